use std::sync::Arc;

use crate::adapter::{CampaignRegistry, InMemoryLedger, MockGateway};
use crate::domain::DonationPolicy;
use crate::port::{
    CampaignStore, DonationStore, DonorStore, IncrementOutbox, IncrementScheduler, PaymentGateway,
};
use crate::service::{Config, DonationIntentInitiator, DonationQueries, Reconciler};

/// Fully wired donation system.
pub struct App {
    pub initiator: DonationIntentInitiator,
    pub reconciler: Reconciler,
    pub queries: DonationQueries,
    pub registry: CampaignRegistry,
    pub gateway: Arc<dyn PaymentGateway>,
}

/// Setup the donation system with production wiring:
/// - InMemoryLedger (shared donation/campaign/donor store + increment outbox)
/// - MockGateway (stand-in provider; a real deployment binds the provider
///   SDK behind the same port)
/// - CampaignRegistry (spawns one aggregate-writer actor per campaign on
///   demand)
///
/// Any increment markers left unapplied by a previous run are replayed
/// before the system takes traffic.
pub async fn boot(config: &Config) -> App {
    let ledger = Arc::new(InMemoryLedger::new());
    let gateway: Arc<dyn PaymentGateway> =
        Arc::new(MockGateway::new(config.webhook_secret.clone()));

    let app = assemble(ledger, gateway, config.policy(), String::new()).await;

    tracing::info!("donation system initialized");

    app
}

/// Wire services over explicit adapters. Used by `boot` and by tests that
/// need a shared ledger or a namespaced actor registry.
pub async fn assemble(
    ledger: Arc<InMemoryLedger>,
    gateway: Arc<dyn PaymentGateway>,
    policy: DonationPolicy,
    namespace: String,
) -> App {
    let donations: Arc<dyn DonationStore> = ledger.clone();
    let campaigns: Arc<dyn CampaignStore> = ledger.clone();
    let donors: Arc<dyn DonorStore> = ledger.clone();
    let outbox: Arc<dyn IncrementOutbox> = ledger;

    let registry = CampaignRegistry::with_namespace(campaigns.clone(), outbox, namespace);
    let scheduler: Arc<dyn IncrementScheduler> = Arc::new(registry.clone());

    match registry.recover_pending_increments().await {
        Ok(0) => {}
        Ok(count) => tracing::info!("replayed {count} pending campaign increments"),
        Err(e) => tracing::error!("failed to replay pending campaign increments: {e}"),
    }

    let initiator = DonationIntentInitiator::new(
        donations.clone(),
        campaigns.clone(),
        donors,
        gateway.clone(),
        policy,
    );
    let reconciler = Reconciler::new(donations.clone(), gateway.clone(), scheduler);
    let queries = DonationQueries::new(donations, campaigns, gateway.clone());

    App {
        initiator,
        reconciler,
        queries,
        registry,
        gateway,
    }
}
