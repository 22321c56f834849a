use std::sync::Arc;

use crate::port::PaymentGateway;
use crate::service::{App, DonationIntentInitiator, DonationQueries, Reconciler};

/// Shared state handed to every route handler.
pub struct AppState {
    pub initiator: DonationIntentInitiator,
    pub reconciler: Reconciler,
    pub queries: DonationQueries,
    pub gateway: Arc<dyn PaymentGateway>,
}

impl AppState {
    pub fn new(app: &App) -> Arc<Self> {
        Arc::new(Self {
            initiator: app.initiator.clone(),
            reconciler: app.reconciler.clone(),
            queries: app.queries.clone(),
            gateway: app.gateway.clone(),
        })
    }
}
