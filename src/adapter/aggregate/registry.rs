use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use ractor::{rpc::CallResult, Actor, ActorRef};

use crate::adapter::{CampaignActor, CampaignActorArguments, CampaignActorMessage};
use crate::domain::{CampaignId, DonationError, IncrementRecord, StorageError};
use crate::port::{CampaignStore, IncrementOutbox, IncrementScheduler};

use super::actor::CampaignActorRef;

/// CampaignRegistry uses ractor's global registry for campaign-actor lookup.
///
/// Relying on the built-in named-actor registry instead of a local map means
/// one campaign can never end up with two competing writers: if two callers
/// race to spawn the same campaign actor, only one spawn succeeds and the
/// loser finds the winner by name. That uniqueness is what makes the actor a
/// valid linearization point for the campaign total.
#[derive(Clone)]
pub struct CampaignRegistry {
    /// Campaigns this process has scheduled increments for (flush/shutdown
    /// bookkeeping only, not used for routing)
    touched: Arc<Mutex<HashSet<CampaignId>>>,
    /// Shared campaign store (passed to spawned actors)
    campaigns: Arc<dyn CampaignStore>,
    /// Shared increment outbox (passed to spawned actors)
    outbox: Arc<dyn IncrementOutbox>,
    /// Namespace prefix for actor names (for test isolation)
    namespace: String,
}

impl CampaignRegistry {
    pub fn new(campaigns: Arc<dyn CampaignStore>, outbox: Arc<dyn IncrementOutbox>) -> Self {
        Self {
            touched: Arc::new(Mutex::new(HashSet::new())),
            campaigns,
            outbox,
            namespace: String::new(),
        }
    }

    /// Create a registry with a custom namespace for test isolation.
    ///
    /// ## Warning: This is NOT MEANT FOR PRODUCTION USE. Only for testing purposes.
    pub fn with_namespace(
        campaigns: Arc<dyn CampaignStore>,
        outbox: Arc<dyn IncrementOutbox>,
        namespace: String,
    ) -> Self {
        Self {
            touched: Arc::new(Mutex::new(HashSet::new())),
            campaigns,
            outbox,
            namespace,
        }
    }

    fn actor_name(&self, campaign_id: &CampaignId) -> String {
        if self.namespace.is_empty() {
            format!("campaign-{campaign_id}")
        } else {
            format!("{}-campaign-{campaign_id}", self.namespace)
        }
    }

    /// Get or spawn the single writer actor for a campaign.
    pub async fn get_or_spawn(
        &self,
        campaign_id: &CampaignId,
    ) -> Result<CampaignActorRef, DonationError> {
        let actor_name = self.actor_name(campaign_id);

        // Fast path: check the global registry
        if let Some(actor_ref) = ActorRef::<CampaignActorMessage>::where_is(actor_name.clone()) {
            return Ok(actor_ref);
        }

        // Slow path: spawn with a global name. A concurrent caller may win
        // this race; the named registry guarantees a single actor either way.
        let args = CampaignActorArguments {
            campaign_id: *campaign_id,
            campaigns: self.campaigns.clone(),
            outbox: self.outbox.clone(),
        };

        match Actor::spawn(Some(actor_name.clone()), CampaignActor, args).await {
            Ok((actor_ref, _handle)) => Ok(actor_ref),
            Err(e) => {
                // Spawn failed - maybe the race was lost? Look up once more
                // before giving up.
                if let Some(actor_ref) = ActorRef::<CampaignActorMessage>::where_is(actor_name) {
                    Ok(actor_ref)
                } else {
                    Err(StorageError::Operation(format!(
                        "failed to spawn or find campaign actor: {e:?}"
                    ))
                    .into())
                }
            }
        }
    }

    /// Replay unacknowledged outbox markers, e.g. after a restart that
    /// interrupted in-flight increments. Returns how many were re-scheduled.
    pub async fn recover_pending_increments(&self) -> Result<usize, DonationError> {
        let records = self.outbox.pending_increments().await?;
        let count = records.len();

        for record in records {
            tracing::info!(
                "replaying pending increment for donation {} (campaign {})",
                record.donation_id,
                record.campaign_id
            );
            self.schedule(record).await?;
        }

        Ok(count)
    }

    /// Wait until every increment already enqueued for this campaign has
    /// been applied. No-op if the campaign has no actor.
    pub async fn flush(&self, campaign_id: &CampaignId) -> Result<(), DonationError> {
        let actor_name = self.actor_name(campaign_id);

        let Some(actor_ref) = ActorRef::<CampaignActorMessage>::where_is(actor_name) else {
            return Ok(());
        };

        match actor_ref
            .call(
                CampaignActorMessage::Flush,
                Some(std::time::Duration::from_secs(10)),
            )
            .await
        {
            Ok(CallResult::Success(())) => Ok(()),
            Ok(CallResult::Timeout) => {
                Err(StorageError::Operation("campaign actor flush timeout".to_string()).into())
            }
            Ok(CallResult::SenderError) => {
                Err(StorageError::Operation("campaign actor sender error".to_string()).into())
            }
            Err(e) => Err(StorageError::Operation(format!(
                "failed to flush campaign actor: {e:?}"
            ))
            .into()),
        }
    }

    /// Flush every campaign this registry has scheduled increments for.
    pub async fn flush_all(&self) -> Result<(), DonationError> {
        let campaign_ids: Vec<CampaignId> = {
            let touched = self.touched.lock().unwrap();
            touched.iter().copied().collect()
        };

        for campaign_id in campaign_ids {
            self.flush(&campaign_id).await?;
        }

        Ok(())
    }

    /// Stop all campaign actors this registry has touched.
    pub async fn shutdown_all(&self) {
        let campaign_ids: Vec<CampaignId> = {
            let touched = self.touched.lock().unwrap();
            touched.iter().copied().collect()
        };

        for campaign_id in campaign_ids {
            let actor_name = self.actor_name(&campaign_id);
            if let Some(actor_ref) = ActorRef::<CampaignActorMessage>::where_is(actor_name) {
                actor_ref.stop(None);
            }
        }

        self.touched.lock().unwrap().clear();
    }
}

#[async_trait]
impl IncrementScheduler for CampaignRegistry {
    async fn schedule(&self, record: IncrementRecord) -> Result<(), DonationError> {
        self.touched.lock().unwrap().insert(record.campaign_id);

        let actor_ref = self.get_or_spawn(&record.campaign_id).await?;

        actor_ref
            .cast(CampaignActorMessage::Increment(record))
            .map_err(|e| {
                StorageError::Operation(format!(
                    "failed to enqueue increment on campaign actor: {e:?}"
                ))
                .into()
            })
    }
}
