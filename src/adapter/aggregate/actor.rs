use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use ractor::{Actor, ActorProcessingErr, ActorRef, RpcReplyPort};

use crate::domain::{CampaignId, DonationError, IncrementRecord, StorageError};
use crate::port::{CampaignStore, IncrementOutbox};

const BASE_RETRY_DELAY: Duration = Duration::from_millis(100);
const MAX_RETRY_DELAY: Duration = Duration::from_secs(5);
const MAX_RETRY_ATTEMPTS: u32 = 10;

/// Messages that can be sent to a CampaignActor
pub enum CampaignActorMessage {
    /// Apply one aggregate increment. No reply port: delivery is
    /// fire-and-forget from the reconciler, at-least-once overall.
    Increment(IncrementRecord),
    /// Rendezvous: replies once every previously enqueued increment has
    /// been applied (the actor processes its mailbox sequentially).
    Flush(RpcReplyPort<()>),
}

pub struct CampaignActorArguments {
    pub campaign_id: CampaignId,
    pub campaigns: Arc<dyn CampaignStore>,
    pub outbox: Arc<dyn IncrementOutbox>,
}

pub struct CampaignActorState {
    pub campaign_id: CampaignId,
    pub campaigns: Arc<dyn CampaignStore>,
    pub outbox: Arc<dyn IncrementOutbox>,
}

/// CampaignActor is the single writer for one campaign's running total.
///
/// The campaign aggregate is the one piece of shared mutable state in the
/// system, and the store only offers single-document atomicity, so the
/// read-modify-write increment must be linearized. Routing every increment
/// for a campaign through this actor's sequential mailbox is that
/// linearization point: two succeeded donations can never interleave their
/// read and write phases.
pub struct CampaignActor;

#[async_trait]
impl Actor for CampaignActor {
    type Msg = CampaignActorMessage;
    type State = CampaignActorState;
    type Arguments = CampaignActorArguments;

    async fn pre_start(
        &self,
        _myself: ActorRef<Self::Msg>,
        args: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        tracing::info!("CampaignActor starting for campaign {}", args.campaign_id);

        Ok(CampaignActorState {
            campaign_id: args.campaign_id,
            campaigns: args.campaigns,
            outbox: args.outbox,
        })
    }

    async fn handle(
        &self,
        _myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        match message {
            CampaignActorMessage::Increment(record) => {
                // The succeeded status is already committed and cannot be
                // un-triggered: retry transient store failures with capped
                // backoff. Retrying inside handle() keeps later increments
                // for this campaign queued behind it, preserving the
                // single-writer ordering. Permanent failures (missing
                // campaign row, total overflow) and the retry budget both
                // abandon the attempt instead of wedging the mailbox; the
                // unacknowledged outbox marker is replayed at boot.
                let mut attempt: u32 = 0;
                let applied = loop {
                    match apply_increment(state, &record).await {
                        Ok(()) => break true,
                        Err(IncrementFailure::Permanent(e)) => {
                            tracing::error!(
                                "campaign {} increment for donation {} cannot be applied, \
                                 leaving its marker for replay: {}",
                                state.campaign_id,
                                record.donation_id,
                                e
                            );
                            break false;
                        }
                        Err(IncrementFailure::Transient(e)) => {
                            attempt += 1;
                            if attempt >= MAX_RETRY_ATTEMPTS {
                                tracing::error!(
                                    "campaign {} increment for donation {} still failing \
                                     after {} attempts, leaving its marker for replay: {}",
                                    state.campaign_id,
                                    record.donation_id,
                                    attempt,
                                    e
                                );
                                break false;
                            }
                            tracing::warn!(
                                "campaign {} increment for donation {} failed (attempt {}): {}",
                                state.campaign_id,
                                record.donation_id,
                                attempt,
                                e
                            );
                            tokio::time::sleep(retry_delay(attempt)).await;
                        }
                    }
                };

                if applied {
                    // Acknowledge the outbox row only after the total landed.
                    // If this removal fails the marker is replayed at boot and
                    // the increment re-applied - at-least-once, by contract.
                    if let Err(e) =
                        state.outbox.mark_increment_applied(&record.donation_id).await
                    {
                        tracing::warn!(
                            "campaign {} could not acknowledge increment for donation {}: {}",
                            state.campaign_id,
                            record.donation_id,
                            e
                        );
                    }

                    tracing::debug!(
                        "campaign {} applied increment of {} for donation {}",
                        state.campaign_id,
                        record.amount,
                        record.donation_id
                    );
                }
            }

            CampaignActorMessage::Flush(reply) => {
                let _ = reply.send(());
            }
        }

        Ok(())
    }
}

/// Transient failures are worth retrying; permanent ones never resolve on
/// their own and would otherwise pin the actor in its backoff loop.
enum IncrementFailure {
    Permanent(DonationError),
    Transient(DonationError),
}

async fn apply_increment(
    state: &CampaignActorState,
    record: &IncrementRecord,
) -> Result<(), IncrementFailure> {
    let campaign = state
        .campaigns
        .campaign(&record.campaign_id)
        .await
        .map_err(IncrementFailure::Transient)?
        .ok_or_else(|| {
            IncrementFailure::Permanent(
                StorageError::MissingDuringUpdate(format!("campaign {}", record.campaign_id))
                    .into(),
            )
        })?;

    let total = campaign.current_amount.checked_add(record.amount).ok_or_else(|| {
        IncrementFailure::Permanent(
            StorageError::Operation(format!("campaign {} total overflow", record.campaign_id))
                .into(),
        )
    })?;

    state
        .campaigns
        .set_current_amount(&record.campaign_id, total, Utc::now())
        .await
        .map_err(IncrementFailure::Transient)
}

fn retry_delay(attempt: u32) -> Duration {
    BASE_RETRY_DELAY
        .saturating_mul(2u32.saturating_pow(attempt.min(8)))
        .min(MAX_RETRY_DELAY)
}

/// Type alias for CampaignActor reference
pub type CampaignActorRef = ActorRef<CampaignActorMessage>;
