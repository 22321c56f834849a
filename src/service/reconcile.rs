use std::sync::Arc;

use chrono::Utc;

use crate::domain::{
    Confirmation, DonationError, DonationId, DonationStatus, GatewayReference, IgnoreReason,
    IntentStatus, ReconcileOutcome, StatusTransition, ValidationError,
};
use crate::port::{DonationStore, IncrementScheduler, PaymentGateway};

/// The single mutation path for donation status.
///
/// Two independent entry points funnel through `reconcile`: the provider's
/// asynchronous webhook feed (signature-verified upstream) and the payer's
/// synchronous confirmation call. Whichever arrives first wins; the other
/// becomes a no-op. Notifications may arrive out of order, duplicated, or
/// not at all - the contract is idempotence, not delivery ordering.
#[derive(Clone)]
pub struct Reconciler {
    donations: Arc<dyn DonationStore>,
    gateway: Arc<dyn PaymentGateway>,
    scheduler: Arc<dyn IncrementScheduler>,
}

impl Reconciler {
    pub fn new(
        donations: Arc<dyn DonationStore>,
        gateway: Arc<dyn PaymentGateway>,
        scheduler: Arc<dyn IncrementScheduler>,
    ) -> Self {
        Self {
            donations,
            gateway,
            scheduler,
        }
    }

    /// Apply one observed provider status to the donation it references:
    /// 1. Look the donation up by gateway reference; unknown references are
    ///    reported and ignored (the webhook transport must still ack them)
    /// 2. Terminal donations short-circuit - this is the idempotence
    ///    guarantee for duplicate delivery
    /// 3. Intermediate provider statuses cause no transition
    /// 4. The transition itself is a conditional update: it applies only if
    ///    the stored status is still pending, so two racing calls cannot
    ///    both win
    /// 5. Iff this call performed the first-ever entry into `succeeded`,
    ///    schedule the campaign increment recorded by the conditional
    ///    update - after the status write, never on duplicates
    pub async fn reconcile(
        &self,
        reference: &GatewayReference,
        observed: IntentStatus,
    ) -> Result<ReconcileOutcome, DonationError> {
        let Some(donation) = self.donations.find_by_gateway_reference(reference).await? else {
            tracing::warn!("notification for unknown gateway reference {reference}, ignoring");
            return Ok(ReconcileOutcome::Ignored {
                reason: IgnoreReason::UnknownReference,
            });
        };

        if donation.status.is_terminal() {
            tracing::debug!(
                "donation {} already {}, ignoring {:?} notification",
                donation.id,
                donation.status,
                observed
            );
            return Ok(ReconcileOutcome::Ignored {
                reason: IgnoreReason::AlreadyTerminal,
            });
        }

        let Some(target) = observed.terminal_target() else {
            tracing::debug!(
                "donation {} saw intermediate status {:?}, staying pending",
                donation.id,
                observed
            );
            return Ok(ReconcileOutcome::Ignored {
                reason: IgnoreReason::NonTerminalStatus,
            });
        };

        match self
            .donations
            .transition_if_pending(reference, target, Utc::now())
            .await?
        {
            StatusTransition::Applied {
                donation,
                increment,
            } => {
                tracing::info!("donation {} transitioned to {}", donation.id, target);

                if let Some(record) = increment {
                    // Status write is committed; the scheduler only enqueues.
                    // If this fails the outbox marker survives for replay.
                    self.scheduler.schedule(record).await?;
                }

                Ok(ReconcileOutcome::Transitioned { status: target })
            }
            StatusTransition::Superseded(current) => {
                tracing::debug!(
                    "donation {} lost transition race, already {}",
                    donation.id,
                    current
                );
                Ok(ReconcileOutcome::Ignored {
                    reason: IgnoreReason::AlreadyTerminal,
                })
            }
        }
    }

    /// Synchronous client-confirmation entry point: the payer's client pings
    /// after finishing the checkout flow, as a fallback for webhook lag.
    /// Retrieves the provider's current intent status and funnels it through
    /// the identical `reconcile` contract.
    pub async fn confirm(
        &self,
        reference: &GatewayReference,
        donation_id: &DonationId,
    ) -> Result<Confirmation, DonationError> {
        let observed = self.gateway.retrieve_intent(reference).await?;

        self.reconcile(reference, observed).await?;

        let donation = self
            .donations
            .find_by_gateway_reference(reference)
            .await?
            .filter(|donation| donation.id == *donation_id)
            .ok_or(ValidationError::DonationNotFound)?;

        Ok(Confirmation {
            success: donation.status == DonationStatus::Succeeded,
            status: donation.status,
        })
    }
}
