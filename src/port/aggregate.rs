use async_trait::async_trait;

use crate::domain::{DonationError, IncrementRecord};

/// Hand-off seam between the reconciler and the per-campaign aggregate
/// writer.
///
/// Fire-and-forget from the reconciler's perspective: `schedule` only
/// enqueues. The implementation must deliver the increment to a single
/// writer per campaign (the linearization point for the shared total) and
/// guarantee at-least-once execution: the `succeeded` status is already
/// committed by the time this is called and cannot be un-triggered.
#[async_trait]
pub trait IncrementScheduler: Send + Sync {
    async fn schedule(&self, record: IncrementRecord) -> Result<(), DonationError>;
}
