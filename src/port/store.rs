use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{
    Amount, Campaign, CampaignId, CustomerId, Donation, DonationError, DonationId, DonationStatus,
    Donor, DonorId, GatewayReference, IncrementRecord, StatusTransition,
};

/// Donation side of the ledger store.
///
/// The backing store is assumed to provide single-document atomicity and
/// secondary indexes, nothing more (no multi-document transactions). The one
/// non-trivial operation is `transition_if_pending`, the compare-and-swap
/// that makes concurrent reconciliation safe.
#[async_trait]
pub trait DonationStore: Send + Sync {
    /// Insert a new donation. The gateway reference is a unique index;
    /// inserting a duplicate reference is a storage error.
    async fn insert_donation(&self, donation: Donation) -> Result<(), DonationError>;

    async fn donation(&self, id: &DonationId) -> Result<Option<Donation>, DonationError>;

    /// Indexed lookup by the provider's payment-intent id, the sole
    /// correlation key for reconciliation.
    async fn find_by_gateway_reference(
        &self,
        reference: &GatewayReference,
    ) -> Result<Option<Donation>, DonationError>;

    async fn donations_for_campaign(
        &self,
        campaign_id: &CampaignId,
    ) -> Result<Vec<Donation>, DonationError>;

    async fn donations_for_donor(
        &self,
        donor_id: &DonorId,
    ) -> Result<Vec<Donation>, DonationError>;

    /// Conditionally move the donation out of `pending` into `target`.
    ///
    /// The guard and the write happen in one atomic store operation: if the
    /// stored status is no longer `pending`, nothing is written and
    /// `Superseded` carries the current status. When the applied target is
    /// `succeeded`, an `IncrementRecord` outbox marker is recorded in the
    /// same operation so a crash cannot drop the aggregate increment.
    ///
    /// Callers look the donation up first; an unknown reference here is a
    /// storage error, not an ignore.
    async fn transition_if_pending(
        &self,
        reference: &GatewayReference,
        target: DonationStatus,
        now: DateTime<Utc>,
    ) -> Result<StatusTransition, DonationError>;
}

/// Campaign side of the ledger store. `set_current_amount` is a plain write:
/// serialization of the read-modify-write cycle is the aggregate writer's
/// responsibility, not the store's.
#[async_trait]
pub trait CampaignStore: Send + Sync {
    async fn insert_campaign(&self, campaign: Campaign) -> Result<(), DonationError>;

    async fn campaign(&self, id: &CampaignId) -> Result<Option<Campaign>, DonationError>;

    async fn set_current_amount(
        &self,
        id: &CampaignId,
        total: Amount,
        now: DateTime<Utc>,
    ) -> Result<(), DonationError>;
}

#[async_trait]
pub trait DonorStore: Send + Sync {
    async fn insert_donor(&self, donor: Donor) -> Result<(), DonationError>;

    async fn donor(&self, id: &DonorId) -> Result<Option<Donor>, DonationError>;

    async fn set_gateway_customer(
        &self,
        id: &DonorId,
        customer: CustomerId,
    ) -> Result<(), DonationError>;
}

/// Pending-increment markers written by `transition_if_pending`.
///
/// Drained at-least-once: a marker is removed only after the campaign total
/// write landed, and unapplied markers are replayed at boot.
#[async_trait]
pub trait IncrementOutbox: Send + Sync {
    async fn pending_increments(&self) -> Result<Vec<IncrementRecord>, DonationError>;

    async fn mark_increment_applied(
        &self,
        donation_id: &DonationId,
    ) -> Result<(), DonationError>;
}
