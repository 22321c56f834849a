use std::fmt::{Display, Formatter};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Amount, DonationId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CampaignId(Uuid);

impl CampaignId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CampaignId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for CampaignId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DonorId(Uuid);

impl DonorId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for DonorId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for DonorId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Partial campaign view: only the fields the reconciliation core owns.
///
/// `current_amount` is mutated exclusively by the per-campaign aggregate
/// writer; after all in-flight reconciliations settle it equals the sum of
/// amounts over this campaign's succeeded donations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Campaign {
    pub id: CampaignId,
    pub name: String,
    pub current_amount: Amount,
    pub goal_amount: Amount,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Internal donor record. The identity provider has already authenticated
/// the caller; this maps the opaque verified identity to the payment
/// gateway's customer record for the donor's email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Donor {
    pub id: DonorId,
    pub email: String,
    pub name: Option<String>,
    pub gateway_customer_id: Option<CustomerId>,
}

/// The payment gateway's identifier for a donor's customer record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(String);

impl CustomerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Durable "increment pending" marker (outbox row).
///
/// Written atomically with the first transition into `succeeded` and drained
/// at-least-once by the campaign's aggregate writer. A crash between the
/// status write and the increment leaves the marker behind for replay at
/// boot, so the increment is never silently dropped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncrementRecord {
    pub donation_id: DonationId,
    pub campaign_id: CampaignId,
    pub amount: Amount,
    pub recorded_at: DateTime<Utc>,
}
