use std::fmt::{Display, Formatter};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{CampaignId, DonorId, IncrementRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DonationId(Uuid);

impl DonationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for DonationId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for DonationId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// The payment provider's identifier for a single payment attempt.
///
/// Assigned exactly once when the intent is created and never mutated.
/// This is the sole correlation key between a donation record and the
/// provider's asynchronous notifications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GatewayReference(String);

impl GatewayReference {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for GatewayReference {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Monetary value in minor units (cents). Never negative.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Amount(i64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    /// Returns None for negative values.
    pub fn from_minor_units(minor_units: i64) -> Option<Self> {
        if minor_units >= 0 {
            Some(Self(minor_units))
        } else {
            None
        }
    }

    pub fn minor_units(self) -> i64 {
        self.0
    }

    pub fn checked_add(self, other: Amount) -> Option<Amount> {
        self.0.checked_add(other.0).map(Amount)
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Lifecycle of a donation. `Pending` is the only non-terminal state;
/// the three terminal states never transition again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DonationStatus {
    Pending,
    Succeeded,
    Failed,
    Canceled,
}

impl DonationStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, DonationStatus::Pending)
    }
}

impl Display for DonationStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            DonationStatus::Pending => "pending",
            DonationStatus::Succeeded => "succeeded",
            DonationStatus::Failed => "failed",
            DonationStatus::Canceled => "canceled",
        };
        f.write_str(s)
    }
}

/// One attempted transfer of funds from a donor to a campaign.
///
/// Created `pending` by the intent initiator and mutated only by the
/// reconciler. `gateway_reference` and `amount` are immutable after
/// creation. A donation contributes to its campaign's aggregate iff it
/// reached `succeeded`, exactly once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Donation {
    pub id: DonationId,
    pub gateway_reference: GatewayReference,
    pub campaign_id: CampaignId,
    pub donor_id: DonorId,
    pub amount: Amount,
    pub message: Option<String>,
    /// Controls read-side redaction only; the donor identity is still
    /// recorded for receipts and administration.
    pub is_anonymous: bool,
    pub status: DonationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Result of the conditional status update.
///
/// `Applied` means this call performed the one and only transition out of
/// `pending`; `increment` is the outbox marker recorded atomically with a
/// transition into `succeeded` (None for failed/canceled).
/// `Superseded` means another caller won the race; the stored status is
/// returned unchanged.
#[derive(Debug, Clone)]
pub enum StatusTransition {
    Applied {
        donation: Donation,
        increment: Option<IncrementRecord>,
    },
    Superseded(DonationStatus),
}
