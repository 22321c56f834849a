use serde::{Deserialize, Serialize};

use crate::domain::{CampaignId, DonationStatus, DonorId, GatewayReference};

/// Payment-intent status vocabulary as reported by the provider.
///
/// Only three of these are terminal for a donation; everything else is an
/// intermediate step of the payer's checkout flow and causes no transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentStatus {
    Succeeded,
    Processing,
    RequiresPaymentMethod,
    RequiresAction,
    RequiresConfirmation,
    PaymentFailed,
    Canceled,
    /// Any provider status outside the vocabulary above. Tolerated and
    /// treated as non-terminal so that new provider statuses never poison
    /// webhook delivery.
    #[serde(other)]
    Unrecognized,
}

impl IntentStatus {
    /// Map an observed provider status to the donation state it finalizes,
    /// or None when the status is intermediate.
    pub fn terminal_target(self) -> Option<DonationStatus> {
        match self {
            IntentStatus::Succeeded => Some(DonationStatus::Succeeded),
            IntentStatus::PaymentFailed => Some(DonationStatus::Failed),
            IntentStatus::Canceled => Some(DonationStatus::Canceled),
            IntentStatus::Processing
            | IntentStatus::RequiresPaymentMethod
            | IntentStatus::RequiresAction
            | IntentStatus::RequiresConfirmation
            | IntentStatus::Unrecognized => None,
        }
    }
}

/// A freshly created payment intent. The client secret is opaque to this
/// system and passed through to the payer's browser.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentIntent {
    pub reference: GatewayReference,
    pub client_secret: String,
    pub status: IntentStatus,
}

/// Audit tags attached to the gateway intent at creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentMetadata {
    pub campaign_id: CampaignId,
    pub donor_id: DonorId,
    pub message: Option<String>,
}

/// A signature-verified provider notification. Ephemeral: a stimulus, not an
/// entity. Duplicate delivery of the same event is expected (at-least-once
/// webhook semantics) and must be tolerated downstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayEvent {
    pub event_type: String,
    pub reference: GatewayReference,
    pub status: IntentStatus,
}
