use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationError {
    #[error("donation amount {amount} is below the minimum of {minimum}")]
    AmountBelowMinimum { amount: i64, minimum: i64 },
    #[error("donation amount {amount} is above the maximum of {maximum}")]
    AmountAboveMaximum { amount: i64, maximum: i64 },
    #[error("campaign not found")]
    CampaignNotFound,
    #[error("donor not found")]
    DonorNotFound,
    #[error("donation not found")]
    DonationNotFound,
}

/// Failures talking to the payment provider. These are never business-state
/// transitions: the caller may retry, and reconciliation stays idempotent.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GatewayError {
    #[error("gateway request failed: {0}")]
    Request(String),
    #[error("event signature verification failed")]
    SignatureVerification,
    #[error("gateway rejected the operation: {0}")]
    Rejected(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageError {
    #[error("storage operation failed: {0}")]
    Operation(String),
    #[error("record missing during conditional update: {0}")]
    MissingDuringUpdate(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DonationError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
