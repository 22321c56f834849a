use async_trait::async_trait;

use crate::domain::{
    Amount, CustomerId, DonationError, GatewayEvent, GatewayReference, IntentMetadata,
    IntentStatus, PaymentIntent,
};

/// Client seam to the payment provider.
///
/// The provider's protocol (charge creation, signature schemes) lives behind
/// this trait; the reconciliation core only specifies the logic layered on
/// top. All calls are network I/O from the caller's perspective and may fail
/// with `GatewayError` without any business-state change.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a payment intent for the validated amount, tagged with
    /// campaign/donor metadata for auditability.
    async fn create_intent(
        &self,
        amount: Amount,
        metadata: IntentMetadata,
    ) -> Result<PaymentIntent, DonationError>;

    /// Retrieve the provider's current status for an intent. Used by the
    /// client-confirmation path as a fallback when the webhook lags.
    async fn retrieve_intent(
        &self,
        reference: &GatewayReference,
    ) -> Result<IntentStatus, DonationError>;

    /// Verify an event notification's signature and parse it.
    ///
    /// Must be called before any reconciliation; a verification failure is a
    /// `GatewayError`, never a state transition.
    fn verify_event(&self, payload: &[u8], signature: &str)
        -> Result<GatewayEvent, DonationError>;

    /// Reuse or create the gateway customer record for a donor's email.
    async fn find_or_create_customer(&self, email: &str) -> Result<CustomerId, DonationError>;

    /// Receipt URL for a settled charge, when the provider exposes one.
    async fn receipt_url(
        &self,
        reference: &GatewayReference,
    ) -> Result<Option<String>, DonationError>;
}
