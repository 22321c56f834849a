use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::domain::{
    Amount, CustomerId, DonationError, GatewayError, GatewayEvent, GatewayReference,
    IntentMetadata, IntentStatus, PaymentIntent,
};
use crate::port::PaymentGateway;

/// One intent as the mock provider sees it. Exposed so tests can assert on
/// the metadata tagged at creation.
#[derive(Debug, Clone)]
pub struct MockIntent {
    pub reference: GatewayReference,
    pub client_secret: String,
    pub amount: Amount,
    pub status: IntentStatus,
    pub metadata: IntentMetadata,
}

#[derive(Serialize, Deserialize)]
struct EventPayload {
    #[serde(rename = "type")]
    event_type: String,
    reference: String,
    status: IntentStatus,
}

struct GatewayData {
    intents: HashMap<GatewayReference, MockIntent>,
    customers: HashMap<String, CustomerId>,
    counter: u64,
    fail_next_create: bool,
}

/// Deterministic in-memory payment gateway.
///
/// A production deployment binds the provider's SDK behind the same port;
/// this adapter issues `pi_N` references, keeps intent statuses scriptable,
/// and verifies event signatures against a shared secret.
pub struct MockGateway {
    data: Arc<RwLock<GatewayData>>,
    webhook_secret: String,
}

impl MockGateway {
    pub fn new(webhook_secret: impl Into<String>) -> Self {
        Self {
            data: Arc::new(RwLock::new(GatewayData {
                intents: HashMap::new(),
                customers: HashMap::new(),
                counter: 0,
                fail_next_create: false,
            })),
            webhook_secret: webhook_secret.into(),
        }
    }

    /// Script the provider-side status of an intent.
    ///
    /// ## Warning: This is NOT MEANT FOR PRODUCTION USE. Only for testing purposes.
    pub async fn set_intent_status(&self, reference: &GatewayReference, status: IntentStatus) {
        let mut data = self.data.write().await;
        if let Some(intent) = data.intents.get_mut(reference) {
            intent.status = status;
        }
    }

    /// Make the next `create_intent` fail with a simulated outage.
    ///
    /// ## Warning: This is NOT MEANT FOR PRODUCTION USE. Only for testing purposes.
    pub async fn fail_next_create(&self) {
        self.data.write().await.fail_next_create = true;
    }

    pub async fn intent(&self, reference: &GatewayReference) -> Option<MockIntent> {
        self.data.read().await.intents.get(reference).cloned()
    }

    pub async fn intent_count(&self) -> usize {
        self.data.read().await.intents.len()
    }

    /// Valid signature for this gateway's webhook payloads.
    pub fn signature(&self) -> String {
        format!("v1={}", self.webhook_secret)
    }

    /// Serialized event payload as the provider would deliver it.
    pub fn event_payload(
        reference: &GatewayReference,
        event_type: &str,
        status: IntentStatus,
    ) -> Vec<u8> {
        // Serialization of a plain struct with string/enum fields cannot fail.
        serde_json::to_vec(&EventPayload {
            event_type: event_type.to_string(),
            reference: reference.as_str().to_string(),
            status,
        })
        .unwrap_or_default()
    }
}

#[async_trait]
impl PaymentGateway for MockGateway {
    async fn create_intent(
        &self,
        amount: Amount,
        metadata: IntentMetadata,
    ) -> Result<PaymentIntent, DonationError> {
        let mut data = self.data.write().await;

        if data.fail_next_create {
            data.fail_next_create = false;
            return Err(GatewayError::Request("simulated provider outage".to_string()).into());
        }

        data.counter += 1;
        let reference = GatewayReference::new(format!("pi_{}", data.counter));
        let client_secret = format!("{}_secret_{}", reference, data.counter);

        let intent = MockIntent {
            reference: reference.clone(),
            client_secret: client_secret.clone(),
            amount,
            status: IntentStatus::RequiresPaymentMethod,
            metadata,
        };
        data.intents.insert(reference.clone(), intent);

        Ok(PaymentIntent {
            reference,
            client_secret,
            status: IntentStatus::RequiresPaymentMethod,
        })
    }

    async fn retrieve_intent(
        &self,
        reference: &GatewayReference,
    ) -> Result<IntentStatus, DonationError> {
        let data = self.data.read().await;
        data.intents
            .get(reference)
            .map(|intent| intent.status)
            .ok_or_else(|| {
                GatewayError::Rejected(format!("no such payment intent: {reference}")).into()
            })
    }

    fn verify_event(
        &self,
        payload: &[u8],
        signature: &str,
    ) -> Result<GatewayEvent, DonationError> {
        if signature != self.signature() {
            return Err(GatewayError::SignatureVerification.into());
        }

        let event: EventPayload = serde_json::from_slice(payload)
            .map_err(|e| GatewayError::Rejected(format!("malformed event payload: {e}")))?;

        Ok(GatewayEvent {
            event_type: event.event_type,
            reference: GatewayReference::new(event.reference),
            status: event.status,
        })
    }

    async fn find_or_create_customer(&self, email: &str) -> Result<CustomerId, DonationError> {
        let mut data = self.data.write().await;

        if let Some(customer) = data.customers.get(email) {
            return Ok(customer.clone());
        }

        data.counter += 1;
        let customer = CustomerId::new(format!("cus_{}", data.counter));
        data.customers.insert(email.to_string(), customer.clone());
        Ok(customer)
    }

    async fn receipt_url(
        &self,
        reference: &GatewayReference,
    ) -> Result<Option<String>, DonationError> {
        let data = self.data.read().await;
        Ok(data
            .intents
            .get(reference)
            .filter(|intent| intent.status == IntentStatus::Succeeded)
            .map(|intent| format!("https://pay.example.com/receipts/{}", intent.reference)))
    }
}
