use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::domain::{
    CampaignId, Donation, DonationError, DonationId, DonationPolicy, DonationStatus, DonorId,
    GatewayReference, IntentMetadata, ValidationError,
};
use crate::port::{CampaignStore, DonationStore, DonorStore, PaymentGateway};

/// A validated-and-authenticated donation request. The donor id arrives
/// already verified by the identity provider.
#[derive(Debug, Clone, Deserialize)]
pub struct DonationRequest {
    /// Requested amount in minor units
    pub amount: i64,
    pub campaign_id: CampaignId,
    pub donor_id: DonorId,
    pub message: Option<String>,
    #[serde(default)]
    pub is_anonymous: bool,
}

/// What the payer's client needs to complete checkout.
#[derive(Debug, Clone, Serialize)]
pub struct DonationIntent {
    pub donation_id: DonationId,
    pub gateway_reference: GatewayReference,
    /// Opaque provider token, passed through to the payer's browser
    pub client_secret: String,
}

/// Creates the {gateway intent, pending donation} pair that reconciliation
/// later settles.
#[derive(Clone)]
pub struct DonationIntentInitiator {
    donations: Arc<dyn DonationStore>,
    campaigns: Arc<dyn CampaignStore>,
    donors: Arc<dyn DonorStore>,
    gateway: Arc<dyn PaymentGateway>,
    policy: DonationPolicy,
}

impl DonationIntentInitiator {
    pub fn new(
        donations: Arc<dyn DonationStore>,
        campaigns: Arc<dyn CampaignStore>,
        donors: Arc<dyn DonorStore>,
        gateway: Arc<dyn PaymentGateway>,
        policy: DonationPolicy,
    ) -> Self {
        Self {
            donations,
            campaigns,
            donors,
            gateway,
            policy,
        }
    }

    /// Create a payment intent and record the matching pending donation:
    /// 1. Validate the amount against configured bounds (no side effects yet)
    /// 2. Resolve the campaign and donor (no side effects yet)
    /// 3. Reuse or create the gateway customer for the donor's email
    /// 4. Create the gateway intent, tagged with campaign/donor metadata
    /// 5. Persist the donation in `pending`, keyed by the intent reference
    ///
    /// The campaign aggregate is untouched here - it moves only when the
    /// reconciler confirms success. A gateway failure in step 4 fails the
    /// call with nothing committed; a store failure in step 5 leaves an
    /// orphaned gateway intent, which later reconciliation resolves as an
    /// unknown reference (accepted risk, no distributed transaction).
    pub async fn create_donation_intent(
        &self,
        request: DonationRequest,
    ) -> Result<DonationIntent, DonationError> {
        let amount = self.policy.validate(request.amount)?;

        self.campaigns
            .campaign(&request.campaign_id)
            .await?
            .ok_or(ValidationError::CampaignNotFound)?;

        let donor = self
            .donors
            .donor(&request.donor_id)
            .await?
            .ok_or(ValidationError::DonorNotFound)?;

        if donor.gateway_customer_id.is_none() {
            let customer = self.gateway.find_or_create_customer(&donor.email).await?;
            self.donors
                .set_gateway_customer(&donor.id, customer)
                .await?;
        }

        let intent = self
            .gateway
            .create_intent(
                amount,
                IntentMetadata {
                    campaign_id: request.campaign_id,
                    donor_id: request.donor_id,
                    message: request.message.clone(),
                },
            )
            .await?;

        let now = Utc::now();
        let donation = Donation {
            id: DonationId::new(),
            gateway_reference: intent.reference.clone(),
            campaign_id: request.campaign_id,
            donor_id: request.donor_id,
            amount,
            message: request.message,
            is_anonymous: request.is_anonymous,
            status: DonationStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        let donation_id = donation.id;

        if let Err(e) = self.donations.insert_donation(donation).await {
            tracing::error!(
                "donation persistence failed after intent {} was created; \
                 the intent is orphaned and later notifications for it will \
                 be ignored: {}",
                intent.reference,
                e
            );
            return Err(e);
        }

        tracing::info!(
            "created donation {} ({} minor units) for campaign {} via intent {}",
            donation_id,
            amount,
            request.campaign_id,
            intent.reference
        );

        Ok(DonationIntent {
            donation_id,
            gateway_reference: intent.reference,
            client_secret: intent.client_secret,
        })
    }
}
