use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{
    Amount, CampaignId, Donation, DonationError, DonationId, DonationStatus, DonorId,
};
use crate::port::{CampaignStore, DonationStore, PaymentGateway};

/// Read-side projection of a donation. `donor_id` is absent when the
/// donation is anonymous and the view is public-facing.
#[derive(Debug, Clone, Serialize)]
pub struct DonationView {
    pub donation_id: DonationId,
    pub campaign_id: CampaignId,
    pub donor_id: Option<DonorId>,
    pub amount: Amount,
    pub message: Option<String>,
    pub is_anonymous: bool,
    pub status: DonationStatus,
    pub created_at: DateTime<Utc>,
}

impl DonationView {
    fn public(donation: &Donation) -> Self {
        Self {
            donation_id: donation.id,
            campaign_id: donation.campaign_id,
            donor_id: (!donation.is_anonymous).then_some(donation.donor_id),
            amount: donation.amount,
            message: donation.message.clone(),
            is_anonymous: donation.is_anonymous,
            status: donation.status,
            created_at: donation.created_at,
        }
    }

    fn own(donation: &Donation) -> Self {
        Self {
            donor_id: Some(donation.donor_id),
            ..Self::public(donation)
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DonationReceipt {
    pub donation_id: DonationId,
    pub amount: Amount,
    pub status: DonationStatus,
    pub receipt_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CampaignProgress {
    pub campaign_id: CampaignId,
    pub current_amount: Amount,
    pub goal_amount: Amount,
    pub donation_count: usize,
    pub percent_funded: f64,
}

/// Pure projections over the ledger. No invariants of their own; the
/// donor-facing terminal outcome is poll/read-based, so a donation that
/// failed at the gateway surfaces here as `status: failed`, never as an
/// error.
#[derive(Clone)]
pub struct DonationQueries {
    donations: Arc<dyn DonationStore>,
    campaigns: Arc<dyn CampaignStore>,
    gateway: Arc<dyn PaymentGateway>,
}

impl DonationQueries {
    pub fn new(
        donations: Arc<dyn DonationStore>,
        campaigns: Arc<dyn CampaignStore>,
        gateway: Arc<dyn PaymentGateway>,
    ) -> Self {
        Self {
            donations,
            campaigns,
            gateway,
        }
    }

    pub async fn donation(
        &self,
        id: &DonationId,
    ) -> Result<Option<DonationView>, DonationError> {
        let donation = self.donations.donation(id).await?;
        Ok(donation.as_ref().map(DonationView::own))
    }

    pub async fn donation_receipt(
        &self,
        id: &DonationId,
    ) -> Result<Option<DonationReceipt>, DonationError> {
        let Some(donation) = self.donations.donation(id).await? else {
            return Ok(None);
        };

        let receipt_url = if donation.status == DonationStatus::Succeeded {
            self.gateway
                .receipt_url(&donation.gateway_reference)
                .await?
        } else {
            None
        };

        Ok(Some(DonationReceipt {
            donation_id: donation.id,
            amount: donation.amount,
            status: donation.status,
            receipt_url,
        }))
    }

    /// A donor's own history: never redacted.
    pub async fn donor_history(
        &self,
        donor_id: &DonorId,
    ) -> Result<Vec<DonationView>, DonationError> {
        let mut donations = self.donations.donations_for_donor(donor_id).await?;
        donations.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(donations.iter().map(DonationView::own).collect())
    }

    /// Public campaign feed: anonymous donations expose no donor id.
    pub async fn campaign_donations(
        &self,
        campaign_id: &CampaignId,
    ) -> Result<Vec<DonationView>, DonationError> {
        let mut donations = self.donations.donations_for_campaign(campaign_id).await?;
        donations.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(donations.iter().map(DonationView::public).collect())
    }

    pub async fn campaign_progress(
        &self,
        campaign_id: &CampaignId,
    ) -> Result<Option<CampaignProgress>, DonationError> {
        let Some(campaign) = self.campaigns.campaign(campaign_id).await? else {
            return Ok(None);
        };

        let donation_count = self
            .donations
            .donations_for_campaign(campaign_id)
            .await?
            .iter()
            .filter(|donation| donation.status == DonationStatus::Succeeded)
            .count();

        let percent_funded = if campaign.goal_amount.minor_units() > 0 {
            campaign.current_amount.minor_units() as f64
                / campaign.goal_amount.minor_units() as f64
                * 100.0
        } else {
            0.0
        };

        Ok(Some(CampaignProgress {
            campaign_id: campaign.id,
            current_amount: campaign.current_amount,
            goal_amount: campaign.goal_amount,
            donation_count,
            percent_funded,
        }))
    }
}
