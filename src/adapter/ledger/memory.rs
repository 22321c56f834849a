use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::domain::{
    Amount, Campaign, CampaignId, CustomerId, Donation, DonationError, DonationId, DonationStatus,
    Donor, DonorId, GatewayReference, IncrementRecord, StatusTransition, StorageError,
};
use crate::port::{CampaignStore, DonationStore, DonorStore, IncrementOutbox};

struct LedgerData {
    donations: HashMap<DonationId, Donation>,
    reference_index: HashMap<GatewayReference, DonationId>,
    campaign_index: HashMap<CampaignId, Vec<DonationId>>,
    donor_index: HashMap<DonorId, Vec<DonationId>>,
    campaigns: HashMap<CampaignId, Campaign>,
    donors: HashMap<DonorId, Donor>,
    pending_increments: HashMap<DonationId, IncrementRecord>,
}

/// In-memory ledger implementation.
///
/// One write lock stands in for the backing platform's single-document
/// atomicity: every mutation, including the status compare-and-swap plus its
/// outbox marker, happens under a single lock acquisition. For production,
/// use a store-backed implementation with the same conditional-update
/// semantics.
pub struct InMemoryLedger {
    data: Arc<RwLock<LedgerData>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LedgerData {
                donations: HashMap::new(),
                reference_index: HashMap::new(),
                campaign_index: HashMap::new(),
                donor_index: HashMap::new(),
                campaigns: HashMap::new(),
                donors: HashMap::new(),
                pending_increments: HashMap::new(),
            })),
        }
    }
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DonationStore for InMemoryLedger {
    async fn insert_donation(&self, donation: Donation) -> Result<(), DonationError> {
        let mut data = self.data.write().await;

        if data.reference_index.contains_key(&donation.gateway_reference) {
            return Err(StorageError::Operation(format!(
                "duplicate gateway reference {}",
                donation.gateway_reference
            ))
            .into());
        }

        data.reference_index
            .insert(donation.gateway_reference.clone(), donation.id);
        data.campaign_index
            .entry(donation.campaign_id)
            .or_default()
            .push(donation.id);
        data.donor_index
            .entry(donation.donor_id)
            .or_default()
            .push(donation.id);
        data.donations.insert(donation.id, donation);

        Ok(())
    }

    async fn donation(&self, id: &DonationId) -> Result<Option<Donation>, DonationError> {
        let data = self.data.read().await;
        Ok(data.donations.get(id).cloned())
    }

    async fn find_by_gateway_reference(
        &self,
        reference: &GatewayReference,
    ) -> Result<Option<Donation>, DonationError> {
        let data = self.data.read().await;
        Ok(data
            .reference_index
            .get(reference)
            .and_then(|id| data.donations.get(id))
            .cloned())
    }

    async fn donations_for_campaign(
        &self,
        campaign_id: &CampaignId,
    ) -> Result<Vec<Donation>, DonationError> {
        let data = self.data.read().await;
        Ok(data
            .campaign_index
            .get(campaign_id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| data.donations.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn donations_for_donor(
        &self,
        donor_id: &DonorId,
    ) -> Result<Vec<Donation>, DonationError> {
        let data = self.data.read().await;
        Ok(data
            .donor_index
            .get(donor_id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| data.donations.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn transition_if_pending(
        &self,
        reference: &GatewayReference,
        target: DonationStatus,
        now: DateTime<Utc>,
    ) -> Result<StatusTransition, DonationError> {
        let mut data = self.data.write().await;

        let id = *data.reference_index.get(reference).ok_or_else(|| {
            StorageError::MissingDuringUpdate(format!("gateway reference {reference}"))
        })?;

        let donation = data.donations.get_mut(&id).ok_or_else(|| {
            StorageError::MissingDuringUpdate(format!("donation {id} behind reference index"))
        })?;

        if donation.status != DonationStatus::Pending {
            return Ok(StatusTransition::Superseded(donation.status));
        }

        donation.status = target;
        donation.updated_at = now;
        let donation = donation.clone();

        // Marker written under the same lock as the status flip: the
        // "increment pending" outbox row cannot be lost between the two.
        let increment = if target == DonationStatus::Succeeded {
            let record = IncrementRecord {
                donation_id: donation.id,
                campaign_id: donation.campaign_id,
                amount: donation.amount,
                recorded_at: now,
            };
            data.pending_increments.insert(donation.id, record.clone());
            Some(record)
        } else {
            None
        };

        Ok(StatusTransition::Applied {
            donation,
            increment,
        })
    }
}

#[async_trait]
impl CampaignStore for InMemoryLedger {
    async fn insert_campaign(&self, campaign: Campaign) -> Result<(), DonationError> {
        let mut data = self.data.write().await;
        data.campaigns.insert(campaign.id, campaign);
        Ok(())
    }

    async fn campaign(&self, id: &CampaignId) -> Result<Option<Campaign>, DonationError> {
        let data = self.data.read().await;
        Ok(data.campaigns.get(id).cloned())
    }

    async fn set_current_amount(
        &self,
        id: &CampaignId,
        total: Amount,
        now: DateTime<Utc>,
    ) -> Result<(), DonationError> {
        let mut data = self.data.write().await;
        let campaign = data
            .campaigns
            .get_mut(id)
            .ok_or_else(|| StorageError::MissingDuringUpdate(format!("campaign {id}")))?;
        campaign.current_amount = total;
        campaign.updated_at = now;
        Ok(())
    }
}

#[async_trait]
impl DonorStore for InMemoryLedger {
    async fn insert_donor(&self, donor: Donor) -> Result<(), DonationError> {
        let mut data = self.data.write().await;
        data.donors.insert(donor.id, donor);
        Ok(())
    }

    async fn donor(&self, id: &DonorId) -> Result<Option<Donor>, DonationError> {
        let data = self.data.read().await;
        Ok(data.donors.get(id).cloned())
    }

    async fn set_gateway_customer(
        &self,
        id: &DonorId,
        customer: CustomerId,
    ) -> Result<(), DonationError> {
        let mut data = self.data.write().await;
        let donor = data
            .donors
            .get_mut(id)
            .ok_or_else(|| StorageError::MissingDuringUpdate(format!("donor {id}")))?;
        donor.gateway_customer_id = Some(customer);
        Ok(())
    }
}

#[async_trait]
impl IncrementOutbox for InMemoryLedger {
    async fn pending_increments(&self) -> Result<Vec<IncrementRecord>, DonationError> {
        let data = self.data.read().await;
        Ok(data.pending_increments.values().cloned().collect())
    }

    async fn mark_increment_applied(
        &self,
        donation_id: &DonationId,
    ) -> Result<(), DonationError> {
        let mut data = self.data.write().await;
        data.pending_increments.remove(donation_id);
        Ok(())
    }
}
