use chrono::Utc;

use crate::context::*;
use donation::domain::{Campaign, CampaignId, DonationId, IncrementRecord};
use donation::port::{CampaignStore, IncrementScheduler};

fn increment(campaign_id: CampaignId, minor_units: i64) -> IncrementRecord {
    IncrementRecord {
        donation_id: DonationId::new(),
        campaign_id,
        amount: amount(minor_units),
        recorded_at: Utc::now(),
    }
}

#[tokio::test]
async fn test_increment_for_missing_campaign_does_not_wedge_actor() {
    let ctx = TestContext::new().await;
    let campaign_id = CampaignId::new();

    // No campaign row exists: the writer must abandon this increment
    // rather than retry forever, or this flush times out.
    ctx.registry
        .schedule(increment(campaign_id, 1_000))
        .await
        .unwrap();
    ctx.registry.flush(&campaign_id).await.unwrap();

    // The same actor stays serviceable once the row appears.
    let now = Utc::now();
    ctx.ledger
        .insert_campaign(Campaign {
            id: campaign_id,
            name: "Night Shelter".to_string(),
            current_amount: amount(0),
            goal_amount: amount(100_000),
            created_at: now,
            updated_at: now,
        })
        .await
        .unwrap();

    ctx.registry
        .schedule(increment(campaign_id, 2_000))
        .await
        .unwrap();
    ctx.registry.flush(&campaign_id).await.unwrap();

    assert_eq!(ctx.campaign_total(&campaign_id).await, 2_000);
    ctx.shutdown().await;
}

#[tokio::test]
async fn test_overflowing_increment_abandoned_without_blocking() {
    let ctx = TestContext::new().await;
    let campaign = ctx.seed_campaign("Night Shelter", 100_000, 1_000).await;

    ctx.registry
        .schedule(increment(campaign, i64::MAX))
        .await
        .unwrap();
    ctx.registry.flush(&campaign).await.unwrap();
    assert_eq!(ctx.campaign_total(&campaign).await, 1_000);

    ctx.registry
        .schedule(increment(campaign, 500))
        .await
        .unwrap();
    ctx.registry.flush(&campaign).await.unwrap();
    assert_eq!(ctx.campaign_total(&campaign).await, 1_500);
    ctx.shutdown().await;
}
