use crate::context::*;
use donation::domain::{DonationId, DonationStatus, IntentStatus};
use donation::service::DonationRequest;

#[tokio::test]
async fn test_anonymous_donations_redacted_in_campaign_feed() {
    let ctx = TestContext::new().await;
    let campaign = ctx.seed_campaign("Clean Water", 100_000, 0).await;
    let donor = ctx.seed_donor("ada@example.com").await;

    ctx.initiator
        .create_donation_intent(DonationRequest {
            amount: 5_000,
            campaign_id: campaign,
            donor_id: donor,
            message: Some("good luck!".to_string()),
            is_anonymous: true,
        })
        .await
        .unwrap();
    ctx.donate(1_000, campaign, donor).await;

    let feed = ctx.queries.campaign_donations(&campaign).await.unwrap();
    assert_eq!(feed.len(), 2);

    let anonymous = feed.iter().find(|view| view.is_anonymous).unwrap();
    assert!(anonymous.donor_id.is_none());
    assert_eq!(anonymous.message.as_deref(), Some("good luck!"));

    let named = feed.iter().find(|view| !view.is_anonymous).unwrap();
    assert_eq!(named.donor_id, Some(donor));
}

#[tokio::test]
async fn test_donor_history_is_never_redacted() {
    let ctx = TestContext::new().await;
    let campaign = ctx.seed_campaign("Clean Water", 100_000, 0).await;
    let donor = ctx.seed_donor("ada@example.com").await;

    ctx.initiator
        .create_donation_intent(DonationRequest {
            amount: 5_000,
            campaign_id: campaign,
            donor_id: donor,
            message: None,
            is_anonymous: true,
        })
        .await
        .unwrap();

    let history = ctx.queries.donor_history(&donor).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].donor_id, Some(donor));
}

#[tokio::test]
async fn test_campaign_progress_counts_succeeded_only() {
    let ctx = TestContext::new().await;
    let campaign = ctx.seed_campaign("Clean Water", 10_000, 0).await;
    let donor = ctx.seed_donor("ada@example.com").await;

    let a = ctx.donate(2_000, campaign, donor).await;
    let b = ctx.donate(3_000, campaign, donor).await;
    let c = ctx.donate(4_000, campaign, donor).await;

    ctx.reconciler
        .reconcile(&a.gateway_reference, IntentStatus::Succeeded)
        .await
        .unwrap();
    ctx.reconciler
        .reconcile(&b.gateway_reference, IntentStatus::Succeeded)
        .await
        .unwrap();
    ctx.reconciler
        .reconcile(&c.gateway_reference, IntentStatus::PaymentFailed)
        .await
        .unwrap();
    ctx.settle().await;

    let progress = ctx
        .queries
        .campaign_progress(&campaign)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(progress.current_amount.minor_units(), 5_000);
    assert_eq!(progress.donation_count, 2);
    assert!((progress.percent_funded - 50.0).abs() < f64::EPSILON);
    ctx.shutdown().await;
}

#[tokio::test]
async fn test_receipt_available_once_succeeded() {
    let ctx = TestContext::new().await;
    let campaign = ctx.seed_campaign("Clean Water", 100_000, 0).await;
    let donor = ctx.seed_donor("ada@example.com").await;
    let intent = ctx.donate(2_500, campaign, donor).await;

    // Pending: receipt view exists, provider has no receipt url yet
    let receipt = ctx
        .queries
        .donation_receipt(&intent.donation_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(receipt.status, DonationStatus::Pending);
    assert!(receipt.receipt_url.is_none());

    ctx.gateway
        .set_intent_status(&intent.gateway_reference, IntentStatus::Succeeded)
        .await;
    ctx.reconciler
        .confirm(&intent.gateway_reference, &intent.donation_id)
        .await
        .unwrap();
    ctx.settle().await;

    let receipt = ctx
        .queries
        .donation_receipt(&intent.donation_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(receipt.status, DonationStatus::Succeeded);
    assert!(receipt.receipt_url.is_some());
    ctx.shutdown().await;
}

#[tokio::test]
async fn test_unknown_donation_lookup_is_none() {
    let ctx = TestContext::new().await;

    assert!(ctx.queries.donation(&DonationId::new()).await.unwrap().is_none());
    assert!(ctx
        .queries
        .donation_receipt(&DonationId::new())
        .await
        .unwrap()
        .is_none());
}
