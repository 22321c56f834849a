use crate::context::*;
use donation::domain::{
    DonationError, DonationPolicy, DonationStatus, IgnoreReason, IntentStatus, ReconcileOutcome,
    ValidationError,
};

/// Policy admitting the small donation sizes these scenarios use.
fn small_donation_policy() -> DonationPolicy {
    DonationPolicy::new(amount(1), amount(100_000_000))
}

#[tokio::test]
async fn test_succeeded_notification_settles_donation_and_campaign() {
    // 50 against a campaign sitting at 1000 settles to 1050
    let ctx = TestContext::with_policy(small_donation_policy()).await;
    let campaign = ctx.seed_campaign("Clean Water", 100_000, 1_000).await;
    let donor = ctx.seed_donor("ada@example.com").await;
    let intent = ctx.donate(50, campaign, donor).await;

    let outcome = ctx
        .reconciler
        .reconcile(&intent.gateway_reference, IntentStatus::Succeeded)
        .await
        .unwrap();

    assert_eq!(
        outcome,
        ReconcileOutcome::Transitioned {
            status: DonationStatus::Succeeded
        }
    );

    ctx.settle().await;
    let donation = ctx.donation_by_reference(&intent.gateway_reference).await;
    assert_eq!(donation.status, DonationStatus::Succeeded);
    assert_eq!(ctx.campaign_total(&campaign).await, 1_050);
    ctx.shutdown().await;
}

#[tokio::test]
async fn test_failed_notification_leaves_campaign_untouched() {
    let ctx = TestContext::with_policy(small_donation_policy()).await;
    let campaign = ctx.seed_campaign("Clean Water", 100_000, 1_000).await;
    let donor = ctx.seed_donor("ada@example.com").await;
    let intent = ctx.donate(50, campaign, donor).await;

    let outcome = ctx
        .reconciler
        .reconcile(&intent.gateway_reference, IntentStatus::PaymentFailed)
        .await
        .unwrap();

    assert_eq!(
        outcome,
        ReconcileOutcome::Transitioned {
            status: DonationStatus::Failed
        }
    );

    ctx.settle().await;
    let donation = ctx.donation_by_reference(&intent.gateway_reference).await;
    assert_eq!(donation.status, DonationStatus::Failed);
    assert_eq!(ctx.campaign_total(&campaign).await, 1_000);
}

#[tokio::test]
async fn test_canceled_notification() {
    let ctx = TestContext::new().await;
    let campaign = ctx.seed_campaign("Clean Water", 100_000, 0).await;
    let donor = ctx.seed_donor("ada@example.com").await;
    let intent = ctx.donate(2_500, campaign, donor).await;

    let outcome = ctx
        .reconciler
        .reconcile(&intent.gateway_reference, IntentStatus::Canceled)
        .await
        .unwrap();

    assert_eq!(
        outcome,
        ReconcileOutcome::Transitioned {
            status: DonationStatus::Canceled
        }
    );
    let donation = ctx.donation_by_reference(&intent.gateway_reference).await;
    assert_eq!(donation.status, DonationStatus::Canceled);
}

#[tokio::test]
async fn test_intermediate_status_causes_no_transition() {
    let ctx = TestContext::new().await;
    let campaign = ctx.seed_campaign("Clean Water", 100_000, 0).await;
    let donor = ctx.seed_donor("ada@example.com").await;
    let intent = ctx.donate(2_500, campaign, donor).await;

    for status in [
        IntentStatus::Processing,
        IntentStatus::RequiresAction,
        IntentStatus::RequiresConfirmation,
        IntentStatus::Unrecognized,
    ] {
        let outcome = ctx
            .reconciler
            .reconcile(&intent.gateway_reference, status)
            .await
            .unwrap();
        assert_eq!(
            outcome,
            ReconcileOutcome::Ignored {
                reason: IgnoreReason::NonTerminalStatus
            }
        );
    }

    let donation = ctx.donation_by_reference(&intent.gateway_reference).await;
    assert_eq!(donation.status, DonationStatus::Pending);
    assert_eq!(ctx.campaign_total(&campaign).await, 0);
}

#[tokio::test]
async fn test_terminal_state_never_regresses() {
    let ctx = TestContext::new().await;
    let campaign = ctx.seed_campaign("Clean Water", 100_000, 0).await;
    let donor = ctx.seed_donor("ada@example.com").await;
    let intent = ctx.donate(2_500, campaign, donor).await;

    ctx.reconciler
        .reconcile(&intent.gateway_reference, IntentStatus::PaymentFailed)
        .await
        .unwrap();

    // A late success notification for an already-failed donation must not
    // resurrect it or touch the aggregate.
    let outcome = ctx
        .reconciler
        .reconcile(&intent.gateway_reference, IntentStatus::Succeeded)
        .await
        .unwrap();

    assert_eq!(
        outcome,
        ReconcileOutcome::Ignored {
            reason: IgnoreReason::AlreadyTerminal
        }
    );
    let donation = ctx.donation_by_reference(&intent.gateway_reference).await;
    assert_eq!(donation.status, DonationStatus::Failed);
    assert_eq!(ctx.campaign_total(&campaign).await, 0);
}

#[tokio::test]
async fn test_confirm_drives_transition_when_webhook_lags() {
    let ctx = TestContext::new().await;
    let campaign = ctx.seed_campaign("Clean Water", 100_000, 0).await;
    let donor = ctx.seed_donor("ada@example.com").await;
    let intent = ctx.donate(2_500, campaign, donor).await;

    ctx.gateway
        .set_intent_status(&intent.gateway_reference, IntentStatus::Succeeded)
        .await;

    let confirmation = ctx
        .reconciler
        .confirm(&intent.gateway_reference, &intent.donation_id)
        .await
        .unwrap();

    assert!(confirmation.success);
    assert_eq!(confirmation.status, DonationStatus::Succeeded);

    ctx.settle().await;
    assert_eq!(ctx.campaign_total(&campaign).await, 2_500);
    ctx.shutdown().await;
}

#[tokio::test]
async fn test_confirm_while_payment_still_in_flight() {
    let ctx = TestContext::new().await;
    let campaign = ctx.seed_campaign("Clean Water", 100_000, 0).await;
    let donor = ctx.seed_donor("ada@example.com").await;
    let intent = ctx.donate(2_500, campaign, donor).await;

    ctx.gateway
        .set_intent_status(&intent.gateway_reference, IntentStatus::Processing)
        .await;

    let confirmation = ctx
        .reconciler
        .confirm(&intent.gateway_reference, &intent.donation_id)
        .await
        .unwrap();

    assert!(!confirmation.success);
    assert_eq!(confirmation.status, DonationStatus::Pending);
}

#[tokio::test]
async fn test_confirm_with_mismatched_donation_id() {
    let ctx = TestContext::new().await;
    let campaign = ctx.seed_campaign("Clean Water", 100_000, 0).await;
    let donor = ctx.seed_donor("ada@example.com").await;
    let first = ctx.donate(2_500, campaign, donor).await;
    let second = ctx.donate(1_000, campaign, donor).await;

    ctx.gateway
        .set_intent_status(&first.gateway_reference, IntentStatus::Succeeded)
        .await;

    let result = ctx
        .reconciler
        .confirm(&first.gateway_reference, &second.donation_id)
        .await;

    assert!(matches!(
        result,
        Err(DonationError::Validation(ValidationError::DonationNotFound))
    ));
    ctx.settle().await;
    ctx.shutdown().await;
}
