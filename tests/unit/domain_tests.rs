use crate::context::amount;
use donation::domain::{
    Amount, DonationPolicy, DonationStatus, IntentStatus, ValidationError,
};

#[test]
fn test_policy_accepts_bounds_inclusive() {
    let policy = DonationPolicy::new(amount(100), amount(10_000));

    assert_eq!(policy.validate(100), Ok(amount(100)));
    assert_eq!(policy.validate(10_000), Ok(amount(10_000)));
    assert_eq!(policy.validate(5_000), Ok(amount(5_000)));
}

#[test]
fn test_policy_rejects_out_of_bounds() {
    let policy = DonationPolicy::new(amount(100), amount(10_000));

    assert_eq!(
        policy.validate(99),
        Err(ValidationError::AmountBelowMinimum {
            amount: 99,
            minimum: 100
        })
    );
    assert_eq!(
        policy.validate(10_001),
        Err(ValidationError::AmountAboveMaximum {
            amount: 10_001,
            maximum: 10_000
        })
    );
}

#[test]
fn test_policy_rejects_negative_as_below_minimum() {
    let policy = DonationPolicy::default();

    assert!(matches!(
        policy.validate(-1),
        Err(ValidationError::AmountBelowMinimum { amount: -1, .. })
    ));
}

#[test]
fn test_amount_rejects_negative() {
    assert!(Amount::from_minor_units(-1).is_none());
    assert_eq!(Amount::from_minor_units(0), Some(Amount::ZERO));
}

#[test]
fn test_amount_checked_add_overflow() {
    let max = Amount::from_minor_units(i64::MAX).unwrap();
    assert!(max.checked_add(amount(1)).is_none());
    assert_eq!(amount(2).checked_add(amount(3)), Some(amount(5)));
}

#[test]
fn test_terminal_target_mapping() {
    assert_eq!(
        IntentStatus::Succeeded.terminal_target(),
        Some(DonationStatus::Succeeded)
    );
    assert_eq!(
        IntentStatus::PaymentFailed.terminal_target(),
        Some(DonationStatus::Failed)
    );
    assert_eq!(
        IntentStatus::Canceled.terminal_target(),
        Some(DonationStatus::Canceled)
    );

    for intermediate in [
        IntentStatus::Processing,
        IntentStatus::RequiresPaymentMethod,
        IntentStatus::RequiresAction,
        IntentStatus::RequiresConfirmation,
        IntentStatus::Unrecognized,
    ] {
        assert_eq!(intermediate.terminal_target(), None);
    }
}

#[test]
fn test_only_pending_is_non_terminal() {
    assert!(!DonationStatus::Pending.is_terminal());
    assert!(DonationStatus::Succeeded.is_terminal());
    assert!(DonationStatus::Failed.is_terminal());
    assert!(DonationStatus::Canceled.is_terminal());
}

#[test]
fn test_unknown_provider_status_parses_as_unrecognized() {
    let status: IntentStatus = serde_json::from_str("\"requires_capture\"").unwrap();
    assert_eq!(status, IntentStatus::Unrecognized);

    let status: IntentStatus = serde_json::from_str("\"succeeded\"").unwrap();
    assert_eq!(status, IntentStatus::Succeeded);
}
