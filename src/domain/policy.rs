use serde::{Deserialize, Serialize};

use crate::domain::{Amount, ValidationError};

/// Configured bounds on a single donation, in minor units.
///
/// The bounds are policy, not invariant: they come from configuration and
/// are checked before any gateway or store call.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DonationPolicy {
    pub minimum: Amount,
    pub maximum: Amount,
}

impl DonationPolicy {
    pub fn new(minimum: Amount, maximum: Amount) -> Self {
        Self { minimum, maximum }
    }

    /// Validate a requested amount and convert it to a checked `Amount`.
    /// Negative requests fall under the below-minimum rejection.
    pub fn validate(&self, requested: i64) -> Result<Amount, ValidationError> {
        let amount = Amount::from_minor_units(requested).ok_or(
            ValidationError::AmountBelowMinimum {
                amount: requested,
                minimum: self.minimum.minor_units(),
            },
        )?;

        if amount < self.minimum {
            return Err(ValidationError::AmountBelowMinimum {
                amount: requested,
                minimum: self.minimum.minor_units(),
            });
        }
        if amount > self.maximum {
            return Err(ValidationError::AmountAboveMaximum {
                amount: requested,
                maximum: self.maximum.minor_units(),
            });
        }

        Ok(amount)
    }
}

impl Default for DonationPolicy {
    fn default() -> Self {
        // 1.00 .. 999,999.99 in minor units
        Self {
            minimum: Amount::from_minor_units(100).unwrap_or(Amount::ZERO),
            maximum: Amount::from_minor_units(99_999_999).unwrap_or(Amount::ZERO),
        }
    }
}
