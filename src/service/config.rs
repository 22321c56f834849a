use std::{env, fmt::Display, str::FromStr};

use tracing::{info, warn};

use crate::domain::{Amount, DonationPolicy};

pub struct Config {
    pub port: u16,
    pub webhook_secret: String,
    /// Minimum accepted donation, minor units
    pub minimum_donation: i64,
    /// Maximum accepted donation, minor units
    pub maximum_donation: i64,
}

impl Config {
    pub fn load() -> Self {
        Self {
            port: try_load("DONATION_PORT", "8080"),
            webhook_secret: load_secret("GATEWAY_WEBHOOK_SECRET", "whsec_dev"),
            minimum_donation: try_load("DONATION_MINIMUM", "100"),
            maximum_donation: try_load("DONATION_MAXIMUM", "99999999"),
        }
    }

    pub fn policy(&self) -> DonationPolicy {
        let defaults = DonationPolicy::default();
        DonationPolicy::new(
            Amount::from_minor_units(self.minimum_donation).unwrap_or(defaults.minimum),
            Amount::from_minor_units(self.maximum_donation).unwrap_or(defaults.maximum),
        )
    }
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| {
        warn!("Environment variable {key} not found, using default");
    })
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
        })
        .expect("Environment misconfigured!")
}

fn load_secret(key: &str, default: &str) -> String {
    var(key).unwrap_or_else(|_| {
        warn!("{key} not set, falling back to the development secret");
        default.to_string()
    })
}
