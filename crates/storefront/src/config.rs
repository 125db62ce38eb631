//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional; defaults match the live site.
//!
//! - `STOREFRONT_SHIPPING_FEE` - Flat shipping fee in dollars (default: 9.99)
//! - `STOREFRONT_TAX_RATE` - Sales tax rate as a fraction (default: 0.08)
//! - `STOREFRONT_PAYMENT_DELAY_MS` - Simulated payment latency (default: 2500)
//! - `STOREFRONT_CONTACT_DELAY_MS` - Simulated contact form latency (default: 1000)
//! - `STOREFRONT_ORDER_PREFIX` - Order number prefix (default: TBG)
//! - `STOREFRONT_CATALOG_PATH` - JSON product catalog (default: built-in catalog)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use rust_decimal::Decimal;
use thiserror::Error;

use balance_guru_core::Price;

const DEFAULT_SHIPPING_FEE_CENTS: i64 = 999;
const DEFAULT_TAX_RATE_PERCENT: i64 = 8;
const DEFAULT_PAYMENT_DELAY_MS: u64 = 2500;
const DEFAULT_CONTACT_DELAY_MS: u64 = 1000;
const DEFAULT_ORDER_PREFIX: &str = "TBG";
const MAX_ORDER_PREFIX_LENGTH: usize = 8;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Order total pricing constants
    pub pricing: PricingConfig,
    /// Simulated latency of the payment step
    pub payment_delay: Duration,
    /// Simulated latency of the contact form
    pub contact_delay: Duration,
    /// Prefix for customer-facing order numbers (e.g. `TBG` in `#TBG4K2J9QZX`)
    pub order_prefix: String,
    /// Optional path to a JSON catalog replacing the built-in one
    pub catalog_path: Option<PathBuf>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// Fixed constants used to compute checkout totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingConfig {
    /// Flat shipping fee added to every order
    pub shipping_fee: Price,
    /// Tax rate applied to the subtotal
    pub tax_rate: Decimal,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            shipping_fee: Price::from_cents(DEFAULT_SHIPPING_FEE_CENTS),
            tax_rate: Decimal::new(DEFAULT_TAX_RATE_PERCENT, 2),
        }
    }
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            pricing: PricingConfig::default(),
            payment_delay: Duration::from_millis(DEFAULT_PAYMENT_DELAY_MS),
            contact_delay: Duration::from_millis(DEFAULT_CONTACT_DELAY_MS),
            order_prefix: DEFAULT_ORDER_PREFIX.to_string(),
            catalog_path: None,
            sentry_dsn: None,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed or is
    /// out of range.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// `from_env` delegates here; tests pass a map instead of mutating the
    /// process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a present value is invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let shipping_fee = parse_or(
            "STOREFRONT_SHIPPING_FEE",
            &lookup,
            defaults.pricing.shipping_fee.amount(),
        )?;
        if shipping_fee.is_sign_negative() && !shipping_fee.is_zero() {
            return Err(invalid("STOREFRONT_SHIPPING_FEE", "must not be negative"));
        }

        let tax_rate = parse_or("STOREFRONT_TAX_RATE", &lookup, defaults.pricing.tax_rate)?;
        if tax_rate < Decimal::ZERO || tax_rate > Decimal::ONE {
            return Err(invalid("STOREFRONT_TAX_RATE", "must be between 0 and 1"));
        }

        let payment_delay = parse_or(
            "STOREFRONT_PAYMENT_DELAY_MS",
            &lookup,
            DEFAULT_PAYMENT_DELAY_MS,
        )?;
        let contact_delay = parse_or(
            "STOREFRONT_CONTACT_DELAY_MS",
            &lookup,
            DEFAULT_CONTACT_DELAY_MS,
        )?;

        let order_prefix = lookup("STOREFRONT_ORDER_PREFIX")
            .map_or(defaults.order_prefix, |prefix| prefix.trim().to_uppercase());
        validate_order_prefix(&order_prefix)?;

        Ok(Self {
            pricing: PricingConfig {
                shipping_fee: Price::new(shipping_fee),
                tax_rate,
            },
            payment_delay: Duration::from_millis(payment_delay),
            contact_delay: Duration::from_millis(contact_delay),
            order_prefix,
            catalog_path: lookup("STOREFRONT_CATALOG_PATH")
                .filter(|path| !path.trim().is_empty())
                .map(PathBuf::from),
            sentry_dsn: lookup("SENTRY_DSN").filter(|dsn| !dsn.trim().is_empty()),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn invalid(key: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidEnvVar(key.to_string(), reason.into())
}

/// Parse a variable if present, otherwise use the default.
fn parse_or<T>(
    key: &str,
    lookup: &impl Fn(&str) -> Option<String>,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse::<T>().map_err(|e| invalid(key, e.to_string())),
        None => Ok(default),
    }
}

/// Order prefixes end up in customer-facing order numbers.
fn validate_order_prefix(prefix: &str) -> Result<(), ConfigError> {
    if prefix.is_empty() || prefix.len() > MAX_ORDER_PREFIX_LENGTH {
        return Err(invalid(
            "STOREFRONT_ORDER_PREFIX",
            format!("must be 1-{MAX_ORDER_PREFIX_LENGTH} characters"),
        ));
    }
    if !prefix.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(invalid(
            "STOREFRONT_ORDER_PREFIX",
            "must be ASCII letters and digits",
        ));
    }
    Ok(())
}
