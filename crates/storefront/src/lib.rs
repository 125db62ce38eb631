//! Balance Guru storefront core.
//!
//! In-memory state behind the storefront: the product catalog, the cart, the
//! three-step checkout with its simulated payment, and the contact form.
//! Rendering and routing live elsewhere; this crate reports what should
//! happen through [`events::StorefrontEvent`]s.
//!
//! ```no_run
//! use balance_guru_core::ProductId;
//! use balance_guru_storefront::{StorefrontConfig, StorefrontSession};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut session = StorefrontSession::from_config(StorefrontConfig::default())?;
//! session.add_to_cart(&ProductId::new("wobble-disc"), 1, None, None)?;
//! session.begin_checkout();
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod contact;
pub mod error;
pub mod events;
pub mod order;
pub mod payment;
pub mod pricing;
pub mod session;

pub use config::{ConfigError, PricingConfig, StorefrontConfig};
pub use error::{Result, StorefrontError};
pub use session::StorefrontSession;
