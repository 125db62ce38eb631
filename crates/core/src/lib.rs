//! Balance Guru Core - Shared value types.
//!
//! This crate provides the small value types used across the Balance Guru
//! storefront components:
//! - `storefront` - Catalog, cart and checkout state
//! - `cli` - Command-line driver for the storefront core
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no timers, no randomness.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for product IDs, prices, emails, and checkout steps

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
