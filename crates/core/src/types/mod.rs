//! Core types for the Balance Guru storefront.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod price;
pub mod step;

pub use email::{Email, EmailError};
pub use id::*;
pub use price::Price;
pub use step::{CheckoutStep, StepProgress};
