//! Unified error handling with Sentry breadcrumbs.
//!
//! Provides the `StorefrontError` type returned by cart, checkout and contact
//! operations, plus [`add_breadcrumb`] so that an error report carries the
//! trail of shopper actions that led up to it.

use thiserror::Error;

use balance_guru_core::{CheckoutStep, EmailError, ProductId};

use crate::catalog::CatalogError;
use crate::payment::PaymentError;

/// Application-level error type for the storefront core.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// Quantity must be a positive integer.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Product ID is not in the catalog.
    #[error("Unknown product: {0}")]
    UnknownProduct(ProductId),

    /// Size or color the product does not offer.
    #[error("Product {id} has no {option} {value:?}")]
    InvalidOption {
        /// Product being added.
        id: ProductId,
        /// Option name, `size` or `color`.
        option: &'static str,
        /// Rejected value.
        value: String,
    },

    /// A required form field was blank.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Email failed structural validation.
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Action is not valid at the current checkout step.
    #[error("Expected checkout step {expected}, currently at {actual}")]
    WrongStep {
        /// Step the action belongs to.
        expected: CheckoutStep,
        /// Step the flow is actually at.
        actual: CheckoutStep,
    },

    /// A payment is already being processed.
    #[error("Payment already in progress")]
    PaymentInProgress,

    /// A payment result arrived for an attempt that is no longer current.
    #[error("Payment attempt {0} is no longer current")]
    StalePayment(uuid::Uuid),

    /// No checkout flow is active.
    #[error("No checkout in progress")]
    NoCheckout,

    /// Payment did not complete.
    #[error("Payment error: {0}")]
    Payment(#[from] PaymentError),

    /// Catalog could not be loaded.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

/// Result type alias for `StorefrontError`.
pub type Result<T> = std::result::Result<T, StorefrontError>;

/// Add a breadcrumb for shopper actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of actions
/// leading up to an error. Without an initialised Sentry client this is a
/// no-op.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added to cart", Some(&[("product_id", "board-pro")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
