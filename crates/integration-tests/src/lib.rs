//! Integration tests for the Balance Guru storefront core.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p balance-guru-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_store` - Cart merging, quantities and totals through the session
//! - `checkout_flow` - Shipping, payment and confirmation end to end
//! - `payment_cancellation` - Leaving checkout while a charge is running
//!
//! Payment and contact delays are real tokio timers; tests pause the clock
//! with `#[tokio::test(start_paused = true)]`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use balance_guru_core::{Price, ProductId};
use balance_guru_storefront::catalog::{Catalog, CatalogError, Product};
use balance_guru_storefront::checkout::{PaymentInfo, ShippingInfo};
use balance_guru_storefront::{StorefrontConfig, StorefrontSession};

/// A board priced at exactly $10.00, for arithmetic that is easy to check.
pub const TEN_DOLLAR_BOARD: &str = "ten-dollar-board";

/// A tee with sizes and colors.
pub const SIZED_TEE: &str = "sized-tee";

/// Build a product with the given price in cents.
#[must_use]
pub fn product(id: &str, category: &str, cents: i64) -> Product {
    Product {
        id: ProductId::new(id),
        title: id.replace('-', " "),
        subtitle: String::new(),
        description: None,
        price: Price::from_cents(cents),
        image: format!("https://cdn.example.com/{id}.jpg"),
        sizes: Vec::new(),
        colors: Vec::new(),
        category: category.to_string(),
        featured: false,
    }
}

/// Small catalog with round prices.
///
/// # Errors
///
/// Returns `CatalogError` if the fixture products are invalid.
pub fn test_catalog() -> Result<Catalog, CatalogError> {
    let mut tee = product(SIZED_TEE, "apparel", 2500);
    tee.sizes = vec!["S".into(), "M".into(), "L".into()];
    tee.colors = vec!["Black".into(), "Yellow".into()];

    Catalog::new(vec![
        product(TEN_DOLLAR_BOARD, "boards", 1000),
        product("five-dollar-socks", "apparel", 500),
        tee,
    ])
}

/// Session over [`test_catalog`] with default pricing and delays.
///
/// # Errors
///
/// Returns `CatalogError` if the fixture catalog is invalid.
pub fn test_session() -> Result<StorefrontSession, CatalogError> {
    Ok(StorefrontSession::new(
        StorefrontConfig::default(),
        test_catalog()?,
    ))
}

/// Fully filled shipping form.
#[must_use]
pub fn shipping_info() -> ShippingInfo {
    ShippingInfo {
        first_name: "Jordan".into(),
        last_name: "Lee".into(),
        email: "jordan@example.com".into(),
        phone: "555-0100".into(),
        address: "1 Balance Way".into(),
        city: "Austin".into(),
        state: "TX".into(),
        zip_code: "78701".into(),
        ..ShippingInfo::default()
    }
}

/// Card details the simulated gateway accepts.
#[must_use]
pub fn payment_info() -> PaymentInfo {
    PaymentInfo::new("4242 4242 4242 4242", "12/30", "123", "Jordan Lee")
}

/// Shorthand for a product ID.
#[must_use]
pub fn id(s: &str) -> ProductId {
    ProductId::new(s)
}
