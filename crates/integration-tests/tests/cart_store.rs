//! Integration tests for the cart through the shopper session.

#![allow(clippy::unwrap_used)]

use balance_guru_core::Price;
use balance_guru_integration_tests::{id, test_session, SIZED_TEE, TEN_DOLLAR_BOARD};
use balance_guru_storefront::cart::LineKey;
use balance_guru_storefront::events::StorefrontEvent;
use balance_guru_storefront::StorefrontError;

fn tee_key(size: &str, color: &str) -> LineKey {
    LineKey::new(id(SIZED_TEE), Some(size.into()), Some(color.into()))
}

// =============================================================================
// Line Identity
// =============================================================================

#[test]
fn test_same_product_and_options_merge() {
    let mut session = test_session().unwrap();

    session
        .add_to_cart(&id(SIZED_TEE), 1, Some("M".into()), Some("Black".into()))
        .unwrap();
    session
        .add_to_cart(&id(SIZED_TEE), 2, Some("M".into()), Some("Black".into()))
        .unwrap();

    let cart = session.cart();
    assert_eq!(cart.items().len(), 1);
    assert_eq!(cart.line(&tee_key("M", "Black")).unwrap().quantity(), 3);
}

#[test]
fn test_different_size_makes_new_line() {
    let mut session = test_session().unwrap();

    session
        .add_to_cart(&id(SIZED_TEE), 1, Some("M".into()), Some("Black".into()))
        .unwrap();
    session
        .add_to_cart(&id(SIZED_TEE), 1, Some("L".into()), Some("Black".into()))
        .unwrap();

    let cart = session.cart();
    assert_eq!(cart.items().len(), 2);
    assert_eq!(cart.item_count(), 2);
    assert_eq!(cart.cart_total(), Price::from_cents(5000));
}

#[test]
fn test_product_page_preselects_first_size_and_color() {
    let mut session = test_session().unwrap();

    session.add_to_cart(&id(SIZED_TEE), 1, None, None).unwrap();
    session
        .add_to_cart(&id(SIZED_TEE), 1, Some("S".into()), Some("Black".into()))
        .unwrap();

    let cart = session.cart();
    assert_eq!(cart.items().len(), 1);
    assert_eq!(cart.line(&tee_key("S", "Black")).unwrap().quantity(), 2);
}

#[test]
fn test_unoffered_options_are_rejected() {
    let mut session = test_session().unwrap();

    let err = session
        .add_to_cart(&id(SIZED_TEE), 1, Some("XXXL".into()), Some("Magenta".into()))
        .unwrap_err();
    assert!(matches!(err, StorefrontError::InvalidOption { .. }));

    let err = session
        .add_to_cart(&id(TEN_DOLLAR_BOARD), 1, Some("M".into()), None)
        .unwrap_err();
    assert!(matches!(err, StorefrontError::InvalidOption { option: "size", .. }));

    assert!(session.cart().is_empty());
}

// =============================================================================
// Quantities and Totals
// =============================================================================

#[test]
fn test_update_to_zero_removes_and_total_excludes() {
    let mut session = test_session().unwrap();
    session
        .add_to_cart(&id(TEN_DOLLAR_BOARD), 2, None, None)
        .unwrap();
    session
        .add_to_cart(&id("five-dollar-socks"), 1, None, None)
        .unwrap();

    session.update_quantity(&LineKey::plain(id(TEN_DOLLAR_BOARD)), 0).unwrap();

    assert_eq!(session.cart().items().len(), 1);
    assert_eq!(session.cart().cart_total(), Price::from_cents(500));
}

#[test]
fn test_negative_update_also_removes() {
    let mut session = test_session().unwrap();
    session
        .add_to_cart(&id(TEN_DOLLAR_BOARD), 2, None, None)
        .unwrap();

    session.update_quantity(&LineKey::plain(id(TEN_DOLLAR_BOARD)), -1).unwrap();

    assert!(session.cart().is_empty());
}

#[test]
fn test_total_matches_lines_after_mixed_operations() {
    let mut session = test_session().unwrap();
    session
        .add_to_cart(&id(TEN_DOLLAR_BOARD), 3, None, None)
        .unwrap();
    session
        .add_to_cart(&id(SIZED_TEE), 2, Some("S".into()), Some("Yellow".into()))
        .unwrap();
    session
        .add_to_cart(&id("five-dollar-socks"), 4, None, None)
        .unwrap();
    session.update_quantity(&tee_key("S", "Yellow"), 1).unwrap();
    session.remove_from_cart(&LineKey::plain(id("five-dollar-socks")));
    session.remove_from_cart(&LineKey::plain(id("not-in-cart")));

    let cart = session.cart();
    let by_lines: Price = cart.items().iter().map(|line| line.line_total()).sum();
    assert_eq!(cart.cart_total(), by_lines);
    assert_eq!(cart.cart_total(), Price::from_cents(3000 + 2500));
    assert_eq!(cart.cart_total(), session.cart().cart_total());
}

#[test]
fn test_invalid_quantity_leaves_cart_unchanged() {
    let mut session = test_session().unwrap();

    let err = session
        .add_to_cart(&id(TEN_DOLLAR_BOARD), 0, None, None)
        .unwrap_err();

    assert!(matches!(err, StorefrontError::InvalidQuantity(0)));
    assert!(session.cart().is_empty());
    assert!(!session.cart().is_open());
}

// =============================================================================
// Sidebar
// =============================================================================

#[test]
fn test_sidebar_toggle_emits_update() {
    let mut session = test_session().unwrap();

    session.toggle_cart();
    assert!(session.cart().is_open());
    session.set_cart_open(false);
    assert!(!session.cart().is_open());

    assert_eq!(
        session.take_events(),
        [StorefrontEvent::CartUpdated, StorefrontEvent::CartUpdated]
    );
}

#[test]
fn test_events_serialize_for_the_ui() {
    let mut session = test_session().unwrap();
    session
        .add_to_cart(&id(TEN_DOLLAR_BOARD), 1, None, None)
        .unwrap();

    let json = serde_json::to_value(session.take_events()).unwrap();

    assert_eq!(json[0]["type"], "notify");
    assert_eq!(json[0]["data"]["title"], "Added to Cart");
    assert_eq!(json[1]["type"], "cart_updated");
}
