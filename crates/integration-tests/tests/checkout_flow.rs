//! Integration tests for the checkout flow from cart to confirmation.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use balance_guru_core::{CheckoutStep, Price, StepProgress};
use balance_guru_integration_tests::{
    id, payment_info, shipping_info, test_catalog, test_session, TEN_DOLLAR_BOARD,
};
use balance_guru_storefront::events::{Notification, Route, StorefrontEvent};
use balance_guru_storefront::{StorefrontConfig, StorefrontError, StorefrontSession};

fn session_with_two_boards() -> StorefrontSession {
    let mut session = test_session().unwrap();
    session
        .add_to_cart(&id(TEN_DOLLAR_BOARD), 2, None, None)
        .unwrap();
    session
}

// =============================================================================
// Entering Checkout
// =============================================================================

#[test]
fn test_empty_cart_redirects_to_shop() {
    let mut session = test_session().unwrap();

    session.begin_checkout();

    assert!(session.checkout().is_none());
    assert!(
        session
            .take_events()
            .contains(&StorefrontEvent::Navigate(Route::Shop))
    );
    assert!(matches!(
        session.submit_shipping(shipping_info()),
        Err(StorefrontError::NoCheckout)
    ));
}

#[test]
fn test_checkout_starts_at_shipping() {
    let mut session = session_with_two_boards();

    session.begin_checkout();

    let flow = session.checkout().unwrap();
    assert_eq!(flow.step(), CheckoutStep::Shipping);
    assert_eq!(
        flow.progress()[0],
        (CheckoutStep::Shipping, StepProgress::Current)
    );
}

// =============================================================================
// Step Transitions
// =============================================================================

#[test]
fn test_back_from_payment_keeps_shipping_fields() {
    let mut session = session_with_two_boards();
    session.begin_checkout();
    session.submit_shipping(shipping_info()).unwrap();
    assert_eq!(session.checkout().unwrap().step(), CheckoutStep::Payment);

    session.checkout_back().unwrap();

    let flow = session.checkout().unwrap();
    assert_eq!(flow.step(), CheckoutStep::Shipping);
    assert_eq!(flow.shipping(), &shipping_info());
}

#[test]
fn test_incomplete_shipping_is_rejected() {
    let mut session = session_with_two_boards();
    session.begin_checkout();
    let mut info = shipping_info();
    info.phone = " ".into();

    let err = session.submit_shipping(info).unwrap_err();

    assert!(matches!(err, StorefrontError::MissingField("phone")));
    assert_eq!(session.checkout().unwrap().step(), CheckoutStep::Shipping);
}

#[test]
fn test_payment_before_shipping_is_wrong_step() {
    let mut session = session_with_two_boards();
    session.begin_checkout();

    let err = session.pay(payment_info()).unwrap_err();

    assert!(matches!(
        err,
        StorefrontError::WrongStep {
            expected: CheckoutStep::Payment,
            actual: CheckoutStep::Shipping,
        }
    ));
}

// =============================================================================
// Payment and Confirmation
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_two_ten_dollar_boards_total_31_59() {
    let mut session = session_with_two_boards();
    session.begin_checkout();
    session.submit_shipping(shipping_info()).unwrap();

    let totals = session.totals();
    assert_eq!(totals.subtotal, Price::from_cents(2000));
    assert_eq!(totals.shipping, Price::from_cents(999));
    assert_eq!(totals.tax, Price::from_cents(160));
    assert_eq!(totals.total, Price::from_cents(3159));

    let confirmation = session
        .submit_payment(payment_info())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(confirmation.totals.total.to_string(), "$31.59");
    assert_eq!(confirmation.email.as_str(), "jordan@example.com");
    assert!(session.cart().is_empty());
    assert_eq!(
        session.checkout().unwrap().step(),
        CheckoutStep::Confirmation
    );
}

#[tokio::test(start_paused = true)]
async fn test_processing_flag_during_delay() {
    let mut session = session_with_two_boards();
    session.begin_checkout();
    session.submit_shipping(shipping_info()).unwrap();

    session.pay(payment_info()).unwrap();
    tokio::time::sleep(Duration::from_millis(2000)).await;

    let flow = session.checkout().unwrap();
    assert!(flow.is_processing());
    assert_eq!(flow.step(), CheckoutStep::Payment);
    assert!(matches!(
        session.pay(payment_info()),
        Err(StorefrontError::PaymentInProgress)
    ));

    session.finish_payment().await.unwrap().unwrap();
    assert!(!session.checkout().unwrap().is_processing());
}

#[tokio::test(start_paused = true)]
async fn test_confirmation_is_exempt_from_empty_cart_redirect() {
    let mut session = session_with_two_boards();
    session.begin_checkout();
    session.submit_shipping(shipping_info()).unwrap();
    session.submit_payment(payment_info()).await.unwrap();
    let events = session.take_events();

    assert!(events.contains(&StorefrontEvent::Notify(Notification::order_confirmed())));
    assert!(!events.contains(&StorefrontEvent::Navigate(Route::Shop)));
    assert!(session.cart().is_empty());
    let flow = session.checkout().unwrap();
    assert!(flow.confirmation().is_some());
    assert!(
        flow.progress()
            .iter()
            .all(|(step, progress)| *step == CheckoutStep::Confirmation
                || *progress == StepProgress::Complete)
    );
}

#[tokio::test(start_paused = true)]
async fn test_order_numbers_use_configured_prefix() {
    let config = StorefrontConfig {
        order_prefix: "BG".to_string(),
        payment_delay: Duration::from_millis(10),
        ..StorefrontConfig::default()
    };
    let mut session = StorefrontSession::new(config, test_catalog().unwrap());
    session
        .add_to_cart(&id(TEN_DOLLAR_BOARD), 1, None, None)
        .unwrap();
    session.begin_checkout();
    session.submit_shipping(shipping_info()).unwrap();

    let confirmation = session
        .submit_payment(payment_info())
        .await
        .unwrap()
        .unwrap();

    let number = confirmation.order_number.as_str();
    assert!(number.starts_with("#BG"));
    assert_eq!(number.len(), "#BG".len() + 8);
    assert_eq!(confirmation.order_id.get_version_num(), 7);
}

#[tokio::test(start_paused = true)]
async fn test_continue_shopping_after_confirmation() {
    let mut session = session_with_two_boards();
    session.begin_checkout();
    session.submit_shipping(shipping_info()).unwrap();
    session.submit_payment(payment_info()).await.unwrap();
    session.take_events();

    session.continue_shopping();

    assert!(session.checkout().is_none());
    assert_eq!(
        session.take_events(),
        [StorefrontEvent::Navigate(Route::Home)]
    );
}
