//! Signals from the storefront core to the presentation layer.
//!
//! The core never renders, routes or shows toasts itself. It queues
//! [`StorefrontEvent`]s, and whatever drives the UI drains and acts on them.

use serde::Serialize;

use balance_guru_core::ProductId;

/// A page the UI should navigate to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "page", content = "id", rename_all = "snake_case")]
pub enum Route {
    Home,
    Shop,
    Checkout,
    Product(ProductId),
}

impl Route {
    /// URL path of the page.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::Shop => "/shop".to_string(),
            Self::Checkout => "/checkout".to_string(),
            Self::Product(id) => format!("/product/{id}"),
        }
    }
}

/// A toast to show the shopper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub title: String,
    pub description: String,
}

impl Notification {
    #[must_use]
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }

    #[must_use]
    pub fn added_to_cart(quantity: i64, title: &str) -> Self {
        Self::new(
            "Added to Cart",
            format!("{quantity}x {title} has been added to your cart."),
        )
    }

    #[must_use]
    pub fn order_confirmed() -> Self {
        Self::new(
            "Order Confirmed!",
            "Thank you for your purchase. Check your email for confirmation.",
        )
    }

    #[must_use]
    pub fn payment_failed(reason: &str) -> Self {
        Self::new("Payment Failed", reason)
    }

    #[must_use]
    pub fn message_sent() -> Self {
        Self::new(
            "Message Sent!",
            "Thank you for reaching out. We'll get back to you soon.",
        )
    }
}

/// Something the presentation layer should react to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum StorefrontEvent {
    Navigate(Route),
    Notify(Notification),
    /// Cart contents or sidebar visibility changed.
    CartUpdated,
}
