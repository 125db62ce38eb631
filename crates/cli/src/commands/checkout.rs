//! Simulated checkout command.
//!
//! Fills a fresh cart, walks the checkout steps with demo shipping and card
//! details, and prints the confirmation.
//!
//! # Usage
//!
//! ```bash
//! bg-cli checkout -i wobble-disc:2 -i grip-socks:1:L/XL --email jordan@example.com
//!
//! # Walk away while the payment is processing
//! bg-cli checkout -i wobble-disc --email jordan@example.com --leave-after-ms 500
//! ```

use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use balance_guru_core::ProductId;
use balance_guru_storefront::checkout::{PaymentInfo, ShippingInfo};
use balance_guru_storefront::events::StorefrontEvent;
use balance_guru_storefront::{StorefrontConfig, StorefrontError, StorefrontSession};

const DEMO_CARD_NUMBER: &str = "4242 4242 4242 4242";
const DEMO_CARD_EXPIRY: &str = "12/30";
const DEMO_CARD_CVC: &str = "123";

/// Errors parsing an `--item` argument.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LineArgError {
    #[error("item must start with a product id")]
    MissingId,

    #[error("invalid quantity: {0}")]
    InvalidQuantity(String),
}

/// One `--item id[:quantity[:size[:color]]]` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineArg {
    pub id: ProductId,
    pub quantity: i64,
    pub size: Option<String>,
    pub color: Option<String>,
}

impl FromStr for LineArg {
    type Err = LineArgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(':').map(str::trim);
        let id = parts
            .next()
            .filter(|id| !id.is_empty())
            .ok_or(LineArgError::MissingId)?;
        let quantity = match parts.next().filter(|q| !q.is_empty()) {
            Some(q) => q
                .parse()
                .map_err(|_| LineArgError::InvalidQuantity(q.to_string()))?,
            None => 1,
        };
        let mut option = || parts.next().filter(|v| !v.is_empty()).map(str::to_string);
        let size = option();
        let color = option();

        Ok(Self {
            id: ProductId::new(id),
            quantity,
            size,
            color,
        })
    }
}

/// Arguments for [`run`].
pub struct CheckoutArgs {
    pub items: Vec<LineArg>,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub leave_after_ms: Option<u64>,
}

/// Run a checkout from an empty cart to confirmation.
///
/// # Errors
///
/// Returns an error if an item is unknown or invalid, the shipping details
/// are rejected, or the payment fails.
pub async fn run(config: StorefrontConfig, args: CheckoutArgs) -> Result<(), StorefrontError> {
    let mut session = StorefrontSession::from_config(config)?;

    for item in args.items {
        session.add_to_cart(&item.id, item.quantity, item.size, item.color)?;
    }
    print_cart(&session);

    session.begin_checkout();
    session.submit_shipping(ShippingInfo {
        first_name: args.first_name.clone(),
        last_name: args.last_name.clone(),
        email: args.email,
        phone: "555-0100".to_string(),
        address: "1 Balance Way".to_string(),
        city: "Austin".to_string(),
        state: "TX".to_string(),
        zip_code: "78701".to_string(),
        ..ShippingInfo::default()
    })?;

    let cardholder = format!("{} {}", args.first_name, args.last_name);
    let attempt_id = session.pay(PaymentInfo::new(
        DEMO_CARD_NUMBER,
        DEMO_CARD_EXPIRY,
        DEMO_CARD_CVC,
        cardholder,
    ))?;
    tracing::info!(%attempt_id, "Payment submitted");

    if let Some(ms) = args.leave_after_ms {
        tokio::time::sleep(Duration::from_millis(ms)).await;
        session.leave_checkout();
    }

    let confirmation = session.finish_payment().await?;
    print_events(&mut session);

    #[allow(clippy::print_stdout)]
    {
        match confirmation {
            Some(c) => {
                println!();
                println!("Order Confirmed! {}", c.order_number);
                println!("  Order ID:  {}", c.order_id);
                println!("  Email:     {}", c.email);
                println!("  Total:     {}", c.totals.total);
                println!("  Cart now has {} item(s)", session.cart().item_count());
            }
            None => {
                println!();
                println!(
                    "Checkout abandoned; cart still has {} item(s)",
                    session.cart().item_count()
                );
            }
        }
    }

    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_cart(session: &StorefrontSession) {
    println!("Cart:");
    for line in session.cart().items() {
        let options: Vec<&str> = [&line.selected_size, &line.selected_color]
            .into_iter()
            .filter_map(Option::as_deref)
            .collect();
        println!(
            "  {} x {:<28} {:>10}  {}",
            line.quantity(),
            line.product.title,
            line.line_total().to_string(),
            options.join(" / ")
        );
    }

    let totals = session.totals();
    println!("  Subtotal: {}", totals.subtotal);
    println!("  Shipping: {}", totals.shipping);
    println!("  Tax:      {}", totals.tax);
    println!("  Total:    {}", totals.total);
}

#[allow(clippy::print_stdout)]
fn print_events(session: &mut StorefrontSession) {
    for event in session.take_events() {
        if let StorefrontEvent::Notify(note) = event {
            println!("[{}] {}", note.title, note.description);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line_arg() {
        let line: LineArg = "guru-training-tee:2:M:Black".parse().unwrap();
        assert_eq!(line.id.as_str(), "guru-training-tee");
        assert_eq!(line.quantity, 2);
        assert_eq!(line.size.as_deref(), Some("M"));
        assert_eq!(line.color.as_deref(), Some("Black"));
    }

    #[test]
    fn test_parse_defaults() {
        let line: LineArg = "wobble-disc".parse().unwrap();
        assert_eq!(line.quantity, 1);
        assert!(line.size.is_none());

        let line: LineArg = "pro-balance-board:1::Yellow".parse().unwrap();
        assert!(line.size.is_none());
        assert_eq!(line.color.as_deref(), Some("Yellow"));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<LineArg>(), Err(LineArgError::MissingId));
        assert_eq!(
            "wobble-disc:two".parse::<LineArg>(),
            Err(LineArgError::InvalidQuantity("two".to_string()))
        );
    }
}
