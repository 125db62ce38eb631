//! Order totals shown on the checkout summary.

use serde::{Deserialize, Serialize};

use balance_guru_core::Price;

use crate::cart::CartStore;
use crate::config::PricingConfig;

/// Subtotal, shipping, tax and grand total, each rounded to cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTotals {
    pub subtotal: Price,
    pub shipping: Price,
    pub tax: Price,
    pub total: Price,
}

impl OrderTotals {
    /// Compute totals for the current cart.
    ///
    /// The grand total is summed from unrounded parts and rounded once, so
    /// it can differ by a cent from the sum of the displayed parts.
    #[must_use]
    pub fn compute(cart: &CartStore, pricing: PricingConfig) -> Self {
        Self::for_subtotal(cart.cart_total(), pricing)
    }

    #[must_use]
    pub fn for_subtotal(subtotal: Price, pricing: PricingConfig) -> Self {
        let tax = subtotal.scale(pricing.tax_rate);
        let total = subtotal + pricing.shipping_fee + tax;

        Self {
            subtotal: subtotal.rounded(),
            shipping: pricing.shipping_fee.rounded(),
            tax: tax.rounded(),
            total: total.rounded(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::catalog::tests::product;

    #[test]
    fn test_two_ten_dollar_items() {
        let mut cart = CartStore::new();
        cart.add_to_cart(&product("a", 1000), 2, None, None).unwrap();

        let totals = OrderTotals::compute(&cart, PricingConfig::default());

        assert_eq!(totals.subtotal, Price::from_cents(2000));
        assert_eq!(totals.shipping, Price::from_cents(999));
        assert_eq!(totals.tax, Price::from_cents(160));
        assert_eq!(totals.total, Price::from_cents(3159));
        assert_eq!(totals.total.to_string(), "$31.59");
    }

    #[test]
    fn test_tax_midpoint_rounds_up() {
        // 0.08 * 0.5625 = 0.045
        let totals = OrderTotals::for_subtotal(
            Price::new(Decimal::new(5625, 4)),
            PricingConfig::default(),
        );
        assert_eq!(totals.tax, Price::from_cents(5));
    }

    #[test]
    fn test_empty_cart_still_charges_shipping() {
        let totals = OrderTotals::compute(&CartStore::new(), PricingConfig::default());
        assert_eq!(totals.subtotal, Price::ZERO);
        assert_eq!(totals.total, Price::from_cents(999));
    }

    #[test]
    fn test_custom_pricing() {
        let pricing = PricingConfig {
            shipping_fee: Price::ZERO,
            tax_rate: Decimal::new(1, 1),
        };
        let totals = OrderTotals::for_subtotal(Price::from_cents(18999), pricing);
        assert_eq!(totals.tax, Price::from_cents(1900));
        assert_eq!(totals.total, Price::from_cents(20899));
    }
}
