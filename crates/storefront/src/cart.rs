//! Cart store.
//!
//! The cart is an ordered list of line items; insertion order is display
//! order. A line is identified by product ID plus the selected size and color,
//! so the same product in two sizes occupies two lines.
//!
//! A line never holds a zero quantity: setting a quantity to zero or below
//! removes the line instead.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use balance_guru_core::{Price, ProductId};

use crate::catalog::Product;
use crate::error::{add_breadcrumb, Result, StorefrontError};

/// Identity of a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineKey {
    pub id: ProductId,
    pub size: Option<String>,
    pub color: Option<String>,
}

impl LineKey {
    #[must_use]
    pub fn new(id: ProductId, size: Option<String>, color: Option<String>) -> Self {
        Self { id, size, color }
    }

    /// Key for a product with no size or color selected.
    #[must_use]
    pub const fn plain(id: ProductId) -> Self {
        Self {
            id,
            size: None,
            color: None,
        }
    }
}

/// One line of the cart: a product snapshot plus quantity and options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    pub product: Product,
    quantity: u32,
    pub selected_size: Option<String>,
    pub selected_color: Option<String>,
}

impl CartLineItem {
    /// Always at least 1.
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price.times(self.quantity)
    }

    #[must_use]
    pub fn key(&self) -> LineKey {
        LineKey::new(
            self.product.id.clone(),
            self.selected_size.clone(),
            self.selected_color.clone(),
        )
    }

    fn matches(&self, key: &LineKey) -> bool {
        self.product.id == key.id
            && self.selected_size == key.size
            && self.selected_color == key.color
    }
}

/// In-memory cart.
#[derive(Debug, Clone, Default)]
pub struct CartStore {
    items: Vec<CartLineItem>,
    is_open: bool,
}

impl CartStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `quantity` of a product, merging into an existing line with the
    /// same size and color.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::InvalidQuantity` if `quantity` is not
    /// positive or the merged quantity would overflow.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub fn add_to_cart(
        &mut self,
        product: &Product,
        quantity: i64,
        size: Option<String>,
        color: Option<String>,
    ) -> Result<()> {
        let added = positive_quantity(quantity)?;
        let key = LineKey::new(product.id.clone(), size, color);

        if let Some(line) = self.items.iter_mut().find(|line| line.matches(&key)) {
            line.quantity = line
                .quantity
                .checked_add(added)
                .ok_or(StorefrontError::InvalidQuantity(quantity))?;
            tracing::debug!(quantity = line.quantity, "Incremented cart line");
        } else {
            self.items.push(CartLineItem {
                product: product.clone(),
                quantity: added,
                selected_size: key.size,
                selected_color: key.color,
            });
            tracing::debug!(quantity = added, "Added cart line");
        }

        add_breadcrumb(
            "cart",
            "Added to cart",
            Some(&[
                ("product_id", product.id.as_str()),
                ("quantity", &added.to_string()),
            ]),
        );
        Ok(())
    }

    /// Remove a line. Does nothing if no line matches.
    #[instrument(skip(self), fields(product_id = %key.id))]
    pub fn remove_from_cart(&mut self, key: &LineKey) {
        let before = self.items.len();
        self.items.retain(|line| !line.matches(key));

        if self.items.len() < before {
            tracing::debug!("Removed cart line");
            add_breadcrumb(
                "cart",
                "Removed from cart",
                Some(&[("product_id", key.id.as_str())]),
            );
        }
    }

    /// Set a line's quantity. Zero or below removes the line; a missing line
    /// is ignored.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::InvalidQuantity` if the quantity does not fit
    /// a cart line. The cart is left unchanged.
    #[instrument(skip(self), fields(product_id = %key.id))]
    pub fn update_quantity(&mut self, key: &LineKey, quantity: i64) -> Result<()> {
        if quantity <= 0 {
            self.remove_from_cart(key);
            return Ok(());
        }

        let quantity =
            u32::try_from(quantity).map_err(|_| StorefrontError::InvalidQuantity(quantity))?;
        if let Some(line) = self.items.iter_mut().find(|line| line.matches(key)) {
            line.quantity = quantity;
            tracing::debug!(quantity, "Updated cart line quantity");
        }
        Ok(())
    }

    /// Sum of price times quantity over all lines, unrounded.
    #[must_use]
    pub fn cart_total(&self) -> Price {
        self.items.iter().map(CartLineItem::line_total).sum()
    }

    pub fn clear_cart(&mut self) {
        if !self.items.is_empty() {
            tracing::debug!(lines = self.items.len(), "Cleared cart");
        }
        self.items.clear();
    }

    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    #[must_use]
    pub fn line(&self, key: &LineKey) -> Option<&CartLineItem> {
        self.items.iter().find(|line| line.matches(key))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of units, as shown on the cart badge.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|line| u64::from(line.quantity)).sum()
    }

    // Sidebar visibility

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.is_open
    }

    pub const fn set_open(&mut self, open: bool) {
        self.is_open = open;
    }

    pub const fn toggle_open(&mut self) {
        self.is_open = !self.is_open;
    }
}

fn positive_quantity(quantity: i64) -> Result<u32> {
    u32::try_from(quantity)
        .ok()
        .filter(|q| *q > 0)
        .ok_or(StorefrontError::InvalidQuantity(quantity))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::tests::product;

    fn sized(id: &str, size: &str) -> LineKey {
        LineKey::new(ProductId::new(id), Some(size.to_string()), None)
    }

    #[test]
    fn test_same_options_merge_into_one_line() {
        let tee = product("tee", 3499);
        let mut cart = CartStore::new();

        cart.add_to_cart(&tee, 1, Some("M".into()), Some("Black".into()))
            .unwrap();
        cart.add_to_cart(&tee, 2, Some("M".into()), Some("Black".into()))
            .unwrap();

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].quantity(), 3);
        assert_eq!(cart.cart_total(), Price::from_cents(10497));
    }

    #[test]
    fn test_different_size_is_a_separate_line() {
        let tee = product("tee", 3499);
        let mut cart = CartStore::new();

        cart.add_to_cart(&tee, 1, Some("M".into()), None).unwrap();
        cart.add_to_cart(&tee, 1, Some("L".into()), None).unwrap();

        assert_eq!(cart.items().len(), 2);
        assert_eq!(cart.line(&sized("tee", "L")).unwrap().quantity(), 1);
        assert_eq!(cart.item_count(), 2);
    }

    #[test]
    fn test_insertion_order_is_kept() {
        let mut cart = CartStore::new();
        for id in ["c", "a", "b"] {
            cart.add_to_cart(&product(id, 100), 1, None, None).unwrap();
        }
        let ids: Vec<&str> = cart.items().iter().map(|l| l.product.id.as_str()).collect();
        assert_eq!(ids, ["c", "a", "b"]);
    }

    #[test]
    fn test_rejects_non_positive_quantity() {
        let mut cart = CartStore::new();
        let board = product("board", 18999);

        for qty in [0, -3] {
            let err = cart.add_to_cart(&board, qty, None, None).unwrap_err();
            assert!(matches!(err, StorefrontError::InvalidQuantity(q) if q == qty));
        }
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_to_zero_removes_line() {
        let mut cart = CartStore::new();
        cart.add_to_cart(&product("a", 1000), 2, None, None).unwrap();
        cart.add_to_cart(&product("b", 500), 1, None, None).unwrap();

        cart.update_quantity(&LineKey::plain(ProductId::new("a")), 0).unwrap();

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.cart_total(), Price::from_cents(500));
    }

    #[test]
    fn test_update_quantity_sets_value() {
        let mut cart = CartStore::new();
        cart.add_to_cart(&product("a", 1000), 2, None, None).unwrap();

        cart.update_quantity(&LineKey::plain(ProductId::new("a")), 5).unwrap();

        assert_eq!(cart.items()[0].quantity(), 5);
        assert_eq!(cart.cart_total(), Price::from_cents(5000));
    }

    #[test]
    fn test_update_rejects_quantity_above_line_limit() {
        let mut cart = CartStore::new();
        cart.add_to_cart(&product("a", 1000), 2, None, None).unwrap();
        let too_many = i64::from(u32::MAX) + 1;

        let err = cart
            .update_quantity(&LineKey::plain(ProductId::new("a")), too_many)
            .unwrap_err();

        assert!(matches!(err, StorefrontError::InvalidQuantity(q) if q == too_many));
        assert_eq!(cart.items()[0].quantity(), 2);
    }

    #[test]
    fn test_missing_line_is_noop() {
        let mut cart = CartStore::new();
        cart.add_to_cart(&product("a", 1000), 1, None, None).unwrap();

        cart.update_quantity(&sized("a", "XL"), 4).unwrap();
        cart.remove_from_cart(&sized("a", "XL"));
        cart.remove_from_cart(&LineKey::plain(ProductId::new("ghost")));

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].quantity(), 1);
    }

    #[test]
    fn test_total_tracks_every_mutation() {
        let mut cart = CartStore::new();
        let a = product("a", 1999);
        let b = product("b", 250);

        cart.add_to_cart(&a, 2, None, None).unwrap();
        cart.add_to_cart(&b, 3, None, None).unwrap();
        cart.update_quantity(&LineKey::plain(b.id.clone()), 1).unwrap();
        cart.add_to_cart(&a, 1, None, None).unwrap();

        let expected: Price = cart.items().iter().map(CartLineItem::line_total).sum();
        assert_eq!(cart.cart_total(), expected);
        assert_eq!(cart.cart_total(), Price::from_cents(1999 * 3 + 250));
        assert_eq!(cart.cart_total(), cart.cart_total());
    }

    #[test]
    fn test_clear_cart() {
        let mut cart = CartStore::new();
        cart.add_to_cart(&product("a", 1000), 2, None, None).unwrap();

        cart.clear_cart();

        assert!(cart.is_empty());
        assert_eq!(cart.cart_total(), Price::ZERO);
        assert_eq!(cart.item_count(), 0);
    }

    #[test]
    fn test_sidebar_visibility() {
        let mut cart = CartStore::new();
        assert!(!cart.is_open());
        cart.toggle_open();
        assert!(cart.is_open());
        cart.set_open(false);
        assert!(!cart.is_open());
    }
}
