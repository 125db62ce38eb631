//! Order identifiers.
//!
//! Each confirmed order gets two identifiers: an `order_id` (UUID v7, unique
//! and time-ordered) and a short customer-facing [`OrderNumber`] such as
//! `#TBG4K2J9QZX`. The order number is random and only for display.

use core::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Length of the random part of an order number.
pub const ORDER_NUMBER_LENGTH: usize = 8;

const BASE36: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Customer-facing order number, e.g. `#TBG4K2J9QZX`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderNumber(String);

impl OrderNumber {
    /// Generate a number with the given prefix and a random base-36 suffix.
    #[must_use]
    pub fn generate(prefix: &str) -> Self {
        let mut rng = rand::rng();
        let suffix: String = (0..ORDER_NUMBER_LENGTH)
            .map(|_| {
                let idx = rng.random_range(0..BASE36.len());
                BASE36.get(idx).map_or('0', |b| char::from(*b))
            })
            .collect();
        Self(format!("#{prefix}{suffix}"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A new unique, time-ordered order ID.
#[must_use]
pub fn new_order_id() -> Uuid {
    Uuid::now_v7()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_number_format() {
        let number = OrderNumber::generate("TBG");
        let s = number.as_str();

        let suffix = s.strip_prefix("#TBG").unwrap();
        assert_eq!(suffix.len(), ORDER_NUMBER_LENGTH);
        assert!(suffix
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
    }

    #[test]
    fn test_order_ids_are_unique_v7() {
        let first = new_order_id();
        let second = new_order_id();
        assert_ne!(first, second);
        assert_eq!(first.get_version_num(), 7);
    }
}
