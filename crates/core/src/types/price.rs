//! Type-safe price representation using decimal arithmetic.
//!
//! All marketplace prices are Indian rupees. The payment gateway bills in
//! paise (1/100 rupee), so conversions in both directions live here rather
//! than being scattered through handlers.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// A price in Indian rupees.
///
/// Stored as a `Decimal` in rupees (e.g., `120.50`), never as a float.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Zero rupees.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal rupee amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from a whole number of paise.
    #[must_use]
    pub fn from_paise(paise: i64) -> Self {
        Self(Decimal::new(paise, 2))
    }

    /// The rupee amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// The amount in paise, as the gateway expects it.
    ///
    /// Rounds to the nearest paisa; prices entered through the app never
    /// carry sub-paisa precision.
    #[must_use]
    pub fn as_paise(&self) -> i64 {
        (self.0 * Decimal::ONE_HUNDRED)
            .round()
            .to_i64()
            .unwrap_or(i64::MAX)
    }

    /// Whether the price is strictly positive.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Multiply by a quantity (for order line totals).
    #[must_use]
    pub fn times(&self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }

    /// Add another price.
    #[must_use]
    pub fn plus(&self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\u{20b9}{:.2}", self.0)
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_paise_roundtrip() {
        let price = Price::from_paise(12050);
        assert_eq!(price.amount(), Decimal::from_str("120.50").unwrap());
        assert_eq!(price.as_paise(), 12050);
    }

    #[test]
    fn test_times_and_plus() {
        let thali = Price::from_paise(9000); // 90.00
        let total = thali.times(3).plus(Price::from_paise(1500));
        assert_eq!(total.as_paise(), 28500);
    }

    #[test]
    fn test_display_formats_two_places() {
        assert_eq!(Price::from_paise(12000).to_string(), "\u{20b9}120.00");
        assert_eq!(Price::from_paise(5).to_string(), "\u{20b9}0.05");
    }

    #[test]
    fn test_is_positive() {
        assert!(Price::from_paise(1).is_positive());
        assert!(!Price::ZERO.is_positive());
        assert!(!Price::from_paise(-100).is_positive());
    }

    #[test]
    fn test_serde_transparent() {
        let price = Price::from_paise(9900);
        let json = serde_json::to_string(&price).unwrap();
        let parsed: Price = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, price);
    }
}
