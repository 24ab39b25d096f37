//! # Quantity Module
//!
//! Received quantities with three decimal places (`500.000` liters,
//! `1.250` tonnes), stored as integer thousandths.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::money::{parse_fixed, Money};

/// Thousandths per whole unit.
pub const MILLIS_PER_UNIT: i64 = 1000;

/// A quantity in thousandths of a unit of measure.
///
/// ## Example
/// ```rust
/// use ledger_core::Quantity;
///
/// let qty: Quantity = "500".parse().unwrap();
/// assert_eq!(qty.millis(), 500_000);
/// assert_eq!(qty.to_string(), "500.000");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
#[serde(into = "String", try_from = "String")]
pub struct Quantity(i64);

impl Quantity {
    #[inline]
    pub const fn from_millis(millis: i64) -> Self {
        Quantity(millis)
    }

    /// Whole units, no fraction.
    #[inline]
    pub const fn from_units(units: i64) -> Self {
        Quantity(units * MILLIS_PER_UNIT)
    }

    #[inline]
    pub const fn millis(&self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn zero() -> Self {
        Quantity(0)
    }

    /// A receipt line must carry a strictly positive quantity.
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Value of this quantity at `unit_price`, rounded to the kopeck.
    ///
    /// ## Example
    /// ```rust
    /// use ledger_core::{Money, Quantity};
    ///
    /// let qty: Quantity = "500.000".parse().unwrap();
    /// let price: Money = "550.50".parse().unwrap();
    /// assert_eq!(qty.extend(price).to_string(), "275250.00");
    /// ```
    pub fn extend(&self, unit_price: Money) -> Money {
        Money::from_milli_kopecks(self.0 as i128 * unit_price.kopecks() as i128)
    }
}

impl FromStr for Quantity {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_fixed(s, 3, "quantity").map(Quantity)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let per_unit = MILLIS_PER_UNIT as u64;
        write!(f, "{}{}.{:03}", sign, abs / per_unit, abs % per_unit)
    }
}

impl From<Quantity> for String {
    fn from(qty: Quantity) -> Self {
        qty.to_string()
    }
}

impl TryFrom<String> for Quantity {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl Add for Quantity {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Quantity(self.0 + other.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let qty: Quantity = "500.000".parse().unwrap();
        assert_eq!(qty.millis(), 500_000);
        assert_eq!(qty.to_string(), "500.000");

        assert_eq!("1.25".parse::<Quantity>().unwrap().millis(), 1_250);
        assert_eq!(Quantity::from_millis(5).to_string(), "0.005");
        assert_eq!(Quantity::from_millis(-1_500).to_string(), "-1.500");
    }

    #[test]
    fn test_parse_rejects_excess_precision() {
        assert!("1.0001".parse::<Quantity>().is_err());
        assert!("ten".parse::<Quantity>().is_err());
    }

    #[test]
    fn test_positive_boundary() {
        assert!(!Quantity::zero().is_positive());
        assert!(Quantity::from_millis(1).is_positive());
        assert!(!Quantity::from_millis(-1).is_positive());
    }

    #[test]
    fn test_extend() {
        let qty = Quantity::from_units(3);
        assert_eq!(qty.extend(Money::from_kopecks(299)).kopecks(), 897);

        // 0.333 × 1.00 = 0.333 → 0.33
        let third = Quantity::from_millis(333);
        assert_eq!(third.extend(Money::from_kopecks(100)).kopecks(), 33);

        assert!(qty.extend(Money::zero()).is_zero());
    }
}
