//! # Money Module
//!
//! Provides the `Money` type for prices and purchase amounts.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │    550.50 × 500.000 as f64 sums drift after a few thousand receipts    │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Kopecks                                          │
//! │    unit_price = 55050 kopecks, quantity = 500000 thousandths            │
//! │    value = 55050 × 500000 / 1000 = 27 525 000 kopecks, exactly         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use ledger_core::money::Money;
//!
//! let price: Money = "550.50".parse().unwrap();
//! assert_eq!(price.kopecks(), 55050);
//! assert_eq!(price.to_string(), "550.50");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub};
use std::str::FromStr;

use crate::error::ValidationError;

/// Minor units per major unit (kopecks per ruble).
pub const KOPECKS_PER_RUBLE: i64 = 100;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in kopecks (the smallest currency unit).
///
/// Serialized as a fixed-point decimal string (`"550.50"`) so that JSON
/// clients never see a float.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
#[serde(into = "String", try_from = "String")]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from kopecks.
    ///
    /// ## Example
    /// ```rust
    /// use ledger_core::money::Money;
    ///
    /// let price = Money::from_kopecks(55050); // 550.50
    /// assert_eq!(price.kopecks(), 55050);
    /// ```
    #[inline]
    pub const fn from_kopecks(kopecks: i64) -> Self {
        Money(kopecks)
    }

    /// Creates a Money value from rubles and kopecks.
    ///
    /// For negative amounts only the major unit carries the sign:
    /// `from_rubles_kopecks(-5, 50)` is -5.50.
    #[inline]
    pub const fn from_rubles_kopecks(rubles: i64, kopecks: i64) -> Self {
        if rubles < 0 {
            Money(rubles * KOPECKS_PER_RUBLE - kopecks)
        } else {
            Money(rubles * KOPECKS_PER_RUBLE + kopecks)
        }
    }

    /// Converts a product of kopecks and quantity thousandths back to
    /// kopecks, rounding half away from zero. Totals beyond the `i64`
    /// kopeck range saturate.
    ///
    /// ## Why
    /// Reports sum `quantity * unit_price` line values as exact integers in
    /// "milli-kopecks". Rounding happens once, on the final figure.
    ///
    /// ## Example
    /// ```rust
    /// use ledger_core::money::Money;
    ///
    /// // 1.500 units × 0.33 = 0.495 → 0.50
    /// assert_eq!(Money::from_milli_kopecks(1_500 * 33).kopecks(), 50);
    /// ```
    pub fn from_milli_kopecks(milli: i128) -> Money {
        let rounded = if milli >= 0 {
            (milli + 500) / 1000
        } else {
            (milli - 500) / 1000
        };
        Money(rounded.clamp(i64::MIN as i128, i64::MAX as i128) as i64)
    }

    /// Returns the value in kopecks.
    #[inline]
    pub const fn kopecks(&self) -> i64 {
        self.0
    }

    /// Returns the ruble portion.
    #[inline]
    pub const fn rubles(&self) -> i64 {
        self.0 / KOPECKS_PER_RUBLE
    }

    /// Returns the kopeck portion (always 0-99).
    #[inline]
    pub const fn kopecks_part(&self) -> i64 {
        (self.0 % KOPECKS_PER_RUBLE).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }
}

// =============================================================================
// Parsing
// =============================================================================

/// Parses `"550"`, `"550.5"` or `"550.50"`; more than two fraction digits
/// is rejected rather than silently rounded.
impl FromStr for Money {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_fixed(s, 2, "amount").map(Money)
    }
}

/// Parses a fixed-point decimal into an integer scaled by `10^scale`.
///
/// Shared by [`Money`] (scale 2) and [`crate::Quantity`] (scale 3).
pub(crate) fn parse_fixed(input: &str, scale: u32, field: &str) -> Result<i64, ValidationError> {
    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: reason.to_string(),
    };

    let s = input.trim();
    if s.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };

    let (whole, fraction) = match digits.split_once('.') {
        Some((w, f)) => (w, f),
        None => (digits, ""),
    };

    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid("expected a decimal number"));
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !fraction.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid("expected a decimal number"));
    }
    if fraction.len() > scale as usize {
        return Err(invalid(&format!("at most {scale} decimal places allowed")));
    }

    let factor = 10_i64.pow(scale);
    let whole_value: i64 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| invalid("value is too large"))?
    };
    let fraction_value: i64 = if fraction.is_empty() {
        0
    } else {
        let padded = format!("{:0<width$}", fraction, width = scale as usize);
        padded.parse().map_err(|_| invalid("expected a decimal number"))?
    };

    let value = whole_value
        .checked_mul(factor)
        .and_then(|v| v.checked_add(fraction_value))
        .ok_or_else(|| invalid("value is too large"))?;

    Ok(if negative { -value } else { value })
}

// =============================================================================
// Trait Implementations
// =============================================================================

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.rubles().abs(), self.kopecks_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl From<Money> for String {
    fn from(money: Money) -> Self {
        money.to_string()
    }
}

impl TryFrom<String> for Money {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_kopecks() {
        let money = Money::from_kopecks(55050);
        assert_eq!(money.kopecks(), 55050);
        assert_eq!(money.rubles(), 550);
        assert_eq!(money.kopecks_part(), 50);
    }

    #[test]
    fn test_from_rubles_kopecks() {
        assert_eq!(Money::from_rubles_kopecks(10, 99).kopecks(), 1099);
        assert_eq!(Money::from_rubles_kopecks(-5, 50).kopecks(), -550);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_kopecks(55050).to_string(), "550.50");
        assert_eq!(Money::from_kopecks(500).to_string(), "5.00");
        assert_eq!(Money::from_kopecks(-550).to_string(), "-5.50");
        assert_eq!(Money::zero().to_string(), "0.00");
    }

    #[test]
    fn test_parse() {
        assert_eq!("550.50".parse::<Money>().unwrap().kopecks(), 55050);
        assert_eq!("550.5".parse::<Money>().unwrap().kopecks(), 55050);
        assert_eq!("550".parse::<Money>().unwrap().kopecks(), 55000);
        assert_eq!("0".parse::<Money>().unwrap().kopecks(), 0);
        assert_eq!(".75".parse::<Money>().unwrap().kopecks(), 75);
        assert_eq!("-1.25".parse::<Money>().unwrap().kopecks(), -125);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("".parse::<Money>().is_err());
        assert!("abc".parse::<Money>().is_err());
        assert!("1.234".parse::<Money>().is_err());
        assert!("1,50".parse::<Money>().is_err());
        assert!(".".parse::<Money>().is_err());
        assert!("99999999999999999999".parse::<Money>().is_err());
    }

    #[test]
    fn test_milli_kopeck_rounding() {
        assert_eq!(Money::from_milli_kopecks(27_525_000_000).kopecks(), 27_525_000);
        assert_eq!(Money::from_milli_kopecks(49_500).kopecks(), 50);
        assert_eq!(Money::from_milli_kopecks(49_499).kopecks(), 49);
        assert_eq!(Money::from_milli_kopecks(-49_500).kopecks(), -50);
        assert_eq!(Money::from_milli_kopecks(i128::from(i64::MAX) * 10_000).kopecks(), i64::MAX);
    }

    #[test]
    fn test_serde_uses_decimal_string() {
        let json = serde_json::to_string(&Money::from_kopecks(55050)).unwrap();
        assert_eq!(json, "\"550.50\"");

        let back: Money = serde_json::from_str("\"12.30\"").unwrap();
        assert_eq!(back.kopecks(), 1230);
        assert!(serde_json::from_str::<Money>("\"12.345\"").is_err());
    }

    #[test]
    fn test_sum() {
        let total: Money = [100, 250, 5].into_iter().map(Money::from_kopecks).sum();
        assert_eq!(total.kopecks(), 355);
    }
}
