//! Lossless money type backed by rust_decimal.
//!
//! Provides canonical parsing from strings, currency rounding and
//! epsilon-based sign tests used throughout settlement.

use rust_decimal::{Decimal as RustDecimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lossless decimal amount in the session's single currency.
///
/// Backed by rust_decimal to avoid floating-point drift.
/// Serializes to JSON number (not string).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Decimal(#[serde(with = "rust_decimal::serde::float")] RustDecimal);

impl Decimal {
    /// Create a Decimal from a RustDecimal.
    pub fn new(value: RustDecimal) -> Self {
        Decimal(value)
    }

    /// Parse a Decimal from a string losslessly.
    ///
    /// # Errors
    /// Returns an error if the string is not a valid decimal number.
    pub fn from_str_canonical(s: &str) -> Result<Self, rust_decimal::Error> {
        RustDecimal::from_str(s).map(Decimal)
    }

    /// Whole currency units, e.g. `Decimal::from_units(50)` is 50.00.
    pub fn from_units(units: i64) -> Self {
        Decimal(RustDecimal::from(units))
    }

    /// Amount from minor units at the given scale (`from_minor(1999, 2)` is 19.99).
    pub fn from_minor(minor: i64, scale: u32) -> Self {
        Decimal(RustDecimal::new(minor, scale))
    }

    /// Format the Decimal as a canonical string (no exponent notation).
    pub fn to_canonical_string(&self) -> String {
        let normalized = self.0.normalize();
        format!("{}", normalized)
    }

    /// Get the underlying RustDecimal.
    pub fn inner(&self) -> RustDecimal {
        self.0
    }

    /// The additive identity (0).
    pub fn zero() -> Self {
        Decimal(RustDecimal::ZERO)
    }

    /// Returns true if the value is exactly zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the value is > 0.
    pub fn is_positive(&self) -> bool {
        !self.is_zero() && self.0.is_sign_positive()
    }

    /// Returns true if the value is < 0.
    pub fn is_negative(&self) -> bool {
        !self.is_zero() && self.0.is_sign_negative()
    }

    /// Absolute value.
    pub fn abs(&self) -> Self {
        Decimal(self.0.abs())
    }

    /// Smaller of two amounts.
    pub fn min(self, other: Decimal) -> Self {
        if self <= other {
            self
        } else {
            other
        }
    }

    /// Round to currency precision, midpoint away from zero (19.995 -> 20.00).
    pub fn round_currency(&self, scale: u32) -> Self {
        Decimal(
            self.0
                .round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// True when `|self| <= epsilon`.
    pub fn is_negligible(&self, epsilon: Decimal) -> bool {
        self.abs() <= epsilon
    }

    /// True when `self > epsilon`.
    pub fn exceeds(&self, epsilon: Decimal) -> bool {
        *self > epsilon
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_canonical_string())
    }
}

impl FromStr for Decimal {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str_canonical(s)
    }
}

impl From<RustDecimal> for Decimal {
    fn from(value: RustDecimal) -> Self {
        Decimal(value)
    }
}

impl From<Decimal> for RustDecimal {
    fn from(value: Decimal) -> Self {
        value.0
    }
}

impl std::ops::Add for Decimal {
    type Output = Decimal;

    fn add(self, rhs: Decimal) -> Decimal {
        Decimal(self.0 + rhs.0)
    }
}

impl std::ops::AddAssign for Decimal {
    fn add_assign(&mut self, rhs: Decimal) {
        self.0 += rhs.0;
    }
}

impl std::ops::Sub for Decimal {
    type Output = Decimal;

    fn sub(self, rhs: Decimal) -> Decimal {
        Decimal(self.0 - rhs.0)
    }
}

impl std::ops::SubAssign for Decimal {
    fn sub_assign(&mut self, rhs: Decimal) {
        self.0 -= rhs.0;
    }
}

impl std::ops::Mul for Decimal {
    type Output = Decimal;

    fn mul(self, rhs: Decimal) -> Decimal {
        Decimal(self.0 * rhs.0)
    }
}

impl std::ops::Neg for Decimal {
    type Output = Decimal;

    fn neg(self) -> Decimal {
        Decimal(-self.0)
    }
}

impl std::iter::Sum for Decimal {
    fn sum<I: Iterator<Item = Decimal>>(iter: I) -> Self {
        iter.fold(Decimal::zero(), |acc, d| acc + d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        Decimal::from_str_canonical(s).unwrap()
    }

    #[test]
    fn test_decimal_canonical_strips_trailing_zeros() {
        assert_eq!(d("50.00").to_canonical_string(), "50");
        assert_eq!(d("12.50").to_canonical_string(), "12.5");
        assert!(!d("123").to_canonical_string().contains('e'));
    }

    #[test]
    fn test_decimal_arithmetic() {
        let a = d("10.5");
        let b = d("2.5");
        assert_eq!((a + b).to_canonical_string(), "13");
        assert_eq!((a - b).to_canonical_string(), "8");
        assert_eq!((-a).to_canonical_string(), "-10.5");
        assert_eq!((a * b).to_canonical_string(), "26.25");

        let mut c = a;
        c += b;
        c -= d("1");
        assert_eq!(c, d("12"));
    }

    #[test]
    fn test_round_currency_midpoint_away_from_zero() {
        assert_eq!(d("19.995").round_currency(2), d("20.00"));
        assert_eq!(d("-19.995").round_currency(2), d("-20.00"));
        assert_eq!(d("33.3333").round_currency(2), d("33.33"));
        assert_eq!(d("7").round_currency(0), d("7"));
    }

    #[test]
    fn test_epsilon_helpers() {
        let eps = d("0.01");
        assert!(d("0.01").is_negligible(eps));
        assert!(d("-0.005").is_negligible(eps));
        assert!(!d("0.02").is_negligible(eps));
        assert!(d("0.02").exceeds(eps));
        assert!(!d("0.01").exceeds(eps));
    }

    #[test]
    fn test_sign_predicates() {
        assert!(d("1").is_positive());
        assert!(d("-1").is_negative());
        assert!(!Decimal::zero().is_positive());
        assert!(!Decimal::zero().is_negative());
    }

    #[test]
    fn test_sum_and_min() {
        let total: Decimal = vec![d("1.10"), d("2.20"), d("-3.30")].into_iter().sum();
        assert!(total.is_zero());
        assert_eq!(d("4").min(d("3")), d("3"));
    }

    #[test]
    fn test_from_units_and_minor() {
        assert_eq!(Decimal::from_units(50), d("50"));
        assert_eq!(Decimal::from_minor(1999, 2), d("19.99"));
    }

    #[test]
    fn test_decimal_json_serialization() {
        let json = serde_json::to_value(d("123.45")).unwrap();
        assert!(json.is_number());
        assert_eq!(json.to_string(), "123.45");
    }
}
