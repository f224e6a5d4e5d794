//! Lossless decimal money type backed by rust_decimal.
//!
//! Provides canonical parsing from strings and formatting without exponent notation.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal as RustDecimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lossless decimal numeric type for prices, deltas and percentages.
///
/// Backed by rust_decimal to avoid floating-point drift.
/// Serializes to JSON number (not string) by default.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Decimal(#[serde(with = "rust_decimal::serde::float")] RustDecimal);

impl Decimal {
    /// Create a Decimal from a RustDecimal.
    pub fn new(value: RustDecimal) -> Self {
        Decimal(value)
    }

    /// Create a Decimal from a mantissa and scale, e.g. `(115, 2)` is 1.15.
    pub fn from_parts(mantissa: i64, scale: u32) -> Self {
        Decimal(RustDecimal::new(mantissa, scale))
    }

    /// Create a Decimal from an integer amount.
    pub fn from_i64(value: i64) -> Self {
        Decimal(RustDecimal::from(value))
    }

    /// Convert a float, returning None for NaN or out-of-range values.
    pub fn from_f64(value: f64) -> Option<Self> {
        RustDecimal::from_f64(value).map(Decimal)
    }

    /// Parse a Decimal from a string losslessly.
    ///
    /// # Errors
    /// Returns an error if the string is not a valid decimal number.
    pub fn from_str_canonical(s: &str) -> Result<Self, rust_decimal::Error> {
        RustDecimal::from_str(s).map(Decimal)
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

    /// The multiplicative identity (1).
    pub fn one() -> Self {
        Decimal(RustDecimal::ONE)
    }

    /// Returns the value 10.
    pub fn ten() -> Self {
        Decimal(RustDecimal::new(10, 0))
    }

    /// Returns the value 100.
    pub fn hundred() -> Self {
        Decimal(RustDecimal::ONE_HUNDRED)
    }

    /// Returns true if the value is exactly zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the value is < 0.
    pub fn is_negative(&self) -> bool {
        !self.is_zero() && self.0.is_sign_negative()
    }

    /// Round to the nearest whole currency unit, halves away from zero.
    pub fn round_units(&self) -> Self {
        Decimal(
            self.0
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Clamp negative values to zero.
    pub fn non_negative(self) -> Self {
        if self.is_negative() {
            Decimal::zero()
        } else {
            self
        }
    }

    /// Addition that returns None instead of overflowing.
    pub fn checked_add(self, rhs: Decimal) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Decimal)
    }

    /// Subtraction that returns None instead of overflowing.
    pub fn checked_sub(self, rhs: Decimal) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Decimal)
    }

    /// Multiplication that returns None instead of overflowing.
    pub fn checked_mul(self, rhs: Decimal) -> Option<Self> {
        self.0.checked_mul(rhs.0).map(Decimal)
    }

    /// Scale by a percentage: `self * (1 + pct / 100)`, or None on overflow.
    pub fn checked_scale_by_percent(&self, pct: Decimal) -> Option<Self> {
        let factor = Decimal::one().checked_add(pct / Decimal::hundred())?;
        self.checked_mul(factor)
    }

    /// Scale by a percentage, pinned to the representable range.
    pub fn saturating_scale_by_percent(&self, pct: Decimal) -> Self {
        let factor = RustDecimal::ONE.saturating_add((pct / Decimal::hundred()).0);
        Decimal(self.0.saturating_mul(factor))
    }

    /// Addition pinned to the representable range.
    pub fn saturating_add(self, rhs: Decimal) -> Self {
        Decimal(self.0.saturating_add(rhs.0))
    }

    pub fn max_value() -> Self {
        Decimal(RustDecimal::MAX)
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

impl std::ops::Mul for Decimal {
    type Output = Decimal;

    fn mul(self, rhs: Decimal) -> Decimal {
        Decimal(self.0 * rhs.0)
    }
}

impl std::ops::Div for Decimal {
    type Output = Decimal;

    fn div(self, rhs: Decimal) -> Decimal {
        Decimal(self.0 / rhs.0)
    }
}

impl std::ops::Rem for Decimal {
    type Output = Decimal;

    fn rem(self, rhs: Decimal) -> Decimal {
        Decimal(self.0 % rhs.0)
    }
}

impl std::ops::Neg for Decimal {
    type Output = Decimal;

    fn neg(self) -> Decimal {
        Decimal(-self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        Decimal::from_str_canonical(s).unwrap()
    }

    #[test]
    fn test_decimal_canonical_no_exponent() {
        let formatted = d("1180.00").to_canonical_string();
        assert!(!formatted.contains('e'));
        assert_eq!(formatted, "1180");
    }

    #[test]
    fn test_decimal_arithmetic() {
        let a = d("10.5");
        let b = d("2.5");
        assert_eq!((a + b).to_canonical_string(), "13");
        assert_eq!((a - b).to_canonical_string(), "8");
        assert_eq!((a * b).to_canonical_string(), "26.25");
        assert_eq!((d("115") % Decimal::ten()).to_canonical_string(), "5");
    }

    #[test]
    fn test_round_units_half_away_from_zero() {
        assert_eq!(d("114.5").round_units(), d("115"));
        assert_eq!(d("114.49").round_units(), d("114"));
        assert_eq!(d("-2.5").round_units(), d("-3"));
    }

    #[test]
    fn test_scale_by_percent() {
        assert_eq!(d("100").checked_scale_by_percent(d("10")), Some(d("110")));
        assert_eq!(d("1000").checked_scale_by_percent(d("-100")), Some(Decimal::zero()));
    }

    #[test]
    fn test_checked_ops_report_overflow() {
        let max = Decimal::max_value();
        assert_eq!(max.checked_add(Decimal::one()), None);
        assert_eq!(max.checked_mul(d("1.25")), None);
        assert_eq!(max.checked_scale_by_percent(d("10")), None);
        assert_eq!(d("10").checked_sub(d("2.5")), Some(d("7.5")));
    }

    #[test]
    fn test_saturating_ops_pin_to_range() {
        let max = Decimal::max_value();
        assert_eq!(max.saturating_add(Decimal::one()), max);
        assert_eq!(max.saturating_scale_by_percent(d("50")), max);
        assert_eq!(d("200").saturating_scale_by_percent(d("-10")), d("180"));
    }

    #[test]
    fn test_non_negative() {
        assert_eq!(d("-5").non_negative(), Decimal::zero());
        assert_eq!(d("5").non_negative(), d("5"));
    }

    #[test]
    fn test_multiplier_from_parts() {
        assert_eq!(Decimal::from_parts(115, 2), d("1.15"));
        assert_eq!(Decimal::from_i64(100) * Decimal::from_parts(115, 2), d("115"));
    }

    #[test]
    fn test_decimal_json_serialization() {
        let json = serde_json::to_value(d("123.456")).unwrap();
        assert!(json.is_number());
        assert_eq!(json.to_string(), "123.456");
    }

    #[test]
    fn test_decimal_from_f64() {
        assert_eq!(Decimal::from_f64(0.0), Some(Decimal::zero()));
        assert!(Decimal::from_f64(f64::NAN).is_none());
    }
}
