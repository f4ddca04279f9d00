use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Neg, Sub};

/// A signed monetary amount held at exactly two decimal places.
///
/// Every constructor rounds to two places (midpoint away from zero), so all
/// downstream arithmetic and serialization see the same precision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Money(Decimal);

impl Money {
    pub fn from_decimal(decimal: Decimal) -> Self {
        Money(decimal.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
    }

    pub fn from_cents(cents: i64) -> Self {
        Money(Decimal::new(cents, 2))
    }

    pub fn to_cents(self) -> i64 {
        (self.0 * Decimal::from(100)).to_i64().unwrap_or(0)
    }

    pub fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    pub fn abs(self) -> Self {
        Money(self.0.abs())
    }
}

/// Plain two-decimal rendering (`-100.50`), used verbatim in OFX output.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Add for Money {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Money(self.0 + rhs.0)
    }
}

impl Sub for Money {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Money(self.0 - rhs.0)
    }
}

impl Neg for Money {
    type Output = Self;
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    #[test]
    fn from_cents_round_trip() {
        assert_eq!(Money::from_cents(12345).to_cents(), 12345);
        assert_eq!(Money::from_cents(-5000).to_cents(), -5000);
    }

    #[test]
    fn from_decimal_rounds_to_two_places() {
        let m = Money::from_decimal(Decimal::from_str("1.005").unwrap());
        assert_eq!(m.to_cents(), 101);
    }

    #[test]
    fn display_always_two_decimals() {
        assert_eq!(Money::from_cents(10050).to_string(), "100.50");
        assert_eq!(Money::from_cents(-10050).to_string(), "-100.50");
        assert_eq!(Money::from_decimal(Decimal::from(100)).to_string(), "100.00");
        assert_eq!(Money::zero().to_string(), "0.00");
    }

    #[test]
    fn arithmetic() {
        let a = Money::from_cents(150);
        let b = Money::from_cents(50);
        assert_eq!((a + b).to_cents(), 200);
        assert_eq!((a - b).to_cents(), 100);
        assert_eq!((-a).to_cents(), -150);
    }

    #[test]
    fn negativity() {
        assert!(Money::from_cents(-1).is_negative());
        assert!(!Money::from_cents(1).is_negative());
        assert!(!Money::zero().is_negative());
        assert_eq!(Money::from_cents(-1).abs(), Money::from_cents(1));
    }
}
