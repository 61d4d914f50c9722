//! Money types with precise decimal arithmetic
//!
//! Claims are settled in a single implicit currency unit, so `Money` is a
//! plain decimal amount. Arithmetic never rounds; rounding to the currency's
//! two decimal places happens only when a figure is published.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use thiserror::Error;

/// Decimal places used when publishing a monetary figure
pub const CURRENCY_DECIMAL_PLACES: u32 = 2;

/// Errors that can occur during money operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Division by zero")]
    DivisionByZero,

    #[error("Overflow during calculation")]
    Overflow,
}

/// A monetary amount in the claim's currency
///
/// Money uses rust_decimal for precise arithmetic without floating-point errors.
/// Amounts keep full precision internally; call [`Money::round_to_currency`]
/// when presenting them.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money {
    amount: Decimal,
}

impl Money {
    /// Creates a new Money value
    pub fn new(amount: Decimal) -> Self {
        Self { amount }
    }

    /// Creates a zero amount
    pub fn zero() -> Self {
        Self { amount: dec!(0) }
    }

    /// Returns the amount
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Returns true if the amount is zero
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Returns true if the amount is positive
    pub fn is_positive(&self) -> bool {
        self.amount.is_sign_positive() && !self.amount.is_zero()
    }

    /// Returns true if the amount is negative
    pub fn is_negative(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }

    /// Returns the absolute value
    pub fn abs(&self) -> Self {
        Self {
            amount: self.amount.abs(),
        }
    }

    /// Rounds to the currency's standard decimal places
    ///
    /// Uses round-half-to-even, the default strategy of `Decimal::round_dp`.
    pub fn round_to_currency(&self) -> Self {
        self.round_dp(CURRENCY_DECIMAL_PLACES)
    }

    /// Rounds to an arbitrary number of decimal places
    pub fn round_dp(&self, dp: u32) -> Self {
        Self {
            amount: self.amount.round_dp(dp),
        }
    }

    /// Returns the amount, or zero when it is negative
    pub fn non_negative(&self) -> Self {
        if self.is_negative() {
            Self::zero()
        } else {
            *self
        }
    }

    /// Multiplies by a scalar (e.g., for rate calculations)
    pub fn multiply(&self, factor: Decimal) -> Self {
        Self::new(self.amount * factor)
    }

    /// Checked multiplication that reports overflow instead of panicking
    pub fn checked_multiply(&self, factor: Decimal) -> Result<Self, MoneyError> {
        self.amount
            .checked_mul(factor)
            .map(Self::new)
            .ok_or(MoneyError::Overflow)
    }

    /// Returns `self / other` as a dimensionless factor
    pub fn ratio_to(&self, other: &Money) -> Result<Decimal, MoneyError> {
        if other.is_zero() {
            return Err(MoneyError::DivisionByZero);
        }
        self.amount
            .checked_div(other.amount)
            .ok_or(MoneyError::Overflow)
    }

    /// Expresses the magnitude of `self` as a percentage of `whole`
    pub fn percentage_of(&self, whole: &Money) -> Result<Decimal, MoneyError> {
        let ratio = self.abs().ratio_to(whole)?;
        ratio.checked_mul(dec!(100)).ok_or(MoneyError::Overflow)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.dp$}",
            self.amount,
            dp = CURRENCY_DECIMAL_PLACES as usize
        )
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Self::new(amount)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.amount + other.amount)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.amount += other.amount;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(self.amount - other.amount)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        self.amount -= other.amount;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.amount)
    }
}

impl Mul<Decimal> for Money {
    type Output = Self;

    fn mul(self, factor: Decimal) -> Self {
        self.multiply(factor)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + *m)
    }
}

/// Represents a percentage rate (e.g., copay rate, bonus rate)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Rate {
    /// The rate as a decimal (e.g., 0.05 for 5%)
    value: Decimal,
}

impl Rate {
    /// Creates a rate from a decimal value (e.g., 0.05 for 5%)
    pub fn new(value: Decimal) -> Self {
        Self { value }
    }

    /// Creates a rate from a percentage (e.g., 5.0 for 5%)
    pub fn from_percentage(percentage: Decimal) -> Self {
        Self {
            value: percentage / dec!(100),
        }
    }

    /// Returns the rate as a decimal
    pub fn as_decimal(&self) -> Decimal {
        self.value
    }

    /// Returns the rate as a percentage
    pub fn as_percentage(&self) -> Decimal {
        self.value * dec!(100)
    }

    /// Applies this rate to a money amount
    pub fn apply(&self, money: &Money) -> Money {
        money.multiply(self.value)
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.as_percentage().round_dp(4).normalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_arithmetic() {
        let a = Money::new(dec!(100.00));
        let b = Money::new(dec!(50.00));

        assert_eq!((a + b).amount(), dec!(150.00));
        assert_eq!((a - b).amount(), dec!(50.00));
        assert_eq!((-a).amount(), dec!(-100.00));
    }

    #[test]
    fn test_money_keeps_full_precision() {
        let third = Money::new(dec!(100)).multiply(dec!(1) / dec!(3));
        assert!(third.amount().scale() > 4);
        assert_eq!(third.round_to_currency().amount(), dec!(33.33));
    }

    #[test]
    fn test_round_to_currency_is_half_even() {
        assert_eq!(Money::new(dec!(2.345)).round_to_currency().amount(), dec!(2.34));
        assert_eq!(Money::new(dec!(2.355)).round_to_currency().amount(), dec!(2.36));
    }

    #[test]
    fn test_ratio_to_zero_is_error() {
        let result = Money::new(dec!(10)).ratio_to(&Money::zero());
        assert_eq!(result, Err(MoneyError::DivisionByZero));
    }

    #[test]
    fn test_percentage_of_uses_magnitude() {
        let pct = Money::new(dec!(-2000)).percentage_of(&Money::new(dec!(10000)));
        assert_eq!(pct, Ok(dec!(20)));
    }

    #[test]
    fn test_rate_application() {
        let rate = Rate::from_percentage(dec!(20));
        let amount = Money::new(dec!(1000.00));

        assert_eq!(rate.apply(&amount).amount(), dec!(200.00));
        assert_eq!(rate.to_string(), "20%");
    }

    #[test]
    fn test_display_uses_two_decimals() {
        assert_eq!(Money::new(dec!(130000)).to_string(), "130000.00");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn money_arithmetic_is_associative(
            a in -1_000_000i64..1_000_000i64,
            b in -1_000_000i64..1_000_000i64,
            c in -1_000_000i64..1_000_000i64
        ) {
            let ma = Money::new(Decimal::new(a, 2));
            let mb = Money::new(Decimal::new(b, 2));
            let mc = Money::new(Decimal::new(c, 2));

            prop_assert_eq!((ma + mb) + mc, ma + (mb + mc));
        }

        #[test]
        fn rate_split_conserves_amount(
            amount in 0i64..1_000_000_000i64,
            pct in 0u32..10_000u32
        ) {
            let money = Money::new(Decimal::new(amount, 2));
            let rate = Rate::from_percentage(Decimal::new(pct as i64, 2));
            let share = rate.apply(&money);

            prop_assert_eq!(share + (money - share), money);
        }
    }
}
