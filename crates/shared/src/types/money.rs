//! Money type with exact decimal precision.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! This type wraps `rust_decimal::Decimal` and keeps full working precision
//! through arithmetic. Rounding to the 2-place currency scale only happens
//! where a value is stored or presented, via [`Money::round_half_even`].

use std::cmp::Ordering;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use rust_decimal::{Decimal, MathematicalOps, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Number of fractional digits used for stored currency amounts.
pub const CURRENCY_SCALE: u32 = 2;

/// An exact monetary amount.
///
/// Zero and negative values are representable. Arithmetic never goes through
/// binary floating point; precision is only reduced by an explicit rounding call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// One whole currency unit.
    pub const ONE: Self = Self(Decimal::ONE);

    /// Wraps a decimal value as-is, without rounding.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Creates an amount from an integer count of minor units (cents).
    ///
    /// ```
    /// use tally_shared::Money;
    /// use rust_decimal_macros::dec;
    ///
    /// assert_eq!(Money::from_minor(12_345).amount(), dec!(123.45));
    /// ```
    #[must_use]
    pub fn from_minor(minor_units: i64) -> Self {
        Self(Decimal::new(minor_units, CURRENCY_SCALE))
    }

    /// Creates an amount from a whole number of currency units.
    #[must_use]
    pub fn from_major(units: i64) -> Self {
        Self(Decimal::from(units))
    }

    /// Returns the underlying decimal.
    #[must_use]
    pub const fn amount(self) -> Decimal {
        self.0
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the amount is strictly below zero.
    #[must_use]
    pub fn is_negative(self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Returns true if the amount is strictly above zero.
    #[must_use]
    pub fn is_positive(self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Rounds to `scale` fractional digits using Banker's Rounding.
    ///
    /// Uses `RoundingStrategy::MidpointNearestEven`:
    /// - 2.345 → 2.34 (to nearest even)
    /// - 2.355 → 2.36 (to nearest even)
    #[must_use]
    pub fn round_half_even(self, scale: u32) -> Self {
        Self(
            self.0
                .round_dp_with_strategy(scale, RoundingStrategy::MidpointNearestEven),
        )
    }

    /// Rounds to the currency scale (2 places) using Banker's Rounding.
    #[must_use]
    pub fn round_currency(self) -> Self {
        self.round_half_even(CURRENCY_SCALE)
    }

    /// Divides at full working precision.
    ///
    /// Returns `None` for a zero divisor or when the quotient does not fit.
    #[must_use]
    pub fn checked_div(self, divisor: Decimal) -> Option<Self> {
        self.0.checked_div(divisor).map(Self)
    }

    /// Adds two amounts, returning `None` if the sum leaves the decimal range.
    #[must_use]
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    /// Raises the amount to a non-negative integer power.
    ///
    /// Returns `None` on overflow. `x.pow(0)` is one.
    #[must_use]
    pub fn checked_pow(self, exponent: u32) -> Option<Self> {
        self.0.checked_powu(u64::from(exponent)).map(Self)
    }
}

impl PartialOrd for Money {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Money {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl Mul<Decimal> for Money {
    type Output = Self;

    fn mul(self, rhs: Decimal) -> Self {
        Self(self.0 * rhs)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Self {
        money.0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str_exact(s.trim()).map(Self)
    }
}
