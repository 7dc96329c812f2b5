//! Money in integer centavos
//!
//! Every amount handled by the incentive and reconciliation logic is a
//! [`Money`]: a signed count of centavos. Decimals only appear at the
//! boundaries (JSON payloads and the display formatter), and are rounded
//! half away from zero to two places on the way in.
//!
//! Amounts are bounded to `±Money::MAX`, a quarter of the `i64` range. Any
//! sum or difference of two bounded amounts fits in an `i64`, so the
//! operators never overflow; their results saturate at the bound.

use crate::{Error, Result};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// Centavos per real
pub const CENTS_PER_REAL: i64 = 100;

/// Largest magnitude a [`Money`] can hold, in centavos
pub const MAX_CENTS: i64 = i64::MAX / 4;

/// Amount of Brazilian Reais, stored as centavos
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Money(i64);

impl Money {
    /// Zero reais
    pub const ZERO: Money = Money(0);

    /// Largest representable amount
    pub const MAX: Money = Money(MAX_CENTS);

    /// Smallest representable amount
    pub const MIN: Money = Money(-MAX_CENTS);

    /// Create from a centavo count, saturating at [`Money::MAX`] / [`Money::MIN`]
    pub const fn from_cents(cents: i64) -> Self {
        Self::saturating(cents)
    }

    /// Create from a centavo count, rejecting anything out of range
    pub fn try_from_cents(cents: i64) -> Result<Self> {
        if (-MAX_CENTS..=MAX_CENTS).contains(&cents) {
            Ok(Self(cents))
        } else {
            Err(Error::InvalidAmount(format!("{} centavos is out of range", cents)))
        }
    }

    /// Create from whole reais, saturating at the bounds
    pub const fn from_reais(reais: i64) -> Self {
        Self::saturating(reais.saturating_mul(CENTS_PER_REAL))
    }

    /// Normalize a decimal amount to centavos, rounding half away from zero
    pub fn from_decimal(amount: Decimal) -> Result<Self> {
        let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        let cents = rounded
            .checked_mul(Decimal::from(CENTS_PER_REAL))
            .and_then(|cents| cents.to_i64())
            .ok_or_else(|| Error::InvalidAmount(format!("{} is out of range", amount)))?;
        Self::try_from_cents(cents)
    }

    const fn saturating(cents: i64) -> Self {
        if cents > MAX_CENTS {
            Self(MAX_CENTS)
        } else if cents < -MAX_CENTS {
            Self(-MAX_CENTS)
        } else {
            Self(cents)
        }
    }

    /// Raw centavo count
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Exact decimal value in reais (scale 2)
    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.0, 2)
    }

    /// Absolute value
    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// True when exactly zero
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// True when below zero
    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Sum, or `None` past the bounds
    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        Self::try_from_cents(self.0 + rhs.0).ok()
    }

    /// Difference, or `None` past the bounds
    pub fn checked_sub(self, rhs: Money) -> Option<Money> {
        Self::try_from_cents(self.0 - rhs.0).ok()
    }

    /// Apply a percentage, rounding the result half away from zero
    pub fn percent(&self, percent: Decimal) -> Result<Self> {
        let value = self
            .to_decimal()
            .checked_mul(percent)
            .and_then(|value| value.checked_div(Decimal::ONE_HUNDRED))
            .ok_or_else(|| {
                Error::InvalidAmount(format!("{}% of {} is out of range", percent, self))
            })?;
        Self::from_decimal(value)
    }
}

impl TryFrom<Decimal> for Money {
    type Error = Error;

    fn try_from(value: Decimal) -> Result<Self> {
        Self::from_decimal(value)
    }
}

impl From<Money> for Decimal {
    fn from(value: Money) -> Self {
        value.to_decimal()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::format::format_brl(*self))
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money::saturating(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        *self = *self + rhs;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money::saturating(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        *self = *self - rhs;
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Money {
        Money(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.copied().sum()
    }
}
