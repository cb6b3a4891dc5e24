use std::{fmt, str::FromStr};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Serialize, Serializer};

use crate::error::Rejection;

/// Number of fractional digits every amount carries
pub const MONEY_SCALE: u32 = 2;

/// A non negative amount of money with exactly two fractional digits.
///
/// Every value that enters goes through [`Money::new`], which rounds half-up to two
/// decimals, so sums and products never drift the way floats would. Arithmetic is
/// checked: an amount that does not fit in two decimals is refused, not wrapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::from_parts(0, 0, 0, false, MONEY_SCALE));

    /// Round `value` half-up to two decimals, rejecting anything below zero
    /// and anything too large to keep two decimals
    pub fn new(value: Decimal) -> Result<Self, Rejection> {
        let rounded = round(value).ok_or_else(|| Rejection::InvalidPrice(value.to_string()))?;
        if rounded < Decimal::ZERO {
            return Err(Rejection::NegativePrice(value.to_string()));
        }
        Ok(Self(rounded))
    }

    /// Amount for `quantity` units at this unit price, rounded half-up.
    /// `None` when the amount does not fit.
    pub fn times(self, quantity: u32) -> Option<Money> {
        self.0.checked_mul(Decimal::from(quantity)).and_then(round).map(Self)
    }

    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).and_then(round).map(Self)
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }
}

fn round(value: Decimal) -> Option<Decimal> {
    // half-up and away-from-zero agree for everything we keep
    let mut rounded = value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero);
    // rescale keeps a smaller scale when the mantissa has no room left
    rounded.rescale(MONEY_SCALE);
    if rounded.scale() != MONEY_SCALE {
        return None;
    }
    if rounded.is_zero() {
        rounded.set_sign_positive(true);
    }
    Some(rounded)
}

impl Default for Money {
    fn default() -> Self {
        Money::ZERO
    }
}

impl FromStr for Money {
    type Err = Rejection;

    /// Accepts plain literals (`50000`, `19.995`) and scientific notation (`5e4`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let value = Decimal::from_str(s)
            .or_else(|_| Decimal::from_scientific(s))
            .map_err(|_| Rejection::InvalidPrice(s.to_string()))?;
        Money::new(value).map_err(|e| match e {
            Rejection::NegativePrice(_) => Rejection::NegativePrice(s.to_string()),
            _ => Rejection::InvalidPrice(s.to_string()),
        })
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
