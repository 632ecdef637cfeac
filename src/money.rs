//! Fixed-point monetary amounts in the ledger's smallest unit.
//!
//! All core arithmetic happens on signed 64-bit integer units. The decimal
//! string representation exists for display only and must never be fed back
//! into payout or pot computations.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub};
use thiserror::Error;

/// Smallest-unit scale of one whole coin (9 decimal places).
pub const UNITS_PER_COIN: i64 = 1_000_000_000;

const DECIMALS: u32 = 9;

/// An amount of the ledger's native currency, in its smallest unit.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_units(units: i64) -> Self {
        Money(units)
    }

    pub const fn units(self) -> i64 {
        self.0
    }

    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    pub fn checked_sub(self, other: Money) -> Option<Money> {
        self.0.checked_sub(other.0).map(Money)
    }

    pub fn saturating_add(self, other: Money) -> Money {
        Money(self.0.saturating_add(other.0))
    }

    pub fn saturating_sub(self, other: Money) -> Money {
        Money(self.0.saturating_sub(other.0))
    }

    /// Whether this amount is an exact multiple of `step`.
    ///
    /// A non-positive step never matches; stake steps are always positive.
    pub fn is_multiple_of(self, step: Money) -> bool {
        step.0 > 0 && self.0 % step.0 == 0
    }

    /// Render as a human decimal string, e.g. `1.5` for 1_500_000_000 units.
    ///
    /// Display only: the result must not re-enter monetary arithmetic.
    pub fn to_decimal_string(self) -> String {
        let negative = self.0 < 0;
        let abs = self.0.unsigned_abs();
        let whole = abs / UNITS_PER_COIN as u64;
        let frac = abs % UNITS_PER_COIN as u64;
        let sign = if negative { "-" } else { "" };
        if frac == 0 {
            return format!("{}{}", sign, whole);
        }
        let frac = format!("{:09}", frac);
        format!("{}{}.{}", sign, whole, frac.trim_end_matches('0'))
    }

    /// Parse a human decimal string into smallest units, without floats.
    pub fn parse_decimal(input: &str) -> Result<Money, MoneyError> {
        let trimmed = input.trim();
        let (negative, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        let (whole_str, frac_str) = match digits.split_once('.') {
            Some((w, f)) => (w, f),
            None => (digits, ""),
        };
        if whole_str.is_empty() && frac_str.is_empty() {
            return Err(MoneyError::Empty);
        }
        if frac_str.len() > DECIMALS as usize {
            return Err(MoneyError::TooManyDecimals {
                input: input.to_string(),
                max: DECIMALS,
            });
        }
        let whole: i64 = if whole_str.is_empty() {
            0
        } else {
            whole_str
                .parse()
                .map_err(|_| MoneyError::InvalidDigits(input.to_string()))?
        };
        let frac: i64 = if frac_str.is_empty() {
            0
        } else {
            if !frac_str.bytes().all(|b| b.is_ascii_digit()) {
                return Err(MoneyError::InvalidDigits(input.to_string()));
            }
            let padded = format!("{:0<9}", frac_str);
            padded
                .parse()
                .map_err(|_| MoneyError::InvalidDigits(input.to_string()))?
        };
        let units = whole
            .checked_mul(UNITS_PER_COIN)
            .and_then(|w| w.checked_add(frac))
            .ok_or_else(|| MoneyError::Overflow(input.to_string()))?;
        Ok(Money(if negative { -units } else { units }))
    }
}

// The operator impls saturate, like `Sum`: one overflow policy across the
// public API. Callers that must detect overflow use the checked_* family.
impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        self.saturating_add(other)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Money) {
        *self = self.saturating_add(other);
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, other: Money) -> Money {
        self.saturating_sub(other)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, m| acc.saturating_add(m))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_decimal_string())
    }
}

/// Errors from parsing a decimal amount string.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MoneyError {
    #[error("empty amount")]
    Empty,

    #[error("invalid digits in amount '{0}'")]
    InvalidDigits(String),

    #[error("amount '{input}' has more than {max} decimal places")]
    TooManyDecimals { input: String, max: u32 },

    #[error("amount '{0}' overflows the smallest-unit range")]
    Overflow(String),
}
