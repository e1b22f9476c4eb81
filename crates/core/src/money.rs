//! Fixed-point currency amounts.
//!
//! Amounts are carried in milliunits (1/1000 of the currency unit), the same
//! resolution the budgeting API reports, so threshold comparisons on
//! remaining balances stay exact.

use std::fmt;
use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

use crate::error::TripwireError;

const MILLIUNITS_PER_UNIT: i64 = 1_000;

/// A signed amount of money in milliunits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Milliunits(pub i64);

impl Milliunits {
    pub const ZERO: Milliunits = Milliunits(0);

    pub fn new(milliunits: i64) -> Self {
        Self(milliunits)
    }

    /// Whole currency units, e.g. `Milliunits::from_units(400)` is $400.00.
    pub fn from_units(units: i64) -> Self {
        Self(units * MILLIUNITS_PER_UNIT)
    }

    /// Convert a floating-point currency amount, rounding to the nearest milliunit.
    pub fn from_f64_units(units: f64) -> Self {
        Self((units * MILLIUNITS_PER_UNIT as f64).round() as i64)
    }

    /// Parse a non-negative decimal amount such as `"50"` or `"50.50"`.
    ///
    /// At most three fractional digits are accepted; signs, exponents and
    /// thousands separators are rejected.
    pub fn parse_units(input: &str) -> Result<Self, TripwireError> {
        let invalid = || TripwireError::InvalidAmount(input.to_string());

        let (whole, frac) = match input.split_once('.') {
            Some((w, f)) => (w, f),
            None => (input, ""),
        };

        if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        if input.contains('.') && (frac.is_empty() || !frac.bytes().all(|b| b.is_ascii_digit())) {
            return Err(invalid());
        }
        if frac.len() > 3 {
            return Err(invalid());
        }

        let whole: i64 = whole.parse().map_err(|_| invalid())?;
        let mut frac_milli: i64 = 0;
        for (i, digit) in frac.bytes().enumerate() {
            frac_milli += i64::from(digit - b'0') * 10_i64.pow(2 - i as u32);
        }

        whole
            .checked_mul(MILLIUNITS_PER_UNIT)
            .and_then(|w| w.checked_add(frac_milli))
            .map(Self)
            .ok_or_else(invalid)
    }

    pub fn as_milliunits(self) -> i64 {
        self.0
    }

    pub fn as_units(self) -> f64 {
        self.0 as f64 / MILLIUNITS_PER_UNIT as f64
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// `self / denominator` as a plain ratio, `None` when the denominator is zero.
    pub fn ratio_of(self, denominator: Milliunits) -> Option<f64> {
        if denominator.is_zero() {
            None
        } else {
            Some(self.0 as f64 / denominator.0 as f64)
        }
    }
}

impl Add for Milliunits {
    type Output = Milliunits;

    fn add(self, rhs: Self) -> Self::Output {
        Milliunits(self.0.saturating_add(rhs.0))
    }
}

impl Sub for Milliunits {
    type Output = Milliunits;

    fn sub(self, rhs: Self) -> Self::Output {
        Milliunits(self.0.saturating_sub(rhs.0))
    }
}

impl fmt::Display for Milliunits {
    /// Renders as dollars and cents, e.g. `$310.00` or `-$5.25`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let cents = (abs + 5) / 10;
        write!(f, "{sign}${}.{:02}", cents / 100, cents % 100)
    }
}
