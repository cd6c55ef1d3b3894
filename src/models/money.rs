//! Money type for representing currency amounts
//!
//! Internally stores amounts in minor units (i64) to avoid floating-point
//! precision issues. The currency symbol is never part of the value; it lives
//! next to it (on the category, or in the settings) and is only attached when
//! formatting.
//!
//! Operators saturate at the `i64` bounds. Anything that changes a stored
//! balance goes through [`Money::checked_add`] instead, so an out-of-range
//! result is reported rather than written.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// Currency symbol used when nothing else names one
pub const DEFAULT_CURRENCY: &str = "₸";

/// Represents a monetary amount stored as hundredths of the currency unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Create a Money amount from minor units
    ///
    /// # Examples
    /// ```
    /// use buildledger::models::Money;
    /// let amount = Money::from_minor(1050); // 10.50
    /// assert_eq!(amount.units(), 10);
    /// ```
    pub const fn from_minor(minor: i64) -> Self {
        Self(minor)
    }

    /// Create a Money amount from whole currency units
    pub const fn from_units(units: i64) -> Self {
        Self(units.saturating_mul(100))
    }

    pub const fn zero() -> Self {
        Self(0)
    }

    /// Get the amount in minor units
    pub const fn minor(&self) -> i64 {
        self.0
    }

    /// Get the whole units portion (truncated toward zero)
    pub const fn units(&self) -> i64 {
        self.0 / 100
    }

    /// Get the minor portion (0-99)
    pub const fn minor_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    pub const fn abs(&self) -> Self {
        Self(self.0.saturating_abs())
    }

    /// Add, or `None` when the result does not fit
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    /// Parse a money amount from a plain number
    ///
    /// Accepts formats: "10.50", "-10.50", "10", "10.5"
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let s = s.trim();

        let (negative, s) = if let Some(stripped) = s.strip_prefix('-') {
            (true, stripped)
        } else {
            (false, s)
        };

        if s.is_empty() || s.starts_with('-') {
            return Err(MoneyParseError::InvalidFormat(s.to_string()));
        }

        let invalid = || MoneyParseError::InvalidFormat(s.to_string());
        let out_of_range = || MoneyParseError::OutOfRange(s.to_string());

        let (units, fraction) = match s.split_once('.') {
            Some((units, fraction)) => (units, fraction),
            None => (s, ""),
        };
        if fraction.contains('.') || !fraction.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        if units.is_empty() || !units.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        // Only the first two fraction digits are kept
        let digit = |i: usize| i64::from(fraction.as_bytes()[i] - b'0');
        let minor = match fraction.len() {
            0 => 0,
            1 => digit(0) * 10,
            _ => digit(0) * 10 + digit(1),
        };

        let units: i64 = units.parse().map_err(|_| out_of_range())?;
        let minor = units
            .checked_mul(100)
            .and_then(|v| v.checked_add(minor))
            .ok_or_else(out_of_range)?;

        Ok(Self(if negative { -minor } else { minor }))
    }

    /// Parse an amount stored as formatted text, e.g. `"1 000 ₸"`
    ///
    /// Everything except ASCII digits, `.` and `-` is discarded before
    /// parsing, so grouping spaces and any currency suffix are ignored.
    pub fn parse_formatted(s: &str) -> Result<Self, MoneyParseError> {
        let numeric: String = s
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
            .collect();

        if numeric.is_empty() {
            return Err(MoneyParseError::InvalidFormat(s.to_string()));
        }

        Self::parse(&numeric).map_err(|e| match e {
            MoneyParseError::InvalidFormat(_) => MoneyParseError::InvalidFormat(s.to_string()),
            MoneyParseError::OutOfRange(_) => MoneyParseError::OutOfRange(s.to_string()),
        })
    }

    /// Format as `"<value> <symbol>"`, dropping the fraction when it is zero
    pub fn format_with_suffix(&self, symbol: &str) -> String {
        let sign = if self.is_negative() { "-" } else { "" };
        let units = self.units().abs();

        if self.minor_part() == 0 {
            format!("{}{} {}", sign, units, symbol)
        } else {
            format!("{}{}.{:02} {}", sign, units, self.minor_part(), symbol)
        }
    }
}

/// A balance as found in a stored document
///
/// Current documents hold minor units; older ones hold formatted text such
/// as `"1000 ₸"`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum StoredAmount {
    Minor(i64),
    Text(String),
}

impl StoredAmount {
    pub fn to_money(&self) -> Result<Money, MoneyParseError> {
        match self {
            Self::Minor(minor) => Ok(Money::from_minor(*minor)),
            Self::Text(text) => Money::parse_formatted(text),
        }
    }

    /// Symbol written after the number in legacy text, if any
    pub fn currency_suffix(&self) -> Option<&str> {
        let Self::Text(text) = self else {
            return None;
        };
        let last_digit = text.rfind(|c: char| c.is_ascii_digit())?;
        let suffix = text[last_digit + 1..].trim();
        (!suffix.is_empty()).then_some(suffix)
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_negative() {
            write!(f, "-{}.{:02}", self.units().abs(), self.minor_part())
        } else {
            write!(f, "{}.{:02}", self.units(), self.minor_part())
        }
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(self.0.saturating_neg())
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

/// Error type for money parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    InvalidFormat(String),
    OutOfRange(String),
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyParseError::InvalidFormat(s) => write!(f, "Invalid money format: {}", s),
            MoneyParseError::OutOfRange(s) => write!(f, "Amount out of range: {}", s),
        }
    }
}

impl std::error::Error for MoneyParseError {}
