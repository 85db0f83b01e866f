//! Amount type for handling monetary values written with a decimal comma.
//!
//! This module provides the `Amount` type which wraps `Decimal`. ING exports write amounts as an
//! unsigned magnitude with a comma as the decimal separator, e.g. `12,34`. No floating point
//! types are involved anywhere, so sums are exact.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::ops::Neg;
use std::str::FromStr;

/// Represents a euro amount.
///
/// # Examples
///
/// Parsing with a decimal comma:
/// ```
/// # use ingparse::model::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str("12,34").unwrap();
/// assert_eq!(amount.to_string(), "12.34");
/// ```
///
/// Negation keeps the scale:
/// ```
/// # use ingparse::model::Amount;
/// # use std::str::FromStr;
/// let amount = -Amount::from_str("12,30").unwrap();
/// assert_eq!(amount.to_string(), "-12.30");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount {
    value: Decimal,
}

impl Amount {
    pub const ZERO: Amount = Amount::new(Decimal::ZERO);

    /// Creates a new Amount from a Decimal value.
    pub const fn new(value: Decimal) -> Self {
        Self { value }
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.value
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.value().is_zero()
    }

    /// Returns true if the amount is positive.
    pub fn is_positive(&self) -> bool {
        !self.is_zero() && self.value().is_sign_positive()
    }

    /// Returns true if the amount is negative.
    pub fn is_negative(&self) -> bool {
        !self.is_zero() && self.value().is_sign_negative()
    }

    /// Adds `rhs`, returning `None` if the sum does not fit in a `Decimal`.
    pub fn checked_add(self, rhs: Amount) -> Option<Amount> {
        self.value.checked_add(rhs.value).map(Amount::new)
    }

    /// Sums `amounts`, returning `None` on overflow.
    pub fn checked_sum<'a>(amounts: impl IntoIterator<Item = &'a Amount>) -> Option<Amount> {
        amounts
            .into_iter()
            .try_fold(Amount::ZERO, |acc, a| acc.checked_add(*a))
    }
}

/// An error that can occur when parsing strings into `Decimal` values.
pub struct AmountError(rust_decimal::Error);

impl Debug for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl std::error::Error for AmountError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.0)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    /// Parses `12,34` as well as `12.34`. The comma is a decimal separator, never a thousands
    /// separator.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().replace(',', ".");
        // Decimal also accepts `_` separators, exports never contain them
        if let Some(c) = normalized
            .chars()
            .find(|c| !(c.is_ascii_digit() || matches!(c, '.' | '-' | '+')))
        {
            return Err(AmountError(rust_decimal::Error::ErrorString(format!(
                "invalid character '{c}' in amount"
            ))));
        }
        let value = Decimal::from_str(&normalized).map_err(AmountError)?;
        Ok(Amount { value })
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            // avoid rendering a negated zero as "-0.00"
            return write!(f, "{}", self.value.abs());
        }
        write!(f, "{}", self.value)
    }
}

impl Neg for Amount {
    type Output = Amount;

    fn neg(self) -> Self::Output {
        Amount::new(-self.value)
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Amount::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}
