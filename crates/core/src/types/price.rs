//! Type-safe price representation using decimal arithmetic.
//!
//! Prices are non-negative and carry at most two fractional digits, so they
//! map exactly onto integer minor units (paise, cents) for storage and SQL
//! aggregation.

use std::fmt;
use std::iter::Sum;
use std::ops::Add;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of fractional digits a price may carry.
pub const PRICE_SCALE: u32 = 2;

/// Currency symbol used when none is configured.
pub const DEFAULT_CURRENCY_SYMBOL: &str = "₹";

/// Errors produced when parsing or constructing a price.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PriceError {
    /// The input was empty after trimming.
    #[error("price is empty")]
    Empty,

    /// The input is not a decimal number.
    #[error("invalid price: {0}")]
    Invalid(String),

    /// Prices cannot be negative.
    #[error("price cannot be negative: {0}")]
    Negative(Decimal),

    /// More fractional digits than minor units can hold.
    #[error("price has more than {PRICE_SCALE} decimal places: {0}")]
    TooPrecise(Decimal),

    /// The amount does not fit in 64-bit minor units.
    #[error("price out of range: {0}")]
    OutOfRange(Decimal),
}

/// A non-negative amount of money.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// The zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// The largest price whose minor units fit in `i64`.
    pub const MAX: Self = Self(Decimal::from_parts(0xFFFF_FFFF, 0x7FFF_FFFF, 0, false, PRICE_SCALE));

    /// Create a price from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns `PriceError` if the amount is negative, has more than two
    /// fractional digits, or is larger than [`Price::MAX`].
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        let normalized = amount.normalize();
        if normalized.scale() > PRICE_SCALE {
            return Err(PriceError::TooPrecise(amount));
        }
        if normalized > Self::MAX.0 {
            return Err(PriceError::OutOfRange(amount));
        }
        Ok(Self(normalized.abs()))
    }

    /// Create a price from integer minor units (e.g. paise).
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Negative` for negative input.
    pub fn from_minor_units(units: i64) -> Result<Self, PriceError> {
        Self::new(Decimal::new(units, PRICE_SCALE))
    }

    /// Parse user input such as `"12.5"` or `" 40 "`.
    ///
    /// # Errors
    ///
    /// Returns `PriceError` if the input is empty, not a number, negative,
    /// too precise or too large.
    pub fn parse(input: &str) -> Result<Self, PriceError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(PriceError::Empty);
        }
        let amount = Decimal::from_str(trimmed)
            .or_else(|_| Decimal::from_scientific(trimmed))
            .map_err(|_| PriceError::Invalid(trimmed.to_owned()))?;
        Self::new(amount)
    }

    /// Convert a floating point amount, as sent by the OCR service, rounding
    /// to two decimal places.
    ///
    /// # Errors
    ///
    /// Returns `PriceError` if the value is not finite or is negative.
    pub fn from_f64_rounded(value: f64) -> Result<Self, PriceError> {
        let amount = Decimal::from_f64_retain(value)
            .ok_or_else(|| PriceError::Invalid(value.to_string()))?;
        Self::new(amount.round_dp(PRICE_SCALE))
    }

    /// The decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// The amount in integer minor units.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::OutOfRange` if the amount does not fit in `i64`,
    /// which only sums and multiples above [`Price::MAX`] can reach.
    pub fn to_minor_units(&self) -> Result<i64, PriceError> {
        let mut scaled = self.0;
        scaled.rescale(PRICE_SCALE);
        i64::try_from(scaled.mantissa()).map_err(|_| PriceError::OutOfRange(self.0))
    }

    /// The price of `quantity` units.
    ///
    /// Saturates at `Decimal::MAX`; the result may exceed [`Price::MAX`].
    #[must_use]
    pub fn times(&self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(Decimal::from(quantity)))
    }

    /// Whether the amount can be stored as minor units.
    #[must_use]
    pub fn is_storable(&self) -> bool {
        self.0 <= Self::MAX.0
    }

    /// Whether the amount is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Format for display with a currency symbol, e.g. `₹12.50`.
    #[must_use]
    pub fn display_with(&self, symbol: &str) -> String {
        format!("{symbol}{self}")
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut amount = self.0;
        amount.rescale(PRICE_SCALE);
        write!(f, "{amount}")
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}
