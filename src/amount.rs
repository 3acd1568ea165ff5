//! Safe financial arithmetic using fixed-point decimal
//!
//! This module provides a type-safe Amount type using rust_decimal.
//! **NEVER use f64 for financial calculations!**

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A money amount in currency subunits (cents) with fixed-point precision.
///
/// - Uses `Decimal` internally (28-29 significant digits)
/// - All arithmetic is exact (no rounding errors)
/// - Saturating operations (never overflow/panic)
/// - Serializes as string (preserves precision)
///
/// # Examples
///
/// ```rust
/// use prorata::Amount;
///
/// let a = Amount::from_cents(1000);
/// let b = Amount::from_cents(500);
/// let total = a.checked_add(&b).unwrap();
/// assert_eq!(total.as_cents(), 1500);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount {
    // Decimal automatically serializes as string with serde feature
    value: Decimal,
}

impl Amount {
    /// Create from cents (smallest unit).
    pub fn from_cents(cents: i64) -> Self {
        Self {
            value: Decimal::from(cents),
        }
    }

    /// Create from a Decimal value (for proration results).
    pub fn from_decimal(value: Decimal) -> Self {
        Self { value }
    }

    /// Get value in cents.
    ///
    /// If the value exceeds i64::MAX, returns i64::MAX.
    pub fn as_cents(&self) -> i64 {
        self.value.try_into().unwrap_or(i64::MAX)
    }

    /// Get the internal Decimal value.
    pub fn as_decimal(&self) -> Decimal {
        self.value
    }

    /// Checked addition (returns None on overflow).
    pub fn checked_add(&self, other: &Self) -> Option<Self> {
        self.value
            .checked_add(other.value)
            .map(|value| Self { value })
    }

    /// Saturating addition (clamps to max on overflow).
    pub fn saturating_add(&self, other: &Self) -> Self {
        self.checked_add(other).unwrap_or(Self {
            value: Decimal::MAX,
        })
    }

    /// Get zero amount.
    pub fn zero() -> Self {
        Self {
            value: Decimal::ZERO,
        }
    }

    /// Check if amount is zero.
    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl FromStr for Amount {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s)
            .map(|value| Self { value })
            .map_err(|e| format!("Invalid amount: {}", e))
    }
}
