//! Monetary amounts in minor units.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// A non-negative amount of money in minor units (kobo, cents).
///
/// Wallet balances and withdrawal amounts are always `Amount`s, so a
/// negative balance is unrepresentable by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(i64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    /// Creates an amount from minor units, rejecting negative values.
    pub fn from_minor(minor: i64) -> Result<Self, ValidationError> {
        if minor < 0 {
            return Err(ValidationError::invalid_format(
                "amount",
                format!("amount cannot be negative, got {}", minor),
            ));
        }
        Ok(Self(minor))
    }

    /// Returns the amount in minor units.
    pub fn as_minor(&self) -> i64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Adds another amount, saturating at `i64::MAX`.
    pub fn plus(&self, other: Amount) -> Amount {
        Amount(self.0.saturating_add(other.0))
    }

    /// Subtracts another amount, or `None` if it exceeds this one.
    pub fn checked_sub(&self, other: Amount) -> Option<Amount> {
        if other.0 > self.0 {
            None
        } else {
            Some(Amount(self.0 - other.0))
        }
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
