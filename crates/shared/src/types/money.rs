//! Credit/debit convention and signed balance type.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! All amounts are `rust_decimal::Decimal`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The credit/debit side convention.
///
/// The same two-valued convention is used in three places:
/// - an account's `balance_status` (the sign of its opening balance)
/// - the side of a ledger entry (which amount column is populated)
/// - a cashbook entry's pay status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    /// Credit ("Cr"). A non-negative balance reports as credit.
    Credit,
    /// Debit ("Dr"). A negative balance reports as debit.
    Debit,
}

impl Side {
    /// Short ledger label for this side.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Credit => "Cr",
            Self::Debit => "Dr",
        }
    }

    /// Returns the opposite side.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Credit => Self::Debit,
            Self::Debit => Self::Credit,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Credit => write!(f, "CREDIT"),
            Self::Debit => write!(f, "DEBIT"),
        }
    }
}

/// Error returned when parsing a [`Side`] from a string fails.
#[derive(Debug, thiserror::Error)]
#[error("Unknown side: {0}")]
pub struct ParseSideError(String);

impl std::str::FromStr for Side {
    type Err = ParseSideError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "CREDIT" | "CR" => Ok(Self::Credit),
            "DEBIT" | "DR" => Ok(Self::Debit),
            _ => Err(ParseSideError(s.to_string())),
        }
    }
}

/// A signed running balance.
///
/// The amount keeps its sign; the Cr/Dr label is derived from it uniformly:
/// a non-negative amount is a credit balance, a negative amount a debit
/// balance. Zero reports as credit by convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    /// The signed amount.
    pub amount: Decimal,
}

impl Balance {
    /// Creates a balance from a signed amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self { amount }
    }

    /// A zero balance (reports as credit).
    #[must_use]
    pub fn zero() -> Self {
        Self {
            amount: Decimal::ZERO,
        }
    }

    /// The side this balance reports as.
    #[must_use]
    pub fn side(&self) -> Side {
        if self.amount.is_sign_negative() && !self.amount.is_zero() {
            Side::Debit
        } else {
            Side::Credit
        }
    }

    /// The unsigned magnitude of this balance.
    #[must_use]
    pub fn magnitude(&self) -> Decimal {
        self.amount.abs()
    }

    /// Returns true if the amount is exactly zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }
}

impl std::fmt::Display for Balance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.magnitude(), self.side().label())
    }
}
