//! Ledger error types.
//!
//! All computation errors surface to the caller; nothing is silently
//! swallowed here. Only activity logging (owned by the persistence layer)
//! may discard its own failures.

use chrono::NaiveDate;
use thiserror::Error;

use khata_shared::types::{AccountId, LedgerEntryId};

use super::entry::SourceRef;
use super::store::StoreError;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Entry amount cannot be zero.
    #[error("Entry amount cannot be zero")]
    ZeroAmount,

    /// Entry amount cannot be negative.
    #[error("Entry amount cannot be negative")]
    NegativeAmount,

    /// Entry must post to exactly one side.
    #[error("Entry must specify either credit or debit, not both")]
    BothSidesSet,

    /// Statement range is inverted.
    #[error("Invalid date range: {from} is after {to}")]
    InvalidRange {
        /// Start of the requested range.
        from: NaiveDate,
        /// End of the requested range.
        to: NaiveDate,
    },

    // ========== Account Errors ==========
    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    // ========== Posting Errors ==========
    /// No active posting exists for the reference.
    #[error("No active posting for {0}")]
    PostingNotFound(SourceRef),

    /// An active posting already exists for the reference.
    #[error("A posting already exists for {0}")]
    AlreadyPosted(SourceRef),

    /// Ledger entry not found.
    #[error("Ledger entry not found: {0}")]
    EntryNotFound(LedgerEntryId),

    // ========== Store Errors ==========
    /// Store failure, propagated without retry.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl LedgerError {
    /// Returns the stable error code for this error.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ZeroAmount => "ZERO_AMOUNT",
            Self::NegativeAmount => "NEGATIVE_AMOUNT",
            Self::BothSidesSet => "BOTH_SIDES_SET",
            Self::InvalidRange { .. } => "INVALID_RANGE",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::PostingNotFound(_) => "POSTING_NOT_FOUND",
            Self::AlreadyPosted(_) => "ALREADY_POSTED",
            Self::EntryNotFound(_) => "ENTRY_NOT_FOUND",
            Self::Store(_) => "STORE_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::entry::ReferenceType;
    use uuid::Uuid;

    #[test]
    fn test_error_codes() {
        assert_eq!(LedgerError::ZeroAmount.error_code(), "ZERO_AMOUNT");
        assert_eq!(LedgerError::NegativeAmount.error_code(), "NEGATIVE_AMOUNT");
        assert_eq!(LedgerError::BothSidesSet.error_code(), "BOTH_SIDES_SET");
        assert_eq!(
            LedgerError::AccountNotFound(AccountId::new()).error_code(),
            "ACCOUNT_NOT_FOUND"
        );
        assert_eq!(
            LedgerError::Store(StoreError::Unavailable("down".to_string())).error_code(),
            "STORE_ERROR"
        );
    }

    #[test]
    fn test_invalid_range_display() {
        let err = LedgerError::InvalidRange {
            from: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
            to: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid date range: 2026-02-01 is after 2026-01-01"
        );
    }

    #[test]
    fn test_posting_error_display_names_reference() {
        let source = SourceRef::new(ReferenceType::Invoice, Uuid::nil());
        let err = LedgerError::AlreadyPosted(source);
        assert!(err.to_string().contains("INVOICE"));
    }
}
