//! Ledger entry domain types.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use khata_shared::types::{AccountId, LedgerEntryId, Side};

use super::error::LedgerError;

/// The kind of source transaction a ledger entry was posted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReferenceType {
    /// Cashbook entry.
    Cashbook,
    /// Goods-received (import) entry.
    Import,
    /// Export entry.
    Export,
    /// Invoice.
    Invoice,
}

impl std::fmt::Display for ReferenceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cashbook => write!(f, "CASHBOOK"),
            Self::Import => write!(f, "IMPORT"),
            Self::Export => write!(f, "EXPORT"),
            Self::Invoice => write!(f, "INVOICE"),
        }
    }
}

/// Reference to the source transaction behind a posting.
///
/// At most one active (non-deleted) ledger entry may exist per reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceRef {
    /// The kind of source transaction.
    pub reference_type: ReferenceType,
    /// The id of the source transaction.
    pub reference_id: Uuid,
}

impl SourceRef {
    /// Creates a source reference.
    #[must_use]
    pub const fn new(reference_type: ReferenceType, reference_id: Uuid) -> Self {
        Self {
            reference_type,
            reference_id,
        }
    }
}

impl std::fmt::Display for SourceRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.reference_type, self.reference_id)
    }
}

/// A dated credit/debit posting against one account.
///
/// Entries are created exactly once per posting event and never mutated
/// afterwards; an edit is a compensating soft delete plus a fresh entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Unique identifier.
    pub id: LedgerEntryId,
    /// The account this entry is posted against.
    pub account_id: AccountId,
    /// Calendar date of the entry.
    pub entry_date: NaiveDate,
    /// Credit amount (zero when this is a debit posting).
    pub credit_amount: Decimal,
    /// Debit amount (zero when this is a credit posting).
    pub debit_amount: Decimal,
    /// Narrative detail.
    pub detail: String,
    /// The source transaction this entry was posted from.
    pub source: SourceRef,
    /// Optional remarks.
    pub remarks: Option<String>,
    /// Soft-delete flag. Deleted entries contribute to no balance.
    pub is_deleted: bool,
    /// Creation timestamp; tie-break for ordering within a date.
    pub created_at: DateTime<Utc>,
}

impl LedgerEntry {
    /// The signed amount of this entry (credit positive, debit negative).
    #[must_use]
    pub fn signed_amount(&self) -> Decimal {
        self.credit_amount - self.debit_amount
    }

    /// Which side this entry posts to.
    #[must_use]
    pub fn side(&self) -> Side {
        if self.debit_amount > Decimal::ZERO {
            Side::Debit
        } else {
            Side::Credit
        }
    }
}

/// Payload for inserting a new ledger entry.
#[derive(Debug, Clone)]
pub struct NewLedgerEntry {
    /// The account to post against.
    pub account_id: AccountId,
    /// Calendar date of the entry.
    pub entry_date: NaiveDate,
    /// Credit amount (zero when this is a debit posting).
    pub credit_amount: Decimal,
    /// Debit amount (zero when this is a credit posting).
    pub debit_amount: Decimal,
    /// Narrative detail.
    pub detail: String,
    /// The source transaction being posted.
    pub source: SourceRef,
    /// Optional remarks.
    pub remarks: Option<String>,
}

impl NewLedgerEntry {
    /// Builds a single-sided entry on the given side.
    #[must_use]
    pub fn single_sided(
        account_id: AccountId,
        entry_date: NaiveDate,
        side: Side,
        amount: Decimal,
        detail: String,
        source: SourceRef,
        remarks: Option<String>,
    ) -> Self {
        let (credit_amount, debit_amount) = match side {
            Side::Credit => (amount, Decimal::ZERO),
            Side::Debit => (Decimal::ZERO, amount),
        };
        Self {
            account_id,
            entry_date,
            credit_amount,
            debit_amount,
            detail,
            source,
            remarks,
        }
    }

    /// Validates that exactly one side is set with a positive amount.
    ///
    /// # Errors
    ///
    /// Returns an error for negative amounts, a zero entry, or an entry with
    /// both sides populated.
    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.credit_amount < Decimal::ZERO || self.debit_amount < Decimal::ZERO {
            return Err(LedgerError::NegativeAmount);
        }
        if self.credit_amount.is_zero() && self.debit_amount.is_zero() {
            return Err(LedgerError::ZeroAmount);
        }
        if !self.credit_amount.is_zero() && !self.debit_amount.is_zero() {
            return Err(LedgerError::BothSidesSet);
        }
        Ok(())
    }

    /// The signed amount of this entry (credit positive, debit negative).
    #[must_use]
    pub fn signed_amount(&self) -> Decimal {
        self.credit_amount - self.debit_amount
    }
}
