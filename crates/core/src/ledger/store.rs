//! The narrow read/write contract to the external entry store.
//!
//! The balance engine and posting rules never talk to a database directly;
//! they consume this trait. Reads serving a single engine call must be
//! internally consistent for the account involved.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use khata_shared::types::{AccountId, LedgerEntryId, Side};

use super::account::Account;
use super::entry::{LedgerEntry, NewLedgerEntry, SourceRef};
use super::range::DateRange;

/// Errors surfaced by a ledger store implementation.
///
/// Transport and backend failures propagate to the caller; the core never
/// retries.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store could not be reached or failed the operation.
    #[error("Ledger store unavailable: {0}")]
    Unavailable(String),

    /// A write referenced an entry the store does not hold.
    #[error("Ledger entry missing from store: {0}")]
    MissingEntry(LedgerEntryId),
}

/// A single cashbook movement, as consumed by the cash-in-hand aggregate.
///
/// Cashbook records carry one amount plus a pay status instead of split
/// credit/debit columns.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CashMovement {
    /// Calendar date of the movement.
    pub entry_date: NaiveDate,
    /// Movement amount (non-negative magnitude).
    pub amount: Decimal,
    /// Whether the movement is a credit or a debit.
    pub pay_status: Side,
}

impl CashMovement {
    /// Signed contribution to cash in hand (credit positive).
    #[must_use]
    pub fn signed_amount(&self) -> Decimal {
        match self.pay_status {
            Side::Credit => self.amount,
            Side::Debit => -self.amount,
        }
    }
}

/// Durable storage of accounts, ledger entries, and cashbook activity.
///
/// Implementations must exclude soft-deleted records from every query
/// result. Method names are descriptive of the contract, not of any
/// particular backend.
pub trait LedgerStore {
    /// Looks up one account.
    fn account(
        &self,
        id: AccountId,
    ) -> impl Future<Output = Result<Option<Account>, StoreError>> + Send;

    /// Lists all active accounts.
    fn active_accounts(&self) -> impl Future<Output = Result<Vec<Account>, StoreError>> + Send;

    /// Returns the non-deleted entries for an account within the range.
    fn entries_for_account(
        &self,
        id: AccountId,
        range: DateRange,
    ) -> impl Future<Output = Result<Vec<LedgerEntry>, StoreError>> + Send;

    /// Inserts a new ledger entry, returning its id.
    fn insert_entry(
        &self,
        entry: NewLedgerEntry,
    ) -> impl Future<Output = Result<LedgerEntryId, StoreError>> + Send;

    /// Soft-deletes an entry. The entry remains stored but contributes to no
    /// further computation.
    fn soft_delete_entry(
        &self,
        id: LedgerEntryId,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Returns the active (non-deleted) posting for a source reference, if
    /// any.
    fn active_posting(
        &self,
        source: SourceRef,
    ) -> impl Future<Output = Result<Option<LedgerEntry>, StoreError>> + Send;

    /// Returns the non-deleted cashbook movements within the range, across
    /// all accounts.
    fn cashbook_activity(
        &self,
        range: DateRange,
    ) -> impl Future<Output = Result<Vec<CashMovement>, StoreError>> + Send;

    /// Overwrites the denormalized cached balance for an account.
    ///
    /// The cache is advisory; every computation in the core derives balances
    /// from the entry fold.
    fn update_cached_balance(
        &self,
        id: AccountId,
        balance: Decimal,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// Forwarding impl so a shared store can serve the engine and the posting
/// service at once.
impl<S: LedgerStore + Sync + Send> LedgerStore for std::sync::Arc<S> {
    fn account(
        &self,
        id: AccountId,
    ) -> impl Future<Output = Result<Option<Account>, StoreError>> + Send {
        self.as_ref().account(id)
    }

    fn active_accounts(&self) -> impl Future<Output = Result<Vec<Account>, StoreError>> + Send {
        self.as_ref().active_accounts()
    }

    fn entries_for_account(
        &self,
        id: AccountId,
        range: DateRange,
    ) -> impl Future<Output = Result<Vec<LedgerEntry>, StoreError>> + Send {
        self.as_ref().entries_for_account(id, range)
    }

    fn insert_entry(
        &self,
        entry: NewLedgerEntry,
    ) -> impl Future<Output = Result<LedgerEntryId, StoreError>> + Send {
        self.as_ref().insert_entry(entry)
    }

    fn soft_delete_entry(
        &self,
        id: LedgerEntryId,
    ) -> impl Future<Output = Result<(), StoreError>> + Send {
        self.as_ref().soft_delete_entry(id)
    }

    fn active_posting(
        &self,
        source: SourceRef,
    ) -> impl Future<Output = Result<Option<LedgerEntry>, StoreError>> + Send {
        self.as_ref().active_posting(source)
    }

    fn cashbook_activity(
        &self,
        range: DateRange,
    ) -> impl Future<Output = Result<Vec<CashMovement>, StoreError>> + Send {
        self.as_ref().cashbook_activity(range)
    }

    fn update_cached_balance(
        &self,
        id: AccountId,
        balance: Decimal,
    ) -> impl Future<Output = Result<(), StoreError>> + Send {
        self.as_ref().update_cached_balance(id, balance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_cash_movement_signed_amount() {
        let credit = CashMovement {
            entry_date: NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
            amount: dec!(400),
            pay_status: Side::Credit,
        };
        let debit = CashMovement {
            pay_status: Side::Debit,
            ..credit
        };
        assert_eq!(credit.signed_amount(), dec!(400));
        assert_eq!(debit.signed_amount(), dec!(-400));
    }
}
