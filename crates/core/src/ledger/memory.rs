//! In-memory ledger store.
//!
//! Reference implementation of [`LedgerStore`] over `RwLock`-guarded maps.
//! Used by the engine and posting tests; also handy for prototyping without
//! a database.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Utc;
use rust_decimal::Decimal;

use khata_shared::types::{AccountId, LedgerEntryId, Side};

use super::account::Account;
use super::entry::{LedgerEntry, NewLedgerEntry, SourceRef};
use super::range::DateRange;
use super::store::{CashMovement, LedgerStore, StoreError};

#[derive(Debug, Default)]
struct Inner {
    accounts: HashMap<AccountId, Account>,
    cached_balances: HashMap<AccountId, Decimal>,
    entries: Vec<LedgerEntry>,
    cashbook: Vec<CashbookRecord>,
}

/// A stored cashbook movement with its soft-delete flag.
#[derive(Debug, Clone, Copy)]
struct CashbookRecord {
    movement: CashMovement,
    is_deleted: bool,
}

/// In-memory [`LedgerStore`] implementation.
#[derive(Debug, Default)]
pub struct MemoryLedgerStore {
    inner: RwLock<Inner>,
}

impl MemoryLedgerStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an account directly (test/seed setup).
    pub fn add_account(&self, account: Account) {
        let mut inner = self.inner.write().expect("ledger store lock poisoned");
        inner.accounts.insert(account.id, account);
    }

    /// Adds a cashbook movement directly (test/seed setup).
    pub fn add_cash_movement(&self, movement: CashMovement) {
        let mut inner = self.inner.write().expect("ledger store lock poisoned");
        inner.cashbook.push(CashbookRecord {
            movement,
            is_deleted: false,
        });
    }

    /// Soft-deletes the cashbook movement at the given insertion index
    /// (test setup for delete scenarios).
    pub fn soft_delete_cash_movement(&self, index: usize) {
        let mut inner = self.inner.write().expect("ledger store lock poisoned");
        if let Some(record) = inner.cashbook.get_mut(index) {
            record.is_deleted = true;
        }
    }

    /// Returns the cached balance last written for an account, if any.
    #[must_use]
    pub fn cached_balance(&self, id: AccountId) -> Option<Decimal> {
        let inner = self.inner.read().expect("ledger store lock poisoned");
        inner.cached_balances.get(&id).copied()
    }

    /// Number of active (non-deleted) entries held for a source reference.
    #[must_use]
    pub fn active_entry_count(&self, source: SourceRef) -> usize {
        let inner = self.inner.read().expect("ledger store lock poisoned");
        inner
            .entries
            .iter()
            .filter(|e| !e.is_deleted && e.source == source)
            .count()
    }
}

impl LedgerStore for MemoryLedgerStore {
    async fn account(&self, id: AccountId) -> Result<Option<Account>, StoreError> {
        let inner = self.inner.read().expect("ledger store lock poisoned");
        Ok(inner.accounts.get(&id).cloned())
    }

    async fn active_accounts(&self) -> Result<Vec<Account>, StoreError> {
        let inner = self.inner.read().expect("ledger store lock poisoned");
        let mut accounts: Vec<Account> = inner
            .accounts
            .values()
            .filter(|account| account.is_active)
            .cloned()
            .collect();
        accounts.sort_by(|a, b| a.account_name.cmp(&b.account_name));
        Ok(accounts)
    }

    async fn entries_for_account(
        &self,
        id: AccountId,
        range: DateRange,
    ) -> Result<Vec<LedgerEntry>, StoreError> {
        let inner = self.inner.read().expect("ledger store lock poisoned");
        Ok(inner
            .entries
            .iter()
            .filter(|entry| {
                entry.account_id == id && !entry.is_deleted && range.contains(entry.entry_date)
            })
            .cloned()
            .collect())
    }

    async fn insert_entry(&self, entry: NewLedgerEntry) -> Result<LedgerEntryId, StoreError> {
        let mut inner = self.inner.write().expect("ledger store lock poisoned");
        let id = LedgerEntryId::new();
        inner.entries.push(LedgerEntry {
            id,
            account_id: entry.account_id,
            entry_date: entry.entry_date,
            credit_amount: entry.credit_amount,
            debit_amount: entry.debit_amount,
            detail: entry.detail,
            source: entry.source,
            remarks: entry.remarks,
            is_deleted: false,
            created_at: Utc::now(),
        });
        Ok(id)
    }

    async fn soft_delete_entry(&self, id: LedgerEntryId) -> Result<(), StoreError> {
        let mut inner = self.inner.write().expect("ledger store lock poisoned");
        let entry = inner
            .entries
            .iter_mut()
            .find(|entry| entry.id == id)
            .ok_or(StoreError::MissingEntry(id))?;
        entry.is_deleted = true;
        Ok(())
    }

    async fn active_posting(&self, source: SourceRef) -> Result<Option<LedgerEntry>, StoreError> {
        let inner = self.inner.read().expect("ledger store lock poisoned");
        Ok(inner
            .entries
            .iter()
            .find(|entry| !entry.is_deleted && entry.source == source)
            .cloned())
    }

    async fn cashbook_activity(&self, range: DateRange) -> Result<Vec<CashMovement>, StoreError> {
        let inner = self.inner.read().expect("ledger store lock poisoned");
        Ok(inner
            .cashbook
            .iter()
            .filter(|record| !record.is_deleted && range.contains(record.movement.entry_date))
            .map(|record| record.movement)
            .collect())
    }

    async fn update_cached_balance(
        &self,
        id: AccountId,
        balance: Decimal,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.write().expect("ledger store lock poisoned");
        inner.cached_balances.insert(id, balance);
        Ok(())
    }
}

/// Builds an account for tests and seeding.
#[must_use]
pub fn account_fixture(name: &str, balance_status: Side, opening_balance: Decimal) -> Account {
    Account {
        id: AccountId::new(),
        account_name: name.to_string(),
        sub_head: super::account::SubHead::Personals,
        balance_status,
        opening_balance,
        is_active: true,
        created_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    use crate::ledger::entry::ReferenceType;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, d).unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_query_entries() {
        let store = MemoryLedgerStore::new();
        let account = account_fixture("Quetta Freight", Side::Credit, dec!(0));
        let account_id = account.id;
        store.add_account(account);

        let source = SourceRef::new(ReferenceType::Export, Uuid::new_v4());
        store
            .insert_entry(NewLedgerEntry::single_sided(
                account_id,
                date(5),
                Side::Credit,
                dec!(150),
                "Export proceeds".to_string(),
                source,
                None,
            ))
            .await
            .unwrap();

        let entries = store
            .entries_for_account(account_id, DateRange::unbounded())
            .await
            .unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].credit_amount, dec!(150));
    }

    #[tokio::test]
    async fn test_soft_delete_hides_entry() {
        let store = MemoryLedgerStore::new();
        let account = account_fixture("Party", Side::Credit, dec!(0));
        let account_id = account.id;
        store.add_account(account);

        let source = SourceRef::new(ReferenceType::Invoice, Uuid::new_v4());
        let id = store
            .insert_entry(NewLedgerEntry::single_sided(
                account_id,
                date(5),
                Side::Debit,
                dec!(75),
                "Invoice".to_string(),
                source,
                None,
            ))
            .await
            .unwrap();

        store.soft_delete_entry(id).await.unwrap();

        let entries = store
            .entries_for_account(account_id, DateRange::unbounded())
            .await
            .unwrap();
        assert!(entries.is_empty());
        assert!(store.active_posting(source).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_soft_delete_missing_entry_errors() {
        let store = MemoryLedgerStore::new();
        let result = store.soft_delete_entry(LedgerEntryId::new()).await;
        assert!(matches!(result, Err(StoreError::MissingEntry(_))));
    }

    #[tokio::test]
    async fn test_date_range_filters_entries() {
        let store = MemoryLedgerStore::new();
        let account = account_fixture("Party", Side::Credit, dec!(0));
        let account_id = account.id;
        store.add_account(account);

        for day in [1, 10, 20] {
            store
                .insert_entry(NewLedgerEntry::single_sided(
                    account_id,
                    date(day),
                    Side::Credit,
                    dec!(10),
                    "entry".to_string(),
                    SourceRef::new(ReferenceType::Cashbook, Uuid::new_v4()),
                    None,
                ))
                .await
                .unwrap();
        }

        let range = DateRange::between(date(5), date(15)).unwrap();
        let entries = store.entries_for_account(account_id, range).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].entry_date, date(10));
    }

    #[tokio::test]
    async fn test_inactive_accounts_hidden_from_active_list() {
        let store = MemoryLedgerStore::new();
        let mut retired = account_fixture("Old Party", Side::Credit, dec!(0));
        retired.is_active = false;
        store.add_account(retired);
        store.add_account(account_fixture("Live Party", Side::Credit, dec!(0)));

        let active = store.active_accounts().await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].account_name, "Live Party");
    }
}
