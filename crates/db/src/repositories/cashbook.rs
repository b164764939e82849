//! Cashbook repository.
//!
//! A cashbook write is the one place where a source row, its derived ledger
//! posting, and two denormalized balances must move together. Each
//! operation wraps the whole set in a single database transaction; a
//! failure anywhere rolls the pair back rather than leaving a half-applied
//! edit.

use std::collections::HashMap;

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    DbErr, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use khata_core::ledger::balance::signed_opening;
use khata_core::ledger::{CashbookTx, LedgerError, ReferenceType, SourceTransaction};
use khata_shared::types::Side;

use crate::entities::{
    accounts, cashbook_entries, ledger_entries,
    sea_orm_active_enums::{self, EntrySide},
};

use super::activity::log_activity;

/// Error types for cashbook operations.
#[derive(Debug, thiserror::Error)]
pub enum CashbookError {
    /// Account not found; nothing is written.
    #[error("Account not found: {0}")]
    AccountNotFound(Uuid),

    /// Cashbook entry not found.
    #[error("Cashbook entry not found: {0}")]
    EntryNotFound(Uuid),

    /// The entry's ledger posting is missing.
    #[error("No active ledger posting for cashbook entry {0}")]
    PostingMissing(Uuid),

    /// Posting derivation or validation failed.
    #[error(transparent)]
    Posting(#[from] LedgerError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a cashbook entry.
#[derive(Debug, Clone)]
pub struct CreateCashbookInput {
    /// The account the cash moved against.
    pub account_id: Uuid,
    /// Transaction date.
    pub entry_date: chrono::NaiveDate,
    /// Amount (positive magnitude).
    pub amount: Decimal,
    /// Whether the movement is a credit or a debit.
    pub pay_status: EntrySide,
    /// Narrative detail.
    pub detail: String,
    /// Optional remarks.
    pub remarks: Option<String>,
}

/// Input for updating a cashbook entry.
#[derive(Debug, Clone, Default)]
pub struct UpdateCashbookInput {
    /// Transaction date.
    pub entry_date: Option<chrono::NaiveDate>,
    /// Amount (positive magnitude).
    pub amount: Option<Decimal>,
    /// Whether the movement is a credit or a debit.
    pub pay_status: Option<EntrySide>,
    /// Narrative detail.
    pub detail: Option<String>,
    /// Optional remarks.
    pub remarks: Option<Option<String>>,
}

/// Cashbook repository for transactional cashbook writes.
#[derive(Debug, Clone)]
pub struct CashbookRepository {
    db: DatabaseConnection,
}

impl CashbookRepository {
    /// Creates a new cashbook repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a cashbook entry together with its ledger posting.
    ///
    /// The row, the posting, the row's as-of-entry balance, and the account
    /// cache are written in one database transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the account does not exist, the amount fails
    /// posting validation, or the database write fails.
    pub async fn create_entry(
        &self,
        input: CreateCashbookInput,
    ) -> Result<cashbook_entries::Model, CashbookError> {
        let entry_id = Uuid::new_v4();

        let tx = SourceTransaction::Cashbook(CashbookTx {
            id: entry_id,
            account_id: khata_shared::types::AccountId::from_uuid(input.account_id),
            date: input.entry_date,
            amount: input.amount,
            pay_status: input.pay_status.clone().into(),
            detail: input.detail.clone(),
            remarks: input.remarks.clone(),
        });
        let posting = tx.derive_entry()?;
        posting.validate()?;

        let txn = self.db.begin().await?;

        let account = accounts::Entity::find_by_id(input.account_id)
            .one(&txn)
            .await?
            .ok_or(CashbookError::AccountNotFound(input.account_id))?;

        // Balance as of this entry: everything dated on or before it, plus
        // the new movement itself.
        let as_of_balance = account_balance_through(&txn, &account, Some(input.entry_date))
            .await?
            + posting.signed_amount();
        let full_balance =
            account_balance_through(&txn, &account, None).await? + posting.signed_amount();

        let now = Utc::now().into();
        let row = cashbook_entries::ActiveModel {
            id: Set(entry_id),
            account_id: Set(input.account_id),
            entry_date: Set(input.entry_date),
            amount: Set(input.amount),
            pay_status: Set(input.pay_status),
            detail: Set(input.detail.clone()),
            current_balance: Set(as_of_balance),
            remarks: Set(input.remarks),
            is_deleted: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let row = row.insert(&txn).await?;

        insert_posting(&txn, &posting).await?;
        write_cached_balance(&txn, account, full_balance).await?;

        txn.commit().await?;

        // Audit trail only; a failed log line never fails the write.
        log_activity(&self.db, "created", "cashbook_entry", entry_id, &input.detail).await;

        Ok(row)
    }

    /// Applies an edit as reverse-then-write.
    ///
    /// The prior posting is soft-deleted and a fresh posting written inside
    /// the same transaction that updates the row, so no reader ever sees an
    /// edit half-applied.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry or its posting is missing, the edited
    /// amount fails validation, or the database write fails.
    pub async fn update_entry(
        &self,
        id: Uuid,
        input: UpdateCashbookInput,
    ) -> Result<cashbook_entries::Model, CashbookError> {
        let txn = self.db.begin().await?;

        let row = cashbook_entries::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(CashbookError::EntryNotFound(id))?;
        if row.is_deleted {
            return Err(CashbookError::EntryNotFound(id));
        }

        let account = accounts::Entity::find_by_id(row.account_id)
            .one(&txn)
            .await?
            .ok_or(CashbookError::AccountNotFound(row.account_id))?;

        let entry_date = input.entry_date.unwrap_or(row.entry_date);
        let amount = input.amount.unwrap_or(row.amount);
        let pay_status = input.pay_status.clone().unwrap_or_else(|| row.pay_status.clone());
        let detail = input.detail.clone().unwrap_or_else(|| row.detail.clone());
        let remarks = input.remarks.clone().unwrap_or_else(|| row.remarks.clone());

        let tx = SourceTransaction::Cashbook(CashbookTx {
            id,
            account_id: khata_shared::types::AccountId::from_uuid(row.account_id),
            date: entry_date,
            amount,
            pay_status: pay_status.clone().into(),
            detail: detail.clone(),
            remarks: remarks.clone(),
        });
        let posting = tx.derive_entry()?;
        posting.validate()?;

        soft_delete_posting(&txn, id).await?;
        insert_posting(&txn, &posting).await?;

        let as_of_balance =
            account_balance_through(&txn, &account, Some(entry_date)).await?;
        let full_balance = account_balance_through(&txn, &account, None).await?;

        let mut active: cashbook_entries::ActiveModel = row.into();
        active.entry_date = Set(entry_date);
        active.amount = Set(amount);
        active.pay_status = Set(pay_status);
        active.detail = Set(detail.clone());
        active.remarks = Set(remarks);
        active.current_balance = Set(as_of_balance);
        active.updated_at = Set(Utc::now().into());
        let row = active.update(&txn).await?;

        write_cached_balance(&txn, account, full_balance).await?;

        txn.commit().await?;

        log_activity(&self.db, "updated", "cashbook_entry", id, &detail).await;

        Ok(row)
    }

    /// Soft-deletes a cashbook entry and reverses its posting.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry is missing or the database write
    /// fails.
    pub async fn delete_entry(&self, id: Uuid) -> Result<(), CashbookError> {
        let txn = self.db.begin().await?;

        let row = cashbook_entries::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(CashbookError::EntryNotFound(id))?;
        if row.is_deleted {
            return Err(CashbookError::EntryNotFound(id));
        }

        let account = accounts::Entity::find_by_id(row.account_id)
            .one(&txn)
            .await?
            .ok_or(CashbookError::AccountNotFound(row.account_id))?;

        soft_delete_posting(&txn, id).await?;

        let mut active: cashbook_entries::ActiveModel = row.into();
        active.is_deleted = Set(true);
        active.updated_at = Set(Utc::now().into());
        active.update(&txn).await?;

        let full_balance = account_balance_through(&txn, &account, None).await?;
        write_cached_balance(&txn, account, full_balance).await?;

        txn.commit().await?;

        log_activity(&self.db, "deleted", "cashbook_entry", id, "").await;

        Ok(())
    }

    /// Recomputes every cashbook row's as-of-entry balance for an account.
    ///
    /// Out-of-order edits leave later rows' cached `current_balance` stale;
    /// this walk re-derives each one from the ledger fold and is the repair
    /// path for that drift.
    ///
    /// # Errors
    ///
    /// Returns an error if the account is missing or a write fails.
    pub async fn recompute_current_balances(&self, account_id: Uuid) -> Result<(), CashbookError> {
        let txn = self.db.begin().await?;

        let account = accounts::Entity::find_by_id(account_id)
            .one(&txn)
            .await?
            .ok_or(CashbookError::AccountNotFound(account_id))?;

        // Running balance after each live ledger entry, keyed by the source
        // reference that produced it.
        let entries = ledger_entries::Entity::find()
            .filter(ledger_entries::Column::AccountId.eq(account_id))
            .filter(ledger_entries::Column::IsDeleted.eq(false))
            .order_by_asc(ledger_entries::Column::EntryDate)
            .order_by_asc(ledger_entries::Column::CreatedAt)
            .order_by_asc(ledger_entries::Column::Id)
            .all(&txn)
            .await?;

        let opening = signed_opening(
            account.balance_status.clone().into(),
            account.opening_balance,
        );
        let mut running = opening;
        let mut balance_by_reference: HashMap<Uuid, Decimal> = HashMap::new();
        for entry in entries {
            running += entry.credit_amount - entry.debit_amount;
            if entry.reference_type == sea_orm_active_enums::ReferenceType::Cashbook {
                balance_by_reference.insert(entry.reference_id, running);
            }
        }

        let rows = cashbook_entries::Entity::find()
            .filter(cashbook_entries::Column::AccountId.eq(account_id))
            .filter(cashbook_entries::Column::IsDeleted.eq(false))
            .all(&txn)
            .await?;

        for row in rows {
            let Some(&balance) = balance_by_reference.get(&row.id) else {
                continue;
            };
            if row.current_balance == balance {
                continue;
            }
            let mut active: cashbook_entries::ActiveModel = row.into();
            active.current_balance = Set(balance);
            active.updated_at = Set(Utc::now().into());
            active.update(&txn).await?;
        }

        write_cached_balance(&txn, account, running).await?;

        txn.commit().await?;
        Ok(())
    }
}

/// Folds the account balance from its live ledger entries, optionally
/// bounded by an inclusive date.
async fn account_balance_through<C: ConnectionTrait>(
    conn: &C,
    account: &accounts::Model,
    through: Option<chrono::NaiveDate>,
) -> Result<Decimal, DbErr> {
    let mut query = ledger_entries::Entity::find()
        .filter(ledger_entries::Column::AccountId.eq(account.id))
        .filter(ledger_entries::Column::IsDeleted.eq(false));

    if let Some(date) = through {
        query = query.filter(ledger_entries::Column::EntryDate.lte(date));
    }

    let entries = query.all(conn).await?;
    let opening = signed_opening(
        account.balance_status.clone().into(),
        account.opening_balance,
    );
    Ok(entries
        .iter()
        .fold(opening, |sum, e| sum + e.credit_amount - e.debit_amount))
}

/// Inserts the derived ledger posting for a cashbook transaction.
async fn insert_posting(
    txn: &DatabaseTransaction,
    posting: &khata_core::ledger::NewLedgerEntry,
) -> Result<(), DbErr> {
    let now = Utc::now().into();
    let model = ledger_entries::ActiveModel {
        id: Set(Uuid::new_v4()),
        account_id: Set(posting.account_id.into_inner()),
        entry_date: Set(posting.entry_date),
        credit_amount: Set(posting.credit_amount),
        debit_amount: Set(posting.debit_amount),
        detail: Set(posting.detail.clone()),
        reference_type: Set(posting.source.reference_type.into()),
        reference_id: Set(posting.source.reference_id),
        remarks: Set(posting.remarks.clone()),
        is_deleted: Set(false),
        created_at: Set(now),
    };
    model.insert(txn).await?;
    Ok(())
}

/// Soft-deletes the active posting for a cashbook reference.
async fn soft_delete_posting(txn: &DatabaseTransaction, reference_id: Uuid) -> Result<(), DbErr> {
    let reference_type: sea_orm_active_enums::ReferenceType = ReferenceType::Cashbook.into();
    let posting = ledger_entries::Entity::find()
        .filter(ledger_entries::Column::ReferenceType.eq(reference_type))
        .filter(ledger_entries::Column::ReferenceId.eq(reference_id))
        .filter(ledger_entries::Column::IsDeleted.eq(false))
        .one(txn)
        .await?;

    if let Some(posting) = posting {
        let mut active: ledger_entries::ActiveModel = posting.into();
        active.is_deleted = Set(true);
        active.update(txn).await?;
    }
    Ok(())
}

/// Writes the denormalized account balance cache.
async fn write_cached_balance(
    txn: &DatabaseTransaction,
    account: accounts::Model,
    balance: Decimal,
) -> Result<(), DbErr> {
    let mut active: accounts::ActiveModel = account.into();
    active.cached_balance = Set(balance);
    active.updated_at = Set(Utc::now().into());
    active.update(txn).await?;
    Ok(())
}

// ============================================================================
// Pure helpers for property testing
// ============================================================================

/// Signed cash movement under the cashbook pay-status convention.
#[must_use]
pub fn signed_cash_amount(pay_status: Side, amount: Decimal) -> Decimal {
    match pay_status {
        Side::Credit => amount,
        Side::Debit => -amount,
    }
}
