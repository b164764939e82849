//! Ledger repository implementing the core store contract.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use khata_core::ledger::{
    Account, CashMovement, DateRange, LedgerEntry, LedgerStore, NewLedgerEntry, SourceRef,
    StoreError,
};
use khata_shared::types::{AccountId, LedgerEntryId};

use crate::entities::{accounts, cashbook_entries, ledger_entries, sea_orm_active_enums};

use super::{account_to_domain, entry_to_domain};

fn store_err(err: DbErr) -> StoreError {
    StoreError::Unavailable(err.to_string())
}

/// `SeaORM`-backed implementation of the core [`LedgerStore`] contract.
///
/// Everything here is a thin translation layer: filters, ordering, and the
/// domain-type conversions. All balance arithmetic stays in the core.
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    db: DatabaseConnection,
}

impl LedgerRepository {
    /// Creates a new ledger repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn entry_query(id: AccountId, range: DateRange) -> sea_orm::Select<ledger_entries::Entity> {
        let mut query = ledger_entries::Entity::find()
            .filter(ledger_entries::Column::AccountId.eq(id.into_inner()))
            .filter(ledger_entries::Column::IsDeleted.eq(false));

        if let Some(from) = range.from {
            query = query.filter(ledger_entries::Column::EntryDate.gte(from));
        }
        if let Some(to) = range.to {
            query = query.filter(ledger_entries::Column::EntryDate.lte(to));
        }

        query
            .order_by_asc(ledger_entries::Column::EntryDate)
            .order_by_asc(ledger_entries::Column::CreatedAt)
            .order_by_asc(ledger_entries::Column::Id)
    }
}

impl LedgerStore for LedgerRepository {
    async fn account(&self, id: AccountId) -> Result<Option<Account>, StoreError> {
        let account = accounts::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(store_err)?;
        Ok(account.map(account_to_domain))
    }

    async fn active_accounts(&self) -> Result<Vec<Account>, StoreError> {
        let accounts = accounts::Entity::find()
            .filter(accounts::Column::IsActive.eq(true))
            .order_by_asc(accounts::Column::AccountName)
            .all(&self.db)
            .await
            .map_err(store_err)?;
        Ok(accounts.into_iter().map(account_to_domain).collect())
    }

    async fn entries_for_account(
        &self,
        id: AccountId,
        range: DateRange,
    ) -> Result<Vec<LedgerEntry>, StoreError> {
        let entries = Self::entry_query(id, range)
            .all(&self.db)
            .await
            .map_err(store_err)?;
        Ok(entries.into_iter().map(entry_to_domain).collect())
    }

    async fn insert_entry(&self, entry: NewLedgerEntry) -> Result<LedgerEntryId, StoreError> {
        let id = Uuid::new_v4();
        let now = Utc::now().into();
        let model = ledger_entries::ActiveModel {
            id: Set(id),
            account_id: Set(entry.account_id.into_inner()),
            entry_date: Set(entry.entry_date),
            credit_amount: Set(entry.credit_amount),
            debit_amount: Set(entry.debit_amount),
            detail: Set(entry.detail),
            reference_type: Set(entry.source.reference_type.into()),
            reference_id: Set(entry.source.reference_id),
            remarks: Set(entry.remarks),
            is_deleted: Set(false),
            created_at: Set(now),
        };
        model.insert(&self.db).await.map_err(store_err)?;
        Ok(LedgerEntryId::from_uuid(id))
    }

    async fn soft_delete_entry(&self, id: LedgerEntryId) -> Result<(), StoreError> {
        let entry = ledger_entries::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(store_err)?
            .ok_or(StoreError::MissingEntry(id))?;

        let mut active: ledger_entries::ActiveModel = entry.into();
        active.is_deleted = Set(true);
        active.update(&self.db).await.map_err(store_err)?;
        Ok(())
    }

    async fn active_posting(&self, source: SourceRef) -> Result<Option<LedgerEntry>, StoreError> {
        let reference_type: sea_orm_active_enums::ReferenceType = source.reference_type.into();
        let entry = ledger_entries::Entity::find()
            .filter(ledger_entries::Column::ReferenceType.eq(reference_type))
            .filter(ledger_entries::Column::ReferenceId.eq(source.reference_id))
            .filter(ledger_entries::Column::IsDeleted.eq(false))
            .one(&self.db)
            .await
            .map_err(store_err)?;
        Ok(entry.map(entry_to_domain))
    }

    async fn cashbook_activity(&self, range: DateRange) -> Result<Vec<CashMovement>, StoreError> {
        let mut query = cashbook_entries::Entity::find()
            .filter(cashbook_entries::Column::IsDeleted.eq(false));

        if let Some(from) = range.from {
            query = query.filter(cashbook_entries::Column::EntryDate.gte(from));
        }
        if let Some(to) = range.to {
            query = query.filter(cashbook_entries::Column::EntryDate.lte(to));
        }

        let entries = query
            .order_by_asc(cashbook_entries::Column::EntryDate)
            .order_by_asc(cashbook_entries::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(store_err)?;

        Ok(entries
            .into_iter()
            .map(|entry| CashMovement {
                entry_date: entry.entry_date,
                amount: entry.amount,
                pay_status: entry.pay_status.into(),
            })
            .collect())
    }

    async fn update_cached_balance(
        &self,
        id: AccountId,
        balance: Decimal,
    ) -> Result<(), StoreError> {
        let account = accounts::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(store_err)?
            .ok_or_else(|| StoreError::Unavailable(format!("account {id} not found")))?;

        let mut active: accounts::ActiveModel = account.into();
        active.cached_balance = Set(balance);
        active.updated_at = Set(Utc::now().into());
        active.update(&self.db).await.map_err(store_err)?;
        Ok(())
    }
}
