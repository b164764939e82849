//! Repository abstractions for data access.

pub mod account;
pub mod activity;
pub mod cashbook;
pub mod ledger;

pub use account::AccountRepository;
pub use activity::ActivityRepository;
pub use cashbook::CashbookRepository;
pub use ledger::LedgerRepository;

use chrono::Utc;

use khata_core::ledger::{Account, LedgerEntry, SourceRef};
use khata_shared::types::{AccountId, LedgerEntryId};

use crate::entities::{accounts, ledger_entries};

/// Converts an account row into the core domain type.
pub(crate) fn account_to_domain(model: accounts::Model) -> Account {
    Account {
        id: AccountId::from_uuid(model.id),
        account_name: model.account_name,
        sub_head: model.sub_head.into(),
        balance_status: model.balance_status.into(),
        opening_balance: model.opening_balance,
        is_active: model.is_active,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

/// Converts a ledger entry row into the core domain type.
pub(crate) fn entry_to_domain(model: ledger_entries::Model) -> LedgerEntry {
    LedgerEntry {
        id: LedgerEntryId::from_uuid(model.id),
        account_id: AccountId::from_uuid(model.account_id),
        entry_date: model.entry_date,
        credit_amount: model.credit_amount,
        debit_amount: model.debit_amount,
        detail: model.detail,
        source: SourceRef::new(model.reference_type.into(), model.reference_id),
        remarks: model.remarks,
        is_deleted: model.is_deleted,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
