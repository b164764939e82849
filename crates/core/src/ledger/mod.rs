//! Ledger accounting logic.
//!
//! This module implements the core ledger functionality:
//! - Ledger party accounts and sub-head grouping
//! - Dated credit/debit ledger entries
//! - The running-balance fold and point-in-time balances
//! - Range-bounded ledger statements
//! - Posting rules for cashbook and trade transactions
//! - The store contract to the external entry store
//! - Error types for ledger operations

pub mod account;
pub mod balance;
pub mod engine;
pub mod entry;
pub mod error;
pub mod memory;
pub mod posting;
pub mod range;
pub mod statement;
pub mod store;

#[cfg(test)]
mod engine_props;
#[cfg(test)]
mod posting_props;

pub use account::{Account, SubHead};
pub use balance::{balance_after, order_entries, signed_opening};
pub use engine::{BalanceEngine, SubHeadTotals};
pub use entry::{LedgerEntry, NewLedgerEntry, ReferenceType, SourceRef};
pub use error::LedgerError;
pub use memory::MemoryLedgerStore;
pub use posting::{
    CashbookTx, ExportTx, GoodsReceivedTx, InvoiceTx, PostingService, SourceTransaction,
};
pub use range::DateRange;
pub use statement::{LedgerStatement, StatementRow};
pub use store::{CashMovement, LedgerStore, StoreError};
