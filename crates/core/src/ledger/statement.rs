//! Range-bounded ledger statements with a running balance column.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::balance::order_entries;
use super::entry::LedgerEntry;

/// One statement row: an entry plus the running balance after applying it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatementRow {
    /// The underlying ledger entry.
    pub entry: LedgerEntry,
    /// Running balance after this row.
    pub running_balance: Decimal,
}

/// A ledger statement for one account over an inclusive date range.
///
/// The opening balance is carried as its own labeled field, never as a
/// synthetic row, so the period totals structurally cannot include it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerStatement {
    /// Balance carried from all entries strictly before the range.
    pub opening_balance: Decimal,
    /// One row per non-deleted entry in range, in statement order.
    pub rows: Vec<StatementRow>,
    /// Sum of credit amounts over the rows only.
    pub total_credit: Decimal,
    /// Sum of debit amounts over the rows only.
    pub total_debit: Decimal,
    /// Running balance after the last row; the opening balance when the
    /// range holds no rows.
    pub closing_balance: Decimal,
}

impl LedgerStatement {
    /// Builds a statement by folding the opening balance forward through the
    /// given in-range entries.
    ///
    /// Entries are sorted into `(entry_date, created_at)` order; soft-deleted
    /// entries are skipped. The same inputs always produce the same
    /// statement.
    #[must_use]
    pub fn build(opening_balance: Decimal, mut entries: Vec<LedgerEntry>) -> Self {
        entries.retain(|entry| !entry.is_deleted);
        order_entries(&mut entries);

        let mut rows = Vec::with_capacity(entries.len());
        let mut running = opening_balance;
        let mut total_credit = Decimal::ZERO;
        let mut total_debit = Decimal::ZERO;

        for entry in entries {
            running += entry.signed_amount();
            total_credit += entry.credit_amount;
            total_debit += entry.debit_amount;
            rows.push(StatementRow {
                entry,
                running_balance: running,
            });
        }

        Self {
            opening_balance,
            rows,
            total_credit,
            total_debit,
            closing_balance: running,
        }
    }
}
