//! The running-balance fold.
//!
//! Every balance in the system is derived from one computation: the signed
//! opening balance of an account plus the signed amounts of its non-deleted
//! entries, applied in `(entry_date, created_at)` order. Report screens and
//! cached values are projections of this fold, never independent arithmetic.

use rust_decimal::Decimal;

use khata_shared::types::Side;

use super::entry::LedgerEntry;

/// Signed contribution of an opening balance under its status convention.
#[must_use]
pub fn signed_opening(balance_status: Side, opening_balance: Decimal) -> Decimal {
    match balance_status {
        Side::Credit => opening_balance,
        Side::Debit => -opening_balance,
    }
}

/// Sorts entries into statement order: `(entry_date, created_at)` ascending.
///
/// The sort is stable, so entries sharing both keys keep their insertion
/// order.
pub fn order_entries(entries: &mut [LedgerEntry]) {
    entries.sort_by(|a, b| {
        a.entry_date
            .cmp(&b.entry_date)
            .then_with(|| a.created_at.cmp(&b.created_at))
    });
}

/// Folds entries forward from an opening balance.
///
/// Soft-deleted entries contribute nothing. Entry order does not affect the
/// result (addition commutes); it only matters for the running column a
/// statement displays.
#[must_use]
pub fn balance_after(opening: Decimal, entries: &[LedgerEntry]) -> Decimal {
    entries
        .iter()
        .filter(|entry| !entry.is_deleted)
        .fold(opening, |balance, entry| balance + entry.signed_amount())
}
