//! Report data types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use khata_shared::types::{AccountId, Side};

use crate::ledger::SubHead;

/// One account line in the account balance report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountBalanceLine {
    /// Account ID.
    pub account_id: AccountId,
    /// Account name.
    pub account_name: String,
    /// Sub-head grouping.
    pub sub_head: SubHead,
    /// Balance magnitude.
    pub amount: Decimal,
    /// Which side the balance reports on.
    pub side: Side,
}

/// Account balance report.
///
/// Accounts with an exactly-zero balance are omitted from this report; the
/// sub-head report below deliberately keeps them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountBalancesReport {
    /// Report type identifier.
    pub report_type: String,
    /// As of date.
    pub as_of: NaiveDate,
    /// Account lines.
    pub lines: Vec<AccountBalanceLine>,
    /// Sum of credit-side magnitudes.
    pub total_credit: Decimal,
    /// Sum of debit-side magnitudes.
    pub total_debit: Decimal,
}

/// One sub-head line in the sub-head balance report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubHeadBalanceLine {
    /// The sub-head.
    pub sub_head: SubHead,
    /// Sum of credit-side account balances under this sub-head.
    pub credit: Decimal,
    /// Sum of debit-side account balances under this sub-head.
    pub debit: Decimal,
}

/// Sub-head balance report.
///
/// Sub-heads whose accounts all balance to zero still appear with zero
/// columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubHeadBalancesReport {
    /// Report type identifier.
    pub report_type: String,
    /// As of date.
    pub as_of: NaiveDate,
    /// Sub-head lines, in sub-head order.
    pub lines: Vec<SubHeadBalanceLine>,
    /// Sum of the credit column.
    pub total_credit: Decimal,
    /// Sum of the debit column.
    pub total_debit: Decimal,
}

/// Cashbook summary over a date range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashbookSummary {
    /// Report type identifier.
    pub report_type: String,
    /// Inclusive range start (None = beginning of the books).
    pub from: Option<NaiveDate>,
    /// Inclusive range end (None = today).
    pub to: Option<NaiveDate>,
    /// Total cash received.
    pub total_credit: Decimal,
    /// Total cash paid out.
    pub total_debit: Decimal,
    /// Net cash in hand.
    pub cash_in_hand: Decimal,
}
