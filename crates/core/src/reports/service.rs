//! Report generation service.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use khata_shared::types::{Balance, Side};

use crate::ledger::engine::SubHeadTotals;
use crate::ledger::store::CashMovement;
use crate::ledger::{Account, SubHead};

use super::types::{
    AccountBalanceLine, AccountBalancesReport, CashbookSummary, SubHeadBalanceLine,
    SubHeadBalancesReport,
};

/// Service for formatting financial reports from computed balances.
pub struct ReportService;

impl ReportService {
    /// Generates the account balance report.
    ///
    /// Accounts whose balance is exactly zero are filtered out. The totals
    /// row sums the credit-side and debit-side magnitudes separately.
    #[must_use]
    pub fn account_balances(
        as_of: NaiveDate,
        balances: Vec<(Account, Balance)>,
    ) -> AccountBalancesReport {
        let mut lines = Vec::with_capacity(balances.len());
        let mut total_credit = Decimal::ZERO;
        let mut total_debit = Decimal::ZERO;

        for (account, balance) in balances {
            if balance.is_zero() {
                continue;
            }
            let side = balance.side();
            match side {
                Side::Credit => total_credit += balance.magnitude(),
                Side::Debit => total_debit += balance.magnitude(),
            }
            lines.push(AccountBalanceLine {
                account_id: account.id,
                account_name: account.account_name,
                sub_head: account.sub_head,
                amount: balance.magnitude(),
                side,
            });
        }

        AccountBalancesReport {
            report_type: "account_balances".to_string(),
            as_of,
            lines,
            total_credit,
            total_debit,
        }
    }

    /// Generates the sub-head balance report.
    ///
    /// Every bucket is kept, including those whose accounts net to zero on
    /// both columns.
    #[must_use]
    pub fn sub_head_balances(
        as_of: NaiveDate,
        buckets: &BTreeMap<SubHead, SubHeadTotals>,
    ) -> SubHeadBalancesReport {
        let mut lines = Vec::with_capacity(buckets.len());
        let mut total_credit = Decimal::ZERO;
        let mut total_debit = Decimal::ZERO;

        for (&sub_head, totals) in buckets {
            total_credit += totals.credit;
            total_debit += totals.debit;
            lines.push(SubHeadBalanceLine {
                sub_head,
                credit: totals.credit,
                debit: totals.debit,
            });
        }

        SubHeadBalancesReport {
            report_type: "sub_head_balances".to_string(),
            as_of,
            lines,
            total_credit,
            total_debit,
        }
    }

    /// Generates the cashbook summary for a range of movements.
    #[must_use]
    pub fn cashbook_summary(
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        movements: &[CashMovement],
    ) -> CashbookSummary {
        let mut total_credit = Decimal::ZERO;
        let mut total_debit = Decimal::ZERO;

        for movement in movements {
            match movement.pay_status {
                Side::Credit => total_credit += movement.amount,
                Side::Debit => total_debit += movement.amount,
            }
        }

        CashbookSummary {
            report_type: "cashbook_summary".to_string(),
            from,
            to,
            total_credit,
            total_debit,
            cash_in_hand: total_credit - total_debit,
        }
    }
}
