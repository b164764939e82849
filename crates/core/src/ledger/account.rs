//! Ledger party account domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use khata_shared::types::{AccountId, Side};

/// Sub-head grouping for ledger party accounts.
///
/// Sub-heads group accounts for reporting only; they have no effect on
/// balance arithmetic or posting direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubHead {
    /// Bank accounts.
    Banks,
    /// Dollar-denominated ledgers.
    DollarLedgers,
    /// Export customer parties.
    ExportParties,
    /// Import supplier parties.
    ImportParties,
    /// NLC / Taftan border expense ledgers.
    NlcTaftanExpenseLedgers,
    /// Personal ledgers.
    Personals,
}

impl SubHead {
    /// All sub-heads in report order.
    pub const ALL: [Self; 6] = [
        Self::Banks,
        Self::DollarLedgers,
        Self::ExportParties,
        Self::ImportParties,
        Self::NlcTaftanExpenseLedgers,
        Self::Personals,
    ];
}

impl std::fmt::Display for SubHead {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Banks => write!(f, "Banks"),
            Self::DollarLedgers => write!(f, "Dollar Ledgers"),
            Self::ExportParties => write!(f, "Export Parties"),
            Self::ImportParties => write!(f, "Import Parties"),
            Self::NlcTaftanExpenseLedgers => write!(f, "NLC/Taftan Expense Ledgers"),
            Self::Personals => write!(f, "Personals"),
        }
    }
}

/// A ledger party account.
///
/// `balance_status` is the sign convention of the opening balance, not a
/// running value: a CREDIT status contributes `+opening_balance` to the
/// running balance, a DEBIT status contributes `-opening_balance`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier.
    pub id: AccountId,
    /// Account name (unique within the active set).
    pub account_name: String,
    /// Sub-head grouping for reports.
    pub sub_head: SubHead,
    /// Sign convention of the opening balance.
    pub balance_status: Side,
    /// Opening balance magnitude (non-negative).
    pub opening_balance: Decimal,
    /// Soft visibility flag. Inactive accounts are excluded from new-entry
    /// pickers but not from historical reports.
    pub is_active: bool,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Signed contribution of the opening balance to the running balance.
    #[must_use]
    pub fn signed_opening(&self) -> Decimal {
        match self.balance_status {
            Side::Credit => self.opening_balance,
            Side::Debit => -self.opening_balance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn make_account(status: Side, opening: Decimal) -> Account {
        Account {
            id: AccountId::new(),
            account_name: "Habib Bank Main".to_string(),
            sub_head: SubHead::Banks,
            balance_status: status,
            opening_balance: opening,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_credit_opening_is_positive() {
        let account = make_account(Side::Credit, dec!(1000));
        assert_eq!(account.signed_opening(), dec!(1000));
    }

    #[test]
    fn test_debit_opening_is_negative() {
        let account = make_account(Side::Debit, dec!(1000));
        assert_eq!(account.signed_opening(), dec!(-1000));
    }

    #[test]
    fn test_zero_opening_is_zero_either_way() {
        assert_eq!(make_account(Side::Credit, dec!(0)).signed_opening(), dec!(0));
        assert_eq!(make_account(Side::Debit, dec!(0)).signed_opening(), dec!(0));
    }

    #[test]
    fn test_sub_head_order_is_stable() {
        let mut heads = SubHead::ALL;
        heads.sort();
        assert_eq!(heads, SubHead::ALL);
    }
}
