//! Postgres enum types shared by the entities.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use khata_core::ledger::{ReferenceType as CoreReferenceType, SubHead as CoreSubHead};
use khata_shared::types::Side;

/// Account sub-head grouping.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "sub_head")]
pub enum SubHead {
    /// Bank accounts.
    #[sea_orm(string_value = "BANKS")]
    Banks,
    /// Dollar-denominated ledgers.
    #[sea_orm(string_value = "DOLLAR_LEDGERS")]
    DollarLedgers,
    /// Export customer parties.
    #[sea_orm(string_value = "EXPORT_PARTIES")]
    ExportParties,
    /// Import supplier parties.
    #[sea_orm(string_value = "IMPORT_PARTIES")]
    ImportParties,
    /// NLC / Taftan border expense ledgers.
    #[sea_orm(string_value = "NLC_TAFTAN_EXPENSE_LEDGERS")]
    NlcTaftanExpenseLedgers,
    /// Personal ledgers.
    #[sea_orm(string_value = "PERSONALS")]
    Personals,
}

/// Credit/debit side.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "entry_side")]
pub enum EntrySide {
    /// Credit.
    #[sea_orm(string_value = "CREDIT")]
    Credit,
    /// Debit.
    #[sea_orm(string_value = "DEBIT")]
    Debit,
}

/// Source transaction kind behind a ledger posting.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "reference_type")]
pub enum ReferenceType {
    /// Cashbook entry.
    #[sea_orm(string_value = "CASHBOOK")]
    Cashbook,
    /// Goods-received (import) entry.
    #[sea_orm(string_value = "IMPORT")]
    Import,
    /// Export entry.
    #[sea_orm(string_value = "EXPORT")]
    Export,
    /// Invoice.
    #[sea_orm(string_value = "INVOICE")]
    Invoice,
}

impl From<CoreSubHead> for SubHead {
    fn from(value: CoreSubHead) -> Self {
        match value {
            CoreSubHead::Banks => Self::Banks,
            CoreSubHead::DollarLedgers => Self::DollarLedgers,
            CoreSubHead::ExportParties => Self::ExportParties,
            CoreSubHead::ImportParties => Self::ImportParties,
            CoreSubHead::NlcTaftanExpenseLedgers => Self::NlcTaftanExpenseLedgers,
            CoreSubHead::Personals => Self::Personals,
        }
    }
}

impl From<SubHead> for CoreSubHead {
    fn from(value: SubHead) -> Self {
        match value {
            SubHead::Banks => Self::Banks,
            SubHead::DollarLedgers => Self::DollarLedgers,
            SubHead::ExportParties => Self::ExportParties,
            SubHead::ImportParties => Self::ImportParties,
            SubHead::NlcTaftanExpenseLedgers => Self::NlcTaftanExpenseLedgers,
            SubHead::Personals => Self::Personals,
        }
    }
}

impl From<Side> for EntrySide {
    fn from(value: Side) -> Self {
        match value {
            Side::Credit => Self::Credit,
            Side::Debit => Self::Debit,
        }
    }
}

impl From<EntrySide> for Side {
    fn from(value: EntrySide) -> Self {
        match value {
            EntrySide::Credit => Self::Credit,
            EntrySide::Debit => Self::Debit,
        }
    }
}

impl From<CoreReferenceType> for ReferenceType {
    fn from(value: CoreReferenceType) -> Self {
        match value {
            CoreReferenceType::Cashbook => Self::Cashbook,
            CoreReferenceType::Import => Self::Import,
            CoreReferenceType::Export => Self::Export,
            CoreReferenceType::Invoice => Self::Invoice,
        }
    }
}

impl From<ReferenceType> for CoreReferenceType {
    fn from(value: ReferenceType) -> Self {
        match value {
            ReferenceType::Cashbook => Self::Cashbook,
            ReferenceType::Import => Self::Import,
            ReferenceType::Export => Self::Export,
            ReferenceType::Invoice => Self::Invoice,
        }
    }
}
