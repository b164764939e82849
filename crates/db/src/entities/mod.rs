//! `SeaORM` entity definitions.

pub mod accounts;
pub mod activity_logs;
pub mod cashbook_entries;
pub mod ledger_entries;
pub mod sea_orm_active_enums;
