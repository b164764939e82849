//! Initial database migration.
//!
//! Creates the enums, tables, indexes, and triggers for the ledger,
//! cashbook, and activity log.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: ACCOUNTS
        // ============================================================
        db.execute_unprepared(ACCOUNTS_SQL).await?;

        // ============================================================
        // PART 3: LEDGER & CASHBOOK
        // ============================================================
        db.execute_unprepared(LEDGER_ENTRIES_SQL).await?;
        db.execute_unprepared(CASHBOOK_ENTRIES_SQL).await?;

        // ============================================================
        // PART 4: ACTIVITY LOG
        // ============================================================
        db.execute_unprepared(ACTIVITY_LOGS_SQL).await?;

        // ============================================================
        // PART 5: TRIGGERS & FUNCTIONS
        // ============================================================
        db.execute_unprepared(TRIGGERS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
-- Account sub-head grouping
CREATE TYPE sub_head AS ENUM (
    'BANKS',
    'DOLLAR_LEDGERS',
    'EXPORT_PARTIES',
    'IMPORT_PARTIES',
    'NLC_TAFTAN_EXPENSE_LEDGERS',
    'PERSONALS'
);

-- Credit/debit side
CREATE TYPE entry_side AS ENUM ('CREDIT', 'DEBIT');

-- Source transaction kind behind a posting
CREATE TYPE reference_type AS ENUM (
    'CASHBOOK',
    'IMPORT',
    'EXPORT',
    'INVOICE'
);
";

const ACCOUNTS_SQL: &str = r"
CREATE TABLE accounts (
    id UUID PRIMARY KEY,
    account_name TEXT NOT NULL,
    sub_head sub_head NOT NULL,
    balance_status entry_side NOT NULL,
    opening_balance NUMERIC(19, 4) NOT NULL DEFAULT 0
        CHECK (opening_balance >= 0),
    cached_balance NUMERIC(19, 4) NOT NULL DEFAULT 0,
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

-- Account names are unique among active accounts only; a deactivated
-- party frees its name for reuse.
CREATE UNIQUE INDEX idx_accounts_active_name
    ON accounts (account_name)
    WHERE is_active;

CREATE INDEX idx_accounts_sub_head ON accounts (sub_head);
";

const LEDGER_ENTRIES_SQL: &str = r"
CREATE TABLE ledger_entries (
    id UUID PRIMARY KEY,
    account_id UUID NOT NULL REFERENCES accounts(id),
    entry_date DATE NOT NULL,
    credit_amount NUMERIC(19, 4) NOT NULL DEFAULT 0
        CHECK (credit_amount >= 0),
    debit_amount NUMERIC(19, 4) NOT NULL DEFAULT 0
        CHECK (debit_amount >= 0),
    detail TEXT NOT NULL,
    reference_type reference_type NOT NULL,
    reference_id UUID NOT NULL,
    remarks TEXT,
    is_deleted BOOLEAN NOT NULL DEFAULT FALSE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_ledger_entries_account_date
    ON ledger_entries (account_id, entry_date, created_at);

-- At most one active posting per source reference.
CREATE UNIQUE INDEX idx_ledger_entries_active_reference
    ON ledger_entries (reference_type, reference_id)
    WHERE NOT is_deleted;
";

const CASHBOOK_ENTRIES_SQL: &str = r"
CREATE TABLE cashbook_entries (
    id UUID PRIMARY KEY,
    account_id UUID NOT NULL REFERENCES accounts(id),
    entry_date DATE NOT NULL,
    amount NUMERIC(19, 4) NOT NULL CHECK (amount > 0),
    pay_status entry_side NOT NULL,
    detail TEXT NOT NULL,
    current_balance NUMERIC(19, 4) NOT NULL DEFAULT 0,
    remarks TEXT,
    is_deleted BOOLEAN NOT NULL DEFAULT FALSE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_cashbook_entries_date
    ON cashbook_entries (entry_date, created_at);

CREATE INDEX idx_cashbook_entries_account
    ON cashbook_entries (account_id, entry_date);
";

const ACTIVITY_LOGS_SQL: &str = r"
CREATE TABLE activity_logs (
    id UUID PRIMARY KEY,
    action TEXT NOT NULL,
    entity_type TEXT NOT NULL,
    entity_id UUID NOT NULL,
    detail TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_activity_logs_entity
    ON activity_logs (entity_type, entity_id);
";

const TRIGGERS_SQL: &str = r"
-- Keep updated_at current on row updates
CREATE OR REPLACE FUNCTION set_updated_at()
RETURNS TRIGGER AS $$
BEGIN
    NEW.updated_at = NOW();
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_accounts_updated_at
    BEFORE UPDATE ON accounts
    FOR EACH ROW
    EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_cashbook_entries_updated_at
    BEFORE UPDATE ON cashbook_entries
    FOR EACH ROW
    EXECUTE FUNCTION set_updated_at();
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS activity_logs;
DROP TABLE IF EXISTS cashbook_entries;
DROP TABLE IF EXISTS ledger_entries;
DROP TABLE IF EXISTS accounts;
DROP FUNCTION IF EXISTS set_updated_at();
DROP TYPE IF EXISTS reference_type;
DROP TYPE IF EXISTS entry_side;
DROP TYPE IF EXISTS sub_head;
";
