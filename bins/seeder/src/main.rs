//! Database seeder for Khata development and testing.
//!
//! Seeds a demo chart of ledger parties and a few cashbook days for local
//! development.
//!
//! Usage: cargo run --bin seeder

use chrono::{Days, Utc};
use rust_decimal_macros::dec;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use khata_db::entities::{
    accounts, cashbook_entries,
    sea_orm_active_enums::{EntrySide, SubHead},
};
use khata_db::repositories::account::CreateAccountInput;
use khata_db::repositories::cashbook::CreateCashbookInput;
use khata_db::{AccountRepository, CashbookRepository};
use khata_shared::AppConfig;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "khata=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().expect("Failed to load configuration");

    info!("Connecting to database...");
    let db = khata_db::connect(&config.database.url)
        .await
        .expect("Failed to connect to database");

    info!("Seeding demo accounts...");
    seed_accounts(&db).await;

    info!("Seeding cashbook entries...");
    seed_cashbook(&db).await;

    info!("Seeding complete!");
}

/// Demo chart of ledger parties: (name, sub-head, status, opening balance).
fn demo_accounts() -> Vec<CreateAccountInput> {
    vec![
        CreateAccountInput {
            account_name: "Habib Bank Main".to_string(),
            sub_head: SubHead::Banks,
            balance_status: EntrySide::Credit,
            opening_balance: dec!(250000),
            is_active: true,
        },
        CreateAccountInput {
            account_name: "Dollar Ledger Karachi".to_string(),
            sub_head: SubHead::DollarLedgers,
            balance_status: EntrySide::Credit,
            opening_balance: dec!(1800),
            is_active: true,
        },
        CreateAccountInput {
            account_name: "Zahedan Traders".to_string(),
            sub_head: SubHead::ImportParties,
            balance_status: EntrySide::Debit,
            opening_balance: dec!(42000),
            is_active: true,
        },
        CreateAccountInput {
            account_name: "Mirjaveh Exports Co".to_string(),
            sub_head: SubHead::ExportParties,
            balance_status: EntrySide::Credit,
            opening_balance: dec!(0),
            is_active: true,
        },
        CreateAccountInput {
            account_name: "Taftan Border Expenses".to_string(),
            sub_head: SubHead::NlcTaftanExpenseLedgers,
            balance_status: EntrySide::Debit,
            opening_balance: dec!(3500),
            is_active: true,
        },
        CreateAccountInput {
            account_name: "Haji Saleem Personal".to_string(),
            sub_head: SubHead::Personals,
            balance_status: EntrySide::Credit,
            opening_balance: dec!(15000),
            is_active: true,
        },
    ]
}

/// Seeds the demo accounts, skipping names that already exist.
async fn seed_accounts(db: &DatabaseConnection) {
    let repo = AccountRepository::new(db.clone());

    for input in demo_accounts() {
        let exists = accounts::Entity::find()
            .filter(accounts::Column::AccountName.eq(&input.account_name))
            .one(db)
            .await
            .ok()
            .flatten()
            .is_some();

        if exists {
            info!("  Account '{}' already exists, skipping...", input.account_name);
            continue;
        }

        let name = input.account_name.clone();
        match repo.create_account(input).await {
            Ok(_) => info!("  Created account: {name}"),
            Err(e) => warn!("  Failed to create account {name}: {e}"),
        }
    }
}

/// Seeds a few cashbook days against the demo bank account.
async fn seed_cashbook(db: &DatabaseConnection) {
    let existing = cashbook_entries::Entity::find()
        .count(db)
        .await
        .unwrap_or(0);
    if existing > 0 {
        info!("  Cashbook already seeded, skipping...");
        return;
    }

    let Ok(Some(bank)) = accounts::Entity::find()
        .filter(accounts::Column::AccountName.eq("Habib Bank Main"))
        .one(db)
        .await
    else {
        warn!("  Demo bank account missing, skipping cashbook seed");
        return;
    };

    let repo = CashbookRepository::new(db.clone());
    let today = Utc::now().date_naive();

    let movements = [
        (3u64, dec!(120000), EntrySide::Credit, "Export proceeds received"),
        (2u64, dec!(45000), EntrySide::Debit, "Customs clearance paid"),
        (1u64, dec!(8000), EntrySide::Debit, "Truck freight Taftan"),
    ];

    for (days_ago, amount, pay_status, detail) in movements {
        let entry_date = today
            .checked_sub_days(Days::new(days_ago))
            .unwrap_or(today);
        let result = repo
            .create_entry(CreateCashbookInput {
                account_id: bank.id,
                entry_date,
                amount,
                pay_status,
                detail: detail.to_string(),
                remarks: None,
            })
            .await;

        match result {
            Ok(_) => info!("  Created cashbook entry: {detail}"),
            Err(e) => warn!("  Failed to create cashbook entry: {e}"),
        }
    }
}
