//! Property tests for the balance engine over the in-memory store.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use khata_shared::types::Side;

use super::engine::BalanceEngine;
use super::entry::{NewLedgerEntry, ReferenceType, SourceRef};
use super::memory::{account_fixture, MemoryLedgerStore};
use super::store::LedgerStore;

/// One generated posting: day of month, credit?, amount cents.
type EntrySpec = (u32, bool, i64);

fn entry_specs() -> impl Strategy<Value = Vec<EntrySpec>> {
    prop::collection::vec((1u32..=28, any::<bool>(), 1i64..1_000_000), 0..25)
}

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, day).unwrap()
}

fn run<F: Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("failed to build test runtime")
        .block_on(future)
}

fn seeded_store(opening_status: Side, opening: Decimal, specs: &[EntrySpec]) -> (MemoryLedgerStore, khata_shared::types::AccountId) {
    let store = MemoryLedgerStore::new();
    let account = account_fixture("Prop Party", opening_status, opening);
    let id = account.id;
    store.add_account(account);

    run(async {
        for &(day, is_credit, cents) in specs {
            let side = if is_credit { Side::Credit } else { Side::Debit };
            store
                .insert_entry(NewLedgerEntry::single_sided(
                    id,
                    date(day),
                    side,
                    Decimal::new(cents, 2),
                    "entry".to_string(),
                    SourceRef::new(ReferenceType::Cashbook, Uuid::new_v4()),
                    None,
                ))
                .await
                .expect("insert failed");
        }
    });

    (store, id)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Chaining two adjacent statements reproduces the single-range closing
    /// balance exactly.
    #[test]
    fn prop_statement_additivity(
        opening in 0i64..1_000_000,
        opening_credit in any::<bool>(),
        specs in entry_specs(),
        split_day in 1u32..28,
    ) {
        let status = if opening_credit { Side::Credit } else { Side::Debit };
        let (store, id) = seeded_store(status, Decimal::new(opening, 2), &specs);
        let engine = BalanceEngine::new(store);

        run(async {
            let full = engine
                .ledger_statement(id, date(1), date(28))
                .await
                .expect("full statement");
            let first = engine
                .ledger_statement(id, date(1), date(split_day))
                .await
                .expect("first statement");
            let second = engine
                .ledger_statement(id, date(split_day + 1), date(28))
                .await
                .expect("second statement");

            prop_assert_eq!(second.opening_balance, first.closing_balance);
            prop_assert_eq!(second.closing_balance, full.closing_balance);
            prop_assert_eq!(
                first.total_credit + second.total_credit,
                full.total_credit
            );
            prop_assert_eq!(first.total_debit + second.total_debit, full.total_debit);
            Ok(())
        })?;
    }

    /// Repeated reads over an unchanged store are identical.
    #[test]
    fn prop_balance_idempotent(
        opening in 0i64..1_000_000,
        specs in entry_specs(),
    ) {
        let (store, id) = seeded_store(Side::Credit, Decimal::new(opening, 2), &specs);
        let engine = BalanceEngine::new(store);

        run(async {
            let first = engine.account_balance(id, None).await.expect("balance");
            let second = engine.account_balance(id, None).await.expect("balance");
            prop_assert_eq!(first.amount, second.amount);
            Ok(())
        })?;
    }

    /// The statement closing balance agrees with the point-in-time balance
    /// at the range end.
    #[test]
    fn prop_closing_matches_point_in_time(
        opening in 0i64..1_000_000,
        specs in entry_specs(),
    ) {
        let (store, id) = seeded_store(Side::Credit, Decimal::new(opening, 2), &specs);
        let engine = BalanceEngine::new(store);

        run(async {
            let statement = engine
                .ledger_statement(id, date(1), date(28))
                .await
                .expect("statement");
            let balance = engine
                .account_balance(id, Some(date(28)))
                .await
                .expect("balance");
            prop_assert_eq!(statement.closing_balance, balance.amount);
            Ok(())
        })?;
    }
}
