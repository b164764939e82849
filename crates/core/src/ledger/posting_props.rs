//! Property tests for posting rules.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

use khata_shared::types::Side;

use super::engine::BalanceEngine;
use super::memory::{account_fixture, MemoryLedgerStore};
use super::posting::{
    CashbookTx, ExportTx, GoodsReceivedTx, InvoiceTx, PostingService, SourceTransaction,
};

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 4, 15).unwrap()
}

fn run<F: Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("failed to build test runtime")
        .block_on(future)
}

fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

/// Kind selector for a generated transaction: 0 cashbook credit, 1 cashbook
/// debit, 2 goods-received, 3 export, 4 invoice.
fn make_tx(kind: u8, account_id: khata_shared::types::AccountId, amount: Decimal) -> SourceTransaction {
    let id = Uuid::new_v4();
    match kind {
        0 | 1 => SourceTransaction::Cashbook(CashbookTx {
            id,
            account_id,
            date: date(),
            amount,
            pay_status: if kind == 0 { Side::Credit } else { Side::Debit },
            detail: "cash".to_string(),
            remarks: None,
        }),
        2 => SourceTransaction::GoodsReceived(GoodsReceivedTx {
            id,
            account_id,
            date: date(),
            amount,
            detail: "goods".to_string(),
            remarks: None,
        }),
        3 => SourceTransaction::Export(ExportTx {
            id,
            account_id,
            date: date(),
            amount,
            detail: "export".to_string(),
            remarks: None,
        }),
        _ => SourceTransaction::Invoice(InvoiceTx {
            id,
            account_id,
            date: date(),
            amount,
            detail: "invoice".to_string(),
            remarks: None,
        }),
    }
}

fn expected_signed(kind: u8, amount: Decimal) -> Decimal {
    match kind {
        0 | 3 => amount,
        _ => -amount,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Posting any batch of transactions moves the balance by exactly the
    /// sum of their signed directions.
    #[test]
    fn prop_posting_direction_law(
        batch in prop::collection::vec((0u8..5, amount_strategy()), 0..15),
    ) {
        let store = Arc::new(MemoryLedgerStore::new());
        let account = account_fixture("Prop Party", Side::Credit, Decimal::ZERO);
        let account_id = account.id;
        store.add_account(account);

        let service = PostingService::new(Arc::clone(&store));
        let engine = BalanceEngine::new(Arc::clone(&store));

        run(async {
            let mut expected = Decimal::ZERO;
            for &(kind, amount) in &batch {
                service
                    .post(&make_tx(kind, account_id, amount))
                    .await
                    .expect("post failed");
                expected += expected_signed(kind, amount);
            }

            let balance = engine
                .account_balance(account_id, None)
                .await
                .expect("balance");
            prop_assert_eq!(balance.amount, expected);
            Ok(())
        })?;
    }

    /// However a transaction is edited, at most one active posting exists
    /// for its reference, and the balance reflects only the latest edit.
    #[test]
    fn prop_edits_keep_single_active_posting(
        first_amount in amount_strategy(),
        edits in prop::collection::vec((0u8..5, amount_strategy()), 1..6),
    ) {
        let store = Arc::new(MemoryLedgerStore::new());
        let account = account_fixture("Prop Party", Side::Credit, Decimal::ZERO);
        let account_id = account.id;
        store.add_account(account);

        let service = PostingService::new(Arc::clone(&store));
        let engine = BalanceEngine::new(Arc::clone(&store));

        run(async {
            // Post once, then re-post the same reference through each edit.
            let original = make_tx(0, account_id, first_amount);
            let source = original.source_ref();
            service.post(&original).await.expect("post failed");

            let mut last_signed = expected_signed(0, first_amount);
            for &(kind, amount) in &edits {
                // Keep the same reference id so each edit replaces the
                // previous posting. The reference type must stay fixed for
                // the reference to match, so edits stay within cashbook.
                let pay_status = if kind % 2 == 0 { Side::Credit } else { Side::Debit };
                let edited = SourceTransaction::Cashbook(CashbookTx {
                    id: source.reference_id,
                    account_id,
                    date: date(),
                    amount,
                    pay_status,
                    detail: "edited".to_string(),
                    remarks: None,
                });
                service.repost(&edited).await.expect("repost failed");
                last_signed = match pay_status {
                    Side::Credit => amount,
                    Side::Debit => -amount,
                };
            }

            prop_assert_eq!(store.active_entry_count(source), 1);

            let balance = engine
                .account_balance(account_id, None)
                .await
                .expect("balance");
            prop_assert_eq!(balance.amount, last_signed);

            // Reversing the last edit restores the pre-posting balance.
            service.reverse(source).await.expect("reverse failed");
            prop_assert_eq!(store.active_entry_count(source), 0);
            let balance = engine
                .account_balance(account_id, None)
                .await
                .expect("balance");
            prop_assert_eq!(balance.amount, Decimal::ZERO);
            Ok(())
        })?;
    }
}
