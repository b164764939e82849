//! Posting rules for source transactions.
//!
//! Every transaction that moves money against an account produces exactly
//! one single-sided ledger posting. The direction convention is a domain
//! rule, not a presentation choice: exports post CREDIT (incoming
//! receivable), goods-received and invoices post DEBIT (outgoing
//! obligation), cashbook entries post on their own pay-status side.
//!
//! Edits never mutate a posting in place. The prior posting is reversed by
//! soft delete and a fresh entry is written, keeping the audit trail and
//! every recomputed running balance correct.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use khata_shared::types::{AccountId, LedgerEntryId, Side};

use super::entry::{NewLedgerEntry, ReferenceType, SourceRef};
use super::error::LedgerError;
use super::store::LedgerStore;

/// A cashbook transaction (cash received or paid out).
#[derive(Debug, Clone)]
pub struct CashbookTx {
    /// Source transaction id.
    pub id: Uuid,
    /// The account the cash moved against.
    pub account_id: AccountId,
    /// Transaction date.
    pub date: NaiveDate,
    /// Amount (non-negative magnitude).
    pub amount: Decimal,
    /// Whether the cash movement is a credit or a debit.
    pub pay_status: Side,
    /// Narrative detail.
    pub detail: String,
    /// Optional remarks.
    pub remarks: Option<String>,
}

/// A goods-received (import) transaction.
#[derive(Debug, Clone)]
pub struct GoodsReceivedTx {
    /// Source transaction id.
    pub id: Uuid,
    /// The import party account.
    pub account_id: AccountId,
    /// Transaction date.
    pub date: NaiveDate,
    /// Goods value.
    pub amount: Decimal,
    /// Narrative detail.
    pub detail: String,
    /// Optional remarks.
    pub remarks: Option<String>,
}

/// An export transaction.
#[derive(Debug, Clone)]
pub struct ExportTx {
    /// Source transaction id.
    pub id: Uuid,
    /// The export party account.
    pub account_id: AccountId,
    /// Transaction date.
    pub date: NaiveDate,
    /// Export value.
    pub amount: Decimal,
    /// Narrative detail.
    pub detail: String,
    /// Optional remarks.
    pub remarks: Option<String>,
}

/// An invoice.
#[derive(Debug, Clone)]
pub struct InvoiceTx {
    /// Source transaction id.
    pub id: Uuid,
    /// The party account invoiced against.
    pub account_id: AccountId,
    /// Invoice date.
    pub date: NaiveDate,
    /// Invoice amount.
    pub amount: Decimal,
    /// Narrative detail.
    pub detail: String,
    /// Optional remarks.
    pub remarks: Option<String>,
}

/// A source transaction, dispatched by kind through pattern matching.
#[derive(Debug, Clone)]
pub enum SourceTransaction {
    /// Cashbook entry.
    Cashbook(CashbookTx),
    /// Goods-received (import) entry.
    GoodsReceived(GoodsReceivedTx),
    /// Export entry.
    Export(ExportTx),
    /// Invoice.
    Invoice(InvoiceTx),
}

impl SourceTransaction {
    /// The reference identifying this transaction's posting.
    #[must_use]
    pub fn source_ref(&self) -> SourceRef {
        match self {
            Self::Cashbook(tx) => SourceRef::new(ReferenceType::Cashbook, tx.id),
            Self::GoodsReceived(tx) => SourceRef::new(ReferenceType::Import, tx.id),
            Self::Export(tx) => SourceRef::new(ReferenceType::Export, tx.id),
            Self::Invoice(tx) => SourceRef::new(ReferenceType::Invoice, tx.id),
        }
    }

    /// The account this transaction posts against.
    #[must_use]
    pub fn account_id(&self) -> AccountId {
        match self {
            Self::Cashbook(tx) => tx.account_id,
            Self::GoodsReceived(tx) => tx.account_id,
            Self::Export(tx) => tx.account_id,
            Self::Invoice(tx) => tx.account_id,
        }
    }

    /// The side this transaction posts to.
    ///
    /// Export credits the party, goods-received and invoices debit it, a
    /// cashbook entry follows its own pay status.
    #[must_use]
    pub fn posting_side(&self) -> Side {
        match self {
            Self::Cashbook(tx) => tx.pay_status,
            Self::Export(_) => Side::Credit,
            Self::GoodsReceived(_) | Self::Invoice(_) => Side::Debit,
        }
    }

    /// Derives the single ledger entry this transaction must post.
    ///
    /// # Errors
    ///
    /// Returns `ZeroAmount`/`NegativeAmount` for a non-positive amount.
    pub fn derive_entry(&self) -> Result<NewLedgerEntry, LedgerError> {
        let (date, amount, detail, remarks) = match self {
            Self::Cashbook(tx) => (tx.date, tx.amount, &tx.detail, &tx.remarks),
            Self::GoodsReceived(tx) => (tx.date, tx.amount, &tx.detail, &tx.remarks),
            Self::Export(tx) => (tx.date, tx.amount, &tx.detail, &tx.remarks),
            Self::Invoice(tx) => (tx.date, tx.amount, &tx.detail, &tx.remarks),
        };

        if amount < Decimal::ZERO {
            return Err(LedgerError::NegativeAmount);
        }
        if amount.is_zero() {
            return Err(LedgerError::ZeroAmount);
        }

        Ok(NewLedgerEntry::single_sided(
            self.account_id(),
            date,
            self.posting_side(),
            amount,
            detail.clone(),
            self.source_ref(),
            remarks.clone(),
        ))
    }
}

/// Writes, replaces, and reverses postings against a [`LedgerStore`].
///
/// The invariant maintained throughout: at most one active (non-deleted)
/// ledger entry per source reference.
#[derive(Debug, Clone)]
pub struct PostingService<S> {
    store: S,
}

impl<S: LedgerStore> PostingService<S> {
    /// Creates a posting service over the given store.
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// The underlying store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Posts a new transaction.
    ///
    /// All-or-nothing for the single entry: validation and the account
    /// lookup happen before anything is written.
    ///
    /// # Errors
    ///
    /// `AccountNotFound` when the referenced account does not exist (nothing
    /// is written); `AlreadyPosted` when an active posting exists for the
    /// reference; amount validation errors from `derive_entry`.
    pub async fn post(&self, tx: &SourceTransaction) -> Result<LedgerEntryId, LedgerError> {
        let entry = tx.derive_entry()?;
        entry.validate()?;

        let account_id = tx.account_id();
        if self.store.account(account_id).await?.is_none() {
            return Err(LedgerError::AccountNotFound(account_id));
        }

        let source = tx.source_ref();
        if self.store.active_posting(source).await?.is_some() {
            return Err(LedgerError::AlreadyPosted(source));
        }

        Ok(self.store.insert_entry(entry).await?)
    }

    /// Replaces the posting for an edited transaction.
    ///
    /// The prior active posting is reversed (soft-deleted) first, then the
    /// fresh entry is written. A failure between the two legs surfaces to
    /// the caller; nothing is retried or silently half-applied.
    ///
    /// # Errors
    ///
    /// `PostingNotFound` when no active posting exists for the reference;
    /// `AccountNotFound` and amount validation errors as for `post`.
    pub async fn repost(&self, tx: &SourceTransaction) -> Result<LedgerEntryId, LedgerError> {
        let entry = tx.derive_entry()?;
        entry.validate()?;

        let account_id = tx.account_id();
        if self.store.account(account_id).await?.is_none() {
            return Err(LedgerError::AccountNotFound(account_id));
        }

        let source = tx.source_ref();
        let prior = self
            .store
            .active_posting(source)
            .await?
            .ok_or(LedgerError::PostingNotFound(source))?;

        self.store.soft_delete_entry(prior.id).await?;
        Ok(self.store.insert_entry(entry).await?)
    }

    /// Reverses the posting for a deleted transaction.
    ///
    /// # Errors
    ///
    /// `PostingNotFound` when no active posting exists for the reference.
    pub async fn reverse(&self, source: SourceRef) -> Result<(), LedgerError> {
        let prior = self
            .store
            .active_posting(source)
            .await?
            .ok_or(LedgerError::PostingNotFound(source))?;
        self.store.soft_delete_entry(prior.id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::engine::BalanceEngine;
    use crate::ledger::memory::{account_fixture, MemoryLedgerStore};
    use rstest::rstest;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, d).unwrap()
    }

    fn store_with_account() -> (Arc<MemoryLedgerStore>, AccountId) {
        let store = Arc::new(MemoryLedgerStore::new());
        let account = account_fixture("Trading Party", Side::Credit, dec!(0));
        let id = account.id;
        store.add_account(account);
        (store, id)
    }

    fn export_tx(account_id: AccountId, amount: Decimal) -> SourceTransaction {
        SourceTransaction::Export(ExportTx {
            id: Uuid::new_v4(),
            account_id,
            date: date(1),
            amount,
            detail: "Rice consignment".to_string(),
            remarks: None,
        })
    }

    fn import_tx(account_id: AccountId, amount: Decimal) -> SourceTransaction {
        SourceTransaction::GoodsReceived(GoodsReceivedTx {
            id: Uuid::new_v4(),
            account_id,
            date: date(1),
            amount,
            detail: "Dates consignment".to_string(),
            remarks: None,
        })
    }

    fn cashbook_tx(account_id: AccountId, pay_status: Side, amount: Decimal) -> CashbookTx {
        CashbookTx {
            id: Uuid::new_v4(),
            account_id,
            date: date(2),
            amount,
            pay_status,
            detail: "Cash settlement".to_string(),
            remarks: None,
        }
    }

    #[rstest]
    #[case::export_credits(export_tx(AccountId::new(), dec!(1000)), Side::Credit)]
    #[case::import_debits(import_tx(AccountId::new(), dec!(1000)), Side::Debit)]
    fn test_trade_posting_direction(
        #[case] tx: SourceTransaction,
        #[case] expected: Side,
    ) {
        assert_eq!(tx.posting_side(), expected);
        let entry = tx.derive_entry().unwrap();
        match expected {
            Side::Credit => {
                assert_eq!(entry.credit_amount, dec!(1000));
                assert_eq!(entry.debit_amount, dec!(0));
            }
            Side::Debit => {
                assert_eq!(entry.debit_amount, dec!(1000));
                assert_eq!(entry.credit_amount, dec!(0));
            }
        }
    }

    #[test]
    fn test_invoice_posts_debit_like_import() {
        let tx = SourceTransaction::Invoice(InvoiceTx {
            id: Uuid::new_v4(),
            account_id: AccountId::new(),
            date: date(3),
            amount: dec!(250),
            detail: "Freight invoice".to_string(),
            remarks: None,
        });
        assert_eq!(tx.posting_side(), Side::Debit);
    }

    #[test]
    fn test_cashbook_follows_pay_status() {
        let credit = SourceTransaction::Cashbook(cashbook_tx(AccountId::new(), Side::Credit, dec!(5)));
        let debit = SourceTransaction::Cashbook(cashbook_tx(AccountId::new(), Side::Debit, dec!(5)));
        assert_eq!(credit.posting_side(), Side::Credit);
        assert_eq!(debit.posting_side(), Side::Debit);
    }

    #[test]
    fn test_derive_entry_rejects_bad_amounts() {
        let zero = export_tx(AccountId::new(), dec!(0));
        assert!(matches!(zero.derive_entry(), Err(LedgerError::ZeroAmount)));

        let negative = import_tx(AccountId::new(), dec!(-10));
        assert!(matches!(
            negative.derive_entry(),
            Err(LedgerError::NegativeAmount)
        ));
    }

    #[tokio::test]
    async fn test_export_then_import_balances() {
        // Export 1000 leaves +1000; an equal import against a fresh account
        // leaves -1000.
        let (store, export_account) = store_with_account();
        let fresh = account_fixture("Fresh Party", Side::Credit, dec!(0));
        let import_account = fresh.id;
        store.add_account(fresh);

        let service = PostingService::new(Arc::clone(&store));
        service.post(&export_tx(export_account, dec!(1000))).await.unwrap();
        service.post(&import_tx(import_account, dec!(1000))).await.unwrap();

        let engine = BalanceEngine::new(Arc::clone(&store));
        assert_eq!(
            engine.account_balance(export_account, None).await.unwrap().amount,
            dec!(1000)
        );
        assert_eq!(
            engine.account_balance(import_account, None).await.unwrap().amount,
            dec!(-1000)
        );
    }

    #[tokio::test]
    async fn test_post_unknown_account_writes_nothing() {
        let store = Arc::new(MemoryLedgerStore::new());
        let service = PostingService::new(Arc::clone(&store));

        let tx = export_tx(AccountId::new(), dec!(100));
        let result = service.post(&tx).await;
        assert!(matches!(result, Err(LedgerError::AccountNotFound(_))));
        assert_eq!(store.active_entry_count(tx.source_ref()), 0);
    }

    #[tokio::test]
    async fn test_double_post_rejected() {
        let (store, account_id) = store_with_account();
        let service = PostingService::new(Arc::clone(&store));

        let tx = export_tx(account_id, dec!(100));
        service.post(&tx).await.unwrap();
        assert!(matches!(
            service.post(&tx).await,
            Err(LedgerError::AlreadyPosted(_))
        ));
        assert_eq!(store.active_entry_count(tx.source_ref()), 1);
    }

    #[tokio::test]
    async fn test_edit_reversal_replaces_prior_posting() {
        // A cashbook CREDIT 500 edited to a DEBIT 500: the credit is
        // reversed, only the debit remains live, and deleting the
        // transaction restores the pre-posting balance.
        let (store, account_id) = store_with_account();
        let service = PostingService::new(Arc::clone(&store));

        let mut cashbook = cashbook_tx(account_id, Side::Credit, dec!(500));
        let tx_id = cashbook.id;
        service
            .post(&SourceTransaction::Cashbook(cashbook.clone()))
            .await
            .unwrap();

        cashbook.pay_status = Side::Debit;
        service
            .repost(&SourceTransaction::Cashbook(cashbook.clone()))
            .await
            .unwrap();

        let source = SourceRef::new(ReferenceType::Cashbook, tx_id);
        assert_eq!(store.active_entry_count(source), 1);

        let engine = BalanceEngine::new(Arc::clone(&store));
        let balance = engine.account_balance(account_id, None).await.unwrap();
        assert_eq!(balance.amount, dec!(-500));

        // Reversing the edit as well restores the pre-posting balance.
        service.reverse(source).await.unwrap();
        let balance = engine.account_balance(account_id, None).await.unwrap();
        assert_eq!(balance.amount, dec!(0));
        assert_eq!(store.active_entry_count(source), 0);
    }

    #[tokio::test]
    async fn test_repost_without_prior_posting_fails() {
        let (store, account_id) = store_with_account();
        let service = PostingService::new(Arc::clone(&store));

        let tx = export_tx(account_id, dec!(40));
        assert!(matches!(
            service.repost(&tx).await,
            Err(LedgerError::PostingNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_reverse_without_posting_fails() {
        let (store, _) = store_with_account();
        let service = PostingService::new(Arc::clone(&store));

        let source = SourceRef::new(ReferenceType::Invoice, Uuid::new_v4());
        assert!(matches!(
            service.reverse(source).await,
            Err(LedgerError::PostingNotFound(_))
        ));
    }
}
