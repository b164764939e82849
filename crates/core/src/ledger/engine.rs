//! The balance engine.
//!
//! Pure read-side computation over a snapshot of entries: every operation
//! issues its reads, folds, and returns. Nothing here maintains a running
//! total between calls; the denormalized caches some stores carry are
//! written elsewhere and never consulted.

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use khata_shared::types::{AccountId, Balance};

use super::account::{Account, SubHead};
use super::balance::balance_after;
use super::error::LedgerError;
use super::range::DateRange;
use super::statement::LedgerStatement;
use super::store::LedgerStore;

/// Credit/debit totals for one sub-head bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubHeadTotals {
    /// Sum of magnitudes of non-negative account balances.
    pub credit: Decimal,
    /// Sum of magnitudes of negative account balances.
    pub debit: Decimal,
}

/// Computes account balances and statements against a [`LedgerStore`].
#[derive(Debug, Clone)]
pub struct BalanceEngine<S> {
    store: S,
}

impl<S: LedgerStore> BalanceEngine<S> {
    /// Creates an engine over the given store.
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// The underlying store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Point-in-time balance of an account.
    ///
    /// Signed opening balance plus the fold of non-deleted entries dated on
    /// or before `as_of` (all entries when `None`).
    ///
    /// # Errors
    ///
    /// `AccountNotFound` when the account does not exist; store failures
    /// propagate.
    pub async fn account_balance(
        &self,
        id: AccountId,
        as_of: Option<NaiveDate>,
    ) -> Result<Balance, LedgerError> {
        let account = self
            .store
            .account(id)
            .await?
            .ok_or(LedgerError::AccountNotFound(id))?;

        let range = as_of.map_or_else(DateRange::unbounded, DateRange::through);
        let entries = self.store.entries_for_account(id, range).await?;

        Ok(Balance::new(balance_after(
            account.signed_opening(),
            &entries,
        )))
    }

    /// Ledger statement for an account over the inclusive range `[from, to]`.
    ///
    /// The opening balance carries everything strictly before `from`; each
    /// row carries the running balance folded forward from it; period totals
    /// cover the rows only.
    ///
    /// # Errors
    ///
    /// `InvalidRange` when `from` is after `to`; `AccountNotFound` when the
    /// account does not exist.
    pub async fn ledger_statement(
        &self,
        id: AccountId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<LedgerStatement, LedgerError> {
        let range = DateRange::between(from, to)?;

        // Balance carried from before the range. The day before the first
        // representable date has no entries, so the opening collapses to the
        // signed opening balance.
        let opening = match from.checked_sub_days(Days::new(1)) {
            Some(day_before) => self.account_balance(id, Some(day_before)).await?.amount,
            None => {
                let account = self
                    .store
                    .account(id)
                    .await?
                    .ok_or(LedgerError::AccountNotFound(id))?;
                account.signed_opening()
            }
        };

        let entries = self.store.entries_for_account(id, range).await?;
        Ok(LedgerStatement::build(opening, entries))
    }

    /// Cash in hand: the cross-account net of cashbook activity in range.
    ///
    /// Credits add, debits subtract, independent of which account each
    /// movement was against. An unbounded range covers all time.
    ///
    /// # Errors
    ///
    /// `InvalidRange` for inverted bounds; store failures propagate.
    pub async fn cash_in_hand(&self, range: DateRange) -> Result<Balance, LedgerError> {
        range.validate()?;
        let movements = self.store.cashbook_activity(range).await?;
        let net: Decimal = movements.iter().map(super::store::CashMovement::signed_amount).sum();
        Ok(Balance::new(net))
    }

    /// Balances of every active account, bucketed by sub-head.
    ///
    /// A non-negative balance adds its magnitude to the sub-head's credit
    /// total, a negative one to its debit total. Exactly-zero balances are
    /// counted (contribute zero), not skipped; the account-level report
    /// applies the opposite policy and the two are deliberately distinct.
    ///
    /// # Errors
    ///
    /// Store failures propagate.
    pub async fn sub_head_balances(
        &self,
    ) -> Result<BTreeMap<SubHead, SubHeadTotals>, LedgerError> {
        let accounts = self.store.active_accounts().await?;
        let mut buckets: BTreeMap<SubHead, SubHeadTotals> = BTreeMap::new();

        for account in accounts {
            let balance = self.account_balance(account.id, None).await?;
            let totals = buckets.entry(account.sub_head).or_default();
            if balance.amount >= Decimal::ZERO {
                totals.credit += balance.magnitude();
            } else {
                totals.debit += balance.magnitude();
            }
        }

        Ok(buckets)
    }

    /// Recomputes an account's denormalized balance cache from the fold and
    /// writes it back through the store.
    ///
    /// The cache is never consulted by any computation here; this repair
    /// path exists so a stored value that drifted (out-of-order edits,
    /// partial writes) can be reconciled with the source of truth.
    ///
    /// # Errors
    ///
    /// `AccountNotFound` when the account does not exist; store failures
    /// propagate.
    pub async fn refresh_cached_balance(&self, id: AccountId) -> Result<Balance, LedgerError> {
        let balance = self.account_balance(id, None).await?;
        self.store.update_cached_balance(id, balance.amount).await?;
        Ok(balance)
    }

    /// Balances of every active account, for the account-level report.
    ///
    /// # Errors
    ///
    /// Store failures propagate.
    pub async fn active_account_balances(
        &self,
    ) -> Result<Vec<(Account, Balance)>, LedgerError> {
        let accounts = self.store.active_accounts().await?;
        let mut balances = Vec::with_capacity(accounts.len());
        for account in accounts {
            let balance = self.account_balance(account.id, None).await?;
            balances.push((account, balance));
        }
        Ok(balances)
    }
}
