//! Account repository for ledger party database operations.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use khata_core::ledger::balance::{balance_after, signed_opening};
use khata_shared::types::Side;

use crate::entities::{
    accounts, ledger_entries,
    sea_orm_active_enums::{EntrySide, SubHead},
};

use super::entry_to_domain;

/// Error types for account operations.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    /// Account name already in use by an active account.
    #[error("Account name '{0}' already exists")]
    DuplicateName(String),

    /// Opening balance must be a non-negative magnitude.
    #[error("Opening balance cannot be negative")]
    NegativeOpeningBalance,

    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating an account.
#[derive(Debug, Clone)]
pub struct CreateAccountInput {
    /// Account name (must be unique among active accounts).
    pub account_name: String,
    /// Sub-head grouping.
    pub sub_head: SubHead,
    /// Sign convention of the opening balance.
    pub balance_status: EntrySide,
    /// Opening balance magnitude.
    pub opening_balance: Decimal,
    /// Whether the account is active.
    pub is_active: bool,
}

/// Input for updating an account.
#[derive(Debug, Clone, Default)]
pub struct UpdateAccountInput {
    /// Account name.
    pub account_name: Option<String>,
    /// Sub-head grouping.
    pub sub_head: Option<SubHead>,
    /// Sign convention of the opening balance.
    pub balance_status: Option<EntrySide>,
    /// Opening balance magnitude.
    pub opening_balance: Option<Decimal>,
    /// Whether the account is active.
    pub is_active: Option<bool>,
}

/// Account repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a new account with validation.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The name is already used by an active account
    /// - The opening balance is negative
    pub async fn create_account(
        &self,
        input: CreateAccountInput,
    ) -> Result<accounts::Model, AccountError> {
        if input.opening_balance < Decimal::ZERO {
            return Err(AccountError::NegativeOpeningBalance);
        }

        let existing = accounts::Entity::find()
            .filter(accounts::Column::AccountName.eq(&input.account_name))
            .filter(accounts::Column::IsActive.eq(true))
            .one(&self.db)
            .await?;

        if existing.is_some() {
            return Err(AccountError::DuplicateName(input.account_name));
        }

        let now = Utc::now().into();
        let signed = signed_opening(input.balance_status.clone().into(), input.opening_balance);
        let account = accounts::ActiveModel {
            id: Set(Uuid::new_v4()),
            account_name: Set(input.account_name),
            sub_head: Set(input.sub_head),
            balance_status: Set(input.balance_status),
            opening_balance: Set(input.opening_balance),
            // A fresh account has no entries, so the cache starts at the
            // signed opening balance.
            cached_balance: Set(signed),
            is_active: Set(input.is_active),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let account = account.insert(&self.db).await?;
        Ok(account)
    }

    /// Finds an account by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_account_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<accounts::Model>, AccountError> {
        let account = accounts::Entity::find_by_id(id).one(&self.db).await?;
        Ok(account)
    }

    /// Lists active accounts ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_active_accounts(&self) -> Result<Vec<accounts::Model>, AccountError> {
        let accounts = accounts::Entity::find()
            .filter(accounts::Column::IsActive.eq(true))
            .order_by_asc(accounts::Column::AccountName)
            .all(&self.db)
            .await?;
        Ok(accounts)
    }

    /// Updates an account with validation.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The account is not found
    /// - The new name collides with another active account
    /// - The new opening balance is negative
    pub async fn update_account(
        &self,
        id: Uuid,
        input: UpdateAccountInput,
    ) -> Result<accounts::Model, AccountError> {
        let account = accounts::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AccountError::AccountNotFound(id))?;

        if let Some(opening) = input.opening_balance
            && opening < Decimal::ZERO
        {
            return Err(AccountError::NegativeOpeningBalance);
        }

        if let Some(new_name) = &input.account_name
            && *new_name != account.account_name
        {
            let existing = accounts::Entity::find()
                .filter(accounts::Column::AccountName.eq(new_name))
                .filter(accounts::Column::IsActive.eq(true))
                .filter(accounts::Column::Id.ne(id))
                .one(&self.db)
                .await?;

            if existing.is_some() {
                return Err(AccountError::DuplicateName(new_name.clone()));
            }
        }

        let now = Utc::now().into();
        let mut active: accounts::ActiveModel = account.into();

        if let Some(account_name) = input.account_name {
            active.account_name = Set(account_name);
        }
        if let Some(sub_head) = input.sub_head {
            active.sub_head = Set(sub_head);
        }
        if let Some(balance_status) = input.balance_status {
            active.balance_status = Set(balance_status);
        }
        if let Some(opening_balance) = input.opening_balance {
            active.opening_balance = Set(opening_balance);
        }
        if let Some(is_active) = input.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(now);

        active.update(&self.db).await?;

        // Opening balance or status changes shift every derived balance;
        // bring the cache back in line with the fold.
        self.recompute_cached_balance(id).await?;

        accounts::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AccountError::AccountNotFound(id))
    }

    /// Deactivates an account (soft delete).
    ///
    /// The account stays visible to historical reports; it is only removed
    /// from new-entry pickers and the active listing.
    ///
    /// # Errors
    ///
    /// Returns an error if the account is not found.
    pub async fn deactivate_account(&self, id: Uuid) -> Result<(), AccountError> {
        let account = accounts::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AccountError::AccountNotFound(id))?;

        let now = Utc::now().into();
        let mut active: accounts::ActiveModel = account.into();
        active.is_active = Set(false);
        active.updated_at = Set(now);
        active.update(&self.db).await?;

        Ok(())
    }

    /// Recomputes the cached balance from the entry fold and stores it.
    ///
    /// This is the repair path for the denormalized cache: the fold over
    /// non-deleted entries is the source of truth, the cache only mirrors
    /// it.
    ///
    /// # Errors
    ///
    /// Returns an error if the account is not found or the query fails.
    pub async fn recompute_cached_balance(&self, id: Uuid) -> Result<Decimal, AccountError> {
        let account = accounts::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AccountError::AccountNotFound(id))?;

        let entries: Vec<_> = ledger_entries::Entity::find()
            .filter(ledger_entries::Column::AccountId.eq(id))
            .filter(ledger_entries::Column::IsDeleted.eq(false))
            .all(&self.db)
            .await?
            .into_iter()
            .map(entry_to_domain)
            .collect();

        let opening = signed_opening(
            account.balance_status.clone().into(),
            account.opening_balance,
        );
        let balance = balance_after(opening, &entries);

        let mut active: accounts::ActiveModel = account.into();
        active.cached_balance = Set(balance);
        active.updated_at = Set(Utc::now().into());
        active.update(&self.db).await?;

        Ok(balance)
    }
}

// ============================================================================
// Pure validation functions for property testing
// ============================================================================

/// Checks whether a name is free among the active account names.
///
/// This is a pure function that can be tested without database access.
#[must_use]
pub fn is_name_available<S: std::hash::BuildHasher>(
    active_names: &std::collections::HashSet<String, S>,
    name: &str,
) -> bool {
    !active_names.contains(name)
}

/// Checks whether renaming an account would collide with another active
/// account.
#[must_use]
pub fn is_rename_valid<S: std::hash::BuildHasher>(
    active_names: &std::collections::HashSet<String, S>,
    current_name: &str,
    new_name: &str,
) -> bool {
    // Renaming to the current name is a no-op, always valid.
    if current_name == new_name {
        return true;
    }
    !active_names.contains(new_name)
}

/// Checks whether an opening balance magnitude is acceptable.
#[must_use]
pub fn is_opening_balance_valid(opening_balance: Decimal) -> bool {
    opening_balance >= Decimal::ZERO
}

/// Signed contribution an account's opening configuration makes to its
/// running balance.
#[must_use]
pub fn signed_opening_for(balance_status: Side, opening_balance: Decimal) -> Decimal {
    signed_opening(balance_status, opening_balance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;
    use std::collections::HashSet;

    fn name_strategy() -> impl Strategy<Value = String> {
        "[A-Za-z][A-Za-z ]{0,20}"
    }

    fn names_strategy() -> impl Strategy<Value = HashSet<String>> {
        prop::collection::hash_set(name_strategy(), 0..20)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// A name present in the active set is never available.
        #[test]
        fn prop_existing_name_rejected(name in name_strategy()) {
            let mut active = HashSet::new();
            active.insert(name.clone());
            prop_assert!(!is_name_available(&active, &name));
        }

        /// Availability matches set membership exactly.
        #[test]
        fn prop_availability_matches_membership(
            active in names_strategy(),
            name in name_strategy(),
        ) {
            prop_assert_eq!(is_name_available(&active, &name), !active.contains(&name));
        }

        /// Renaming to the current name is always valid.
        #[test]
        fn prop_rename_to_self_valid(
            active in names_strategy(),
            name in name_strategy(),
        ) {
            prop_assert!(is_rename_valid(&active, &name, &name));
        }

        /// Renaming onto another active name is rejected.
        #[test]
        fn prop_rename_onto_existing_rejected(
            current in name_strategy(),
            other in name_strategy(),
        ) {
            prop_assume!(current != other);
            let mut active = HashSet::new();
            active.insert(current.clone());
            active.insert(other.clone());
            prop_assert!(!is_rename_valid(&active, &current, &other));
        }

        /// The opening contribution always carries the status sign.
        #[test]
        fn prop_signed_opening_sign(magnitude in 0i64..1_000_000_000) {
            let opening = Decimal::new(magnitude, 2);
            prop_assert!(signed_opening_for(Side::Credit, opening) >= Decimal::ZERO);
            prop_assert!(signed_opening_for(Side::Debit, opening) <= Decimal::ZERO);
            prop_assert_eq!(
                signed_opening_for(Side::Credit, opening),
                -signed_opening_for(Side::Debit, opening)
            );
        }
    }

    #[test]
    fn test_empty_active_set_allows_any_name() {
        let active: HashSet<String> = HashSet::new();
        assert!(is_name_available(&active, "Habib Bank Main"));
        assert!(is_name_available(&active, ""));
    }

    #[test]
    fn test_names_are_case_sensitive() {
        let mut active = HashSet::new();
        active.insert("Zahedan Traders".to_string());

        assert!(!is_name_available(&active, "Zahedan Traders"));
        assert!(is_name_available(&active, "zahedan traders"));
    }

    #[test]
    fn test_opening_balance_validation() {
        assert!(is_opening_balance_valid(dec!(0)));
        assert!(is_opening_balance_valid(dec!(5000)));
        assert!(!is_opening_balance_valid(dec!(-0.01)));
    }
}
