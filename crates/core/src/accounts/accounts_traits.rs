//! Account repository and service traits.
//!
//! These traits define the contract for account operations without any
//! database-specific types, allowing for different storage implementations.

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::accounts_model::{Account, NewAccount};
use crate::errors::Result;

/// Trait defining the contract for Account repository operations.
#[async_trait]
pub trait AccountRepositoryTrait: Send + Sync {
    /// Creates a new account. Fails with a unique violation if the name is taken.
    async fn create(&self, new_account: NewAccount) -> Result<Account>;

    /// Inserts every name not already present with a zero initial balance.
    ///
    /// Returns the number of accounts created.
    async fn ensure_exist(&self, names: Vec<String>) -> Result<usize>;

    /// Sets the initial balance of an existing account.
    async fn update_initial_balance(&self, name: &str, initial_balance: Decimal)
        -> Result<Account>;

    /// Lists all accounts ordered by name.
    fn list(&self) -> Result<Vec<Account>>;
}

/// Trait defining the contract for Account service operations.
#[async_trait]
pub trait AccountServiceTrait: Send + Sync {
    /// Creates a new account with business validation.
    async fn create_account(&self, new_account: NewAccount) -> Result<Account>;

    /// Ensures every named account exists, creating missing ones at zero.
    async fn ensure_accounts(&self, names: Vec<String>) -> Result<usize>;

    /// Updates the initial balance of an account.
    async fn update_initial_balance(&self, name: &str, initial_balance: Decimal)
        -> Result<Account>;

    /// Lists all accounts.
    fn list_accounts(&self) -> Result<Vec<Account>>;
}
