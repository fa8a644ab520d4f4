use log::debug;
use rust_decimal::Decimal;
use std::collections::BTreeSet;
use std::sync::Arc;

use super::accounts_model::{Account, NewAccount};
use super::accounts_traits::{AccountRepositoryTrait, AccountServiceTrait};
use crate::errors::{Result, ValidationError};

/// Service for managing accounts
pub struct AccountService {
    repository: Arc<dyn AccountRepositoryTrait>,
}

impl AccountService {
    /// Creates a new AccountService instance
    pub fn new(repository: Arc<dyn AccountRepositoryTrait>) -> Self {
        Self { repository }
    }
}

#[async_trait::async_trait]
impl AccountServiceTrait for AccountService {
    async fn create_account(&self, new_account: NewAccount) -> Result<Account> {
        new_account.validate()?;
        let new_account = NewAccount {
            name: new_account.name.trim().to_string(),
            ..new_account
        };
        debug!("Creating account {}", new_account.name);
        self.repository.create(new_account).await
    }

    async fn ensure_accounts(&self, names: Vec<String>) -> Result<usize> {
        let unique: BTreeSet<String> = names
            .into_iter()
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .collect();
        if unique.is_empty() {
            return Ok(0);
        }
        let created = self
            .repository
            .ensure_exist(unique.into_iter().collect())
            .await?;
        if created > 0 {
            debug!("Created {} account(s) referenced by the ledger", created);
        }
        Ok(created)
    }

    async fn update_initial_balance(
        &self,
        name: &str,
        initial_balance: Decimal,
    ) -> Result<Account> {
        if name.trim().is_empty() {
            return Err(ValidationError::MissingField("name".to_string()).into());
        }
        self.repository
            .update_initial_balance(name, initial_balance)
            .await
    }

    fn list_accounts(&self) -> Result<Vec<Account>> {
        self.repository.list()
    }
}
