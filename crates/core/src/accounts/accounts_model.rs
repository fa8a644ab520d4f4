//! Account domain models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, ValidationError};
use crate::utils::decimal_input_format;

/// A cash account, identified by its unique name.
///
/// The initial balance is the account's cash as of the earliest ledger
/// event; every later change comes from replaying the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub name: String,
    pub initial_balance: Decimal,
}

impl Account {
    /// An account created implicitly by a ledger reference.
    pub fn with_zero_balance(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            initial_balance: Decimal::ZERO,
        }
    }
}

/// Input model for creating a new account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAccount {
    pub name: String,
    #[serde(
        default,
        deserialize_with = "decimal_input_format::deserialize_decimal_or_zero"
    )]
    pub initial_balance: Decimal,
}

impl NewAccount {
    /// Validates the new account data.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingField("name".to_string()).into());
        }
        Ok(())
    }
}

impl From<NewAccount> for Account {
    fn from(new_account: NewAccount) -> Self {
        Self {
            name: new_account.name.trim().to_string(),
            initial_balance: new_account.initial_balance,
        }
    }
}
