//! Database model for accounts.

use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::StorageError;
use crate::utils::text_to_decimal;
use worthline_core::accounts::Account;

/// Database model for accounts
#[derive(Queryable, Selectable, Insertable, PartialEq, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::accounts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AccountDB {
    pub name: String,
    pub initial_balance: String,
    #[diesel(skip_insertion)]
    pub created_at: String,
}

impl TryFrom<AccountDB> for Account {
    type Error = StorageError;

    fn try_from(db: AccountDB) -> Result<Self, Self::Error> {
        Ok(Account {
            initial_balance: text_to_decimal(&db.initial_balance)?,
            name: db.name,
        })
    }
}

impl From<Account> for AccountDB {
    fn from(domain: Account) -> Self {
        Self {
            name: domain.name,
            initial_balance: domain.initial_balance.to_string(),
            created_at: String::new(),
        }
    }
}
