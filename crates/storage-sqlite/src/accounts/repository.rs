use async_trait::async_trait;
use diesel::prelude::*;
use log::debug;
use rust_decimal::Decimal;
use std::sync::Arc;

use super::model::AccountDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::accounts;
use crate::schema::accounts::dsl::*;
use worthline_core::accounts::{Account, AccountRepositoryTrait, NewAccount};
use worthline_core::errors::{DatabaseError, Error, Result};

/// Repository for managing account data in the database
pub struct AccountRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl AccountRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

fn to_domain(row: AccountDB) -> Result<Account> {
    Account::try_from(row).map_err(Error::from)
}

#[async_trait]
impl AccountRepositoryTrait for AccountRepository {
    async fn create(&self, new_account: NewAccount) -> Result<Account> {
        new_account.validate()?;
        let account_db = AccountDB::from(Account::from(new_account));

        self.writer
            .exec(move |conn| {
                diesel::insert_into(accounts::table)
                    .values(&account_db)
                    .execute(conn)
                    .into_core()?;

                let created = accounts
                    .find(&account_db.name)
                    .select(AccountDB::as_select())
                    .first::<AccountDB>(conn)
                    .into_core()?;
                to_domain(created)
            })
            .await
    }

    async fn ensure_exist(&self, names: Vec<String>) -> Result<usize> {
        if names.is_empty() {
            return Ok(0);
        }

        let rows: Vec<AccountDB> = names
            .into_iter()
            .map(|n| AccountDB::from(Account::with_zero_balance(n)))
            .collect();

        self.writer
            .exec(move |conn| {
                let mut created = 0;
                for row in &rows {
                    created += diesel::insert_or_ignore_into(accounts::table)
                        .values(row)
                        .execute(conn)
                        .into_core()?;
                }
                if created > 0 {
                    debug!("Created {} missing accounts", created);
                }
                Ok(created)
            })
            .await
    }

    async fn update_initial_balance(
        &self,
        account_name: &str,
        balance: Decimal,
    ) -> Result<Account> {
        let account_name = account_name.to_string();

        self.writer
            .exec(move |conn| {
                let updated = diesel::update(accounts.find(&account_name))
                    .set(initial_balance.eq(balance.to_string()))
                    .execute(conn)
                    .into_core()?;

                if updated == 0 {
                    return Err(Error::Database(DatabaseError::NotFound(format!(
                        "Account '{}' not found",
                        account_name
                    ))));
                }

                let row = accounts
                    .find(&account_name)
                    .select(AccountDB::as_select())
                    .first::<AccountDB>(conn)
                    .into_core()?;
                to_domain(row)
            })
            .await
    }

    fn list(&self) -> Result<Vec<Account>> {
        let mut conn = get_connection(&self.pool)?;

        let rows = accounts
            .select(AccountDB::as_select())
            .order(name.asc())
            .load::<AccountDB>(&mut conn)
            .into_core()?;

        rows.into_iter().map(to_domain).collect()
    }
}
