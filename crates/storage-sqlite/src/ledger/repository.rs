use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::prelude::*;
use log::debug;
use std::collections::BTreeSet;
use std::sync::Arc;

use super::model::{InvestmentDB, TransactionDB, TransferDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::{investments, transactions, transfers};
use crate::utils::date_to_text;
use worthline_core::errors::{DatabaseError, Error, Result};
use worthline_core::ledger::{InvestmentOrder, LedgerRepositoryTrait, Transaction, Transfer};

/// Repository over the `transactions`, `transfers` and `investments` tables.
pub struct LedgerRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl LedgerRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

fn convert<D, T>(rows: Vec<D>) -> Result<Vec<T>>
where
    T: TryFrom<D, Error = crate::errors::StorageError>,
{
    rows.into_iter()
        .map(|row| T::try_from(row).map_err(Error::from))
        .collect()
}

#[async_trait]
impl LedgerRepositoryTrait for LedgerRepository {
    fn list_transactions(&self, until: Option<NaiveDate>) -> Result<Vec<Transaction>> {
        let mut conn = get_connection(&self.pool)?;

        let mut query = transactions::table
            .filter(transactions::is_excluded.eq(false))
            .into_boxed();
        if let Some(until) = until {
            query = query.filter(transactions::date.le(date_to_text(until)));
        }

        let rows = query
            .select(TransactionDB::as_select())
            .order((transactions::date.asc(), transactions::id.asc()))
            .load::<TransactionDB>(&mut conn)
            .into_core()?;
        convert(rows)
    }

    fn list_transfers(&self, until: Option<NaiveDate>) -> Result<Vec<Transfer>> {
        let mut conn = get_connection(&self.pool)?;

        let mut query = transfers::table.into_boxed();
        if let Some(until) = until {
            query = query.filter(transfers::date.le(date_to_text(until)));
        }

        let rows = query
            .select(TransferDB::as_select())
            .order((transfers::date.asc(), transfers::id.asc()))
            .load::<TransferDB>(&mut conn)
            .into_core()?;
        convert(rows)
    }

    fn list_investment_orders(&self, until: Option<NaiveDate>) -> Result<Vec<InvestmentOrder>> {
        let mut conn = get_connection(&self.pool)?;

        let mut query = investments::table.into_boxed();
        if let Some(until) = until {
            query = query.filter(investments::date.le(date_to_text(until)));
        }

        let rows = query
            .select(InvestmentDB::as_select())
            .order((investments::date.asc(), investments::id.asc()))
            .load::<InvestmentDB>(&mut conn)
            .into_core()?;
        convert(rows)
    }

    fn list_all_transactions(&self, year: Option<i32>) -> Result<Vec<Transaction>> {
        let mut conn = get_connection(&self.pool)?;

        let mut query = transactions::table.into_boxed();
        if let Some(year) = year {
            query = query
                .filter(transactions::date.ge(format!("{:04}-01-01", year)))
                .filter(transactions::date.le(format!("{:04}-12-31", year)));
        }

        let rows = query
            .select(TransactionDB::as_select())
            .order((transactions::date.desc(), transactions::id.asc()))
            .load::<TransactionDB>(&mut conn)
            .into_core()?;
        convert(rows)
    }

    fn distinct_account_names(&self) -> Result<Vec<String>> {
        let mut conn = get_connection(&self.pool)?;
        let mut names = BTreeSet::new();

        names.extend(
            transactions::table
                .select(transactions::account)
                .distinct()
                .load::<String>(&mut conn)
                .into_core()?,
        );
        names.extend(
            transfers::table
                .select(transfers::source_account)
                .distinct()
                .load::<String>(&mut conn)
                .into_core()?,
        );
        names.extend(
            transfers::table
                .select(transfers::target_account)
                .distinct()
                .load::<String>(&mut conn)
                .into_core()?,
        );
        names.extend(
            investments::table
                .select(investments::account)
                .distinct()
                .load::<String>(&mut conn)
                .into_core()?,
        );

        Ok(names.into_iter().collect())
    }

    async fn insert_transactions(&self, new_transactions: Vec<Transaction>) -> Result<usize> {
        if new_transactions.is_empty() {
            return Ok(0);
        }
        let rows: Vec<TransactionDB> = new_transactions.into_iter().map(Into::into).collect();

        self.writer
            .exec(move |conn| {
                let mut inserted = 0;
                for row in &rows {
                    inserted += diesel::insert_or_ignore_into(transactions::table)
                        .values(row)
                        .execute(conn)
                        .into_core()?;
                }
                debug!("Inserted {} of {} transactions", inserted, rows.len());
                Ok(inserted)
            })
            .await
    }

    async fn insert_transfers(&self, new_transfers: Vec<Transfer>) -> Result<usize> {
        if new_transfers.is_empty() {
            return Ok(0);
        }
        let rows: Vec<TransferDB> = new_transfers.into_iter().map(Into::into).collect();

        self.writer
            .exec(move |conn| {
                let mut inserted = 0;
                for row in &rows {
                    inserted += diesel::insert_or_ignore_into(transfers::table)
                        .values(row)
                        .execute(conn)
                        .into_core()?;
                }
                debug!("Inserted {} of {} transfers", inserted, rows.len());
                Ok(inserted)
            })
            .await
    }

    async fn insert_investment_order(&self, order: InvestmentOrder) -> Result<InvestmentOrder> {
        let row = InvestmentDB::from(order.clone());

        self.writer
            .exec(move |conn| {
                diesel::insert_into(investments::table)
                    .values(&row)
                    .execute(conn)
                    .into_core()?;
                Ok(())
            })
            .await?;

        Ok(order)
    }

    async fn set_transaction_excluded(&self, id: &str, is_excluded: bool) -> Result<Transaction> {
        let id = id.to_string();

        self.writer
            .exec(move |conn| {
                let updated = diesel::update(transactions::table.find(&id))
                    .set(transactions::is_excluded.eq(is_excluded))
                    .execute(conn)
                    .into_core()?;

                if updated == 0 {
                    return Err(Error::Database(DatabaseError::NotFound(format!(
                        "Transaction '{}' not found",
                        id
                    ))));
                }

                let row = transactions::table
                    .find(&id)
                    .select(TransactionDB::as_select())
                    .first::<TransactionDB>(conn)
                    .into_core()?;
                Transaction::try_from(row).map_err(Error::from)
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_db;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use worthline_core::ledger::{OrderAction, TransactionKind};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn transaction(id: &str, day: NaiveDate, account: &str, amount: Decimal) -> Transaction {
        Transaction {
            id: id.to_string(),
            date: day,
            category: "Groceries".to_string(),
            account: account.to_string(),
            amount,
            currency: "EUR".to_string(),
            comment: String::new(),
            kind: TransactionKind::Expense,
            is_excluded: false,
        }
    }

    #[tokio::test]
    async fn test_insert_transactions_ignores_existing_ids() {
        let (pool, writer, _dir) = test_db();
        let repo = LedgerRepository::new(pool, writer);

        let first = vec![
            transaction("t1", date(2023, 1, 2), "Checking", dec!(10.10)),
            transaction("t2", date(2023, 1, 1), "Checking", dec!(5)),
        ];
        assert_eq!(repo.insert_transactions(first.clone()).await.unwrap(), 2);
        assert_eq!(repo.insert_transactions(first).await.unwrap(), 0);

        let listed = repo.list_transactions(None).unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, "t2");
        assert_eq!(listed[1].amount, dec!(10.10));
    }

    #[tokio::test]
    async fn test_list_transactions_skips_excluded_and_respects_until() {
        let (pool, writer, _dir) = test_db();
        let repo = LedgerRepository::new(pool, writer);
        repo.insert_transactions(vec![
            transaction("t1", date(2023, 1, 1), "Checking", dec!(1)),
            transaction("t2", date(2023, 1, 5), "Checking", dec!(2)),
            transaction("t3", date(2023, 2, 1), "Checking", dec!(3)),
        ])
        .await
        .unwrap();

        let excluded = repo.set_transaction_excluded("t1", true).await.unwrap();
        assert!(excluded.is_excluded);

        let listed = repo.list_transactions(Some(date(2023, 1, 31))).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, "t2");

        let all = repo.list_all_transactions(Some(2023)).unwrap();
        assert_eq!(
            all.iter().map(|t| t.id.as_str()).collect::<Vec<_>>(),
            vec!["t3", "t2", "t1"]
        );
        assert!(repo.list_all_transactions(Some(2022)).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_set_transaction_excluded_unknown_id_is_not_found() {
        let (pool, writer, _dir) = test_db();
        let repo = LedgerRepository::new(pool, writer);

        let err = repo.set_transaction_excluded("nope", true).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_transfers_and_orders_round_trip_with_exact_decimals() {
        let (pool, writer, _dir) = test_db();
        let repo = LedgerRepository::new(pool, writer);

        repo.insert_transfers(vec![Transfer {
            id: "x1".to_string(),
            date: date(2023, 3, 1),
            source_account: "Checking".to_string(),
            target_account: "Broker".to_string(),
            amount: dec!(500.25),
            comment: "monthly".to_string(),
        }])
        .await
        .unwrap();

        let order = InvestmentOrder {
            id: "o1".to_string(),
            date: date(2023, 3, 2),
            ticker: "VWCE.DE".to_string(),
            name: "Vanguard FTSE All-World".to_string(),
            action: OrderAction::Buy,
            quantity: dec!(3.5),
            unit_price: dec!(101.123456),
            fees: dec!(1.5),
            account: "Broker".to_string(),
            comment: String::new(),
        };
        repo.insert_investment_order(order.clone()).await.unwrap();

        let transfers = repo.list_transfers(Some(date(2023, 3, 1))).unwrap();
        assert_eq!(transfers.len(), 1);
        assert_eq!(transfers[0].amount, dec!(500.25));
        assert!(repo.list_transfers(Some(date(2023, 2, 28))).unwrap().is_empty());

        let orders = repo.list_investment_orders(None).unwrap();
        assert_eq!(orders, vec![order]);
    }

    #[tokio::test]
    async fn test_distinct_account_names_spans_all_tables() {
        let (pool, writer, _dir) = test_db();
        let repo = LedgerRepository::new(pool, writer);
        repo.insert_transactions(vec![transaction(
            "t1",
            date(2023, 1, 1),
            "Checking",
            dec!(1),
        )])
        .await
        .unwrap();
        repo.insert_transfers(vec![Transfer {
            id: "x1".to_string(),
            date: date(2023, 1, 2),
            source_account: "Checking".to_string(),
            target_account: "Savings".to_string(),
            amount: dec!(1),
            comment: String::new(),
        }])
        .await
        .unwrap();

        assert_eq!(
            repo.distinct_account_names().unwrap(),
            vec!["Checking".to_string(), "Savings".to_string()]
        );
    }
}
