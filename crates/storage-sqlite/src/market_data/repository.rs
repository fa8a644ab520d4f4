use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use diesel::dsl::{max, min};
use diesel::prelude::*;
use rust_decimal::Decimal;
use std::sync::Arc;

use super::model::QuoteDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::quotes::dsl as quotes_dsl;
use crate::utils::{chunk_for_sqlite, date_to_text, text_to_date};
use worthline_core::errors::{Error, Result};
use worthline_core::quotes::{PricePoint, QuoteStore};

/// SQLite-backed price cache.
pub struct QuoteRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl QuoteRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

fn to_point(row: QuoteDB) -> Result<PricePoint> {
    PricePoint::try_from(row).map_err(Error::from)
}

#[async_trait]
impl QuoteStore for QuoteRepository {
    async fn upsert_prices(
        &self,
        ticker: &str,
        source: &str,
        prices: &[(NaiveDate, Decimal)],
    ) -> Result<usize> {
        if prices.is_empty() {
            return Ok(0);
        }

        let created_at = Utc::now().to_rfc3339();
        let db_rows: Vec<QuoteDB> = prices
            .iter()
            .map(|(date, price)| QuoteDB {
                ticker: ticker.to_string(),
                date: date_to_text(*date),
                price: price.to_string(),
                source: source.to_string(),
                created_at: created_at.clone(),
            })
            .collect();

        self.writer
            .exec(move |conn| {
                let mut total_upserted = 0;
                for chunk in chunk_for_sqlite(&db_rows) {
                    total_upserted += diesel::replace_into(quotes_dsl::quotes)
                        .values(chunk)
                        .execute(conn)
                        .into_core()?;
                }
                Ok(total_upserted)
            })
            .await
    }

    fn min_max_date(&self, ticker: &str) -> Result<Option<(NaiveDate, NaiveDate)>> {
        let mut conn = get_connection(&self.pool)?;

        let (first, last) = quotes_dsl::quotes
            .filter(quotes_dsl::ticker.eq(ticker))
            .select((min(quotes_dsl::date), max(quotes_dsl::date)))
            .first::<(Option<String>, Option<String>)>(&mut conn)
            .into_core()?;

        match (first, last) {
            (Some(first), Some(last)) => Ok(Some((
                text_to_date(&first).map_err(Error::from)?,
                text_to_date(&last).map_err(Error::from)?,
            ))),
            _ => Ok(None),
        }
    }

    fn read_range(
        &self,
        tickers: &[String],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PricePoint>> {
        if tickers.is_empty() || start > end {
            return Ok(Vec::new());
        }
        let mut conn = get_connection(&self.pool)?;
        let start_str = date_to_text(start);
        let end_str = date_to_text(end);

        let mut points = Vec::new();
        for chunk in chunk_for_sqlite(tickers) {
            let rows = quotes_dsl::quotes
                .filter(quotes_dsl::ticker.eq_any(chunk))
                .filter(quotes_dsl::date.ge(start_str.as_str()))
                .filter(quotes_dsl::date.le(end_str.as_str()))
                .select(QuoteDB::as_select())
                .order((quotes_dsl::ticker.asc(), quotes_dsl::date.asc()))
                .load::<QuoteDB>(&mut conn)
                .into_core()?;
            for row in rows {
                points.push(to_point(row)?);
            }
        }

        points.sort_by(|a, b| a.ticker.cmp(&b.ticker).then(a.date.cmp(&b.date)));
        Ok(points)
    }

    fn latest_on_or_before(&self, ticker: &str, date: NaiveDate) -> Result<Option<PricePoint>> {
        let mut conn = get_connection(&self.pool)?;

        let row = quotes_dsl::quotes
            .filter(quotes_dsl::ticker.eq(ticker))
            .filter(quotes_dsl::date.le(date_to_text(date)))
            .select(QuoteDB::as_select())
            .order(quotes_dsl::date.desc())
            .first::<QuoteDB>(&mut conn)
            .optional()
            .into_core()?;

        row.map(to_point).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_db;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_upsert_is_last_write_wins() {
        let (pool, writer, _dir) = test_db();
        let repo = QuoteRepository::new(pool, writer);

        repo.upsert_prices("AAPL", "YAHOO", &[(date(2023, 1, 3), dec!(125.07))])
            .await
            .unwrap();
        repo.upsert_prices(
            "AAPL",
            "YAHOO",
            &[(date(2023, 1, 3), dec!(126)), (date(2023, 1, 4), dec!(126.36))],
        )
        .await
        .unwrap();

        let points = repo
            .read_range(&["AAPL".to_string()], date(2023, 1, 1), date(2023, 1, 31))
            .unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].price, dec!(126));
        assert_eq!(points[1].date, date(2023, 1, 4));
    }

    #[tokio::test]
    async fn test_min_max_date() {
        let (pool, writer, _dir) = test_db();
        let repo = QuoteRepository::new(pool, writer);
        assert_eq!(repo.min_max_date("MSFT").unwrap(), None);

        repo.upsert_prices(
            "MSFT",
            "YAHOO",
            &[
                (date(2023, 2, 1), dec!(247.81)),
                (date(2022, 12, 30), dec!(239.82)),
                (date(2023, 1, 3), dec!(239.58)),
            ],
        )
        .await
        .unwrap();

        assert_eq!(
            repo.min_max_date("MSFT").unwrap(),
            Some((date(2022, 12, 30), date(2023, 2, 1)))
        );
    }

    #[tokio::test]
    async fn test_read_range_sorted_by_ticker_then_date() {
        let (pool, writer, _dir) = test_db();
        let repo = QuoteRepository::new(pool, writer);
        repo.upsert_prices("ZZZ", "YAHOO", &[(date(2023, 1, 2), dec!(1))])
            .await
            .unwrap();
        repo.upsert_prices(
            "AAA",
            "YAHOO",
            &[(date(2023, 1, 3), dec!(3)), (date(2023, 1, 2), dec!(2))],
        )
        .await
        .unwrap();

        let points = repo
            .read_range(
                &["ZZZ".to_string(), "AAA".to_string()],
                date(2023, 1, 2),
                date(2023, 1, 3),
            )
            .unwrap();
        let keys: Vec<_> = points.iter().map(|p| (p.ticker.as_str(), p.date)).collect();
        assert_eq!(
            keys,
            vec![
                ("AAA", date(2023, 1, 2)),
                ("AAA", date(2023, 1, 3)),
                ("ZZZ", date(2023, 1, 2)),
            ]
        );
    }

    #[tokio::test]
    async fn test_latest_on_or_before() {
        let (pool, writer, _dir) = test_db();
        let repo = QuoteRepository::new(pool, writer);
        repo.upsert_prices(
            "AAPL",
            "YAHOO",
            &[(date(2023, 1, 3), dec!(125)), (date(2023, 1, 6), dec!(129))],
        )
        .await
        .unwrap();

        let on_weekend = repo.latest_on_or_before("AAPL", date(2023, 1, 8)).unwrap();
        assert_eq!(on_weekend.map(|p| p.price), Some(dec!(129)));

        let between = repo.latest_on_or_before("AAPL", date(2023, 1, 5)).unwrap();
        assert_eq!(between.map(|p| p.price), Some(dec!(125)));

        assert!(repo
            .latest_on_or_before("AAPL", date(2023, 1, 2))
            .unwrap()
            .is_none());
    }
}
