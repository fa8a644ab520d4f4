//! Price cache storage trait.
//!
//! Abstracts the persisted per-(ticker, date) price store so the sync logic
//! can run against SQLite in production and an in-memory map in tests.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::model::PricePoint;
use crate::errors::Result;

/// Storage interface for cached daily prices.
///
/// At most one row exists per (ticker, date). Writes are idempotent upserts
/// where the last write for a key wins.
#[async_trait]
pub trait QuoteStore: Send + Sync {
    /// Upserts daily prices for one ticker.
    ///
    /// Returns the number of rows written.
    async fn upsert_prices(
        &self,
        ticker: &str,
        source: &str,
        prices: &[(NaiveDate, Decimal)],
    ) -> Result<usize>;

    /// Earliest and latest cached date for a ticker, `None` if nothing is cached.
    fn min_max_date(&self, ticker: &str) -> Result<Option<(NaiveDate, NaiveDate)>>;

    /// All cached rows for `tickers` with `start <= date <= end`, sorted by
    /// ticker then date.
    fn read_range(
        &self,
        tickers: &[String],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PricePoint>>;

    /// The latest cached row for `ticker` dated on or before `date`.
    fn latest_on_or_before(&self, ticker: &str, date: NaiveDate) -> Result<Option<PricePoint>>;
}
