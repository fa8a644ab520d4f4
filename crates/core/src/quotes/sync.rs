//! Quote synchronization service.
//!
//! Guarantees that the price cache covers a set of tickers from a required
//! start date through today, downloading only the missing sub-ranges.
//!
//! ```text
//! QuoteSyncService
//!       │
//!       ├─► QuoteStore (min/max cached date, upserts)
//!       └─► MarketDataClient (fetch missing ranges)
//! ```
//!
//! Every range is fetched independently and concurrently. A failing range is
//! logged and reported in the [`SyncResult`]; it never aborts the others and
//! never surfaces as an error to the caller.

use chrono::{Duration, NaiveDate};
use futures::stream::{self, StreamExt};
use log::{debug, info, warn};
use serde::Serialize;
use std::sync::Arc;

use super::client::MarketDataClient;
use super::store::QuoteStore;
use crate::errors::Result;

/// A contiguous date range to download for one ticker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchRange {
    pub ticker: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Error details for a range that could not be synced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeFailure {
    pub ticker: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub message: String,
}

/// Aggregate result of a sync operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResult {
    /// Ranges downloaded and stored (including ranges with no trading day).
    pub ranges_fetched: usize,
    /// Ranges that failed.
    pub ranges_failed: usize,
    /// Total prices written to the cache.
    pub prices_upserted: usize,
    /// Detailed errors, sorted by ticker then start date.
    pub failures: Vec<RangeFailure>,
}

impl SyncResult {
    /// Check if the sync was fully successful (no failures).
    pub fn is_success(&self) -> bool {
        self.ranges_failed == 0
    }

    pub fn summary(&self) -> String {
        if self.is_success() {
            format!(
                "Synced {} prices over {} ranges",
                self.prices_upserted, self.ranges_fetched
            )
        } else {
            format!(
                "Synced {} prices with {} failed ranges",
                self.prices_upserted, self.ranges_failed
            )
        }
    }

    fn add_failure(&mut self, range: &FetchRange, message: String) {
        self.ranges_failed += 1;
        self.failures.push(RangeFailure {
            ticker: range.ticker.clone(),
            start: range.start,
            end: range.end,
            message,
        });
    }
}

/// Missing sub-ranges of `[start, today]` given the cached bounds of a ticker.
pub fn missing_ranges(
    ticker: &str,
    cached: Option<(NaiveDate, NaiveDate)>,
    start: NaiveDate,
    today: NaiveDate,
) -> Vec<FetchRange> {
    if start > today {
        return Vec::new();
    }
    let range = |start, end| FetchRange {
        ticker: ticker.to_string(),
        start,
        end,
    };
    match cached {
        None => vec![range(start, today)],
        Some((min, max)) => {
            let mut ranges = Vec::new();
            if min > start {
                ranges.push(range(start, min - Duration::days(1)));
            }
            if max < today {
                ranges.push(range(max + Duration::days(1), today));
            }
            ranges
        }
    }
}

pub struct QuoteSyncService {
    client: MarketDataClient,
    store: Arc<dyn QuoteStore>,
}

impl QuoteSyncService {
    pub fn new(client: MarketDataClient, store: Arc<dyn QuoteStore>) -> Self {
        Self { client, store }
    }

    /// Ensures every ticker has cached prices from `start` through `today`.
    pub async fn ensure_coverage(
        &self,
        tickers: &[String],
        start: NaiveDate,
        today: NaiveDate,
    ) -> SyncResult {
        let mut result = SyncResult::default();
        let mut ranges = Vec::new();

        for ticker in tickers {
            match self.store.min_max_date(ticker) {
                Ok(cached) => ranges.extend(missing_ranges(ticker, cached, start, today)),
                Err(e) => {
                    warn!("Could not read cached bounds for {}: {}", ticker, e);
                    result.add_failure(
                        &FetchRange {
                            ticker: ticker.clone(),
                            start,
                            end: today,
                        },
                        e.to_string(),
                    );
                }
            }
        }

        if ranges.is_empty() {
            debug!("Price cache already covers {} ticker(s)", tickers.len());
            return result;
        }

        let concurrency = self.client.rate_limit().max_concurrency.max(1);
        debug!(
            "Fetching {} missing range(s) with concurrency {}",
            ranges.len(),
            concurrency
        );

        let outcomes: Vec<(FetchRange, Result<usize>)> = stream::iter(ranges)
            .map(|range| async move {
                let outcome = self.sync_range(&range).await;
                (range, outcome)
            })
            .buffer_unordered(concurrency)
            .collect()
            .await;

        for (range, outcome) in outcomes {
            match outcome {
                Ok(count) => {
                    result.ranges_fetched += 1;
                    result.prices_upserted += count;
                }
                Err(e) => {
                    warn!(
                        "Failed to sync {} from {} to {}: {}",
                        range.ticker, range.start, range.end, e
                    );
                    result.add_failure(&range, e.to_string());
                }
            }
        }
        result
            .failures
            .sort_by(|a, b| (&a.ticker, a.start).cmp(&(&b.ticker, b.start)));

        info!("{}", result.summary());
        result
    }

    async fn sync_range(&self, range: &FetchRange) -> Result<usize> {
        let prices = self
            .client
            .fetch_daily_prices(&range.ticker, range.start, range.end)
            .await?;
        if prices.is_empty() {
            return Ok(0);
        }
        self.store
            .upsert_prices(&range.ticker, self.client.provider_id(), &prices)
            .await
    }
}
