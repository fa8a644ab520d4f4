//! Unified price cache service consumed by the wealth engine and the
//! snapshot inspector.

use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use log::{debug, warn};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;

use super::client::MarketDataClient;
use super::model::PriceMatrix;
use super::store::QuoteStore;
use super::sync::{QuoteSyncService, SyncResult};
use crate::errors::Result;
use crate::utils::time_utils::get_days_between;

#[async_trait]
pub trait QuoteServiceTrait: Send + Sync {
    /// Downloads whatever is missing so `tickers` are covered from `start`
    /// through `today`. Failures are reported, never returned as errors.
    async fn ensure_coverage(
        &self,
        tickers: &[String],
        start: NaiveDate,
        today: NaiveDate,
    ) -> SyncResult;

    /// Reads the cache into a filled matrix over every date of `[start, end]`.
    fn read_coverage(
        &self,
        tickers: &[String],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceMatrix>;

    /// Latest cached price on or before `date`. Never triggers a download.
    fn latest_price_on_or_before(&self, ticker: &str, date: NaiveDate) -> Result<Option<Decimal>>;
}

pub struct QuoteService {
    store: Arc<dyn QuoteStore>,
    sync_service: QuoteSyncService,
}

impl QuoteService {
    pub fn new(store: Arc<dyn QuoteStore>, client: MarketDataClient) -> Self {
        Self {
            sync_service: QuoteSyncService::new(client, store.clone()),
            store,
        }
    }
}

#[async_trait]
impl QuoteServiceTrait for QuoteService {
    async fn ensure_coverage(
        &self,
        tickers: &[String],
        start: NaiveDate,
        today: NaiveDate,
    ) -> SyncResult {
        self.sync_service.ensure_coverage(tickers, start, today).await
    }

    fn read_coverage(
        &self,
        tickers: &[String],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceMatrix> {
        let dates = get_days_between(start, end);
        if tickers.is_empty() || dates.is_empty() {
            return Ok(PriceMatrix::empty(dates));
        }

        let rows = self.store.read_range(tickers, start, end)?;
        let mut seeds = HashMap::new();
        let day_before = start - Duration::days(1);
        for ticker in tickers {
            match self.store.latest_on_or_before(ticker, day_before) {
                Ok(Some(point)) => {
                    seeds.insert(ticker.clone(), point.price);
                }
                Ok(None) => {}
                Err(e) => warn!("Skipping price seed for {} before {}: {}", ticker, start, e),
            }
        }
        debug!(
            "Read {} cached price(s) for {} ticker(s) between {} and {}",
            rows.len(),
            tickers.len(),
            start,
            end
        );
        Ok(PriceMatrix::build(dates, tickers, &rows, &seeds))
    }

    fn latest_price_on_or_before(&self, ticker: &str, date: NaiveDate) -> Result<Option<Decimal>> {
        Ok(self
            .store
            .latest_on_or_before(ticker, date)?
            .map(|point| point.price))
    }
}
