//! Market Data Client - Facade for the market-data crate.
//!
//! Converts calendar-date ranges into provider requests and provider bars
//! into one price per trading day.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use log::{debug, warn};
use rust_decimal::Decimal;

use super::constants::MAX_FETCH_ATTEMPTS;
use crate::errors::Result;

use worthline_market_data::{MarketDataError, MarketDataProvider, RateLimit, RetryClass};

/// Client wrapping a single external price source.
#[derive(Clone)]
pub struct MarketDataClient {
    provider: Arc<dyn MarketDataProvider>,
}

impl MarketDataClient {
    pub fn new(provider: Arc<dyn MarketDataProvider>) -> Self {
        Self { provider }
    }

    pub fn provider_id(&self) -> &'static str {
        self.provider.id()
    }

    pub fn rate_limit(&self) -> RateLimit {
        self.provider.rate_limit()
    }

    /// Fetches daily closes for `ticker` over `[start, end]`.
    ///
    /// Returns one price per trading day sorted by date; when the source
    /// reports several bars for a day the last one wins. A range with no
    /// trading days yields an empty list rather than an error. Transient
    /// failures are retried once after the provider's delay.
    pub async fn fetch_daily_prices(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<(NaiveDate, Decimal)>> {
        // Bars from exchanges east of UTC open on the previous UTC day.
        let from = day_start_utc(start.pred_opt().unwrap_or(start));
        // Providers treat the end bound as exclusive.
        let to = day_start_utc(end.succ_opt().unwrap_or(end));

        let mut attempt = 1;
        let quotes = loop {
            match self.provider.get_historical_quotes(ticker, from, to).await {
                Ok(quotes) => break quotes,
                Err(MarketDataError::NoDataForRange) => {
                    debug!("No trading days for {} between {} and {}", ticker, start, end);
                    return Ok(Vec::new());
                }
                Err(e)
                    if e.retry_class() == RetryClass::WithBackoff
                        && attempt < MAX_FETCH_ATTEMPTS =>
                {
                    warn!(
                        "Transient error fetching {} ({}), retrying in {:?}",
                        ticker,
                        e,
                        self.rate_limit().min_delay
                    );
                    tokio::time::sleep(self.rate_limit().min_delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e.into()),
            }
        };

        let mut by_date: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
        for quote in quotes {
            let date = quote.date();
            if date < start || date > end {
                continue;
            }
            if let Some(price) = quote.daily_price() {
                by_date.insert(date, price);
            }
        }
        Ok(by_date.into_iter().collect())
    }
}

fn day_start_utc(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}
