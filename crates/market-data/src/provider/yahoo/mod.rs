//! Yahoo Finance market data provider.
//!
//! Fetches daily bars for equities, ETFs and crypto pairs (e.g. `AAPL`,
//! `CW8.PA`, `BTC-EUR`). Prices are returned in the instrument's listing
//! currency; no conversion is applied.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use time::OffsetDateTime;
use tracing::{debug, warn};
use yahoo_finance_api as yahoo;

use crate::errors::MarketDataError;
use crate::models::Quote;
use crate::provider::{MarketDataProvider, RateLimit};

const PROVIDER_ID: &str = "YAHOO";

/// Yahoo Finance market data provider.
pub struct YahooProvider {
    connector: yahoo::YahooConnector,
}

impl YahooProvider {
    /// Create a new Yahoo Finance provider.
    pub fn new() -> Result<Self, MarketDataError> {
        let connector =
            yahoo::YahooConnector::new().map_err(|e| MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("Failed to initialize Yahoo connector: {}", e),
            })?;
        Ok(Self { connector })
    }

    /// Convert chrono DateTime<Utc> to time::OffsetDateTime for the Yahoo API.
    fn chrono_to_offset_datetime(dt: DateTime<Utc>) -> OffsetDateTime {
        OffsetDateTime::from_unix_timestamp(dt.timestamp())
            .unwrap_or_else(|_| OffsetDateTime::now_utc())
    }

    /// Convert a Yahoo quote to our Quote model. `gmtoffset` is the
    /// exchange's offset from UTC as reported in the chart metadata.
    fn yahoo_quote_to_quote(
        yahoo_quote: &yahoo::Quote,
        gmtoffset: i32,
    ) -> Result<Quote, MarketDataError> {
        let timestamp: DateTime<Utc> = Utc
            .timestamp_opt(yahoo_quote.timestamp as i64, 0)
            .single()
            .ok_or_else(|| MarketDataError::ValidationFailed {
                message: format!("Invalid timestamp: {}", yahoo_quote.timestamp),
            })?;

        Ok(Quote::new(
            timestamp,
            price_from_f64(yahoo_quote.close),
            price_from_f64(yahoo_quote.adjclose),
            PROVIDER_ID,
        )
        .with_utc_offset(gmtoffset))
    }

    /// Map a connector error onto the crate's error kinds.
    fn map_error(symbol: &str, error: yahoo::YahooError) -> MarketDataError {
        if matches!(
            error,
            yahoo::YahooError::NoQuotes | yahoo::YahooError::NoResult
        ) {
            return MarketDataError::SymbolNotFound(symbol.to_string());
        }

        let message = error.to_string();
        let lowered = message.to_lowercase();
        if lowered.contains("429") || lowered.contains("too many requests") {
            MarketDataError::RateLimited {
                provider: PROVIDER_ID.to_string(),
            }
        } else if lowered.contains("timed out") || lowered.contains("timeout") {
            MarketDataError::Timeout {
                provider: PROVIDER_ID.to_string(),
            }
        } else {
            MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message,
            }
        }
    }
}

/// Yahoo reports missing values as NaN or zero.
fn price_from_f64(value: f64) -> Option<Decimal> {
    if !value.is_finite() || value <= 0.0 {
        return None;
    }
    Decimal::from_f64_retain(value)
}

#[async_trait]
impl MarketDataProvider for YahooProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn rate_limit(&self) -> RateLimit {
        RateLimit {
            max_concurrency: 4,
            min_delay: Duration::from_millis(500),
        }
    }

    async fn get_historical_quotes(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Quote>, MarketDataError> {
        debug!(
            "Fetching historical quotes for {} from {} to {} from Yahoo",
            symbol,
            start.format("%Y-%m-%d"),
            end.format("%Y-%m-%d")
        );

        let start_time = Self::chrono_to_offset_datetime(start);
        let end_time = Self::chrono_to_offset_datetime(end);

        let response = self
            .connector
            .get_quote_history(symbol, start_time, end_time)
            .await
            .map_err(|e| Self::map_error(symbol, e))?;

        let gmtoffset = match response.metadata() {
            Ok(meta) => meta.gmtoffset,
            Err(e) => {
                warn!("No exchange metadata for '{}', using UTC days: {}", symbol, e);
                0
            }
        };

        match response.quotes() {
            Ok(yahoo_quotes) => {
                let quotes: Vec<Quote> = yahoo_quotes
                    .iter()
                    .filter_map(|q| match Self::yahoo_quote_to_quote(q, gmtoffset) {
                        Ok(quote) => Some(quote),
                        Err(e) => {
                            warn!("Skipping quote due to conversion error: {:?}", e);
                            None
                        }
                    })
                    .collect();

                if quotes.is_empty() {
                    return Err(MarketDataError::NoDataForRange);
                }

                Ok(quotes)
            }
            Err(yahoo::YahooError::NoQuotes) => {
                warn!(
                    "No historical quotes returned for '{}' between {} and {}",
                    symbol,
                    start.format("%Y-%m-%d"),
                    end.format("%Y-%m-%d")
                );
                Err(MarketDataError::NoDataForRange)
            }
            Err(e) => Err(Self::map_error(symbol, e)),
        }
    }
}
