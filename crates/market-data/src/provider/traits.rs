//! Market data provider trait definitions.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::errors::MarketDataError;
use crate::models::Quote;

use super::capabilities::RateLimit;

/// Trait for external daily price sources.
///
/// Implement this trait to add support for a new market data source. The
/// price cache only ever asks for historical daily bars of a single ticker.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use worthline_market_data::{MarketDataError, MarketDataProvider, Quote, RateLimit};
///
/// struct FixedProvider;
///
/// #[async_trait]
/// impl MarketDataProvider for FixedProvider {
///     fn id(&self) -> &'static str {
///         "FIXED"
///     }
///
///     fn rate_limit(&self) -> RateLimit {
///         RateLimit::default()
///     }
///
///     async fn get_historical_quotes(&self, symbol: &str, start: DateTime<Utc>, end: DateTime<Utc>)
///         -> Result<Vec<Quote>, MarketDataError> {
///         Ok(vec![])
///     }
/// }
/// ```
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Unique identifier for this provider.
    ///
    /// Should be a constant string like "YAHOO". Used for logging and as
    /// the `source` recorded alongside cached prices.
    fn id(&self) -> &'static str;

    /// Rate limiting configuration for this provider.
    fn rate_limit(&self) -> RateLimit;

    /// Fetch daily bars for `symbol` between `start` and `end` (inclusive).
    ///
    /// Returns [`MarketDataError::SymbolNotFound`] when the provider does not
    /// know the ticker and [`MarketDataError::NoDataForRange`] when the ticker
    /// exists but had no trading days in the range.
    async fn get_historical_quotes(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Quote>, MarketDataError>;
}
