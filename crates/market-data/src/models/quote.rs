use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One daily bar as returned by a provider.
///
/// Providers are not consistent about which price field is populated for a
/// given day, so both are optional and [`Quote::daily_price`] picks the one to use.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Timestamp of the bar (market open of the trading day, UTC)
    pub timestamp: DateTime<Utc>,

    /// Closing price
    #[serde(skip_serializing_if = "Option::is_none")]
    pub close: Option<Decimal>,

    /// Dividend and split adjusted close
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adjclose: Option<Decimal>,

    /// Source of the quote (YAHOO, ...)
    pub source: String,

    /// Offset of the listing exchange from UTC, in seconds
    #[serde(default)]
    pub utc_offset_secs: i32,
}

impl Quote {
    pub fn new(
        timestamp: DateTime<Utc>,
        close: Option<Decimal>,
        adjclose: Option<Decimal>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            close,
            adjclose,
            source: source.into(),
            utc_offset_secs: 0,
        }
    }

    /// Sets the exchange's offset from UTC used to derive the trading day.
    pub fn with_utc_offset(mut self, secs: i32) -> Self {
        self.utc_offset_secs = secs;
        self
    }

    /// Trading day of the bar in the exchange's local time.
    ///
    /// Markets east of UTC open before midnight UTC, so the UTC date of
    /// their bars is the previous calendar day.
    pub fn date(&self) -> NaiveDate {
        match FixedOffset::east_opt(self.utc_offset_secs) {
            Some(offset) => self.timestamp.with_timezone(&offset).date_naive(),
            None => self.timestamp.date_naive(),
        }
    }

    /// The price to record for this day: the close when it is a positive
    /// number, otherwise the adjusted close, otherwise nothing.
    pub fn daily_price(&self) -> Option<Decimal> {
        self.close
            .filter(|p| p.is_sign_positive() && !p.is_zero())
            .or_else(|| {
                self.adjclose
                    .filter(|p| p.is_sign_positive() && !p.is_zero())
            })
    }
}
