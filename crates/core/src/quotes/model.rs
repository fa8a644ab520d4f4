//! Price cache domain models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// One cached daily close: a long-form row of the price cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricePoint {
    pub ticker: String,
    pub date: NaiveDate,
    pub price: Decimal,
}

/// Date-indexed price matrix with one column per ticker.
///
/// Every calendar date carries a value for a ticker as soon as the ticker has
/// any price at all: gaps are forward-filled from the previous trading day and
/// a leading gap is backward-filled from the first available price.
#[derive(Debug, Clone, Default)]
pub struct PriceMatrix {
    dates: Vec<NaiveDate>,
    columns: HashMap<String, Vec<Option<Decimal>>>,
}

impl PriceMatrix {
    /// A matrix over `dates` with no price for any ticker.
    pub fn empty(dates: Vec<NaiveDate>) -> Self {
        Self {
            dates,
            columns: HashMap::new(),
        }
    }

    /// Builds the filled matrix.
    ///
    /// `dates` must be sorted ascending. `rows` are cached prices inside the
    /// calendar; rows on dates outside it are ignored. `seeds` holds, per
    /// ticker, the last cached price before the first calendar date and is
    /// the starting value of the forward fill.
    pub fn build(
        dates: Vec<NaiveDate>,
        tickers: &[String],
        rows: &[PricePoint],
        seeds: &HashMap<String, Decimal>,
    ) -> Self {
        let mut by_ticker: HashMap<&str, BTreeMap<NaiveDate, Decimal>> = HashMap::new();
        for row in rows {
            by_ticker
                .entry(row.ticker.as_str())
                .or_default()
                .insert(row.date, row.price);
        }

        let mut columns = HashMap::with_capacity(tickers.len());
        for ticker in tickers {
            let known = by_ticker.get(ticker.as_str());
            let mut current = seeds.get(ticker).copied();
            let mut column = Vec::with_capacity(dates.len());
            for date in &dates {
                if let Some(price) = known.and_then(|k| k.get(date)) {
                    current = Some(*price);
                }
                column.push(current);
            }

            if let Some(first) = column.iter().flatten().next().copied() {
                for slot in column.iter_mut() {
                    if slot.is_some() {
                        break;
                    }
                    *slot = Some(first);
                }
            }
            columns.insert(ticker.clone(), column);
        }

        Self { dates, columns }
    }

    /// Price of `ticker` at calendar position `index`.
    pub fn price_at(&self, ticker: &str, index: usize) -> Option<Decimal> {
        self.columns
            .get(ticker)
            .and_then(|column| column.get(index))
            .copied()
            .flatten()
    }

    /// Price of `ticker` on `date`, if the date is in the calendar.
    pub fn price(&self, ticker: &str, date: NaiveDate) -> Option<Decimal> {
        let index = self.dates.binary_search(&date).ok()?;
        self.price_at(ticker, index)
    }
}
