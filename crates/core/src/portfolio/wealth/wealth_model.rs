use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

/// One calendar day of the wealth table.
///
/// Serializes flat: `date`, one key per account, `Total Invest`, `Total Wealth`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WealthRow {
    pub date: NaiveDate,
    /// Cash plus valued holdings, per account.
    #[serde(flatten)]
    pub accounts: BTreeMap<String, Decimal>,
    #[serde(rename = "Total Invest")]
    pub total_invest: Decimal,
    #[serde(rename = "Total Wealth")]
    pub total_wealth: Decimal,
}

impl WealthRow {
    pub fn account_value(&self, account: &str) -> Option<Decimal> {
        self.accounts.get(account).copied()
    }
}

/// The engine output: one row per day, strictly increasing, no gaps.
///
/// An empty table means the ledger had nothing to replay.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WealthTable {
    /// Account column names, sorted.
    pub accounts: Vec<String>,
    pub rows: Vec<WealthRow>,
}

impl WealthTable {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, date: NaiveDate) -> Option<&WealthRow> {
        self.rows
            .binary_search_by_key(&date, |r| r.date)
            .ok()
            .map(|i| &self.rows[i])
    }
}
