use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

/// Income, expense and savings over a year (or the whole ledger).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CashFlowSummary {
    pub year: Option<i32>,
    pub total_income: Decimal,
    pub total_expense: Decimal,
    /// Income minus expense.
    pub savings: Decimal,
    /// Savings as a percentage of income; zero when there is no income.
    pub savings_rate: Decimal,
    /// Expense per category, largest first.
    pub expenses_by_category: Vec<CategoryTotal>,
    pub monthly: Vec<MonthlyTotals>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    pub category: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyTotals {
    pub year: i32,
    pub month: u32,
    pub income: Decimal,
    pub expense: Decimal,
}

/// Net signed change of one account on one day.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyChange {
    pub date: NaiveDate,
    pub account: String,
    pub change: Decimal,
}
