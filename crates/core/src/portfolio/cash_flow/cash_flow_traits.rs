use rust_decimal::Decimal;

use super::cash_flow_model::{CashFlowSummary, DailyChange};
use crate::errors::Result;
use crate::ledger::{Transaction, TransactionKind};

pub trait CashFlowServiceTrait: Send + Sync {
    /// Summary over non-excluded transactions, optionally for one year.
    fn summarize(&self, year: Option<i32>) -> Result<CashFlowSummary>;

    /// Signed change per (date, account) from non-excluded transactions.
    fn daily_changes(&self) -> Result<Vec<DailyChange>>;

    /// Transactions of `kind` with an amount of at least `threshold`,
    /// excluded ones included, largest first.
    fn find_outliers(
        &self,
        threshold: Decimal,
        kind: TransactionKind,
        year: Option<i32>,
    ) -> Result<Vec<Transaction>>;
}
