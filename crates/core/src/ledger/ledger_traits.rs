//! Ledger repository and service traits.

use async_trait::async_trait;
use chrono::NaiveDate;

use super::ledger_model::{
    InvestmentOrder, NewInvestmentOrder, NewTransaction, NewTransfer, Transaction, Transfer,
};
use crate::errors::Result;

/// Read and append access to the ledger tables.
///
/// The `until` bound on the list methods is inclusive; `None` reads everything.
#[async_trait]
pub trait LedgerRepositoryTrait: Send + Sync {
    /// Non-excluded transactions dated on or before `until`, oldest first.
    fn list_transactions(&self, until: Option<NaiveDate>) -> Result<Vec<Transaction>>;

    /// Transfers dated on or before `until`, oldest first.
    fn list_transfers(&self, until: Option<NaiveDate>) -> Result<Vec<Transfer>>;

    /// Investment orders dated on or before `until`, oldest first.
    fn list_investment_orders(&self, until: Option<NaiveDate>) -> Result<Vec<InvestmentOrder>>;

    /// Every transaction including excluded ones, newest first, optionally
    /// restricted to one calendar year.
    fn list_all_transactions(&self, year: Option<i32>) -> Result<Vec<Transaction>>;

    /// Distinct account names referenced by any ledger row.
    fn distinct_account_names(&self) -> Result<Vec<String>>;

    /// Inserts transactions, ignoring ids that already exist.
    /// Returns the number of rows inserted.
    async fn insert_transactions(&self, transactions: Vec<Transaction>) -> Result<usize>;

    /// Inserts transfers, ignoring ids that already exist.
    async fn insert_transfers(&self, transfers: Vec<Transfer>) -> Result<usize>;

    async fn insert_investment_order(&self, order: InvestmentOrder) -> Result<InvestmentOrder>;

    /// Sets the exclusion flag of a transaction. Unknown ids are `NotFound`.
    async fn set_transaction_excluded(&self, id: &str, is_excluded: bool) -> Result<Transaction>;
}

/// Ledger-boundary operations: validation, account auto-creation and
/// display listings.
#[async_trait]
pub trait LedgerServiceTrait: Send + Sync {
    async fn record_investment_order(&self, order: NewInvestmentOrder) -> Result<InvestmentOrder>;

    async fn record_transactions(&self, transactions: Vec<NewTransaction>) -> Result<usize>;

    async fn record_transfers(&self, transfers: Vec<NewTransfer>) -> Result<usize>;

    async fn set_transaction_excluded(&self, id: &str, is_excluded: bool) -> Result<Transaction>;

    /// Creates every account the ledger references but the account set lacks.
    async fn sync_accounts_from_history(&self) -> Result<usize>;

    fn list_transactions(&self, year: Option<i32>) -> Result<Vec<Transaction>>;

    /// All orders, newest first.
    fn list_investment_orders(&self) -> Result<Vec<InvestmentOrder>>;
}
