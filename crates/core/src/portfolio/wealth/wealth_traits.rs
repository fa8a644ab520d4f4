use async_trait::async_trait;
use chrono::NaiveDate;

use super::wealth_model::WealthTable;
use crate::errors::Result;

#[async_trait]
pub trait WealthServiceTrait: Send + Sync {
    /// Daily wealth table from `start` (or the first ledger event) through today.
    async fn calculate_wealth_evolution(&self, start: Option<NaiveDate>) -> Result<WealthTable>;

    /// Same as [`calculate_wealth_evolution`](Self::calculate_wealth_evolution)
    /// with an explicit valuation date standing in for today.
    async fn calculate_wealth_evolution_as_of(
        &self,
        start: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Result<WealthTable>;
}
