use async_trait::async_trait;
use chrono::NaiveDate;
use log::{debug, warn};
use std::sync::Arc;

use super::wealth_calculator::calculate_wealth;
use super::wealth_model::WealthTable;
use super::wealth_traits::WealthServiceTrait;
use crate::accounts::AccountRepositoryTrait;
use crate::errors::{Result, ValidationError};
use crate::ledger::{load_ledger, LedgerRepositoryTrait};
use crate::quotes::{PriceMatrix, QuoteServiceTrait};
use crate::utils::time_utils::{get_days_between, valuation_date_today};

/// Wealth evolution engine.
///
/// Recomputes everything from the ledger and the price cache on each call;
/// nothing derived is persisted. The only side effect is the price cache
/// sync, which is an idempotent upsert.
pub struct WealthService {
    account_repository: Arc<dyn AccountRepositoryTrait>,
    ledger_repository: Arc<dyn LedgerRepositoryTrait>,
    quote_service: Arc<dyn QuoteServiceTrait>,
}

impl WealthService {
    pub fn new(
        account_repository: Arc<dyn AccountRepositoryTrait>,
        ledger_repository: Arc<dyn LedgerRepositoryTrait>,
        quote_service: Arc<dyn QuoteServiceTrait>,
    ) -> Self {
        Self {
            account_repository,
            ledger_repository,
            quote_service,
        }
    }

    /// Syncs and reads prices. Any failure degrades to an empty matrix so
    /// holdings fall back to their last executed price.
    async fn load_prices(
        &self,
        tickers: &[String],
        calendar: &[NaiveDate],
        start: NaiveDate,
        today: NaiveDate,
    ) -> PriceMatrix {
        if tickers.is_empty() {
            return PriceMatrix::empty(calendar.to_vec());
        }

        let sync = self.quote_service.ensure_coverage(tickers, start, today).await;
        if !sync.is_success() {
            warn!(
                "Price sync incomplete, {} range(s) failed; valuing from cache",
                sync.ranges_failed
            );
        }

        match self.quote_service.read_coverage(tickers, start, today) {
            Ok(matrix) => matrix,
            Err(e) => {
                warn!("Could not read price cache, valuing at last trade price: {}", e);
                PriceMatrix::empty(calendar.to_vec())
            }
        }
    }
}

#[async_trait]
impl WealthServiceTrait for WealthService {
    async fn calculate_wealth_evolution(&self, start: Option<NaiveDate>) -> Result<WealthTable> {
        self.calculate_wealth_evolution_as_of(start, valuation_date_today())
            .await
    }

    async fn calculate_wealth_evolution_as_of(
        &self,
        start: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Result<WealthTable> {
        if let Some(start) = start {
            if start > today {
                return Err(ValidationError::InvalidInput(format!(
                    "Start date {} is after the valuation date {}",
                    start, today
                ))
                .into());
            }
        }

        let mut ledger = load_ledger(
            self.account_repository.as_ref(),
            self.ledger_repository.as_ref(),
            Some(today),
        )?;
        if ledger.is_empty() {
            debug!("Ledger is empty, nothing to replay");
            return Ok(WealthTable::empty());
        }

        let added = ledger.add_missing_accounts();
        if !added.is_empty() {
            warn!(
                "Ledger references unknown account(s) {:?}; replaying them from zero",
                added
            );
        }

        let start = start.or_else(|| ledger.min_event_date()).unwrap_or(today);
        let calendar = get_days_between(start, today);
        let tickers = ledger.tickers();
        let prices = self.load_prices(&tickers, &calendar, start, today).await;

        Ok(calculate_wealth(&ledger, &calendar, &prices))
    }
}
