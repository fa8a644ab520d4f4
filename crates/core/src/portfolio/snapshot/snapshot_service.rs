use chrono::NaiveDate;
use log::{debug, warn};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use super::snapshot_model::{LineType, SnapshotLine};
use super::snapshot_traits::SnapshotServiceTrait;
use crate::accounts::AccountRepositoryTrait;
use crate::constants::{CASH_DISPLAY_NAME, CASH_TICKER, SNAPSHOT_EPSILON};
use crate::errors::Result;
use crate::ledger::{load_ledger, LedgerRepositoryTrait};
use crate::portfolio::replay::{bucket_by_date, EngineState};
use crate::quotes::QuoteServiceTrait;

pub struct SnapshotService {
    account_repository: Arc<dyn AccountRepositoryTrait>,
    ledger_repository: Arc<dyn LedgerRepositoryTrait>,
    quote_service: Arc<dyn QuoteServiceTrait>,
}

impl SnapshotService {
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

    fn price_of(&self, ticker: &str, target_date: NaiveDate, state: &EngineState) -> Decimal {
        let cached = match self.quote_service.latest_price_on_or_before(ticker, target_date) {
            Ok(price) => price,
            Err(e) => {
                warn!("Price cache lookup failed for {}: {}", ticker, e);
                None
            }
        };
        cached
            .or_else(|| state.last_trade_price(ticker))
            .unwrap_or(Decimal::ZERO)
    }
}

impl SnapshotServiceTrait for SnapshotService {
    fn inspect(&self, target_date: NaiveDate) -> Result<Vec<SnapshotLine>> {
        let epsilon = Decimal::from_str(SNAPSHOT_EPSILON).unwrap_or(Decimal::ZERO);

        let mut ledger = load_ledger(
            self.account_repository.as_ref(),
            self.ledger_repository.as_ref(),
            Some(target_date),
        )?;
        ledger.add_missing_accounts();

        let mut state = EngineState::seeded(&ledger.accounts);
        for day in bucket_by_date(&ledger).values() {
            state.apply_day(day);
        }

        // Display name from the most recent order of each ticker.
        let mut names: HashMap<&str, &str> = HashMap::new();
        for order in &ledger.orders {
            names.insert(order.ticker.as_str(), order.name.as_str());
        }

        let mut lines = Vec::new();
        for (account, cash) in state.cash_balances() {
            if cash.abs() > epsilon {
                lines.push(SnapshotLine {
                    account: account.to_string(),
                    line_type: LineType::Liquidity,
                    ticker: CASH_TICKER.to_string(),
                    name: CASH_DISPLAY_NAME.to_string(),
                    quantity: cash,
                    unit_price: Decimal::ONE,
                    value: cash,
                });
            }
            for (ticker, quantity) in state.holdings_of(account) {
                if quantity <= epsilon {
                    continue;
                }
                let unit_price = self.price_of(ticker, target_date, &state);
                lines.push(SnapshotLine {
                    account: account.to_string(),
                    line_type: LineType::Investment,
                    ticker: ticker.to_string(),
                    name: names
                        .get(ticker)
                        .map(|n| n.to_string())
                        .unwrap_or_else(|| ticker.to_string()),
                    quantity,
                    unit_price,
                    value: quantity * unit_price,
                });
            }
        }

        debug!("Snapshot for {} has {} line(s)", target_date, lines.len());
        Ok(lines)
    }
}
