use chrono::NaiveDate;
use log::debug;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use super::wealth_model::{WealthRow, WealthTable};
use crate::ledger::Ledger;
use crate::portfolio::replay::{bucket_by_date, EngineState};
use crate::quotes::PriceMatrix;

/// Replays `ledger` over `calendar` and values holdings with `prices`.
///
/// `calendar` must be sorted and gapless. Events dated before its first day
/// are folded into the opening state; events after its last day are ignored.
/// Every account of `ledger.accounts` gets a column; callers add the accounts
/// referenced by events beforehand.
///
/// A holding is valued with the matrix price for the day, else the last
/// executed unit price seen so far for the ticker, else zero.
pub fn calculate_wealth(ledger: &Ledger, calendar: &[NaiveDate], prices: &PriceMatrix) -> WealthTable {
    let (Some(first), Some(last)) = (calendar.first(), calendar.last()) else {
        return WealthTable::empty();
    };

    let events = bucket_by_date(ledger);
    let mut state = EngineState::seeded(&ledger.accounts);
    for day in events.range(..*first).map(|(_, day)| day) {
        state.apply_day(day);
    }

    let accounts: Vec<String> = {
        let mut names: Vec<String> = ledger.accounts.iter().map(|a| a.name.clone()).collect();
        names.sort();
        names.dedup();
        names
    };

    let mut rows = Vec::with_capacity(calendar.len());
    for &date in calendar {
        if let Some(day) = events.get(&date) {
            state.apply_day(day);
        }

        let mut values = BTreeMap::new();
        let mut total_invest = Decimal::ZERO;
        let mut total_wealth = Decimal::ZERO;
        for account in &accounts {
            let invested: Decimal = state
                .holdings_of(account)
                .filter(|(_, quantity)| !quantity.is_zero())
                .map(|(ticker, quantity)| {
                    let price = prices
                        .price(ticker, date)
                        .or_else(|| state.last_trade_price(ticker))
                        .unwrap_or(Decimal::ZERO);
                    quantity * price
                })
                .sum();
            let value = state.cash(account) + invested;
            total_invest += invested;
            total_wealth += value;
            values.insert(account.clone(), value);
        }

        rows.push(WealthRow {
            date,
            accounts: values,
            total_invest,
            total_wealth,
        });
    }

    debug!(
        "Replayed {} day(s) from {} to {} over {} account(s)",
        rows.len(),
        first,
        last,
        accounts.len()
    );
    WealthTable { accounts, rows }
}
