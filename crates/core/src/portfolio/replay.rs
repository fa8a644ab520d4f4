//! Event replay state shared by the wealth engine and the snapshot inspector.
//!
//! The ledger is bucketed by date once; each calendar tick then applies the
//! day's events in a fixed order: transactions, transfers, investment orders.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::accounts::Account;
use crate::ledger::{InvestmentOrder, Ledger, Transaction, Transfer};

/// Events dated on the same day.
#[derive(Debug, Default)]
pub struct DayEvents<'a> {
    pub transactions: Vec<&'a Transaction>,
    pub transfers: Vec<&'a Transfer>,
    pub orders: Vec<&'a InvestmentOrder>,
}

/// Groups every ledger event by its date.
pub fn bucket_by_date(ledger: &Ledger) -> BTreeMap<NaiveDate, DayEvents<'_>> {
    let mut days: BTreeMap<NaiveDate, DayEvents<'_>> = BTreeMap::new();
    for t in &ledger.transactions {
        days.entry(t.date).or_default().transactions.push(t);
    }
    for t in &ledger.transfers {
        days.entry(t.date).or_default().transfers.push(t);
    }
    for o in &ledger.orders {
        days.entry(o.date).or_default().orders.push(o);
    }
    days
}

/// Running cash per account, quantity per (account, ticker) and the last
/// executed unit price per ticker.
#[derive(Debug, Clone, Default)]
pub struct EngineState {
    cash: BTreeMap<String, Decimal>,
    holdings: BTreeMap<String, BTreeMap<String, Decimal>>,
    last_trade_price: BTreeMap<String, Decimal>,
}

impl EngineState {
    /// Opening state: every account at its initial balance, nothing held.
    pub fn seeded(accounts: &[Account]) -> Self {
        Self {
            cash: accounts
                .iter()
                .map(|a| (a.name.clone(), a.initial_balance))
                .collect(),
            ..Default::default()
        }
    }

    pub fn apply_transaction(&mut self, transaction: &Transaction) {
        self.add_cash(&transaction.account, transaction.signed_amount());
    }

    pub fn apply_transfer(&mut self, transfer: &Transfer) {
        self.add_cash(&transfer.source_account, -transfer.amount);
        self.add_cash(&transfer.target_account, transfer.amount);
    }

    pub fn apply_order(&mut self, order: &InvestmentOrder) {
        self.add_cash(&order.account, order.cash_delta());
        *self
            .holdings
            .entry(order.account.clone())
            .or_default()
            .entry(order.ticker.clone())
            .or_insert(Decimal::ZERO) += order.quantity_delta();
        self.last_trade_price
            .insert(order.ticker.clone(), order.unit_price);
    }

    pub fn apply_day(&mut self, events: &DayEvents<'_>) {
        for t in &events.transactions {
            self.apply_transaction(t);
        }
        for t in &events.transfers {
            self.apply_transfer(t);
        }
        for o in &events.orders {
            self.apply_order(o);
        }
    }

    pub fn cash(&self, account: &str) -> Decimal {
        self.cash.get(account).copied().unwrap_or(Decimal::ZERO)
    }

    /// Cash per account, ordered by account name.
    pub fn cash_balances(&self) -> impl Iterator<Item = (&str, Decimal)> + '_ {
        self.cash.iter().map(|(name, cash)| (name.as_str(), *cash))
    }

    /// Held quantity per ticker for one account, ordered by ticker.
    /// Quantities may be zero or negative.
    pub fn holdings_of<'s>(
        &'s self,
        account: &str,
    ) -> impl Iterator<Item = (&'s str, Decimal)> + 's {
        self.holdings
            .get(account)
            .into_iter()
            .flat_map(|positions| positions.iter().map(|(t, q)| (t.as_str(), *q)))
    }

    pub fn quantity(&self, account: &str, ticker: &str) -> Decimal {
        self.holdings
            .get(account)
            .and_then(|positions| positions.get(ticker))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    pub fn last_trade_price(&self, ticker: &str) -> Option<Decimal> {
        self.last_trade_price.get(ticker).copied()
    }

    fn add_cash(&mut self, account: &str, delta: Decimal) {
        *self
            .cash
            .entry(account.to_string())
            .or_insert(Decimal::ZERO) += delta;
    }
}
