use async_trait::async_trait;
use chrono::NaiveDate;
use log::{debug, info};
use std::sync::Arc;

use super::ledger_model::{
    InvestmentOrder, Ledger, NewInvestmentOrder, NewTransaction, NewTransfer, Transaction,
};
use super::ledger_traits::{LedgerRepositoryTrait, LedgerServiceTrait};
use crate::accounts::{AccountRepositoryTrait, AccountServiceTrait};
use crate::errors::Result;

/// Reads the accounts and every event dated on or before `until`.
pub fn load_ledger(
    accounts: &dyn AccountRepositoryTrait,
    ledger: &dyn LedgerRepositoryTrait,
    until: Option<NaiveDate>,
) -> Result<Ledger> {
    Ok(Ledger {
        accounts: accounts.list()?,
        transactions: ledger.list_transactions(until)?,
        transfers: ledger.list_transfers(until)?,
        orders: ledger.list_investment_orders(until)?,
    })
}

pub struct LedgerService {
    repository: Arc<dyn LedgerRepositoryTrait>,
    account_service: Arc<dyn AccountServiceTrait>,
}

impl LedgerService {
    pub fn new(
        repository: Arc<dyn LedgerRepositoryTrait>,
        account_service: Arc<dyn AccountServiceTrait>,
    ) -> Self {
        Self {
            repository,
            account_service,
        }
    }
}

#[async_trait]
impl LedgerServiceTrait for LedgerService {
    async fn record_investment_order(&self, order: NewInvestmentOrder) -> Result<InvestmentOrder> {
        order.validate()?;
        let order = order.into_order();
        self.account_service
            .ensure_accounts(vec![order.account.clone()])
            .await?;
        debug!(
            "Recording {} {} x {} @ {} on {}",
            order.action, order.ticker, order.quantity, order.unit_price, order.account
        );
        self.repository.insert_investment_order(order).await
    }

    async fn record_transactions(&self, transactions: Vec<NewTransaction>) -> Result<usize> {
        for t in &transactions {
            t.validate()?;
        }
        let rows: Vec<Transaction> = transactions
            .into_iter()
            .map(NewTransaction::into_transaction)
            .collect();
        if rows.is_empty() {
            return Ok(0);
        }
        let names = rows.iter().map(|t| t.account.clone()).collect();
        self.account_service.ensure_accounts(names).await?;
        let inserted = self.repository.insert_transactions(rows).await?;
        info!("Recorded {} transaction(s)", inserted);
        Ok(inserted)
    }

    async fn record_transfers(&self, transfers: Vec<NewTransfer>) -> Result<usize> {
        for t in &transfers {
            t.validate()?;
        }
        let rows: Vec<_> = transfers
            .into_iter()
            .map(NewTransfer::into_transfer)
            .collect();
        if rows.is_empty() {
            return Ok(0);
        }
        let names = rows
            .iter()
            .flat_map(|t| [t.source_account.clone(), t.target_account.clone()])
            .collect();
        self.account_service.ensure_accounts(names).await?;
        let inserted = self.repository.insert_transfers(rows).await?;
        info!("Recorded {} transfer(s)", inserted);
        Ok(inserted)
    }

    async fn set_transaction_excluded(&self, id: &str, is_excluded: bool) -> Result<Transaction> {
        debug!("Setting exclusion of transaction {} to {}", id, is_excluded);
        self.repository.set_transaction_excluded(id, is_excluded).await
    }

    async fn sync_accounts_from_history(&self) -> Result<usize> {
        let names = self.repository.distinct_account_names()?;
        let created = self.account_service.ensure_accounts(names).await?;
        info!("Account sync created {} account(s)", created);
        Ok(created)
    }

    fn list_transactions(&self, year: Option<i32>) -> Result<Vec<Transaction>> {
        self.repository.list_all_transactions(year)
    }

    fn list_investment_orders(&self) -> Result<Vec<InvestmentOrder>> {
        let mut orders = self.repository.list_investment_orders(None)?;
        orders.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(orders)
    }
}
