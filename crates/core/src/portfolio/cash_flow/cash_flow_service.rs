use chrono::Datelike;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use super::cash_flow_model::{CashFlowSummary, CategoryTotal, DailyChange, MonthlyTotals};
use super::cash_flow_traits::CashFlowServiceTrait;
use crate::errors::Result;
use crate::ledger::{LedgerRepositoryTrait, Transaction, TransactionKind};

pub struct CashFlowService {
    ledger_repository: Arc<dyn LedgerRepositoryTrait>,
}

impl CashFlowService {
    pub fn new(ledger_repository: Arc<dyn LedgerRepositoryTrait>) -> Self {
        Self { ledger_repository }
    }
}

impl CashFlowServiceTrait for CashFlowService {
    fn summarize(&self, year: Option<i32>) -> Result<CashFlowSummary> {
        let transactions: Vec<Transaction> = self
            .ledger_repository
            .list_transactions(None)?
            .into_iter()
            .filter(|t| year.map_or(true, |y| t.date.year() == y))
            .collect();

        let mut total_income = Decimal::ZERO;
        let mut total_expense = Decimal::ZERO;
        let mut by_category: HashMap<&str, Decimal> = HashMap::new();
        let mut by_month: BTreeMap<(i32, u32), (Decimal, Decimal)> = BTreeMap::new();
        if let Some(y) = year {
            for month in 1..=12 {
                by_month.insert((y, month), (Decimal::ZERO, Decimal::ZERO));
            }
        }

        for t in &transactions {
            let month = by_month
                .entry((t.date.year(), t.date.month()))
                .or_insert((Decimal::ZERO, Decimal::ZERO));
            match t.kind {
                TransactionKind::Income => {
                    total_income += t.amount;
                    month.0 += t.amount;
                }
                TransactionKind::Expense => {
                    total_expense += t.amount;
                    month.1 += t.amount;
                    *by_category.entry(t.category.as_str()).or_default() += t.amount;
                }
            }
        }

        let savings = total_income - total_expense;
        let savings_rate = if total_income.is_zero() {
            Decimal::ZERO
        } else {
            savings / total_income * Decimal::ONE_HUNDRED
        };

        let mut expenses_by_category: Vec<CategoryTotal> = by_category
            .into_iter()
            .map(|(category, amount)| CategoryTotal {
                category: category.to_string(),
                amount,
            })
            .collect();
        expenses_by_category.sort_by(|a, b| {
            b.amount
                .cmp(&a.amount)
                .then_with(|| a.category.cmp(&b.category))
        });

        Ok(CashFlowSummary {
            year,
            total_income,
            total_expense,
            savings,
            savings_rate,
            expenses_by_category,
            monthly: by_month
                .into_iter()
                .map(|((year, month), (income, expense))| MonthlyTotals {
                    year,
                    month,
                    income,
                    expense,
                })
                .collect(),
        })
    }

    fn daily_changes(&self) -> Result<Vec<DailyChange>> {
        let mut changes: BTreeMap<(chrono::NaiveDate, String), Decimal> = BTreeMap::new();
        for t in self.ledger_repository.list_transactions(None)? {
            *changes.entry((t.date, t.account.clone())).or_default() += t.signed_amount();
        }
        Ok(changes
            .into_iter()
            .map(|((date, account), change)| DailyChange {
                date,
                account,
                change,
            })
            .collect())
    }

    fn find_outliers(
        &self,
        threshold: Decimal,
        kind: TransactionKind,
        year: Option<i32>,
    ) -> Result<Vec<Transaction>> {
        let mut outliers: Vec<Transaction> = self
            .ledger_repository
            .list_all_transactions(year)?
            .into_iter()
            .filter(|t| t.kind == kind && t.amount.abs() >= threshold)
            .collect();
        outliers.sort_by(|a, b| b.amount.cmp(&a.amount).then_with(|| b.date.cmp(&a.date)));
        Ok(outliers)
    }
}
