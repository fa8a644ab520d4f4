//! Ledger domain models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::accounts::Account;
use crate::constants::DEFAULT_CURRENCY;
use crate::errors::{Error, Result, ValidationError};
use crate::utils::decimal_input_format;

/// Direction of a bank cash movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "INCOME",
            TransactionKind::Expense => "EXPENSE",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "INCOME" => Ok(TransactionKind::Income),
            "EXPENSE" => Ok(TransactionKind::Expense),
            other => Err(ValidationError::InvalidInput(format!(
                "Unknown transaction kind '{}'",
                other
            ))
            .into()),
        }
    }
}

/// Side of an investment order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderAction {
    Buy,
    Sell,
}

impl OrderAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderAction::Buy => "BUY",
            OrderAction::Sell => "SELL",
        }
    }
}

impl fmt::Display for OrderAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderAction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BUY" => Ok(OrderAction::Buy),
            "SELL" => Ok(OrderAction::Sell),
            other => Err(
                ValidationError::InvalidInput(format!("Unknown order action '{}'", other)).into(),
            ),
        }
    }
}

/// Income or expense on a single account.
///
/// `amount` is unsigned; the sign comes from `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub date: NaiveDate,
    pub category: String,
    pub account: String,
    pub amount: Decimal,
    pub currency: String,
    pub comment: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub is_excluded: bool,
}

impl Transaction {
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            TransactionKind::Income => self.amount,
            TransactionKind::Expense => -self.amount,
        }
    }
}

/// Input model for recording a transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    #[serde(default)]
    pub id: Option<String>,
    pub date: NaiveDate,
    #[serde(default)]
    pub category: String,
    pub account: String,
    #[serde(deserialize_with = "decimal_input_format::deserialize_decimal")]
    pub amount: Decimal,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
}

impl NewTransaction {
    pub fn validate(&self) -> Result<()> {
        if self.account.trim().is_empty() {
            return Err(ValidationError::MissingField("account".to_string()).into());
        }
        if self.amount < Decimal::ZERO {
            return Err(ValidationError::InvalidInput(format!(
                "Transaction amount must not be negative, got {}",
                self.amount
            ))
            .into());
        }
        Ok(())
    }

    /// Builds the stored transaction, assigning an id when none was given.
    pub fn into_transaction(self) -> Transaction {
        Transaction {
            id: self
                .id
                .filter(|id| !id.trim().is_empty())
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            date: self.date,
            category: self.category,
            account: self.account.trim().to_string(),
            amount: self.amount,
            currency: self
                .currency
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            comment: self.comment.unwrap_or_default(),
            kind: self.kind,
            is_excluded: false,
        }
    }
}

/// Cash moved from one account to another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transfer {
    pub id: String,
    pub date: NaiveDate,
    pub source_account: String,
    pub target_account: String,
    pub amount: Decimal,
    pub comment: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransfer {
    #[serde(default)]
    pub id: Option<String>,
    pub date: NaiveDate,
    pub source_account: String,
    pub target_account: String,
    #[serde(deserialize_with = "decimal_input_format::deserialize_decimal")]
    pub amount: Decimal,
    #[serde(default)]
    pub comment: Option<String>,
}

impl NewTransfer {
    pub fn validate(&self) -> Result<()> {
        let source = self.source_account.trim();
        let target = self.target_account.trim();
        if source.is_empty() {
            return Err(ValidationError::MissingField("sourceAccount".to_string()).into());
        }
        if target.is_empty() {
            return Err(ValidationError::MissingField("targetAccount".to_string()).into());
        }
        if source == target {
            return Err(ValidationError::InvalidInput(format!(
                "Transfer source and target are the same account '{}'",
                source
            ))
            .into());
        }
        if self.amount <= Decimal::ZERO {
            return Err(ValidationError::InvalidInput(format!(
                "Transfer amount must be positive, got {}",
                self.amount
            ))
            .into());
        }
        Ok(())
    }

    pub fn into_transfer(self) -> Transfer {
        Transfer {
            id: self
                .id
                .filter(|id| !id.trim().is_empty())
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            date: self.date,
            source_account: self.source_account.trim().to_string(),
            target_account: self.target_account.trim().to_string(),
            amount: self.amount,
            comment: self.comment.unwrap_or_default(),
        }
    }
}

/// A buy or sell of a ticker, settled against an account's cash.
///
/// Quantity, unit price and fees are fixed at execution and never revalued.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentOrder {
    pub id: String,
    pub date: NaiveDate,
    pub ticker: String,
    pub name: String,
    pub action: OrderAction,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub fees: Decimal,
    pub account: String,
    pub comment: String,
}

impl InvestmentOrder {
    /// Signed effect on the account's cash. Fees are paid on both sides.
    pub fn cash_delta(&self) -> Decimal {
        let gross = self.quantity * self.unit_price;
        match self.action {
            OrderAction::Buy => -(gross + self.fees),
            OrderAction::Sell => gross - self.fees,
        }
    }

    /// Signed effect on the held quantity of `ticker` in `account`.
    pub fn quantity_delta(&self) -> Decimal {
        match self.action {
            OrderAction::Buy => self.quantity,
            OrderAction::Sell => -self.quantity,
        }
    }
}

/// Input model for recording an investment order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInvestmentOrder {
    pub date: NaiveDate,
    pub ticker: String,
    #[serde(default)]
    pub name: Option<String>,
    pub action: OrderAction,
    #[serde(deserialize_with = "decimal_input_format::deserialize_decimal")]
    pub quantity: Decimal,
    #[serde(deserialize_with = "decimal_input_format::deserialize_decimal")]
    pub unit_price: Decimal,
    #[serde(
        default,
        deserialize_with = "decimal_input_format::deserialize_decimal_or_zero"
    )]
    pub fees: Decimal,
    pub account: String,
    #[serde(default)]
    pub comment: Option<String>,
}

impl NewInvestmentOrder {
    pub fn validate(&self) -> Result<()> {
        if self.ticker.trim().is_empty() {
            return Err(ValidationError::MissingField("ticker".to_string()).into());
        }
        if self.account.trim().is_empty() {
            return Err(ValidationError::MissingField("account".to_string()).into());
        }
        if self.quantity <= Decimal::ZERO {
            return Err(ValidationError::InvalidInput(format!(
                "Quantity must be positive, got {}",
                self.quantity
            ))
            .into());
        }
        if self.unit_price <= Decimal::ZERO {
            return Err(ValidationError::InvalidInput(format!(
                "Unit price must be positive, got {}",
                self.unit_price
            ))
            .into());
        }
        if self.fees < Decimal::ZERO {
            return Err(ValidationError::InvalidInput(format!(
                "Fees must not be negative, got {}",
                self.fees
            ))
            .into());
        }
        Ok(())
    }

    pub fn into_order(self) -> InvestmentOrder {
        let ticker = self.ticker.trim().to_uppercase();
        InvestmentOrder {
            id: uuid::Uuid::new_v4().to_string(),
            date: self.date,
            name: self
                .name
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| ticker.clone()),
            ticker,
            action: self.action,
            quantity: self.quantity,
            unit_price: self.unit_price,
            fees: self.fees,
            account: self.account.trim().to_string(),
            comment: self.comment.unwrap_or_default(),
        }
    }
}

/// The full ledger as read for one replay.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    pub accounts: Vec<Account>,
    pub transactions: Vec<Transaction>,
    pub transfers: Vec<Transfer>,
    pub orders: Vec<InvestmentOrder>,
}

impl Ledger {
    /// True when there is nothing to replay: no events and no accounts.
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty() && !self.has_events()
    }

    pub fn has_events(&self) -> bool {
        !(self.transactions.is_empty() && self.transfers.is_empty() && self.orders.is_empty())
    }

    /// Earliest date across all events, if any.
    pub fn min_event_date(&self) -> Option<NaiveDate> {
        let tx = self.transactions.iter().map(|t| t.date);
        let tr = self.transfers.iter().map(|t| t.date);
        let or = self.orders.iter().map(|o| o.date);
        tx.chain(tr).chain(or).min()
    }

    /// Every account name referenced by an event.
    pub fn referenced_accounts(&self) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        for t in &self.transactions {
            names.insert(t.account.clone());
        }
        for t in &self.transfers {
            names.insert(t.source_account.clone());
            names.insert(t.target_account.clone());
        }
        for o in &self.orders {
            names.insert(o.account.clone());
        }
        names
    }

    /// Adds an in-memory zero-balance account for every referenced name
    /// missing from the account set. Returns the names that were added.
    pub fn add_missing_accounts(&mut self) -> Vec<String> {
        let known: BTreeSet<String> = self.accounts.iter().map(|a| a.name.clone()).collect();
        let missing: Vec<String> = self
            .referenced_accounts()
            .into_iter()
            .filter(|n| !known.contains(n))
            .collect();
        for name in &missing {
            self.accounts.push(Account::with_zero_balance(name.clone()));
        }
        missing
    }

    /// Tickers with at least one order, sorted.
    pub fn tickers(&self) -> Vec<String> {
        self.orders
            .iter()
            .map(|o| o.ticker.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// Parses an amount as written in bank exports.
///
/// Accepts `,` as decimal separator and ignores spaces (including the
/// non-breaking spaces used as thousands separators).
pub fn parse_amount(text: &str) -> Result<Decimal> {
    let cleaned: String = text
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '\u{a0}' && *c != '\u{202f}')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    if cleaned.is_empty() {
        return Err(ValidationError::MissingField("amount".to_string()).into());
    }
    Decimal::from_str(&cleaned).map_err(|_| {
        ValidationError::InvalidInput(format!("'{}' is not a valid amount", text.trim())).into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn order(action: OrderAction, quantity: Decimal, price: Decimal, fees: Decimal) -> InvestmentOrder {
        InvestmentOrder {
            id: "o1".to_string(),
            date: d(2024, 1, 1),
            ticker: "X".to_string(),
            name: "X".to_string(),
            action,
            quantity,
            unit_price: price,
            fees,
            account: "Broker".to_string(),
            comment: String::new(),
        }
    }

    #[test]
    fn test_buy_cash_delta_includes_fees() {
        let o = order(OrderAction::Buy, dec!(10), dec!(100), dec!(5));
        assert_eq!(o.cash_delta(), dec!(-1005));
        assert_eq!(o.quantity_delta(), dec!(10));
    }

    #[test]
    fn test_sell_cash_delta_subtracts_fees() {
        let o = order(OrderAction::Sell, dec!(4), dec!(50), dec!(2));
        assert_eq!(o.cash_delta(), dec!(198));
        assert_eq!(o.quantity_delta(), dec!(-4));
    }

    #[test]
    fn test_parse_amount_accepts_comma_and_spaces() {
        assert_eq!(parse_amount("1 234,56").unwrap(), dec!(1234.56));
        assert_eq!(parse_amount("1\u{a0}000,5").unwrap(), dec!(1000.5));
        assert_eq!(parse_amount("-12.30").unwrap(), dec!(-12.30));
    }

    #[test]
    fn test_parse_amount_rejects_garbage() {
        assert!(matches!(parse_amount("abc"), Err(Error::Validation(_))));
        assert!(matches!(parse_amount("  "), Err(Error::Validation(_))));
        assert!(matches!(parse_amount("1,2,3"), Err(Error::Validation(_))));
    }

    #[test]
    fn test_kind_and_action_parse_case_insensitively() {
        assert_eq!("income".parse::<TransactionKind>().unwrap(), TransactionKind::Income);
        assert_eq!(" Sell ".parse::<OrderAction>().unwrap(), OrderAction::Sell);
        assert!("DIVIDEND".parse::<OrderAction>().is_err());
    }

    #[test]
    fn test_new_order_validation() {
        let base = NewInvestmentOrder {
            date: d(2024, 1, 1),
            ticker: "cw8.pa".to_string(),
            name: None,
            action: OrderAction::Buy,
            quantity: dec!(1),
            unit_price: dec!(400),
            fees: dec!(0),
            account: "PEA".to_string(),
            comment: None,
        };
        assert!(base.validate().is_ok());

        let order = base.clone().into_order();
        assert_eq!(order.ticker, "CW8.PA");
        assert_eq!(order.name, "CW8.PA");

        let mut bad = base.clone();
        bad.quantity = dec!(0);
        assert!(bad.validate().is_err());

        let mut bad = base.clone();
        bad.unit_price = dec!(-1);
        assert!(bad.validate().is_err());

        let mut bad = base.clone();
        bad.fees = dec!(-0.5);
        assert!(bad.validate().is_err());

        let mut bad = base;
        bad.ticker = " ".to_string();
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_new_transfer_rejects_same_account() {
        let transfer = NewTransfer {
            id: None,
            date: d(2024, 1, 1),
            source_account: "A".to_string(),
            target_account: " A ".to_string(),
            amount: dec!(10),
            comment: None,
        };
        assert!(transfer.validate().is_err());
    }

    #[test]
    fn test_ledger_adds_missing_accounts_once() {
        let mut ledger = Ledger {
            accounts: vec![Account::with_zero_balance("A")],
            transfers: vec![Transfer {
                id: "t1".to_string(),
                date: d(2024, 1, 2),
                source_account: "A".to_string(),
                target_account: "B".to_string(),
                amount: dec!(5),
                comment: String::new(),
            }],
            ..Default::default()
        };

        assert_eq!(ledger.add_missing_accounts(), vec!["B".to_string()]);
        assert!(ledger.add_missing_accounts().is_empty());
        assert_eq!(ledger.accounts.len(), 2);
        assert_eq!(ledger.min_event_date(), Some(d(2024, 1, 2)));
    }

    #[test]
    fn test_new_transaction_reads_bank_formatted_amounts() {
        let tx: NewTransaction = serde_json::from_value(serde_json::json!({
            "date": "2024-03-01",
            "account": "Checking",
            "amount": "1 234,56",
            "type": "EXPENSE"
        }))
        .unwrap();
        assert_eq!(tx.amount, dec!(1234.56));

        let order: NewInvestmentOrder = serde_json::from_value(serde_json::json!({
            "date": "2024-03-01",
            "ticker": "X",
            "action": "BUY",
            "quantity": 3,
            "unitPrice": "99,5",
            "account": "Broker"
        }))
        .unwrap();
        assert_eq!(order.unit_price, dec!(99.5));
        assert_eq!(order.fees, Decimal::ZERO);

        let bad = serde_json::from_value::<NewTransfer>(serde_json::json!({
            "date": "2024-03-01",
            "sourceAccount": "A",
            "targetAccount": "B",
            "amount": "12abc"
        }));
        assert!(bad.is_err());
    }
}
