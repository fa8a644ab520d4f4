//! Database models for transactions, transfers and investment orders.

use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::StorageError;
use crate::utils::{date_to_text, text_to_date, text_to_decimal};
use worthline_core::ledger::{InvestmentOrder, OrderAction, Transaction, TransactionKind, Transfer};

#[derive(
    Queryable, Identifiable, Selectable, Insertable, Serialize, Deserialize, Debug, Clone, PartialEq,
)]
#[diesel(table_name = crate::schema::transactions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TransactionDB {
    pub id: String,
    pub date: String,
    pub category: String,
    pub account: String,
    pub amount: String,
    pub currency: String,
    pub comment: String,
    pub kind: String,
    pub is_excluded: bool,
}

impl From<Transaction> for TransactionDB {
    fn from(domain: Transaction) -> Self {
        Self {
            id: domain.id,
            date: date_to_text(domain.date),
            category: domain.category,
            account: domain.account,
            amount: domain.amount.to_string(),
            currency: domain.currency,
            comment: domain.comment,
            kind: domain.kind.as_str().to_string(),
            is_excluded: domain.is_excluded,
        }
    }
}

impl TryFrom<TransactionDB> for Transaction {
    type Error = StorageError;

    fn try_from(db: TransactionDB) -> Result<Self, Self::Error> {
        let kind = TransactionKind::from_str(&db.kind)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;
        Ok(Transaction {
            date: text_to_date(&db.date)?,
            amount: text_to_decimal(&db.amount)?,
            id: db.id,
            category: db.category,
            account: db.account,
            currency: db.currency,
            comment: db.comment,
            kind,
            is_excluded: db.is_excluded,
        })
    }
}

#[derive(
    Queryable, Identifiable, Selectable, Insertable, Serialize, Deserialize, Debug, Clone, PartialEq,
)]
#[diesel(table_name = crate::schema::transfers)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TransferDB {
    pub id: String,
    pub date: String,
    pub source_account: String,
    pub target_account: String,
    pub amount: String,
    pub comment: String,
}

impl From<Transfer> for TransferDB {
    fn from(domain: Transfer) -> Self {
        Self {
            id: domain.id,
            date: date_to_text(domain.date),
            source_account: domain.source_account,
            target_account: domain.target_account,
            amount: domain.amount.to_string(),
            comment: domain.comment,
        }
    }
}

impl TryFrom<TransferDB> for Transfer {
    type Error = StorageError;

    fn try_from(db: TransferDB) -> Result<Self, Self::Error> {
        Ok(Transfer {
            date: text_to_date(&db.date)?,
            amount: text_to_decimal(&db.amount)?,
            id: db.id,
            source_account: db.source_account,
            target_account: db.target_account,
            comment: db.comment,
        })
    }
}

/// Database model for investment orders (`investments` table)
#[derive(
    Queryable, Identifiable, Selectable, Insertable, Serialize, Deserialize, Debug, Clone, PartialEq,
)]
#[diesel(table_name = crate::schema::investments)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct InvestmentDB {
    pub id: String,
    pub date: String,
    pub ticker: String,
    pub name: String,
    pub action: String,
    pub quantity: String,
    pub unit_price: String,
    pub fees: String,
    pub account: String,
    pub comment: String,
}

impl From<InvestmentOrder> for InvestmentDB {
    fn from(domain: InvestmentOrder) -> Self {
        Self {
            id: domain.id,
            date: date_to_text(domain.date),
            ticker: domain.ticker,
            name: domain.name,
            action: domain.action.as_str().to_string(),
            quantity: domain.quantity.to_string(),
            unit_price: domain.unit_price.to_string(),
            fees: domain.fees.to_string(),
            account: domain.account,
            comment: domain.comment,
        }
    }
}

impl TryFrom<InvestmentDB> for InvestmentOrder {
    type Error = StorageError;

    fn try_from(db: InvestmentDB) -> Result<Self, Self::Error> {
        let action = OrderAction::from_str(&db.action)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;
        Ok(InvestmentOrder {
            date: text_to_date(&db.date)?,
            quantity: text_to_decimal(&db.quantity)?,
            unit_price: text_to_decimal(&db.unit_price)?,
            fees: text_to_decimal(&db.fees)?,
            id: db.id,
            ticker: db.ticker,
            name: db.name,
            action,
            account: db.account,
            comment: db.comment,
        })
    }
}
