//! Database model for cached daily prices.

use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::StorageError;
use crate::utils::{text_to_date, text_to_decimal};
use worthline_core::quotes::PricePoint;

/// One cached price, keyed by (ticker, date).
#[derive(
    Queryable, Identifiable, Selectable, Insertable, Debug, Clone, Serialize, Deserialize, PartialEq,
)]
#[diesel(table_name = crate::schema::quotes)]
#[diesel(primary_key(ticker, date))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct QuoteDB {
    pub ticker: String,
    pub date: String,
    pub price: String,
    pub source: String,
    pub created_at: String,
}

impl TryFrom<QuoteDB> for PricePoint {
    type Error = StorageError;

    fn try_from(db: QuoteDB) -> Result<Self, Self::Error> {
        Ok(PricePoint {
            date: text_to_date(&db.date)?,
            price: text_to_decimal(&db.price)?,
            ticker: db.ticker,
        })
    }
}
