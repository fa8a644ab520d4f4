//! Helpers shared by the repositories.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::errors::StorageError;

/// Maximum number of bound parameters per statement chunk.
///
/// SQLite's default `SQLITE_MAX_VARIABLE_NUMBER` is 999; 500 leaves room for
/// the other parameters of the query.
pub const SQLITE_MAX_PARAMS_CHUNK: usize = 500;

/// Splits `items` into slices small enough for one `IN (...)` query or one
/// multi-row insert.
pub fn chunk_for_sqlite<T>(items: &[T]) -> impl Iterator<Item = &[T]> {
    items.chunks(SQLITE_MAX_PARAMS_CHUNK)
}

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// ISO dates sort lexicographically, so range filters can compare the text.
pub fn date_to_text(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn text_to_date(value: &str) -> Result<NaiveDate, StorageError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|e| StorageError::SerializationError(format!("date '{}': {}", value, e)))
}

pub fn text_to_decimal(value: &str) -> Result<Decimal, StorageError> {
    Decimal::from_str(value)
        .map_err(|e| StorageError::SerializationError(format!("decimal '{}': {}", value, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_chunk_for_sqlite_empty() {
        let items: Vec<i32> = vec![];
        assert_eq!(chunk_for_sqlite(&items).count(), 0);
    }

    #[test]
    fn test_chunk_for_sqlite_over_limit() {
        let items: Vec<i32> = (0..1200).collect();
        let chunks: Vec<_> = chunk_for_sqlite(&items).collect();
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].len(), SQLITE_MAX_PARAMS_CHUNK);
        assert_eq!(chunks[2].len(), 200);
    }

    #[test]
    fn test_dates_sort_as_text() {
        let a = date_to_text(NaiveDate::from_ymd_opt(2023, 9, 30).unwrap());
        let b = date_to_text(NaiveDate::from_ymd_opt(2023, 10, 1).unwrap());
        assert!(a < b);
        assert_eq!(text_to_date(&b).unwrap(), NaiveDate::from_ymd_opt(2023, 10, 1).unwrap());
    }

    #[test]
    fn test_decimal_text_is_exact() {
        assert_eq!(text_to_decimal("0.1").unwrap() + text_to_decimal("0.2").unwrap(), dec!(0.3));
        assert!(text_to_decimal("abc").is_err());
        assert!(text_to_date("2023/01/01").is_err());
    }
}
