//! Deserializers for amounts arriving at the import boundary.
//!
//! Bank exports and hand-written payloads send amounts either as JSON
//! numbers or as strings such as `"1 234,56"`. Strings go through
//! [`parse_amount`] so both forms land on the same `Decimal`.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::Number;

use crate::ledger::parse_amount;

#[derive(Deserialize)]
#[serde(untagged)]
enum DecimalInput {
    String(String),
    Number(Number),
    Null,
}

fn number_to_decimal(value: &Number) -> Result<Decimal, String> {
    let text = value.to_string();
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|e| format!("Invalid decimal value '{}': {}", text, e))
}

fn to_decimal(input: DecimalInput) -> Result<Option<Decimal>, String> {
    match input {
        DecimalInput::String(s) => parse_amount(&s).map(Some).map_err(|e| e.to_string()),
        DecimalInput::Number(n) => number_to_decimal(&n).map(Some),
        DecimalInput::Null => Ok(None),
    }
}

/// Required amount: a number or a locale-formatted string.
pub fn deserialize_decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let input = DecimalInput::deserialize(deserializer)?;
    to_decimal(input)
        .map_err(serde::de::Error::custom)?
        .ok_or_else(|| serde::de::Error::custom("amount must not be null"))
}

/// Amount that defaults to zero when null. Pair with `#[serde(default)]`
/// for fields that may be omitted entirely.
pub fn deserialize_decimal_or_zero<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let input = DecimalInput::deserialize(deserializer)?;
    to_decimal(input)
        .map(|v| v.unwrap_or(Decimal::ZERO))
        .map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Row {
        #[serde(deserialize_with = "deserialize_decimal")]
        amount: Decimal,
        #[serde(default, deserialize_with = "deserialize_decimal_or_zero")]
        fees: Decimal,
    }

    #[test]
    fn accepts_json_numbers() {
        let row: Row = serde_json::from_value(json!({ "amount": 12.5, "fees": 1 })).unwrap();
        assert_eq!(row.amount, dec!(12.5));
        assert_eq!(row.fees, dec!(1));
    }

    #[test]
    fn accepts_locale_formatted_strings() {
        let row: Row =
            serde_json::from_value(json!({ "amount": "1 234,56", "fees": "0,5" })).unwrap();
        assert_eq!(row.amount, dec!(1234.56));
        assert_eq!(row.fees, dec!(0.5));

        let row: Row = serde_json::from_value(json!({ "amount": "-12\u{a0}000,10" })).unwrap();
        assert_eq!(row.amount, dec!(-12000.10));
    }

    #[test]
    fn missing_or_null_fees_default_to_zero() {
        let row: Row = serde_json::from_value(json!({ "amount": "3" })).unwrap();
        assert_eq!(row.fees, Decimal::ZERO);

        let row: Row = serde_json::from_value(json!({ "amount": "3", "fees": null })).unwrap();
        assert_eq!(row.fees, Decimal::ZERO);
    }

    #[test]
    fn rejects_garbage_and_null_amounts() {
        let err = serde_json::from_value::<Row>(json!({ "amount": "12,3,4" })).unwrap_err();
        assert!(err.to_string().contains("not a valid amount"));

        assert!(serde_json::from_value::<Row>(json!({ "amount": null })).is_err());
        assert!(serde_json::from_value::<Row>(json!({ "amount": "" })).is_err());
    }
}
