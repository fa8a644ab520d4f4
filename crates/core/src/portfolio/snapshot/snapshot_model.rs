use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineType {
    Liquidity,
    Investment,
}

/// One row of the snapshot table.
///
/// For liquidity lines `quantity` and `value` are the cash balance and
/// `unit_price` is one.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotLine {
    pub account: String,
    pub line_type: LineType,
    pub ticker: String,
    pub name: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub value: Decimal,
}
