/// Ticker label used for cash lines in a snapshot
pub const CASH_TICKER: &str = "CASH";

/// Display name used for cash lines in a snapshot
pub const CASH_DISPLAY_NAME: &str = "Cash";

/// Balances and quantities at or below this magnitude are treated as empty
pub const SNAPSHOT_EPSILON: &str = "0.000001";

/// Default currency recorded on imported transactions without one
pub const DEFAULT_CURRENCY: &str = "EUR";
