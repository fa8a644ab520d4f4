/// Classification for retry policy.
///
/// Used by the market data client to decide whether a failed fetch is worth
/// a second attempt before the range is reported as failed.
///
/// | Class | Retry? |
/// |-------|--------|
/// | `Never` | No |
/// | `WithBackoff` | Yes, after a short delay |
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RetryClass {
    /// Never retry - bad symbol, empty range, or malformed data.
    /// The request is fundamentally invalid and retrying won't help.
    Never,

    /// Retry after a delay.
    ///
    /// Used for transient errors like rate limiting (429) or timeouts.
    WithBackoff,
}
