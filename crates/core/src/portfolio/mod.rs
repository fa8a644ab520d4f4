//! Derived views replayed from the ledger: the daily wealth table, the
//! point-in-time snapshot and the cash-flow summary.

pub mod cash_flow;
pub mod replay;
pub mod snapshot;
pub mod wealth;

pub use cash_flow::*;
pub use snapshot::*;
pub use wealth::*;
