//! Worthline Core - Domain entities, services, and traits.
//!
//! This crate contains the ledger model, the market price cache and the
//! wealth evolution engine. It is database-agnostic and defines traits that
//! are implemented by the `storage-sqlite` crate.

pub mod accounts;
pub mod constants;
pub mod errors;
pub mod ledger;
pub mod portfolio;
pub mod quotes;
pub mod utils;

pub use portfolio::*;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
