//! Worthline Market Data Crate
//!
//! This crate provides the external price sources consumed by the price
//! cache in `worthline-core`. It knows nothing about the ledger or the cache:
//! a provider is asked for the daily closes of one ticker over a date range
//! and either returns them or fails.
//!
//! # Architecture
//!
//! ```text
//! QuoteSyncService (core) --> MarketDataClient (core)
//!                                     |
//!                                     v
//!                          +---------------------+
//!                          | MarketDataProvider  |  (this crate)
//!                          +---------------------+
//!                                     |
//!                                     v
//!                          +---------------------+
//!                          |    YahooProvider    |
//!                          +---------------------+
//! ```
//!
//! # Core Types
//!
//! - [`MarketDataProvider`] - The trait every price source implements
//! - [`Quote`] - One daily bar with close and adjusted-close fields
//! - [`MarketDataError`] - Provider failures with a [`RetryClass`]

pub mod errors;
pub mod models;
pub mod provider;

pub use errors::{MarketDataError, RetryClass};
pub use models::Quote;
pub use provider::yahoo::YahooProvider;
pub use provider::{MarketDataProvider, RateLimit};
