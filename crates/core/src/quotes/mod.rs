//! Market price cache module.
//!
//! - [`model`] - Price points and the forward/backward-filled price matrix
//! - [`store`] - Storage trait for the persisted per-(ticker, date) cache
//! - [`client`] - Facade over the market-data crate providers
//! - [`sync`] - Gap detection and concurrent range fetching
//! - [`service`] - Unified service used by the wealth engine
//!
//! # Architecture
//!
//! ```text
//! QuoteService ─► QuoteSyncService ─► MarketDataClient ─► market-data crate
//!       │                 │
//!       └────────► QuoteStore (DB) ◄┘
//! ```

pub mod client;
pub mod constants;
pub mod model;
pub mod service;
pub mod store;
pub mod sync;


pub use client::MarketDataClient;
pub use model::{PriceMatrix, PricePoint};
pub use service::{QuoteService, QuoteServiceTrait};
pub use store::QuoteStore;
pub use sync::{FetchRange, QuoteSyncService, RangeFailure, SyncResult};
