//! SQLite storage implementation for Worthline.
//!
//! This crate implements the repository and store traits defined in
//! `worthline-core` using Diesel over SQLite:
//! - connection pooling and the single writer actor
//! - embedded migrations
//! - the accounts, ledger and price cache repositories
//!
//! ```text
//!        core (domain, engine)
//!                │
//!                ▼
//!   storage-sqlite (this crate)
//!                │
//!                ▼
//!            SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod schema;
pub mod utils;

pub mod accounts;
pub mod ledger;
pub mod market_data;

#[cfg(test)]
mod test_support;

pub use db::{
    create_pool, get_connection, init, open, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};

pub use errors::{IntoCore, StorageError};

pub use accounts::AccountRepository;
pub use ledger::LedgerRepository;
pub use market_data::QuoteRepository;

pub use worthline_core::errors::{DatabaseError, Error, Result};
