//! SQLite storage implementation for the daily price cache.

mod model;
mod repository;

pub use model::QuoteDB;
pub use repository::QuoteRepository;
