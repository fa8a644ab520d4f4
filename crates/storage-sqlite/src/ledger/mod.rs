//! SQLite storage implementation for the ledger tables.

mod model;
mod repository;

pub use model::{InvestmentDB, TransactionDB, TransferDB};
pub use repository::LedgerRepository;
