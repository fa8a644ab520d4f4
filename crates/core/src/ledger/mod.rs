//! Ledger module - transactions, transfers and investment orders.
//!
//! The ledger is the append-mostly record every derived view is replayed
//! from. Only the exclusion flag on transactions is mutable after import.

mod ledger_model;
mod ledger_service;
mod ledger_traits;


pub use ledger_model::{
    parse_amount, InvestmentOrder, Ledger, NewInvestmentOrder, NewTransaction, NewTransfer,
    OrderAction, Transaction, TransactionKind, Transfer,
};
pub use ledger_service::{load_ledger, LedgerService};
pub use ledger_traits::{LedgerRepositoryTrait, LedgerServiceTrait};
