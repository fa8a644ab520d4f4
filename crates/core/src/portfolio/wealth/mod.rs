//! Wealth evolution module.
//!
//! Replays the ledger day by day against the filled price matrix and emits
//! one row per calendar date with a value per account plus the invested and
//! total aggregates.

mod wealth_calculator;
mod wealth_model;
mod wealth_service;
mod wealth_traits;

#[cfg(test)]
mod wealth_service_tests;

pub use wealth_calculator::calculate_wealth;
pub use wealth_model::{WealthRow, WealthTable};
pub use wealth_service::WealthService;
pub use wealth_traits::WealthServiceTrait;
