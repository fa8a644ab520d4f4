//! Cash-flow summary over bank transactions.

mod cash_flow_model;
mod cash_flow_service;
mod cash_flow_traits;


pub use cash_flow_model::{CashFlowSummary, CategoryTotal, DailyChange, MonthlyTotals};
pub use cash_flow_service::CashFlowService;
pub use cash_flow_traits::CashFlowServiceTrait;
