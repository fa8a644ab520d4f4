use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use worthline_core::{
    ledger::{Transaction, TransactionKind},
    CashFlowSummary, DailyChange,
};

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

#[derive(Deserialize)]
struct SummaryQuery {
    year: Option<i32>,
}

async fn get_summary(
    State(state): State<Arc<AppState>>,
    Query(q): Query<SummaryQuery>,
) -> ApiResult<Json<CashFlowSummary>> {
    Ok(Json(state.cash_flow_service.summarize(q.year)?))
}

async fn get_daily_changes(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<DailyChange>>> {
    Ok(Json(state.cash_flow_service.daily_changes()?))
}

#[derive(Deserialize)]
struct OutlierQuery {
    threshold: Decimal,
    kind: Option<String>,
    year: Option<i32>,
}

async fn get_outliers(
    State(state): State<Arc<AppState>>,
    Query(q): Query<OutlierQuery>,
) -> ApiResult<Json<Vec<Transaction>>> {
    let kind = match q.kind.as_deref() {
        None => TransactionKind::Expense,
        Some(raw) => raw
            .parse::<TransactionKind>()
            .map_err(|e| ApiError::BadRequest(e.to_string()))?,
    };
    let outliers = state
        .cash_flow_service
        .find_outliers(q.threshold, kind, q.year)?;
    Ok(Json(outliers))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/cash-flow", get(get_summary))
        .route("/cash-flow/daily", get(get_daily_changes))
        .route("/cash-flow/outliers", get(get_outliers))
}
