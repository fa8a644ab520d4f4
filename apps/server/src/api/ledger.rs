use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use worthline_core::ledger::{
    InvestmentOrder, NewInvestmentOrder, NewTransaction, NewTransfer, Transaction,
};

use crate::{
    error::{ApiJson, ApiResult},
    main_lib::AppState,
};

#[derive(Deserialize)]
struct YearQuery {
    year: Option<i32>,
}

#[derive(Serialize)]
struct InsertedResponse {
    inserted: usize,
}

/// All transactions including excluded ones, newest first.
async fn list_transactions(
    State(state): State<Arc<AppState>>,
    Query(q): Query<YearQuery>,
) -> ApiResult<Json<Vec<Transaction>>> {
    Ok(Json(state.ledger_service.list_transactions(q.year)?))
}

async fn record_transactions(
    State(state): State<Arc<AppState>>,
    ApiJson(batch): ApiJson<Vec<NewTransaction>>,
) -> ApiResult<Json<InsertedResponse>> {
    let inserted = state.ledger_service.record_transactions(batch).await?;
    Ok(Json(InsertedResponse { inserted }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExclusionBody {
    is_excluded: bool,
}

async fn set_transaction_excluded(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<ExclusionBody>,
) -> ApiResult<Json<Transaction>> {
    let updated = state
        .ledger_service
        .set_transaction_excluded(&id, body.is_excluded)
        .await?;
    Ok(Json(updated))
}

async fn record_transfers(
    State(state): State<Arc<AppState>>,
    ApiJson(batch): ApiJson<Vec<NewTransfer>>,
) -> ApiResult<Json<InsertedResponse>> {
    let inserted = state.ledger_service.record_transfers(batch).await?;
    Ok(Json(InsertedResponse { inserted }))
}

async fn list_investments(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<InvestmentOrder>>> {
    Ok(Json(state.ledger_service.list_investment_orders()?))
}

async fn record_investment(
    State(state): State<Arc<AppState>>,
    ApiJson(order): ApiJson<NewInvestmentOrder>,
) -> ApiResult<Json<InvestmentOrder>> {
    let recorded = state.ledger_service.record_investment_order(order).await?;
    Ok(Json(recorded))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/transactions",
            get(list_transactions).post(record_transactions),
        )
        .route(
            "/transactions/{id}/exclusion",
            put(set_transaction_excluded),
        )
        .route("/transfers", post(record_transfers))
        .route("/investments", get(list_investments).post(record_investment))
}
