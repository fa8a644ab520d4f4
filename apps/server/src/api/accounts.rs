use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use worthline_core::{
    accounts::{Account, NewAccount},
    utils::decimal_input_format,
};

use crate::{
    error::{ApiJson, ApiResult},
    main_lib::AppState,
};

async fn list_accounts(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Account>>> {
    Ok(Json(state.account_service.list_accounts()?))
}

async fn create_account(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<NewAccount>,
) -> ApiResult<Json<Account>> {
    let created = state.account_service.create_account(payload).await?;
    Ok(Json(created))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct InitialBalanceBody {
    #[serde(deserialize_with = "decimal_input_format::deserialize_decimal")]
    initial_balance: Decimal,
}

async fn update_initial_balance(
    Path(name): Path<String>,
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<InitialBalanceBody>,
) -> ApiResult<Json<Account>> {
    let updated = state
        .account_service
        .update_initial_balance(&name, body.initial_balance)
        .await?;
    Ok(Json(updated))
}

#[derive(Serialize)]
struct SyncAccountsResponse {
    created: usize,
}

/// Creates accounts referenced by ledger history but missing from the account set.
async fn sync_accounts(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<SyncAccountsResponse>> {
    let created = state.ledger_service.sync_accounts_from_history().await?;
    Ok(Json(SyncAccountsResponse { created }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/accounts", get(list_accounts).post(create_account))
        .route(
            "/accounts/{name}/initial-balance",
            put(update_initial_balance),
        )
        .route("/accounts/sync", post(sync_accounts))
}
