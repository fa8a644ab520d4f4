use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use worthline_core::{utils::time_utils::valuation_date_today, SnapshotLine, WealthTable};

use crate::{error::ApiResult, main_lib::AppState};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WealthQuery {
    start_date: Option<NaiveDate>,
}

/// The daily wealth table; the only output the display layer consumes.
async fn get_wealth(
    State(state): State<Arc<AppState>>,
    Query(q): Query<WealthQuery>,
) -> ApiResult<Json<WealthTable>> {
    let table = state
        .wealth_service
        .calculate_wealth_evolution(q.start_date)
        .await?;
    Ok(Json(table))
}

#[derive(Deserialize)]
struct SnapshotQuery {
    date: Option<NaiveDate>,
}

async fn get_snapshot(
    State(state): State<Arc<AppState>>,
    Query(q): Query<SnapshotQuery>,
) -> ApiResult<Json<Vec<SnapshotLine>>> {
    let target = q.date.unwrap_or_else(valuation_date_today);
    Ok(Json(state.snapshot_service.inspect(target)?))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/wealth", get(get_wealth))
        .route("/snapshot", get(get_snapshot))
}
