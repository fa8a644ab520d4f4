use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};
use chrono::NaiveDate;
use serde::Deserialize;
use worthline_core::{quotes::SyncResult, utils::time_utils::valuation_date_today};

use crate::{
    error::{ApiError, ApiJson, ApiResult},
    main_lib::AppState,
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SyncBody {
    tickers: Vec<String>,
    start_date: NaiveDate,
}

/// Downloads missing prices. Provider failures come back inside the
/// result, not as an error status.
async fn sync_market_data(
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<SyncBody>,
) -> ApiResult<Json<SyncResult>> {
    let today = valuation_date_today();
    if body.start_date > today {
        return Err(ApiError::BadRequest(format!(
            "startDate {} is after today",
            body.start_date
        )));
    }

    let tickers: Vec<String> = body
        .tickers
        .iter()
        .map(|t| t.trim().to_uppercase())
        .filter(|t| !t.is_empty())
        .collect();

    let result = state
        .quote_service
        .ensure_coverage(&tickers, body.start_date, today)
        .await;
    if !result.is_success() {
        tracing::warn!("Market data sync incomplete: {}", result.summary());
    }
    Ok(Json(result))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/market-data/sync", post(sync_market_data))
}
