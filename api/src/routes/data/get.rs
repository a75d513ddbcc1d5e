use crate::{response::error_response, state::AppState};
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use db::models::rate_limit::Model as RateLimitModel;

/// GET /data
///
/// Returns the most recent observation as a one-element array. On an empty
/// store this performs a fetch-and-persist inline and returns the new row.
/// The inline fetch does not count toward the poller's retry budget.
///
/// ### Responses
/// - `200 OK`
/// ```json
/// [
///   {
///     "id": 1,
///     "timestamp": "2025-06-01T10:00:00Z",
///     "limitName": "DailyDurableStreamingApiEvents",
///     "maximum": 1000,
///     "remaining": 250,
///     "inUse": 750,
///     "inUsePercent": 75.0
///   }
/// ]
/// ```
/// - `500 Internal Server Error` with `{ "error": "..." }` on storage or upstream failure
pub async fn get_latest(State(state): State<AppState>) -> Response {
    match RateLimitModel::latest(state.db()).await {
        Ok(Some(row)) => Json(vec![row]).into_response(),
        Ok(None) => {
            tracing::info!("No data found in DB, fetching initial data");
            match state.ingestor().fetch_and_store().await {
                Ok(row) => Json(vec![row]).into_response(),
                Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "Error reading data from DB");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

/// GET /fetch-now
///
/// Forces one fetch-and-persist cycle and returns the stored observation.
/// Works even when scheduled polling is suspended, and leaves the poller's
/// failure counter untouched.
///
/// ### Responses
/// - `200 OK` with the stored observation object
/// - `500 Internal Server Error` with `{ "error": "..." }`
pub async fn fetch_now(State(state): State<AppState>) -> Response {
    tracing::info!("Manual trigger: fetching limits");
    match state.ingestor().fetch_and_store().await {
        Ok(row) => Json(row).into_response(),
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}
