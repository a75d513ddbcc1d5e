use crate::{response::error_response, state::AppState};
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::{SecondsFormat, Utc};
use db::models::rate_limit::Model as RateLimitModel;
use serde_json::json;

/// Builds the `/health` route.
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

/// GET /health
///
/// Confirms the store answers a query and returns the latest observation.
///
/// ### Response
/// - `200 OK`
/// ```json
/// {
///   "status": "ok",
///   "timestamp": "2025-06-01T10:00:00.000Z",
///   "latestData": [ { "id": 12, "timestamp": "...", "limitName": "...", ... } ]
/// }
/// ```
/// `latestData` is empty when nothing has been stored yet.
///
/// - `500 Internal Server Error` when the store cannot be queried
pub async fn health_check(State(state): State<AppState>) -> Response {
    match RateLimitModel::latest(state.db()).await {
        Ok(latest) => {
            tracing::debug!("Health check: database connection is active");
            let latest_data: Vec<RateLimitModel> = latest.into_iter().collect();
            Json(json!({
                "status": "ok",
                "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
                "latestData": latest_data,
            }))
            .into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Health check failed to read database");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}
