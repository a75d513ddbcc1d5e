use crate::state::AppState;
use axum::{Router, routing::get};

pub mod get;

/// Builds the `/data` and `/fetch-now` routes.
pub fn data_routes() -> Router<AppState> {
    Router::new()
        .route("/data", get(get::get_latest))
        .route("/fetch-now", get(get::fetch_now))
}
