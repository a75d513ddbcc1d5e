use crate::state::AppState;
use axum::{Router, routing::get};

pub mod get;

/// Builds the history export routes.
pub fn export_routes() -> Router<AppState> {
    Router::new()
        .route("/download-csv", get(get::download_csv))
        .route("/chart-data-json", get(get::chart_data_json))
}
