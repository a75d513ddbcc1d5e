//! HTTP route entry point.
//!
//! Route groups:
//! - `/health` → liveness plus latest observation
//! - `/data`, `/fetch-now` → latest observation and manual fetch trigger
//! - `/download-csv`, `/chart-data-json` → history exports
//! - `/chart` → static dashboard page

use crate::middleware::log_request;
use crate::routes::{
    chart::chart_routes, data::data_routes, export::export_routes, health::health_routes,
};
use crate::state::AppState;
use axum::{
    Router,
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    middleware::from_fn,
};
use tower_http::cors::CorsLayer;

pub mod chart;
pub mod data;
pub mod export;
pub mod health;

/// Builds the router for all HTTP endpoints with `AppState` applied.
pub fn routes(app_state: AppState) -> Router {
    Router::new()
        .merge(health_routes())
        .merge(data_routes())
        .merge(export_routes())
        .merge(chart_routes())
        .with_state(app_state)
}

/// [`routes`] wrapped in request logging and a permissive CORS layer.
pub fn app(app_state: AppState) -> Router {
    let cors = CorsLayer::very_permissive().expose_headers([CONTENT_DISPOSITION, CONTENT_TYPE]);

    routes(app_state).layer(from_fn(log_request)).layer(cors)
}
