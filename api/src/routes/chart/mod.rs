use crate::state::AppState;
use axum::{Router, routing::get};

pub mod get;

pub fn chart_routes() -> Router<AppState> {
    Router::new().route("/chart", get(get::chart_page))
}
