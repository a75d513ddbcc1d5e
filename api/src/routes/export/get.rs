use crate::{response::error_response, state::AppState};
use axum::{
    Json,
    extract::{Query, State},
    http::{
        HeaderMap, HeaderValue, StatusCode,
        header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    },
    response::{IntoResponse, Response},
};
use chrono::{DateTime, TimeDelta, Utc};
use chrono_tz::Tz;
use db::models::rate_limit::Model as RateLimitModel;
use serde::{Deserialize, Serialize};
use util::dates::format_local;

/// Column order matches the JSON field names of an observation.
pub const CSV_HEADER: &str = "id,timestamp,limitName,maximum,remaining,inUse,inUsePercent";

pub const DEFAULT_LAST_DAYS: i64 = 2;

/// Renders rows as CSV, one line per row, no trailing newline.
pub fn rows_to_csv(rows: &[RateLimitModel], tz: Tz) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(CSV_HEADER.to_string());
    for r in rows {
        lines.push(format!(
            "{},{},{},{},{},{},{}",
            r.id,
            format_local(r.timestamp, tz),
            r.limit_name,
            r.maximum,
            r.remaining,
            r.in_use,
            r.in_use_percent
        ));
    }
    lines.join("\n")
}

/// GET /download-csv
///
/// Full history, newest first, as a CSV attachment. Timestamps are shown as
/// `YYYY-MM-DD HH:mm` in the display timezone.
///
/// ### Responses
/// - `200 OK` with `Content-Disposition: attachment; filename="rate_limits.csv"`
/// ```text
/// id,timestamp,limitName,maximum,remaining,inUse,inUsePercent
/// 2,2025-06-01 17:30,DailyDurableStreamingApiEvents,1000,250,750,75
/// ```
/// - `404 Not Found` with `{ "error": "No data available to download." }`
/// - `500 Internal Server Error` on read failure
pub async fn download_csv(State(state): State<AppState>) -> Response {
    tracing::info!("Download CSV endpoint called");
    let rows = match RateLimitModel::newest_first(state.db(), None).await {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!(error = %e, "Failed to read rows for CSV export");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string());
        }
    };

    if rows.is_empty() {
        return error_response(StatusCode::NOT_FOUND, "No data available to download.");
    }

    let csv = rows_to_csv(&rows, state.display_tz());

    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/csv"));
    headers.insert(
        CONTENT_DISPOSITION,
        HeaderValue::from_static("attachment; filename=\"rate_limits.csv\""),
    );

    tracing::info!(rows = rows.len(), "CSV download initiated");
    (headers, csv).into_response()
}

#[derive(Debug, Deserialize)]
pub struct ChartQuery {
    /// Window size in days. The chart page offers 1 to 7.
    #[serde(rename = "lastDay")]
    pub last_day: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    pub id: i64,
    pub timestamp: String,
    pub in_use_percent: f64,
}

#[derive(Debug, Serialize)]
pub struct ChartData {
    pub data: Vec<ChartPoint>,
}

/// Lower bound of a `days`-long window ending at `now`.
///
/// Returns `None` when the window reaches past the representable range, which
/// means "no lower bound".
pub fn window_start(now: DateTime<Utc>, days: i64) -> Option<DateTime<Utc>> {
    TimeDelta::try_days(days).and_then(|d| now.checked_sub_signed(d))
}

/// GET /chart-data-json?lastDay=N
///
/// Observations from the last `N` days (default 2), newest first.
///
/// ### Responses
/// - `200 OK`
/// ```json
/// { "data": [ { "id": 9, "timestamp": "2025-06-01 17:30", "inUsePercent": 75.0 } ] }
/// ```
/// - `404 Not Found` with `{ "error": "No data available for chart." }`
/// - `500 Internal Server Error` on read failure
pub async fn chart_data_json(
    State(state): State<AppState>,
    Query(query): Query<ChartQuery>,
) -> Response {
    let days = query.last_day.unwrap_or(DEFAULT_LAST_DAYS);
    tracing::info!(days, "Chart data JSON endpoint called");

    let since = window_start(Utc::now(), days);
    let rows = match RateLimitModel::newest_first(state.db(), since).await {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!(error = %e, "Failed to read rows for chart");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string());
        }
    };

    if rows.is_empty() {
        return error_response(StatusCode::NOT_FOUND, "No data available for chart.");
    }

    let tz = state.display_tz();
    let data = rows
        .into_iter()
        .map(|r| ChartPoint {
            id: r.id,
            timestamp: format_local(r.timestamp, tz),
            in_use_percent: r.in_use_percent,
        })
        .collect();

    Json(ChartData { data }).into_response()
}
