use axum::response::Html;

const CHART_PAGE: &str = include_str!("../../../assets/chart.html");

/// GET /chart
///
/// Static page that polls `/chart-data-json` and renders usage as a bar chart.
pub async fn chart_page() -> Html<&'static str> {
    Html(CHART_PAGE)
}
