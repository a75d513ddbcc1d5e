#[cfg(test)]
mod tests {
    use crate::helpers::{StubSource, get, make_test_app, read_body};
    use axum::http::{StatusCode, header};

    #[tokio::test]
    async fn chart_page_is_served_as_html() {
        let (app, _db) = make_test_app(StubSource::ok(1000, 250)).await;

        let response = get(&app, "/chart").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(
            response.headers()[header::CONTENT_TYPE]
                .to_str()
                .unwrap()
                .starts_with("text/html")
        );

        let body = read_body(response).await;
        assert!(body.contains("apexcharts"));
        assert!(body.contains("/chart-data-json?lastDay="));
        assert!(body.contains("Refresh"));
    }
}
