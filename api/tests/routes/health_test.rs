#[cfg(test)]
mod tests {
    use crate::helpers::{StubSource, get, make_test_app, read_json, seed_row};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use chrono::{TimeZone, Utc};
    use tower::ServiceExt;

    #[tokio::test]
    async fn health_on_empty_store_reports_ok_without_data() {
        let source = StubSource::ok(1000, 250);
        let (app, _db) = make_test_app(source.clone()).await;

        let response = get(&app, "/health").await;
        assert_eq!(response.status(), StatusCode::OK);

        let json = read_json(response).await;
        assert_eq!(json["status"], "ok");
        assert!(json["timestamp"].as_str().unwrap().ends_with('Z'));
        assert_eq!(json["latestData"], serde_json::json!([]));
        assert_eq!(source.calls(), 0);
    }

    #[tokio::test]
    async fn health_includes_latest_observation() {
        let (app, db) = make_test_app(StubSource::ok(1000, 250)).await;
        let older = Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap();
        let newer = Utc.with_ymd_and_hms(2025, 6, 1, 10, 30, 0).unwrap();
        seed_row(&db, newer, 1000, 400).await;
        seed_row(&db, older, 1000, 900).await;

        let json = read_json(get(&app, "/health").await).await;

        let latest = json["latestData"].as_array().unwrap();
        assert_eq!(latest.len(), 1);
        assert_eq!(latest[0]["remaining"], 400);
        assert_eq!(latest[0]["timestamp"], "2025-06-01T10:30:00Z");
        assert_eq!(latest[0]["limitName"], "DailyDurableStreamingApiEvents");
    }

    #[tokio::test]
    async fn cross_origin_requests_are_allowed() {
        let (app, _db) = make_test_app(StubSource::ok(1000, 250)).await;

        let req = Request::builder()
            .method("GET")
            .uri("/health")
            .header("origin", "http://dashboard.local")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["access-control-allow-origin"],
            "http://dashboard.local"
        );
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let (app, _db) = make_test_app(StubSource::ok(1000, 250)).await;
        let response = get(&app, "/nope").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
