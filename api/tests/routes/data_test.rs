#[cfg(test)]
mod tests {
    use crate::helpers::{LIMIT, StubSource, get, make_test_app, read_json, seed_row};
    use axum::http::StatusCode;
    use chrono::{Duration, Utc};
    use db::models::rate_limit::Model as RateLimitModel;

    #[tokio::test]
    async fn data_returns_latest_row_without_fetching() {
        let source = StubSource::ok(1000, 10);
        let (app, db) = make_test_app(source.clone()).await;
        let now = Utc::now();
        seed_row(&db, now - Duration::hours(1), 1000, 900).await;
        let newest = seed_row(&db, now, 1000, 250).await;

        let response = get(&app, "/data").await;
        assert_eq!(response.status(), StatusCode::OK);

        let json = read_json(response).await;
        let rows = json.as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["id"], newest.id);
        assert_eq!(rows[0]["inUse"], 750);
        assert_eq!(rows[0]["inUsePercent"], 75.0);
        assert_eq!(source.calls(), 0);
    }

    #[tokio::test]
    async fn data_on_empty_store_fetches_inline_and_persists() {
        let source = StubSource::ok(1000, 250);
        let (app, db) = make_test_app(source.clone()).await;

        let json = read_json(get(&app, "/data").await).await;

        let rows = json.as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["limitName"], LIMIT);
        assert_eq!(rows[0]["remaining"], 250);
        assert_eq!(source.calls(), 1);

        let stored = RateLimitModel::latest(&db).await.unwrap().unwrap();
        assert_eq!(rows[0]["id"], stored.id);
    }

    #[tokio::test]
    async fn data_on_empty_store_with_failing_upstream_is_500() {
        let (app, db) = make_test_app(StubSource::failing()).await;

        let response = get(&app, "/data").await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = read_json(response).await;
        assert!(json["error"].as_str().unwrap().contains("503"));
        assert!(RateLimitModel::latest(&db).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn fetch_now_appends_and_returns_row_object() {
        let source = StubSource::ok(500, 500);
        let (app, db) = make_test_app(source.clone()).await;
        seed_row(&db, Utc::now() - Duration::minutes(30), 500, 100).await;

        let response = get(&app, "/fetch-now").await;
        assert_eq!(response.status(), StatusCode::OK);

        let json = read_json(response).await;
        assert!(json.is_object());
        assert_eq!(json["inUse"], 0);
        assert_eq!(json["inUsePercent"], 200.0);
        assert_eq!(source.calls(), 1);

        let all = RateLimitModel::newest_first(&db, None).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, json["id"].as_i64().unwrap());
    }

    #[tokio::test]
    async fn fetch_now_failure_is_500_and_writes_nothing() {
        let (app, db) = make_test_app(StubSource::failing()).await;

        let response = get(&app, "/fetch-now").await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = read_json(response).await;
        assert!(json["error"].is_string());
        assert!(RateLimitModel::newest_first(&db, None).await.unwrap().is_empty());
    }
}
