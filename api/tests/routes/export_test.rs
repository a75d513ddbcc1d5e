#[cfg(test)]
mod tests {
    use crate::helpers::{
        StubSource, get, make_test_app, make_test_app_in, read_body, read_json, seed_row,
    };
    use axum::http::{StatusCode, header};
    use chrono::{Duration, TimeZone, Utc};

    #[tokio::test]
    async fn download_csv_on_empty_store_is_404() {
        let (app, _db) = make_test_app(StubSource::ok(1000, 250)).await;

        let response = get(&app, "/download-csv").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let json = read_json(response).await;
        assert_eq!(json["error"], "No data available to download.");
    }

    #[tokio::test]
    async fn download_csv_returns_attachment_newest_first_in_local_time() {
        let (app, db) = make_test_app(StubSource::ok(1000, 250)).await;
        let morning = Utc.with_ymd_and_hms(2025, 6, 1, 9, 30, 0).unwrap();
        let first = seed_row(&db, morning, 1000, 1000).await;
        let second = seed_row(&db, morning + Duration::hours(1), 1000, 250).await;

        let response = get(&app, "/download-csv").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/csv");
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"rate_limits.csv\""
        );

        let body = read_body(response).await;
        let lines: Vec<&str> = body.lines().collect();
        assert_eq!(
            lines,
            vec![
                "id,timestamp,limitName,maximum,remaining,inUse,inUsePercent".to_string(),
                format!(
                    "{},2025-06-01 17:30,DailyDurableStreamingApiEvents,1000,250,750,75",
                    second.id
                ),
                format!(
                    "{},2025-06-01 16:30,DailyDurableStreamingApiEvents,1000,1000,0,200",
                    first.id
                ),
            ]
        );
    }

    #[tokio::test]
    async fn download_csv_honours_display_zone() {
        let (app, db) = make_test_app_in(StubSource::ok(1000, 250), chrono_tz::Tz::UTC).await;
        let late = Utc.with_ymd_and_hms(2025, 6, 1, 23, 5, 0).unwrap();
        seed_row(&db, late, 1000, 250).await;

        let body = read_body(get(&app, "/download-csv").await).await;
        assert!(body.contains(",2025-06-01 23:05,"));
    }

    #[tokio::test]
    async fn chart_data_on_empty_store_is_404() {
        let (app, _db) = make_test_app(StubSource::ok(1000, 250)).await;

        let response = get(&app, "/chart-data-json").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let json = read_json(response).await;
        assert_eq!(json["error"], "No data available for chart.");
    }

    #[tokio::test]
    async fn chart_data_defaults_to_two_day_window() {
        let (app, db) = make_test_app(StubSource::ok(1000, 250)).await;
        let now = Utc::now();
        seed_row(&db, now - Duration::days(5), 1000, 990).await;
        let mid = seed_row(&db, now - Duration::hours(30), 1000, 700).await;
        let recent = seed_row(&db, now - Duration::hours(1), 1000, 400).await;

        let response = get(&app, "/chart-data-json").await;
        assert_eq!(response.status(), StatusCode::OK);

        let json = read_json(response).await;
        let data = json["data"].as_array().unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data[0]["id"], recent.id);
        assert_eq!(data[0]["inUsePercent"], 60.0);
        assert_eq!(data[1]["id"], mid.id);
        let shown = data[0]["timestamp"].as_str().unwrap();
        assert_eq!(shown.len(), "2025-06-01 17:30".len());
        assert!(data[0].get("remaining").is_none());
    }

    #[tokio::test]
    async fn chart_data_respects_last_day() {
        let (app, db) = make_test_app(StubSource::ok(1000, 250)).await;
        let now = Utc::now();
        seed_row(&db, now - Duration::days(5), 1000, 990).await;
        seed_row(&db, now - Duration::hours(30), 1000, 700).await;
        seed_row(&db, now - Duration::hours(1), 1000, 400).await;

        let week = read_json(get(&app, "/chart-data-json?lastDay=7").await).await;
        assert_eq!(week["data"].as_array().unwrap().len(), 3);

        let day = read_json(get(&app, "/chart-data-json?lastDay=1").await).await;
        assert_eq!(day["data"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn chart_data_window_with_nothing_recent_is_404() {
        let (app, db) = make_test_app(StubSource::ok(1000, 250)).await;
        seed_row(&db, Utc::now() - Duration::days(10), 1000, 990).await;

        let response = get(&app, "/chart-data-json?lastDay=1").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
