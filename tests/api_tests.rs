use std::sync::Arc;

use axum_test::TestServer;

use release_radar_api::error::{AppError, AppResult};
use release_radar_api::models::{ContentType, Release};
use release_radar_api::routes::create_router;
use release_radar_api::services::ReleaseProvider;

/// Provider serving a canned feed, standing in for the upstream vendor
struct StubFeed {
    releases: Vec<Release>,
    fail: bool,
}

#[async_trait::async_trait]
impl ReleaseProvider for StubFeed {
    async fn fetch_upcoming(&self) -> AppResult<Vec<Release>> {
        if self.fail {
            return Err(AppError::ExternalApi(
                "Release feed payload is not a list".to_string(),
            ));
        }
        Ok(self.releases.clone())
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

fn release(id: &str, title: &str, content_type: ContentType, date: &str) -> Release {
    Release {
        id: id.to_string(),
        title: title.to_string(),
        content_type,
        release_date: date.to_string(),
        region: Some("CN".to_string()),
        cover: None,
        episodes: None,
    }
}

fn create_test_server(releases: Vec<Release>) -> TestServer {
    let provider = Arc::new(StubFeed {
        releases,
        fail: false,
    });
    TestServer::new(create_router(provider)).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server(vec![]);
    let response = server.get("/health").await;
    response.assert_status_ok();
}

#[tokio::test]
async fn test_calendar_curates_feed() {
    let server = create_test_server(vec![
        release("movie", "孤岛", ContentType::Movie, "2025-01-16"),
        release("dup-late", "风云", ContentType::Tv, "2025-01-20"),
        release("dup-early", "风云", ContentType::Tv, "2025-01-18"),
        release("season", "孤岛 第二季", ContentType::Tv, "2025-01-10"),
        release("stale", "旧闻", ContentType::Movie, "2024-10-01"),
    ]);

    let response = server
        .get("/api/v1/releases/calendar")
        .add_query_param("date", "2025-01-15")
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["date"], "2025-01-15");

    let releases = body["releases"].as_array().unwrap();
    let ids: Vec<&str> = releases.iter().map(|r| r["id"].as_str().unwrap()).collect();

    // "孤岛 第二季" collapses into the bare "孤岛"; the duplicate "风云"
    // keeps its earlier date; the stale record never enters the window.
    assert_eq!(ids, vec!["movie", "dup-early"]);
    assert_eq!(releases[0]["releaseDate"], "2025-01-16");
    assert_eq!(releases[0]["type"], "movie");
}

#[tokio::test]
async fn test_calendar_empty_feed_yields_empty_list() {
    let server = create_test_server(vec![]);

    let response = server
        .get("/api/v1/releases/calendar")
        .add_query_param("date", "2025-01-15")
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["releases"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_calendar_caps_display_slot() {
    let mut feed = Vec::new();
    for i in 0..8 {
        feed.push(release(
            &format!("wk-{i}"),
            &format!("Week Feature {i} Part"),
            ContentType::Movie,
            "2025-01-18",
        ));
    }
    for i in 0..6 {
        feed.push(release(
            &format!("mo-{i}"),
            &format!("Month Feature {i} Part"),
            ContentType::Tv,
            "2025-02-05",
        ));
    }

    let server = create_test_server(feed);

    let response = server
        .get("/api/v1/releases/calendar")
        .add_query_param("date", "2025-01-15")
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["releases"].as_array().unwrap().len(), 10);
}

#[tokio::test]
async fn test_calendar_bad_date_is_rejected() {
    let server = create_test_server(vec![]);

    let response = server
        .get("/api/v1/releases/calendar")
        .add_query_param("date", "15/01/2025")
        .await;

    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("Invalid date"));
}

#[tokio::test]
async fn test_calendar_feed_contract_violation_is_bad_gateway() {
    let provider = Arc::new(StubFeed {
        releases: vec![],
        fail: true,
    });
    let server = TestServer::new(create_router(provider)).unwrap();

    let response = server
        .get("/api/v1/releases/calendar")
        .add_query_param("date", "2025-01-15")
        .await;

    response.assert_status(axum::http::StatusCode::BAD_GATEWAY);
}
