use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, AppResult},
    models::Release,
    services::{curation::curate_releases, ReleaseProvider},
};

#[derive(Debug, Deserialize)]
pub struct CalendarQuery {
    /// Reference date override (`YYYY-MM-DD`); defaults to the current
    /// UTC calendar date
    date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CalendarResponse {
    pub date: String,
    pub releases: Vec<Release>,
}

/// Handler for the curated release calendar endpoint
///
/// Fetches the raw feed from the provider and resolves it into the
/// bounded, deduplicated, temporally diversified display list.
pub async fn calendar(
    State(provider): State<Arc<dyn ReleaseProvider>>,
    Query(params): Query<CalendarQuery>,
) -> AppResult<Json<CalendarResponse>> {
    let today = match &params.date {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map_err(|_| AppError::InvalidInput(format!("Invalid date: {}", raw)))?,
        None => Utc::now().date_naive(),
    };

    let feed = provider.fetch_upcoming().await?;
    let releases = curate_releases(feed, today);

    tracing::info!(
        date = %today,
        selected = releases.len(),
        provider = provider.name(),
        "Release calendar curated"
    );

    Ok(Json(CalendarResponse {
        date: today.format("%Y-%m-%d").to_string(),
        releases,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ContentType;
    use crate::routes::create_router;
    use crate::services::providers::MockReleaseProvider;
    use axum_test::TestServer;

    fn release(id: &str, title: &str, date: &str) -> Release {
        Release {
            id: id.to_string(),
            title: title.to_string(),
            content_type: ContentType::Movie,
            release_date: date.to_string(),
            region: None,
            cover: None,
            episodes: None,
        }
    }

    fn server_with_feed(feed: Vec<Release>) -> TestServer {
        let mut provider = MockReleaseProvider::new();
        provider
            .expect_fetch_upcoming()
            .returning(move || Ok(feed.clone()));
        provider.expect_name().return_const("mock");

        TestServer::new(create_router(Arc::new(provider))).unwrap()
    }

    #[tokio::test]
    async fn test_calendar_uses_query_date() {
        let server = server_with_feed(vec![
            release("in", "Alpha", "2025-01-18"),
            release("out", "Beta", "2024-11-01"),
        ]);

        let response = server
            .get("/api/v1/releases/calendar")
            .add_query_param("date", "2025-01-15")
            .await;

        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["date"], "2025-01-15");
        assert_eq!(body["releases"].as_array().unwrap().len(), 1);
        assert_eq!(body["releases"][0]["id"], "in");
    }

    #[tokio::test]
    async fn test_calendar_rejects_malformed_date() {
        let server = server_with_feed(vec![]);

        let response = server
            .get("/api/v1/releases/calendar")
            .add_query_param("date", "January 15th")
            .await;

        response.assert_status(axum::http::StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_calendar_propagates_feed_failure() {
        let mut provider = MockReleaseProvider::new();
        provider.expect_fetch_upcoming().returning(|| {
            Err(AppError::ExternalApi("Release feed returned status 500".to_string()))
        });
        provider.expect_name().return_const("mock");
        let server = TestServer::new(create_router(Arc::new(provider))).unwrap();

        let response = server
            .get("/api/v1/releases/calendar")
            .add_query_param("date", "2025-01-15")
            .await;

        response.assert_status(axum::http::StatusCode::BAD_GATEWAY);
    }
}
