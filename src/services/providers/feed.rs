/// HTTP release feed provider
///
/// Fetches the raw announcement feed from the configured calendar vendor.
/// The payload must be a JSON array; individual records that fail to
/// decode are skipped with a diagnostic, while a payload of the wrong
/// overall shape fails the call, since that signals an upstream contract
/// change rather than a bad record.
use reqwest::Client as HttpClient;

use crate::{
    error::{AppError, AppResult},
    models::{ApiRelease, Release},
    services::providers::ReleaseProvider,
};

pub struct ReleaseFeedProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl ReleaseFeedProvider {
    pub fn new(api_key: String, api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
        }
    }

    /// Decodes the raw feed payload into releases
    ///
    /// Tolerant per record, strict on the overall shape.
    fn decode_feed(payload: serde_json::Value) -> AppResult<Vec<Release>> {
        let records = payload
            .as_array()
            .ok_or_else(|| AppError::ExternalApi("Release feed payload is not a list".to_string()))?;

        let releases: Vec<Release> = records
            .iter()
            .filter_map(|record| match serde_json::from_value::<ApiRelease>(record.clone()) {
                Ok(raw) => Some(Release::from(raw)),
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping malformed release record");
                    None
                }
            })
            .collect();

        if releases.len() < records.len() {
            tracing::warn!(
                total = records.len(),
                decoded = releases.len(),
                "Some release records failed to decode"
            );
        }

        Ok(releases)
    }
}

#[async_trait::async_trait]
impl ReleaseProvider for ReleaseFeedProvider {
    async fn fetch_upcoming(&self) -> AppResult<Vec<Release>> {
        let url = format!("{}/v1/releases/upcoming", self.api_url);

        let response = self
            .http_client
            .get(&url)
            .query(&[("apiKey", self.api_key.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Release feed returned status {}: {}",
                status, body
            )));
        }

        let payload: serde_json::Value = response.json().await?;
        let releases = Self::decode_feed(payload)?;

        tracing::info!(
            releases = releases.len(),
            provider = self.name(),
            "Release feed fetched"
        );

        Ok(releases)
    }

    fn name(&self) -> &'static str {
        "release-calendar"
    }
}
