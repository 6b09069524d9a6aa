use serde::{Deserialize, Serialize};

/// A single release announcement from the upstream feed
///
/// Records are owned by the caller and pass through the curation pipeline
/// unchanged: the curated output has exactly this shape, so the display
/// layer renders what the feed delivered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Release {
    /// Opaque source-record identifier (unique per record, not per title)
    pub id: String,
    /// Display title; may carry a "series: subtitle" colon form
    pub title: String,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    /// Calendar date as `YYYY-MM-DD`; compared lexicographically, never
    /// parsed into a date-time
    pub release_date: String,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub cover: Option<String>,
    #[serde(default)]
    pub episodes: Option<u32>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Movie,
    Tv,
}

/// Raw feed record as the upstream API delivers it
///
/// The `type` field is free-form upstream, so it is decoded as a string
/// and mapped when converting into a [`Release`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRelease {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub release_type: String,
    pub release_date: String,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub cover: Option<String>,
    #[serde(default)]
    pub episodes: Option<u32>,
}

impl From<ApiRelease> for Release {
    fn from(raw: ApiRelease) -> Self {
        let content_type = match raw.release_type.as_str() {
            "tv" | "series" | "tv_series" => ContentType::Tv,
            _ => ContentType::Movie,
        };

        Release {
            id: raw.id,
            title: raw.title,
            content_type,
            release_date: raw.release_date,
            region: raw.region,
            cover: raw.cover,
            episodes: raw.episodes,
        }
    }
}
