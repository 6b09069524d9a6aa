/// Release feed provider abstraction
///
/// The upstream catalog vendor is a black box that returns raw release
/// announcements. Putting it behind a trait keeps the curation pipeline
/// and the HTTP handlers independent of any one vendor and lets tests
/// substitute a canned feed.
use crate::{error::AppResult, models::Release};

pub mod feed;

pub use feed::ReleaseFeedProvider;

/// Trait for release feed providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ReleaseProvider: Send + Sync {
    /// Fetch the raw upcoming/recent release announcements
    ///
    /// Returns every record the upstream delivered that decodes to a
    /// [`Release`]; no windowing or deduplication happens here.
    async fn fetch_upcoming(&self) -> AppResult<Vec<Release>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
