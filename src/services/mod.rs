pub mod curation;
pub mod dedup;
pub mod providers;

pub use curation::curate_releases;
pub use providers::ReleaseProvider;
