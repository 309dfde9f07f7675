pub mod artic;
pub mod filter;
pub mod query;
pub mod types;

use anyhow::Result;
use async_trait::async_trait;
use filter::FilterConfig;
use types::ArtworkRecord;

/// Source of artwork batches.
///
/// Implementations build the request from `session`, perform a single
/// attempt, and on success record every returned id in `session` before
/// handing back the records to display. On failure `session` is left as-is.
#[async_trait]
pub trait ArtworkSource: Send + Sync {
    async fn fetch_batch(&mut self, session: &mut FilterConfig) -> Result<Vec<ArtworkRecord>>;
}
