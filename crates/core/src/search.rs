//! Search backend trait, an opaque source of candidate hits.
//!
//! The backend's own ranking is not our concern; callers only rely on
//! rows coming back in backend order.

use async_trait::async_trait;

use crate::error::FetchError;
use crate::model::SearchResult;

/// The category lane used when a caller does not name one.
pub const GENERAL_LANE: &str = "general";

#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Backend name, used in logs and error messages.
    fn name(&self) -> &str;

    /// Run one query in one category lane, returning at most `limit` rows.
    async fn search(
        &self,
        query: &str,
        lane: &str,
        limit: usize,
    ) -> Result<Vec<SearchResult>, FetchError>;

    /// Whether the backend currently answers queries.
    async fn health_check(&self) -> Result<bool, FetchError> {
        Ok(true)
    }
}
