use ctxscout_core::{Error, Result};
use tracing::info;

use crate::request::FetchRequest;
use crate::response::FetchResponse;
use crate::ContextEngine;

impl ContextEngine {
    /// Context for one URL via the mirror → direct chain. A URL that cannot
    /// be fetched still yields a response, with `source = none` and the
    /// error.
    pub async fn fetch_url(&self, request: FetchRequest) -> Result<FetchResponse> {
        let url = request.url.trim();
        if url.is_empty() {
            return Err(Error::MissingParameter("url".into()));
        }

        let item = self
            .fetcher
            .fetch_item(url, self.config.limits.url_context_chars)
            .await;
        info!(url, source = %item.source, chars = item.context.chars().count(), "URL fetched");
        Ok(FetchResponse::from_item(item))
    }
}
