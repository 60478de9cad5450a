//! SearxNG search backend.
//!
//! `GET {base}/search?q=..&format=json&categories=<lane>&language=..`
//! returning `{results: [{title?, url, content? | snippet?}]}`.

use async_trait::async_trait;
use ctxscout_config::SearchConfig;
use ctxscout_core::{FetchError, HttpRequest, HttpTransport, SearchBackend, SearchResult};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use crate::http::send_with_timeout;

const SERVICE: &str = "searxng";

pub struct SearxBackend {
    base_url: String,
    language: String,
    timeout: Duration,
    transport: Arc<dyn HttpTransport>,
}

#[derive(Debug, Deserialize)]
struct SearxResponse {
    #[serde(default)]
    results: Vec<SearxHit>,
}

#[derive(Debug, Deserialize)]
struct SearxHit {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    snippet: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl SearxHit {
    /// Fill the gaps the way callers expect: title falls back to the URL
    /// then "Untitled", content falls back to the snippet.
    fn into_result(self) -> SearchResult {
        let url = self.url.unwrap_or_default();
        let title = non_empty(self.title)
            .or_else(|| non_empty(Some(url.clone())))
            .unwrap_or_else(|| "Untitled".to_string());
        let content = non_empty(self.content)
            .or_else(|| non_empty(self.snippet))
            .unwrap_or_default();
        SearchResult::new(title, url, content)
    }
}

impl SearxBackend {
    pub fn new(config: &SearchConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            language: config.language.clone(),
            timeout: config.timeout(),
            transport,
        }
    }

    fn search_url(&self, query: &str, lane: &str) -> Result<String, FetchError> {
        let mut url = Url::parse(&format!("{}/search", self.base_url))
            .map_err(|e| FetchError::InvalidUrl(format!("{}: {e}", self.base_url)))?;
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("format", "json")
            .append_pair("categories", lane)
            .append_pair("language", &self.language);
        Ok(url.into())
    }
}

#[async_trait]
impl SearchBackend for SearxBackend {
    fn name(&self) -> &str {
        SERVICE
    }

    async fn search(
        &self,
        query: &str,
        lane: &str,
        limit: usize,
    ) -> Result<Vec<SearchResult>, FetchError> {
        let url = self.search_url(query, lane)?;
        debug!(query, lane, limit, "Searching");

        let response = send_with_timeout(
            self.transport.as_ref(),
            SERVICE,
            self.timeout,
            HttpRequest::get(url),
        )
        .await?;

        if !response.is_ok() {
            warn!(query, lane, status = response.status, "Search backend returned error");
            return Err(FetchError::UpstreamHttp {
                service: SERVICE.into(),
                status: response.status,
            });
        }

        let parsed: SearxResponse = serde_json::from_str(&response.body)
            .map_err(|e| FetchError::Decode(format!("search response: {e}")))?;

        Ok(parsed
            .results
            .into_iter()
            .take(limit)
            .map(SearxHit::into_result)
            .collect())
    }

    async fn health_check(&self) -> Result<bool, FetchError> {
        let url = self.search_url("health", ctxscout_core::GENERAL_LANE)?;
        match send_with_timeout(
            self.transport.as_ref(),
            SERVICE,
            self.timeout,
            HttpRequest::get(url),
        )
        .await
        {
            Ok(response) => Ok(response.is_ok()),
            Err(e) => {
                warn!(error = %e, "Search backend health check failed");
                Ok(false)
            }
        }
    }
}
