//! # ctxscout engine
//!
//! The four orchestration operations, each a method on [`ContextEngine`]:
//!
//! - [`search_quick`](ContextEngine::search_quick): one backend call, optional page context
//! - [`search_deep`](ContextEngine::search_deep): every query in every lane, concurrently
//! - [`fetch_url`](ContextEngine::fetch_url): one page through the mirror/direct chain
//! - [`fetch_smart`](ContextEngine::fetch_smart): a page plus a bounded set of its links
//!
//! All network work inside one step runs concurrently; output order never
//! depends on completion order. Individual fetch or search failures are
//! logged and dropped. Only a missing query/URL (and an invalid smart-fetch
//! seed) surface as errors.

mod deep;
mod fetch;
mod plan;
mod quick;
pub mod request;
pub mod response;
mod smart;

pub use request::{DeepSearchRequest, FetchRequest, QuickSearchRequest, SmartFetchRequest};
pub use response::{
    AnalysisHint, DateContext, DeepSearchResponse, FetchResponse, QuickSearchResponse,
    SmartFetchResponse,
};

use ctxscout_config::AppConfig;
use ctxscout_core::{ContextItem, HttpTransport, Result, SearchBackend, SearchResult};
use ctxscout_extract::merge_context_items;
use ctxscout_sources::{ContextFetcher, GithubRepoFetcher, ReqwestTransport, SearxBackend};
use futures::future::join_all;
use std::sync::Arc;
use tracing::debug;

use crate::plan::SearchPlan;

/// Owns the search backend and fetchers; cheap to share behind an `Arc`.
pub struct ContextEngine {
    config: AppConfig,
    backend: Arc<dyn SearchBackend>,
    fetcher: ContextFetcher,
    github: GithubRepoFetcher,
}

impl ContextEngine {
    pub fn new(
        config: AppConfig,
        backend: Arc<dyn SearchBackend>,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        let fetcher = ContextFetcher::new(&config, transport.clone());
        let github = GithubRepoFetcher::new(&config.github, transport);
        Self {
            config,
            backend,
            fetcher,
            github,
        }
    }

    /// Production wiring: reqwest transport and the SearxNG backend.
    pub fn from_config(config: AppConfig) -> Result<Self> {
        let transport: Arc<dyn HttpTransport> = Arc::new(ReqwestTransport::new()?);
        let backend = Arc::new(SearxBackend::new(&config.search, transport.clone()));
        Ok(Self::new(config, backend, transport))
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn backend(&self) -> &dyn SearchBackend {
        self.backend.as_ref()
    }

    /// Page context for the plan's URL pool plus curated files for every
    /// repository scope, fetched concurrently and merged by URL.
    async fn gather_context(
        &self,
        plan: &SearchPlan,
        rows: &[SearchResult],
        max_urls: usize,
        max_chars: usize,
        repo_files: usize,
        repo_chars: usize,
    ) -> Vec<ContextItem> {
        let pool = plan.context_pool(rows);
        debug!(
            pool = pool.len(),
            scopes = plan.scopes.len(),
            max_urls,
            "Gathering context"
        );

        let pages = self.fetcher.fetch_context_items(&pool, max_urls, max_chars);
        let repos = join_all(plan.scopes.iter().map(|scope| {
            self.github
                .fetch_repo_files(&scope.owner, &scope.repo, repo_files, repo_chars)
        }));
        let (pages, repos) = tokio::join!(pages, repos);

        merge_context_items(pages.into_iter().chain(repos.into_iter().flatten()))
    }
}
