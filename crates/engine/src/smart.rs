use ctxscout_core::{Error, Result};
use ctxscout_extract::{compact_text, extract_links, merge_context_items, validate_http_url};
use ctxscout_sources::parse_repo;
use futures::future::join_all;
use tracing::info;

use crate::request::SmartFetchRequest;
use crate::response::{DateContext, SmartFetchResponse};
use crate::ContextEngine;

impl ContextEngine {
    /// Fetch a seed page and then up to `max_urls - 1` more: curated files
    /// when the seed is a repository, otherwise links found in the seed's
    /// text (same host unless `allow_external`).
    pub async fn fetch_smart(&self, request: SmartFetchRequest) -> Result<SmartFetchResponse> {
        let request = request.clamped();
        let seed = request.url.trim().to_string();
        if seed.is_empty() {
            return Err(Error::MissingParameter("url".into()));
        }
        validate_http_url(&seed).map_err(|_| Error::InvalidUrl(seed.clone()))?;

        let max_urls = request.max_urls;
        let max_chars = request.max_chars_per_url;

        let seed_item = self.fetcher.fetch_item(&seed, max_chars).await;
        let mut visited = vec![seed.clone()];
        let mut items = vec![seed_item];

        if let Some(scope) = parse_repo(&seed) {
            let files = self
                .github
                .fetch_repo_files(&scope.owner, &scope.repo, (4 * max_urls).min(24), max_chars)
                .await;
            items.extend(files.into_iter().take(max_urls - 1));
        } else {
            let links = extract_links(&seed, &items[0].context, max_urls - 1, request.allow_external);
            let fetched = join_all(links.iter().map(|u| self.fetcher.fetch_item(u, max_chars))).await;
            visited.extend(links);
            items.extend(fetched);
        }

        let items = merge_context_items(items);
        let merged = items
            .iter()
            .filter(|item| item.has_context())
            .map(|item| format!("URL: {}\n{}", item.url, item.context))
            .collect::<Vec<_>>()
            .join("\n\n");
        let budget = self.config.limits.aggregate_ceiling.min(max_chars * max_urls);

        info!(
            seed = %seed,
            visited = visited.len(),
            items = items.len(),
            budget,
            "Smart fetch complete"
        );

        Ok(SmartFetchResponse {
            url: seed,
            mode: "smart".into(),
            urls_visited: visited,
            count: items.len(),
            merged_context: compact_text(&merged, budget),
            context_items: items,
            current_date: DateContext::now(),
        })
    }
}
