use ctxscout_core::{GENERAL_LANE, Result};
use ctxscout_extract::merge_result_rows;
use tracing::{info, warn};

use crate::plan::SearchPlan;
use crate::request::QuickSearchRequest;
use crate::response::{AnalysisHint, DateContext, QuickSearchResponse};
use crate::ContextEngine;

impl ContextEngine {
    /// Search the first planned query in the general lane and optionally
    /// attach page context.
    ///
    /// Context is fetched whenever the caller pasted URLs, even without
    /// `include_context`.
    pub async fn search_quick(&self, request: QuickSearchRequest) -> Result<QuickSearchResponse> {
        let request = request.clamped();
        let plan = SearchPlan::build(request.query.as_deref(), &request.queries, &request.urls)?;
        let strict = plan.strict(request.strict_repo_only);
        let limit = request.limit;

        let primary = plan.scoped_queries.first().cloned().unwrap_or_default();
        let mut rows = if primary.is_empty() {
            Vec::new()
        } else {
            match self.backend.search(&primary, GENERAL_LANE, limit).await {
                Ok(rows) => merge_result_rows(rows, limit),
                Err(e) => {
                    warn!(query = %primary, backend = self.backend.name(), error = %e, "Search failed, continuing without results");
                    Vec::new()
                }
            }
        };
        rows = plan.prioritize(rows, strict, limit);

        let wants_context = request.include_context || !plan.explicit_urls.is_empty();
        let context_items = if wants_context && request.context_max_urls > 0 {
            self.gather_context(
                &plan,
                &rows,
                request.context_max_urls,
                request.context_max_chars,
                (3 * request.context_max_urls).min(10),
                request.context_max_chars.min(2000),
            )
            .await
        } else {
            Vec::new()
        };

        let rows = plan.fold_context(rows, &context_items, strict, limit);

        info!(
            query = %primary,
            results = rows.len(),
            context_items = context_items.len(),
            scopes = plan.scopes.len(),
            strict,
            "Quick search complete"
        );

        let queries_used = if primary.is_empty() {
            Vec::new()
        } else {
            vec![primary.clone()]
        };

        Ok(QuickSearchResponse {
            mode: "quick".into(),
            query: primary,
            queries_used,
            count: rows.len(),
            results: rows,
            analysis_hint: AnalysisHint::new(&plan.explicit_urls, &context_items),
            urls_detected: plan.explicit_urls,
            context_items,
            repo_scope_enforced: !plan.scopes.is_empty(),
            strict_repo_only: strict,
            repo_scopes: plan.scopes,
            current_date: DateContext::now(),
        })
    }
}
