use ctxscout_core::{GENERAL_LANE, Result};
use ctxscout_extract::RowAccumulator;
use futures::future::join_all;
use tracing::{info, warn};

use crate::plan::SearchPlan;
use crate::request::DeepSearchRequest;
use crate::response::{AnalysisHint, DateContext, DeepSearchResponse};
use crate::ContextEngine;

impl ContextEngine {
    /// Lanes for this request. Repository scopes switch to the configured
    /// code-oriented pair regardless of what was asked for.
    fn deep_lanes(&self, plan: &SearchPlan, requested: &[String]) -> Vec<String> {
        let lanes = if plan.has_scopes() {
            self.config.search.repo_lanes.clone()
        } else if !requested.is_empty() {
            requested.to_vec()
        } else {
            self.config.search.default_lanes.clone()
        };
        if lanes.is_empty() {
            vec![GENERAL_LANE.to_string()]
        } else {
            lanes
        }
    }

    /// Run every planned query in every lane concurrently and merge the
    /// rows query-major, lane-minor.
    pub async fn search_deep(&self, request: DeepSearchRequest) -> Result<DeepSearchResponse> {
        let request = request.clamped();
        let plan = SearchPlan::build(request.query.as_deref(), &request.queries, &request.urls)?;
        let strict = plan.strict(request.strict_repo_only);
        let lanes = self.deep_lanes(&plan, &request.lanes);
        let per_call = request.limit.max(3);

        let pairs: Vec<(&str, &str)> = plan
            .scoped_queries
            .iter()
            .flat_map(|q| lanes.iter().map(move |l| (q.as_str(), l.as_str())))
            .collect();
        let outcomes = join_all(
            pairs
                .iter()
                .map(|(query, lane)| self.backend.search(query, lane, per_call)),
        )
        .await;

        let mut acc = RowAccumulator::new();
        let mut failed = 0usize;
        for ((query, lane), outcome) in pairs.iter().zip(outcomes) {
            match outcome {
                Ok(rows) => {
                    for row in rows {
                        acc.push(row.with_matched_query(*query));
                    }
                }
                Err(e) => {
                    failed += 1;
                    warn!(query, lane, error = %e, "Lane search failed, skipping");
                }
            }
        }

        let cap = request.limit * lanes.len().max(1) * plan.scoped_queries.len().max(1);
        let mut rows = plan.prioritize(acc.into_rows(), strict, cap);
        rows.truncate(cap);

        let context_items = if request.include_context && request.context_max_urls > 0 {
            self.gather_context(
                &plan,
                &rows,
                request.context_max_urls,
                request.context_max_chars,
                (3 * request.context_max_urls).min(12),
                request.context_max_chars.min(2400),
            )
            .await
        } else {
            Vec::new()
        };

        let fold_limit = request.limit * lanes.len().max(1);
        let rows = plan.fold_context(rows, &context_items, strict, fold_limit);

        info!(
            calls = pairs.len(),
            failed,
            results = rows.len(),
            context_items = context_items.len(),
            lanes = ?lanes,
            "Deep search complete"
        );

        Ok(DeepSearchResponse {
            mode: "deep".into(),
            queries_used: plan.scoped_queries.clone(),
            lanes_used: lanes,
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
