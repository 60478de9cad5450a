//! Planning shared by quick and deep search: which queries to run, which
//! URLs the caller pointed at, and which repositories to scope to.

use ctxscout_core::{ContextItem, Error, RepoScope, Result, SearchResult};
use ctxscout_extract::{
    collect_queries, context_items_to_results, dedupe_urls, merge_result_rows,
    split_query_and_urls,
};
use ctxscout_sources::{build_scoped_queries, detect_scopes, filter_by_scope};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SearchPlan {
    /// Request URLs plus those pasted into queries, deduped.
    pub explicit_urls: Vec<String>,
    pub scopes: Vec<RepoScope>,
    /// Cleaned queries, `site:`-scoped when repositories were found.
    pub scoped_queries: Vec<String>,
}

impl SearchPlan {
    pub fn build(query: Option<&str>, queries: &[String], urls: &[String]) -> Result<Self> {
        let collected = collect_queries(query, queries);
        if collected.is_empty() && urls.is_empty() {
            return Err(Error::MissingParameter(
                "provide 'query' or non-empty 'queries'".into(),
            ));
        }

        let mut all_urls = urls.to_vec();
        let mut cleaned = Vec::new();
        for q in &collected {
            let split = split_query_and_urls(q);
            all_urls.extend(split.urls);
            if !split.query.is_empty() {
                cleaned.push(split.query);
            }
        }

        let explicit_urls = dedupe_urls(&all_urls);
        let scopes = detect_scopes(&explicit_urls);
        let scoped_queries = build_scoped_queries(&cleaned, &scopes);

        Ok(Self {
            explicit_urls,
            scopes,
            scoped_queries,
        })
    }

    pub fn has_scopes(&self) -> bool {
        !self.scopes.is_empty()
    }

    /// Strict mode only means something when there is a scope to enforce.
    pub fn strict(&self, requested: bool) -> bool {
        requested && self.has_scopes()
    }

    /// Prefer in-scope rows. Strict keeps only those; otherwise they move
    /// to the front of the full list.
    pub fn prioritize(&self, rows: Vec<SearchResult>, strict: bool, limit: usize) -> Vec<SearchResult> {
        if !self.has_scopes() {
            return rows;
        }
        let filtered = filter_by_scope(&rows, &self.scopes);
        if strict {
            filtered
        } else if filtered.is_empty() {
            rows
        } else {
            merge_result_rows(filtered.into_iter().chain(rows), limit)
        }
    }

    /// Append repository context as rows; strict mode filters again
    /// afterwards so nothing out of scope slips back in.
    pub fn fold_context(
        &self,
        rows: Vec<SearchResult>,
        items: &[ContextItem],
        strict: bool,
        limit: usize,
    ) -> Vec<SearchResult> {
        if !self.has_scopes() {
            return rows;
        }
        let folded = merge_result_rows(
            rows.into_iter().chain(context_items_to_results(items, limit)),
            limit,
        );
        if strict {
            filter_by_scope(&folded, &self.scopes)
        } else {
            folded
        }
    }

    /// URLs to pull context from: explicit ones first, then result URLs.
    pub fn context_pool(&self, rows: &[SearchResult]) -> Vec<String> {
        self.explicit_urls
            .iter()
            .cloned()
            .chain(
                rows.iter()
                    .filter(|r| !r.url.is_empty())
                    .map(|r| r.url.clone()),
            )
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ctxscout_core::ContextSource;

    fn row(url: &str) -> SearchResult {
        SearchResult::new(url, url, "")
    }

    #[test]
    fn nothing_to_do_is_missing_parameter() {
        let err = SearchPlan::build(None, &[" ".into()], &[]).unwrap_err();
        assert!(matches!(err, Error::MissingParameter(_)));
    }

    #[test]
    fn urls_alone_are_enough() {
        let plan = SearchPlan::build(None, &[], &["https://example.com/a".into()]).unwrap();
        assert_eq!(plan.explicit_urls, vec!["https://example.com/a"]);
        assert!(plan.scoped_queries.is_empty());
        assert!(!plan.has_scopes());
    }

    #[test]
    fn embedded_repository_url_scopes_the_query() {
        let plan = SearchPlan::build(
            Some("summarize https://github.com/acme/widgets please"),
            &[],
            &[],
        )
        .unwrap();
        assert_eq!(plan.explicit_urls, vec!["https://github.com/acme/widgets"]);
        assert_eq!(plan.scopes, vec![RepoScope::new("acme", "widgets")]);
        assert_eq!(
            plan.scoped_queries,
            vec!["site:github.com/acme/widgets summarize please"]
        );
        assert!(plan.strict(true));
        assert!(!plan.strict(false));
    }

    #[test]
    fn prioritize_puts_scoped_rows_first() {
        let plan = SearchPlan::build(None, &[], &["https://github.com/acme/widgets".into()]).unwrap();
        let rows = vec![
            row("https://example.com/x"),
            row("https://github.com/acme/widgets/issues/1"),
        ];

        let relaxed = plan.prioritize(rows.clone(), false, 5);
        assert_eq!(relaxed[0].url, "https://github.com/acme/widgets/issues/1");
        assert_eq!(relaxed.len(), 2);

        let strict = plan.prioritize(rows.clone(), true, 5);
        assert_eq!(strict.len(), 1);

        let nothing_in_scope = plan.prioritize(vec![row("https://example.com/x")], false, 5);
        assert_eq!(nothing_in_scope.len(), 1);
    }

    #[test]
    fn strict_fold_stays_in_scope() {
        let plan = SearchPlan::build(None, &[], &["https://github.com/acme/widgets".into()]).unwrap();
        let items = vec![
            ContextItem::new(
                "https://github.com/acme/widgets/blob/main/README.md",
                "readme",
                ContextSource::GithubFile,
            ),
            ContextItem::new("https://example.com/page", "other", ContextSource::Mirror),
        ];
        let folded = plan.fold_context(Vec::new(), &items, true, 5);
        assert_eq!(folded.len(), 1);
        assert_eq!(folded[0].title, "Repo Context: README.md");

        let relaxed = plan.fold_context(Vec::new(), &items, false, 5);
        assert_eq!(relaxed.len(), 2);
    }

    #[test]
    fn context_pool_orders_explicit_first() {
        let plan = SearchPlan::build(Some("q"), &[], &["https://a.test/".into()]).unwrap();
        let pool = plan.context_pool(&[row("https://b.test/"), SearchResult::new("t", "", "")]);
        assert_eq!(pool, vec!["https://a.test/", "https://b.test/"]);
    }
}
