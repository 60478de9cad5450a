//! Separating pasted URLs from the free-text part of a query.

use std::collections::HashSet;

use crate::compact::collapse_whitespace;
use crate::urls::{URL_PATTERN, dedupe_urls};

/// A query with its embedded URLs pulled out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitQuery {
    /// The text with every URL removed and whitespace collapsed.
    pub query: String,
    /// Valid, deduplicated URLs in order of appearance.
    pub urls: Vec<String>,
}

/// Split `text` into its cleaned query and the URLs it mentions.
pub fn split_query_and_urls(text: &str) -> SplitQuery {
    let urls = dedupe_urls(URL_PATTERN.find_iter(text).map(|m| m.as_str()));
    let cleaned = URL_PATTERN.replace_all(text, " ");
    SplitQuery {
        query: collapse_whitespace(&cleaned),
        urls,
    }
}

/// Merge the single `query` and the `queries` list: whitespace collapsed,
/// entries under two characters dropped, case-insensitive duplicates
/// removed.
pub fn collect_queries(query: Option<&str>, queries: &[String]) -> Vec<String> {
    let mut out = Vec::new();
    let mut seen = HashSet::new();
    for raw in query.into_iter().chain(queries.iter().map(String::as_str)) {
        let cleaned = collapse_whitespace(raw);
        if cleaned.chars().count() < 2 {
            continue;
        }
        if seen.insert(cleaned.to_lowercase()) {
            out.push(cleaned);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_embedded_repository_url() {
        let split = split_query_and_urls("summarize https://github.com/acme/widgets please");
        assert_eq!(split.query, "summarize please");
        assert_eq!(split.urls, vec!["https://github.com/acme/widgets"]);
    }

    #[test]
    fn trailing_punctuation_is_not_part_of_the_url() {
        let split = split_query_and_urls("compare (https://a.com/x), https://b.com/y; ok?");
        assert_eq!(split.urls, vec!["https://a.com/x", "https://b.com/y"]);
        assert_eq!(split.query, "compare ( ok?");
    }

    #[test]
    fn plain_text_has_no_urls() {
        let split = split_query_and_urls("  rust   async runtimes ");
        assert_eq!(split.query, "rust async runtimes");
        assert!(split.urls.is_empty());
    }

    #[test]
    fn url_only_query_leaves_empty_text() {
        let split = split_query_and_urls("https://example.com/page");
        assert!(split.query.is_empty());
        assert_eq!(split.urls.len(), 1);
    }

    #[test]
    fn collect_queries_dedupes_and_filters() {
        let queries = vec![
            "Rust  Async".to_string(),
            "x".to_string(),
            "tokio vs smol".to_string(),
            "   ".to_string(),
        ];
        let merged = collect_queries(Some("rust async"), &queries);
        assert_eq!(merged, vec!["rust async", "tokio vs smol"]);
        assert!(collect_queries(None, &[]).is_empty());
    }
}
