//! Deduplicating merges over result rows and context items.
//!
//! Priority is expressed purely by input order: callers concatenate the
//! higher-priority list first and the first occurrence of a key wins.

use ctxscout_core::{ContextItem, SearchResult};
use std::collections::HashSet;

use crate::compact::compact_text;

/// Characters of context kept when a context item is shown as a result row.
const CONTEXT_ROW_CHARS: usize = 260;

/// Ordered, deduplicating collector of result rows.
#[derive(Debug, Default)]
pub struct RowAccumulator {
    rows: Vec<SearchResult>,
    seen: HashSet<String>,
}

impl RowAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `row` unless its key is empty or already present. Returns
    /// whether the row was kept.
    pub fn push(&mut self, row: SearchResult) -> bool {
        let key = row.dedup_key();
        if key.is_empty() || !self.seen.insert(key) {
            return false;
        }
        self.rows.push(row);
        true
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn into_rows(self) -> Vec<SearchResult> {
        self.rows
    }
}

/// First-seen-wins dedup of `rows`, stopping after `max(1, limit)` rows.
pub fn merge_result_rows<I>(rows: I, limit: usize) -> Vec<SearchResult>
where
    I: IntoIterator<Item = SearchResult>,
{
    let limit = limit.max(1);
    let mut acc = RowAccumulator::new();
    for row in rows {
        acc.push(row);
        if acc.len() >= limit {
            break;
        }
    }
    acc.into_rows()
}

/// Dedupe context items by case-folded URL, first occurrence wins.
pub fn merge_context_items<I>(items: I) -> Vec<ContextItem>
where
    I: IntoIterator<Item = ContextItem>,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.url.trim().to_lowercase()))
        .collect()
}

/// Present the first `max(1, limit)` context items as result rows so they
/// can be folded into a result list.
pub fn context_items_to_results(items: &[ContextItem], limit: usize) -> Vec<SearchResult> {
    items
        .iter()
        .take(limit.max(1))
        .map(|item| {
            let name = item
                .url
                .rsplit('/')
                .next()
                .filter(|s| !s.is_empty())
                .unwrap_or("GitHub file context");
            SearchResult::new(
                format!("Repo Context: {name}"),
                item.url.clone(),
                compact_text(&item.context, CONTEXT_ROW_CHARS),
            )
        })
        .collect()
}
