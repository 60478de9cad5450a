//! Response envelopes returned by the engines.

use chrono::{Local, Utc};
use ctxscout_core::{ContextItem, ContextSource, RepoScope, SearchResult};
use serde::{Deserialize, Serialize};

const DATE_INSTRUCTION: &str = "Use this date context as authoritative current date/time for \
temporal reasoning. Do not assume training-cutoff dates.";

/// The wall clock at the time the response was built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateContext {
    pub today_utc: String,
    pub now_utc_iso: String,
    pub today_local: String,
    pub now_local_iso: String,
    pub weekday_utc: String,
    pub timezone_local: String,
    pub instruction: String,
}

impl DateContext {
    pub fn now() -> Self {
        let utc = Utc::now();
        let local = Local::now();
        Self {
            today_utc: utc.date_naive().to_string(),
            now_utc_iso: utc.to_rfc3339(),
            today_local: local.date_naive().to_string(),
            now_local_iso: local.to_rfc3339(),
            weekday_utc: utc.format("%A").to_string(),
            timezone_local: local.format("%:z").to_string(),
            instruction: DATE_INSTRUCTION.to_string(),
        }
    }
}

/// How a consumer should weigh the returned material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisHint {
    pub grounding_required: bool,
    pub priority_sources: Vec<String>,
    pub do_not_claim_no_access_when_context_present: bool,
}

impl AnalysisHint {
    pub fn new(urls_detected: &[String], context_items: &[ContextItem]) -> Self {
        Self {
            grounding_required: !urls_detected.is_empty() || !context_items.is_empty(),
            priority_sources: vec!["context_items".into(), "results".into()],
            do_not_claim_no_access_when_context_present: !context_items.is_empty(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuickSearchResponse {
    pub mode: String,
    /// The query actually sent to the backend (empty when none was).
    pub query: String,
    pub queries_used: Vec<String>,
    pub count: usize,
    pub results: Vec<SearchResult>,
    pub urls_detected: Vec<String>,
    pub context_items: Vec<ContextItem>,
    pub repo_scope_enforced: bool,
    pub strict_repo_only: bool,
    pub repo_scopes: Vec<RepoScope>,
    pub current_date: DateContext,
    pub analysis_hint: AnalysisHint,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeepSearchResponse {
    pub mode: String,
    pub queries_used: Vec<String>,
    pub lanes_used: Vec<String>,
    pub count: usize,
    pub results: Vec<SearchResult>,
    pub urls_detected: Vec<String>,
    pub context_items: Vec<ContextItem>,
    pub repo_scope_enforced: bool,
    pub strict_repo_only: bool,
    pub repo_scopes: Vec<RepoScope>,
    pub current_date: DateContext,
    pub analysis_hint: AnalysisHint,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchResponse {
    pub url: String,
    pub context: String,
    pub source: ContextSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub current_date: DateContext,
}

impl FetchResponse {
    pub(crate) fn from_item(item: ContextItem) -> Self {
        Self {
            url: item.url,
            context: item.context,
            source: item.source,
            error: item.error,
            current_date: DateContext::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmartFetchResponse {
    pub url: String,
    pub mode: String,
    pub urls_visited: Vec<String>,
    pub count: usize,
    pub context_items: Vec<ContextItem>,
    pub merged_context: String,
    pub current_date: DateContext,
}
