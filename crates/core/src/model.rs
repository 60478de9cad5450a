//! Request-scoped domain types shared by every ctxscout crate.

use serde::{Deserialize, Serialize};

/// One row of search output: a backend hit, or a context item folded
/// back into the result list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub content: String,

    /// The query that produced this row (deep search only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_query: Option<String>,
}

impl SearchResult {
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            content: content.into(),
            matched_query: None,
        }
    }

    /// Tag the row with the query that produced it.
    pub fn with_matched_query(mut self, query: impl Into<String>) -> Self {
        self.matched_query = Some(query.into());
        self
    }

    /// Uniqueness key used when merging rows: the URL, or the title when
    /// the URL is empty, trimmed and case-folded.
    pub fn dedup_key(&self) -> String {
        let raw = if self.url.trim().is_empty() {
            &self.title
        } else {
            &self.url
        };
        raw.trim().to_lowercase()
    }
}

/// Where a piece of context text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContextSource {
    /// The text-extraction mirror.
    Mirror,
    /// A direct HTTP fetch of the page.
    Direct,
    /// A raw file from a source repository.
    GithubFile,
    /// Nothing could be fetched.
    None,
}

impl ContextSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mirror => "mirror",
            Self::Direct => "direct",
            Self::GithubFile => "github-file",
            Self::None => "none",
        }
    }
}

impl std::fmt::Display for ContextSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A compacted text excerpt attributed to one URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextItem {
    pub url: String,
    pub context: String,
    pub source: ContextSource,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ContextItem {
    pub fn new(url: impl Into<String>, context: impl Into<String>, source: ContextSource) -> Self {
        Self {
            url: url.into(),
            context: context.into(),
            source,
            error: None,
        }
    }

    /// An empty-context record for a URL that could not be fetched.
    pub fn failed(url: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            context: String::new(),
            source: ContextSource::None,
            error: Some(error.into()),
        }
    }

    /// Build the item for `url` from the outcome of fetching it.
    pub fn from_outcome(url: impl Into<String>, outcome: FetchOutcome) -> Self {
        match outcome {
            FetchOutcome::Success { text, source } => Self::new(url, text, source),
            FetchOutcome::Failure { error } => Self::failed(url, error),
        }
    }

    pub fn has_context(&self) -> bool {
        !self.context.is_empty()
    }
}

/// A detected `(owner, repo)` pair on the code host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoScope {
    pub owner: String,
    pub repo: String,
}

impl RepoScope {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    /// Case-folded `owner/repo`, the dedup key for scopes.
    pub fn key(&self) -> String {
        format!("{}/{}", self.owner.to_lowercase(), self.repo.to_lowercase())
    }
}

impl std::fmt::Display for RepoScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// Terminal result of any single-URL fetch attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Success { text: String, source: ContextSource },
    Failure { error: String },
}

impl FetchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The fetched text, or an empty string on failure.
    pub fn text(&self) -> &str {
        match self {
            Self::Success { text, .. } => text,
            Self::Failure { .. } => "",
        }
    }
}
