//! Request types for the four engine operations.
//!
//! Every field has a default so a caller can send only what it cares
//! about. Numeric fields accept any JSON number and are clamped into
//! range by `clamped()` rather than rejected.

use serde::{Deserialize, Deserializer, Serialize};

/// Accept integers or floats; negatives and non-finite values become 0.
fn count<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    Ok(if value.is_finite() && value > 0.0 {
        value as usize
    } else {
        0
    })
}

fn default_limit() -> usize {
    5
}

fn quick_context_urls() -> usize {
    2
}

fn quick_context_chars() -> usize {
    1400
}

fn deep_context_urls() -> usize {
    5
}

fn deep_context_chars() -> usize {
    1800
}

fn default_true() -> bool {
    true
}

fn smart_max_urls() -> usize {
    4
}

fn smart_max_chars() -> usize {
    2200
}

/// Fast single-lane search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickSearchRequest {
    #[serde(default)]
    pub query: Option<String>,

    #[serde(default)]
    pub queries: Vec<String>,

    #[serde(default = "default_limit", deserialize_with = "count")]
    pub limit: usize,

    #[serde(default)]
    pub urls: Vec<String>,

    #[serde(default)]
    pub include_context: bool,

    #[serde(default = "quick_context_urls", deserialize_with = "count")]
    pub context_max_urls: usize,

    #[serde(default = "quick_context_chars", deserialize_with = "count")]
    pub context_max_chars: usize,

    #[serde(default)]
    pub strict_repo_only: bool,
}

impl Default for QuickSearchRequest {
    fn default() -> Self {
        Self {
            query: None,
            queries: Vec::new(),
            limit: default_limit(),
            urls: Vec::new(),
            include_context: false,
            context_max_urls: quick_context_urls(),
            context_max_chars: quick_context_chars(),
            strict_repo_only: false,
        }
    }
}

impl QuickSearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
            ..Self::default()
        }
    }

    /// Clamp numeric fields into their accepted ranges.
    pub fn clamped(mut self) -> Self {
        self.limit = self.limit.clamp(1, 20);
        self.context_max_urls = self.context_max_urls.min(10);
        self.context_max_chars = self.context_max_chars.clamp(500, 6000);
        self
    }
}

/// Multi-query, multi-lane search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeepSearchRequest {
    #[serde(default)]
    pub query: Option<String>,

    #[serde(default)]
    pub queries: Vec<String>,

    #[serde(default = "default_limit", deserialize_with = "count")]
    pub limit: usize,

    /// Search categories; empty means the configured default lanes.
    #[serde(default)]
    pub lanes: Vec<String>,

    #[serde(default)]
    pub urls: Vec<String>,

    #[serde(default = "default_true")]
    pub include_context: bool,

    #[serde(default = "deep_context_urls", deserialize_with = "count")]
    pub context_max_urls: usize,

    #[serde(default = "deep_context_chars", deserialize_with = "count")]
    pub context_max_chars: usize,

    #[serde(default = "default_true")]
    pub strict_repo_only: bool,
}

impl Default for DeepSearchRequest {
    fn default() -> Self {
        Self {
            query: None,
            queries: Vec::new(),
            limit: default_limit(),
            lanes: Vec::new(),
            urls: Vec::new(),
            include_context: true,
            context_max_urls: deep_context_urls(),
            context_max_chars: deep_context_chars(),
            strict_repo_only: true,
        }
    }
}

impl DeepSearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
            ..Self::default()
        }
    }

    pub fn clamped(mut self) -> Self {
        self.limit = self.limit.clamp(1, 20);
        self.context_max_urls = self.context_max_urls.min(12);
        self.context_max_chars = self.context_max_chars.clamp(500, 6000);
        self.lanes = self
            .lanes
            .into_iter()
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .collect();
        self
    }
}

/// Context for a single URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchRequest {
    #[serde(default)]
    pub url: String,
}

impl FetchRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// Context for a URL plus a bounded set of pages it links to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmartFetchRequest {
    #[serde(default)]
    pub url: String,

    #[serde(default = "smart_max_urls", deserialize_with = "count")]
    pub max_urls: usize,

    #[serde(default = "smart_max_chars", deserialize_with = "count")]
    pub max_chars_per_url: usize,

    #[serde(default)]
    pub allow_external: bool,
}

impl Default for SmartFetchRequest {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_urls: smart_max_urls(),
            max_chars_per_url: smart_max_chars(),
            allow_external: false,
        }
    }
}

impl SmartFetchRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn clamped(mut self) -> Self {
        self.max_urls = self.max_urls.clamp(1, 12);
        self.max_chars_per_url = self.max_chars_per_url.clamp(500, 8000);
        self
    }
}
