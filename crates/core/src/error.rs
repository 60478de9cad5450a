//! Error types for the ctxscout domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Network-facing code reports [`FetchError`]; orchestration code reports
//! the top-level [`Error`], of which only a handful of variants ever reach
//! the caller.

use thiserror::Error;

/// The top-level error type for all ctxscout operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Request errors (the only ones surfaced to callers) ---
    #[error("Missing parameter: {0}")]
    MissingParameter(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    // --- Fetch errors ---
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    // --- Tool errors ---
    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Failure of a single network operation (one fetch, one search call).
///
/// Cloneable so a failure can be recorded in an outcome and logged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    #[error("{service} returned HTTP {status}")]
    UpstreamHttp { service: String, status: u16 },

    #[error("network error: {0}")]
    Network(String),

    #[error("{service} timed out after {timeout_secs}s")]
    Timeout { service: String, timeout_secs: u64 },

    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl FetchError {
    /// Whether the failure came from the transport rather than the upstream.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Timeout { .. })
    }
}

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    NotFound(String),

    #[error("Tool execution failed: {tool_name}: {reason}")]
    ExecutionFailed { tool_name: String, reason: String },

    #[error("Invalid tool arguments: {0}")]
    InvalidArguments(String),
}
