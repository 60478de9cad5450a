//! # ctxscout core
//!
//! Domain types, traits, and error definitions for the ctxscout context
//! engine. This crate has **no network dependencies**: it defines the
//! request-scoped model and the seams (HTTP transport, search backend,
//! tools) that the other crates implement against.

pub mod error;
pub mod model;
pub mod search;
pub mod tool;
pub mod transport;

// Re-export key types at crate root for ergonomics
pub use error::{Error, FetchError, Result, ToolError};
pub use model::{ContextItem, ContextSource, FetchOutcome, RepoScope, SearchResult};
pub use search::{GENERAL_LANE, SearchBackend};
pub use tool::{Tool, ToolCall, ToolDefinition, ToolRegistry, ToolResult};
pub use transport::{HttpRequest, HttpResponse, HttpTransport, Reply, StaticTransport};
