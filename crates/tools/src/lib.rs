//! Named tools over the ctxscout engines.
//!
//! Each tool parses its JSON arguments into the engine's request type,
//! runs the operation and returns the response envelope. A caller-side
//! problem (no query, no URL, bad seed, malformed arguments) comes back as
//! [`ToolError::InvalidArguments`]; anything else as `ExecutionFailed`.

pub mod fetch_smart;
pub mod fetch_url;
pub mod search_deep;
pub mod search_quick;

use ctxscout_core::{Error, ToolError, ToolRegistry};
use ctxscout_engine::ContextEngine;
use serde::de::DeserializeOwned;
use std::sync::Arc;

pub use fetch_smart::FetchSmartTool;
pub use fetch_url::FetchUrlTool;
pub use search_deep::SearchDeepTool;
pub use search_quick::SearchQuickTool;

/// A registry holding all four tools, sharing one engine.
pub fn default_registry(engine: Arc<ContextEngine>) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(SearchQuickTool::new(engine.clone())));
    registry.register(Box::new(SearchDeepTool::new(engine.clone())));
    registry.register(Box::new(FetchUrlTool::new(engine.clone())));
    registry.register(Box::new(FetchSmartTool::new(engine)));
    registry
}

/// Deserialize tool arguments; a missing argument object counts as `{}`.
pub(crate) fn parse_args<T: DeserializeOwned>(arguments: serde_json::Value) -> Result<T, ToolError> {
    let arguments = if arguments.is_null() {
        serde_json::json!({})
    } else {
        arguments
    };
    serde_json::from_value(arguments).map_err(|e| ToolError::InvalidArguments(e.to_string()))
}

pub(crate) fn engine_error(tool_name: &str, error: Error) -> ToolError {
    match error {
        Error::MissingParameter(msg) => ToolError::InvalidArguments(msg),
        Error::InvalidUrl(url) => ToolError::InvalidArguments(format!("invalid url: {url}")),
        other => ToolError::ExecutionFailed {
            tool_name: tool_name.to_string(),
            reason: other.to_string(),
        },
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use ctxscout_config::AppConfig;
    use ctxscout_core::{FetchError, SearchBackend, SearchResult, StaticTransport};
    use ctxscout_engine::ContextEngine;
    use std::sync::Arc;

    pub const MIRROR: &str = "https://mirror.test";

    /// Returns one row per call echoing the query and lane.
    pub struct EchoBackend;

    #[async_trait::async_trait]
    impl SearchBackend for EchoBackend {
        fn name(&self) -> &str {
            "echo"
        }

        async fn search(
            &self,
            query: &str,
            lane: &str,
            _limit: usize,
        ) -> Result<Vec<SearchResult>, FetchError> {
            Ok(vec![SearchResult::new(
                query,
                format!("https://results.test/{lane}"),
                "",
            )])
        }
    }

    pub fn engine(transport: StaticTransport) -> Arc<ContextEngine> {
        let mut config = AppConfig::default();
        config.mirror.base_url = MIRROR.into();
        Arc::new(ContextEngine::new(config, Arc::new(EchoBackend), Arc::new(transport)))
    }
}
