//! `search_quick`: one backend query with optional page context.

use async_trait::async_trait;
use ctxscout_core::{Tool, ToolError, ToolResult};
use ctxscout_engine::{ContextEngine, QuickSearchRequest};
use std::sync::Arc;
use tracing::debug;

use crate::{engine_error, parse_args};

pub struct SearchQuickTool {
    engine: Arc<ContextEngine>,
}

impl SearchQuickTool {
    pub fn new(engine: Arc<ContextEngine>) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl Tool for SearchQuickTool {
    fn name(&self) -> &str {
        "search_quick"
    }

    fn description(&self) -> &str {
        "Fast web lookup in the general lane. Only use when the user explicitly asks for a web \
         search. URLs pasted into the query are fetched for context, and a GitHub repository URL \
         scopes the search to that repository; ground answers on context_items first."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": { "type": "string" },
                "queries": { "type": "array", "items": { "type": "string" } },
                "limit": { "type": "number", "default": 5 },
                "urls": { "type": "array", "items": { "type": "string" } },
                "include_context": { "type": "boolean", "default": false },
                "context_max_urls": { "type": "number", "default": 2 },
                "context_max_chars": { "type": "number", "default": 1400 },
                "strict_repo_only": { "type": "boolean", "default": false }
            },
            "anyOf": [{ "required": ["query"] }, { "required": ["queries"] }]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let request: QuickSearchRequest = parse_args(arguments)?;
        debug!(query = ?request.query, "search_quick");
        let response = self
            .engine
            .search_quick(request)
            .await
            .map_err(|e| engine_error(self.name(), e))?;
        ToolResult::from_envelope(&response)
    }
}
