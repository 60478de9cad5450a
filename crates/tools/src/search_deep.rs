//! `search_deep`: every query across several category lanes.

use async_trait::async_trait;
use ctxscout_core::{Tool, ToolError, ToolResult};
use ctxscout_engine::{ContextEngine, DeepSearchRequest};
use std::sync::Arc;

use crate::{engine_error, parse_args};

pub struct SearchDeepTool {
    engine: Arc<ContextEngine>,
}

impl SearchDeepTool {
    pub fn new(engine: Arc<ContextEngine>) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl Tool for SearchDeepTool {
    fn name(&self) -> &str {
        "search_deep"
    }

    fn description(&self) -> &str {
        "Multi-lane research (general, science, news by default). Only use when deep research is \
         explicitly requested. A repository URL switches to code-oriented lanes and keeps results \
         inside that repository unless strict_repo_only is false."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": { "type": "string" },
                "queries": { "type": "array", "items": { "type": "string" } },
                "limit": { "type": "number", "default": 5 },
                "lanes": {
                    "type": "array",
                    "items": { "type": "string" },
                    "default": ["general", "science", "news"]
                },
                "urls": { "type": "array", "items": { "type": "string" } },
                "include_context": { "type": "boolean", "default": true },
                "context_max_urls": { "type": "number", "default": 5 },
                "context_max_chars": { "type": "number", "default": 1800 },
                "strict_repo_only": { "type": "boolean", "default": true }
            },
            "anyOf": [{ "required": ["query"] }, { "required": ["queries"] }]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let request: DeepSearchRequest = parse_args(arguments)?;
        let response = self
            .engine
            .search_deep(request)
            .await
            .map_err(|e| engine_error(self.name(), e))?;
        ToolResult::from_envelope(&response)
    }
}
