//! `fetch_url_context_smart`: a page plus the pages it links to.

use async_trait::async_trait;
use ctxscout_core::{Tool, ToolError, ToolResult};
use ctxscout_engine::{ContextEngine, SmartFetchRequest};
use std::sync::Arc;

use crate::{engine_error, parse_args};

pub struct FetchSmartTool {
    engine: Arc<ContextEngine>,
}

impl FetchSmartTool {
    pub fn new(engine: Arc<ContextEngine>) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl Tool for FetchSmartTool {
    fn name(&self) -> &str {
        "fetch_url_context_smart"
    }

    fn description(&self) -> &str {
        "Inspect a URL in depth: fetch it, then follow up to max_urls - 1 related links (same \
         host unless allow_external) or, for a GitHub repository, its key files. Returns every \
         page plus one merged context."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "url": { "type": "string" },
                "max_urls": { "type": "number", "default": 4 },
                "max_chars_per_url": { "type": "number", "default": 2200 },
                "allow_external": { "type": "boolean", "default": false }
            },
            "required": ["url"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let request: SmartFetchRequest = parse_args(arguments)?;
        let response = self
            .engine
            .fetch_smart(request)
            .await
            .map_err(|e| engine_error(self.name(), e))?;
        ToolResult::from_envelope(&response)
    }
}
