//! `fetch_url_context`: readable text for a single URL.

use async_trait::async_trait;
use ctxscout_core::{Tool, ToolError, ToolResult};
use ctxscout_engine::{ContextEngine, FetchRequest};
use std::sync::Arc;

use crate::{engine_error, parse_args};

pub struct FetchUrlTool {
    engine: Arc<ContextEngine>,
}

impl FetchUrlTool {
    pub fn new(engine: Arc<ContextEngine>) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl Tool for FetchUrlTool {
    fn name(&self) -> &str {
        "fetch_url_context"
    }

    fn description(&self) -> &str {
        "Extract readable text from one URL the user explicitly asked about. Tries a \
         text-extraction mirror first and falls back to a direct fetch."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "url": { "type": "string" }
            },
            "required": ["url"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let request: FetchRequest = parse_args(arguments)?;
        let response = self
            .engine
            .fetch_url(request)
            .await
            .map_err(|e| engine_error(self.name(), e))?;
        ToolResult::from_envelope(&response)
    }
}
