//! `ctxscout tools` / `ctxscout call`: the tool catalog.

use ctxscout_core::ToolCall;
use ctxscout_tools::default_registry;

use super::{build_engine, print_json};

pub async fn list() -> Result<(), Box<dyn std::error::Error>> {
    let registry = default_registry(build_engine()?);
    print_json(&serde_json::json!({ "tools": registry.definitions() }))
}

pub async fn call(name: String, arguments: String) -> Result<(), Box<dyn std::error::Error>> {
    let arguments: serde_json::Value = serde_json::from_str(&arguments)
        .map_err(|e| format!("Tool arguments must be a JSON object: {e}"))?;
    let registry = default_registry(build_engine()?);
    let result = registry.execute(&ToolCall { name, arguments }).await?;
    println!("{}", result.output);
    Ok(())
}
