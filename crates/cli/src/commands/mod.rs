//! Subcommand implementations.

pub mod config_cmd;
pub mod deep;
pub mod fetch;
pub mod search;
pub mod smart;
pub mod tools;

use ctxscout_config::AppConfig;
use ctxscout_engine::ContextEngine;
use serde::Serialize;
use std::sync::Arc;

/// Load configuration and wire the production engine.
pub(crate) fn build_engine() -> Result<Arc<ContextEngine>, Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    Ok(Arc::new(ContextEngine::from_config(config)?))
}

/// Print an envelope as pretty JSON on stdout.
pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
