//! `ctxscout config`: configuration management commands.

use ctxscout_config::AppConfig;
use ctxscout_engine::ContextEngine;

pub async fn show() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

pub async fn path() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = AppConfig::config_dir().join("config.toml");
    println!("{}", config_path.display());
    Ok(())
}

pub async fn default() -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", AppConfig::default_toml());
    Ok(())
}

pub async fn check() -> Result<(), Box<dyn std::error::Error>> {
    println!("Validating configuration...");

    let config = match AppConfig::load() {
        Ok(config) => {
            println!("   ok   config parsed and validated");
            config
        }
        Err(e) => {
            println!("   FAIL config error: {e}");
            return Err(e.into());
        }
    };

    println!();
    println!("   Search:  {} (timeout {}s)", config.search.base_url, config.search.timeout_secs);
    println!("   Mirror:  {} (timeout {}s)", config.mirror.base_url, config.mirror.timeout_secs);
    println!("   GitHub:  {}", config.github.api_url);
    println!("   Lanes:   {}", config.search.default_lanes.join(", "));
    println!();

    let engine = ContextEngine::from_config(config)?;
    let backend = engine.backend();
    match backend.health_check().await {
        Ok(true) => println!("   ok   {} is reachable", backend.name()),
        Ok(false) => println!("   WARN {} did not answer the health query", backend.name()),
        Err(e) => println!("   WARN {} health check failed: {e}", backend.name()),
    }

    Ok(())
}
