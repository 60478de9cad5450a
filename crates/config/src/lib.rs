//! Configuration loading and validation for ctxscout.
//!
//! Loads configuration from `~/.ctxscout/config.toml` with environment
//! variable overrides. Validates all settings at startup; the resulting
//! [`AppConfig`] is passed into component constructors, never read as
//! global state.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// The root configuration structure.
///
/// Maps directly to `~/.ctxscout/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Search backend (SearxNG) settings
    #[serde(default)]
    pub search: SearchConfig,

    /// Text-extraction mirror settings
    #[serde(default)]
    pub mirror: MirrorConfig,

    /// Direct HTTP fetch settings
    #[serde(default)]
    pub direct: DirectConfig,

    /// Code host (GitHub) settings
    #[serde(default)]
    pub github: GithubConfig,

    /// Response size limits
    #[serde(default)]
    pub limits: LimitsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_search_url")]
    pub base_url: String,

    #[serde(default = "default_search_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_language")]
    pub language: String,

    /// Lanes used by deep search when the request names none
    #[serde(default = "default_lanes")]
    pub default_lanes: Vec<String>,

    /// Lanes deep search switches to once a repository scope is detected
    #[serde(default = "default_repo_lanes")]
    pub repo_lanes: Vec<String>,
}

fn default_search_url() -> String {
    "http://searxng:8080".into()
}
fn default_search_timeout() -> u64 {
    20
}
fn default_language() -> String {
    "auto".into()
}
fn default_lanes() -> Vec<String> {
    vec!["general".into(), "science".into(), "news".into()]
}
fn default_repo_lanes() -> Vec<String> {
    // "it" is SearxNG's code category
    vec!["general".into(), "it".into()]
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: default_search_url(),
            timeout_secs: default_search_timeout(),
            language: default_language(),
            default_lanes: default_lanes(),
            repo_lanes: default_repo_lanes(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MirrorConfig {
    #[serde(default = "default_mirror_url")]
    pub base_url: String,

    #[serde(default = "default_fetch_timeout")]
    pub timeout_secs: u64,
}

fn default_mirror_url() -> String {
    "https://r.jina.ai".into()
}
fn default_fetch_timeout() -> u64 {
    25
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            base_url: default_mirror_url(),
            timeout_secs: default_fetch_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectConfig {
    #[serde(default = "default_direct_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_accept")]
    pub accept: String,

    #[serde(default = "default_fetch_timeout")]
    pub timeout_secs: u64,
}

fn default_direct_user_agent() -> String {
    format!(
        "Mozilla/5.0 (compatible; ctxscout/{})",
        env!("CARGO_PKG_VERSION")
    )
}
fn default_accept() -> String {
    "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8".into()
}

impl Default for DirectConfig {
    fn default() -> Self {
        Self {
            user_agent: default_direct_user_agent(),
            accept: default_accept(),
            timeout_secs: default_fetch_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubConfig {
    #[serde(default = "default_github_api")]
    pub api_url: String,

    #[serde(default = "default_github_raw")]
    pub raw_url: String,

    #[serde(default = "default_github_user_agent")]
    pub user_agent: String,

    /// Timeout for repository metadata and tree calls
    #[serde(default = "default_search_timeout")]
    pub api_timeout_secs: u64,

    /// Timeout for each raw file download
    #[serde(default = "default_fetch_timeout")]
    pub file_timeout_secs: u64,
}

fn default_github_api() -> String {
    "https://api.github.com".into()
}
fn default_github_raw() -> String {
    "https://raw.githubusercontent.com".into()
}
fn default_github_user_agent() -> String {
    format!("ctxscout/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_url: default_github_api(),
            raw_url: default_github_raw(),
            user_agent: default_github_user_agent(),
            api_timeout_secs: default_search_timeout(),
            file_timeout_secs: default_fetch_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Upper bound on smart fetch's merged context
    #[serde(default = "default_aggregate_ceiling")]
    pub aggregate_ceiling: usize,

    /// Character budget for a single-URL fetch
    #[serde(default = "default_url_context_chars")]
    pub url_context_chars: usize,
}

fn default_aggregate_ceiling() -> usize {
    20_000
}
fn default_url_context_chars() -> usize {
    4_000
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            aggregate_ceiling: default_aggregate_ceiling(),
            url_context_chars: default_url_context_chars(),
        }
    }
}

impl SearchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl MirrorConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl DirectConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl GithubConfig {
    pub fn api_timeout(&self) -> Duration {
        Duration::from_secs(self.api_timeout_secs)
    }

    pub fn file_timeout(&self) -> Duration {
        Duration::from_secs(self.file_timeout_secs)
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.ctxscout/config.toml).
    ///
    /// Environment variables override file values:
    /// - `CTXSCOUT_SEARCH_URL` (falls back to `SEARX_BASE`)
    /// - `CTXSCOUT_MIRROR_URL`
    /// - `CTXSCOUT_GITHUB_API_URL`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;

        if let Some(url) = std::env::var("CTXSCOUT_SEARCH_URL")
            .ok()
            .or_else(|| std::env::var("SEARX_BASE").ok())
        {
            config.search.base_url = url;
        }

        if let Ok(url) = std::env::var("CTXSCOUT_MIRROR_URL") {
            config.mirror.base_url = url;
        }

        if let Ok(url) = std::env::var("CTXSCOUT_GITHUB_API_URL") {
            config.github.api_url = url;
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".ctxscout")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("search.base_url", &self.search.base_url),
            ("mirror.base_url", &self.mirror.base_url),
            ("github.api_url", &self.github.api_url),
            ("github.raw_url", &self.github.raw_url),
        ] {
            if !value.starts_with("http://") && !value.starts_with("https://") {
                return Err(ConfigError::ValidationError(format!(
                    "{field} must be an http(s) URL, got '{value}'"
                )));
            }
        }

        for (field, secs) in [
            ("search.timeout_secs", self.search.timeout_secs),
            ("mirror.timeout_secs", self.mirror.timeout_secs),
            ("direct.timeout_secs", self.direct.timeout_secs),
            ("github.api_timeout_secs", self.github.api_timeout_secs),
            ("github.file_timeout_secs", self.github.file_timeout_secs),
        ] {
            if secs == 0 {
                return Err(ConfigError::ValidationError(format!(
                    "{field} must be greater than 0"
                )));
            }
        }

        if self.limits.aggregate_ceiling < 500 {
            return Err(ConfigError::ValidationError(
                "limits.aggregate_ceiling must be at least 500".into(),
            ));
        }

        if self.search.repo_lanes.iter().all(|l| l.trim().is_empty()) {
            return Err(ConfigError::ValidationError(
                "search.repo_lanes must name at least one lane".into(),
            ));
        }

        Ok(())
    }

    /// Generate a default config TOML string.
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
