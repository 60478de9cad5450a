//! Repository scope resolution and curated file fetching for GitHub.

use ctxscout_config::GithubConfig;
use ctxscout_core::{
    ContextItem, ContextSource, FetchError, HttpRequest, HttpResponse, HttpTransport, RepoScope,
    SearchResult,
};
use ctxscout_extract::compact_text;
use futures::future::join_all;
use serde::Deserialize;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use crate::http::send_with_timeout;

/// Used when a repository scope is known but the caller gave no query.
pub const DEFAULT_REPO_QUERY: &str = "project structure main files architecture readme";

/// Path fragments that mark a file as worth reading first.
const PREFERRED_MARKERS: [&str; 11] = [
    "readme",
    "dockerfile",
    "compose",
    "package.json",
    "requirements.txt",
    "pyproject.toml",
    "setup.py",
    "go.mod",
    "cargo.toml",
    "pom.xml",
    "build.gradle",
];

const TEXT_EXTENSIONS: [&str; 11] = [
    ".md", ".txt", ".py", ".js", ".ts", ".tsx", ".jsx", ".json", ".yml", ".yaml", ".toml",
];

const MAX_FILES: usize = 24;
const MIN_FILE_CHARS: usize = 500;
const MAX_FILE_CHARS: usize = 8000;

/// Recognize `https://github.com/{owner}/{repo}[/...]`.
pub fn parse_repo(url: &str) -> Option<RepoScope> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?.to_lowercase();
    if host != "github.com" && host != "www.github.com" {
        return None;
    }

    let mut segments = parsed.path_segments()?;
    let owner = segments.next()?.trim();
    let repo = segments.next()?.trim();
    if owner.is_empty() || repo.is_empty() {
        return None;
    }
    Some(RepoScope::new(owner, repo))
}

/// Every distinct repository referenced by `urls`, first spelling kept.
pub fn detect_scopes<S: AsRef<str>>(urls: &[S]) -> Vec<RepoScope> {
    let mut seen = HashSet::new();
    urls.iter()
        .filter_map(|u| parse_repo(u.as_ref()))
        .filter(|scope| seen.insert(scope.key()))
        .collect()
}

/// Prefix each query with a `site:` restriction per scope, scope-major.
/// Queries pass through untouched when there are no scopes.
pub fn build_scoped_queries(queries: &[String], scopes: &[RepoScope]) -> Vec<String> {
    if scopes.is_empty() {
        return queries.to_vec();
    }

    let default = [DEFAULT_REPO_QUERY.to_string()];
    let seeds = if queries.is_empty() { &default[..] } else { queries };

    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for scope in scopes {
        for query in seeds {
            let scoped = format!("site:github.com/{}/{} {}", scope.owner, scope.repo, query);
            if seen.insert(scoped.to_lowercase()) {
                out.push(scoped);
            }
        }
    }
    out
}

/// Keep rows pointing inside one of `scopes`. No-op without scopes.
pub fn filter_by_scope(rows: &[SearchResult], scopes: &[RepoScope]) -> Vec<SearchResult> {
    if scopes.is_empty() {
        return rows.to_vec();
    }
    let prefixes: Vec<String> = scopes
        .iter()
        .map(|s| format!("https://github.com/{}/{}", s.owner, s.repo).to_lowercase())
        .collect();

    rows.iter()
        .filter(|row| {
            let url = row.url.to_lowercase();
            prefixes.iter().any(|p| url.starts_with(p.as_str()))
        })
        .cloned()
        .collect()
}

#[derive(Debug, Deserialize)]
struct RepoInfo {
    #[serde(default)]
    default_branch: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Tree {
    #[serde(default)]
    tree: Vec<TreeNode>,
}

#[derive(Debug, Deserialize)]
struct TreeNode {
    #[serde(default)]
    path: String,
    #[serde(default, rename = "type")]
    kind: String,
}

/// Pick the files worth reading: marker files first, then plain text and
/// source files, both in tree order.
fn select_paths(nodes: Vec<TreeNode>, max_files: usize) -> Vec<String> {
    let mut preferred = Vec::new();
    let mut other = Vec::new();

    for node in nodes {
        if node.kind != "blob" || node.path.is_empty() {
            continue;
        }
        let lower = node.path.to_lowercase();
        if PREFERRED_MARKERS.iter().any(|m| lower.contains(m)) {
            preferred.push(node.path);
        } else if TEXT_EXTENSIONS.iter().any(|ext| lower.ends_with(ext)) {
            other.push(node.path);
        }
    }

    preferred.into_iter().chain(other).take(max_files).collect()
}

/// Fetches a curated set of files from a repository through the REST API
/// and the raw content host.
pub struct GithubRepoFetcher {
    api_url: String,
    raw_url: String,
    user_agent: String,
    api_timeout: Duration,
    file_timeout: Duration,
    transport: Arc<dyn HttpTransport>,
}

impl GithubRepoFetcher {
    pub fn new(config: &GithubConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            api_url: config.api_url.trim_end_matches('/').to_string(),
            raw_url: config.raw_url.trim_end_matches('/').to_string(),
            user_agent: config.user_agent.clone(),
            api_timeout: config.api_timeout(),
            file_timeout: config.file_timeout(),
            transport,
        }
    }

    fn request(&self, url: String) -> HttpRequest {
        HttpRequest::get(url).header("User-Agent", self.user_agent.as_str())
    }

    async fn api_get(&self, url: String) -> Result<HttpResponse, FetchError> {
        let response = send_with_timeout(
            self.transport.as_ref(),
            "github-api",
            self.api_timeout,
            self.request(url),
        )
        .await?;
        if !response.is_ok() {
            return Err(FetchError::UpstreamHttp {
                service: "github-api".into(),
                status: response.status,
            });
        }
        Ok(response)
    }

    /// Resolve the default branch and list the selected file paths.
    async fn list_files(
        &self,
        owner: &str,
        repo: &str,
        max_files: usize,
    ) -> Result<(String, Vec<String>), FetchError> {
        let info_url = format!("{}/repos/{owner}/{repo}", self.api_url);
        let info: RepoInfo = serde_json::from_str(&self.api_get(info_url).await?.body)
            .map_err(|e| FetchError::Decode(format!("repository info: {e}")))?;
        let branch = info
            .default_branch
            .filter(|b| !b.is_empty())
            .unwrap_or_else(|| "main".to_string());

        let tree_url = format!(
            "{}/repos/{owner}/{repo}/git/trees/{branch}?recursive=1",
            self.api_url
        );
        let tree: Tree = serde_json::from_str(&self.api_get(tree_url).await?.body)
            .map_err(|e| FetchError::Decode(format!("repository tree: {e}")))?;

        Ok((branch, select_paths(tree.tree, max_files)))
    }

    async fn fetch_raw(&self, url: String) -> Result<String, FetchError> {
        let response = send_with_timeout(
            self.transport.as_ref(),
            "github-raw",
            self.file_timeout,
            self.request(url),
        )
        .await?;
        if !response.is_ok() {
            return Err(FetchError::UpstreamHttp {
                service: "github-raw".into(),
                status: response.status,
            });
        }
        Ok(response.body)
    }

    /// Fetch up to `max_files` files of `owner/repo`, each rendered as
    /// `[GitHub file: path] snippet` within `max_chars_per_file`.
    ///
    /// API failures yield an empty list; failed or empty files are dropped.
    pub async fn fetch_repo_files(
        &self,
        owner: &str,
        repo: &str,
        max_files: usize,
        max_chars_per_file: usize,
    ) -> Vec<ContextItem> {
        let max_files = max_files.clamp(1, MAX_FILES);
        let max_chars = max_chars_per_file.clamp(MIN_FILE_CHARS, MAX_FILE_CHARS);

        let (branch, paths) = match self.list_files(owner, repo, max_files).await {
            Ok(listing) => listing,
            Err(e) => {
                warn!(owner, repo, error = %e, "Repository listing failed");
                return Vec::new();
            }
        };
        if paths.is_empty() {
            debug!(owner, repo, "Repository has no readable files");
            return Vec::new();
        }

        info!(owner, repo, branch = %branch, files = paths.len(), "Fetching repository files");
        let bodies = join_all(paths.iter().map(|path| {
            self.fetch_raw(format!("{}/{owner}/{repo}/{branch}/{path}", self.raw_url))
        }))
        .await;

        paths
            .into_iter()
            .zip(bodies)
            .filter_map(|(path, body)| {
                let body = match body {
                    Ok(body) => body,
                    Err(e) => {
                        debug!(path = %path, error = %e, "Repository file skipped");
                        return None;
                    }
                };
                let prefix = format!("[GitHub file: {path}] ");
                let budget = max_chars.saturating_sub(prefix.chars().count());
                let snippet = compact_text(&body, budget);
                if snippet.is_empty() {
                    return None;
                }
                Some(ContextItem::new(
                    format!("https://github.com/{owner}/{repo}/blob/{branch}/{path}"),
                    format!("{prefix}{snippet}"),
                    ContextSource::GithubFile,
                ))
            })
            .collect()
    }
}
