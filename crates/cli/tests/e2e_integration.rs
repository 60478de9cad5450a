//! End-to-end tests for the ctxscout engines.
//!
//! These drive the full pipeline (planning, concurrent search and fetch,
//! merging, envelopes, tool dispatch) against an in-memory transport and a
//! scripted search backend. No network access.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use ctxscout_config::AppConfig;
use ctxscout_core::{
    ContextSource, FetchError, HttpResponse, Reply, SearchBackend, SearchResult, StaticTransport,
    ToolCall, ToolError,
};
use ctxscout_engine::{
    ContextEngine, DeepSearchRequest, FetchRequest, QuickSearchRequest, SmartFetchRequest,
};
use ctxscout_tools::default_registry;

const MIRROR: &str = "https://mirror.test";
const GITHUB_API: &str = "https://api.gh.test";
const GITHUB_RAW: &str = "https://raw.gh.test";

// ── Scripted search backend ──────────────────────────────────────────────

/// Answers (query, lane) pairs from a table; listed pairs can be made to fail.
#[derive(Default)]
struct ScriptedBackend {
    rows: HashMap<(String, String), Vec<SearchResult>>,
    failing: Vec<(String, String)>,
    calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedBackend {
    fn answer(mut self, query: &str, lane: &str, rows: &[(&str, &str)]) -> Self {
        let rows = rows
            .iter()
            .map(|(title, url)| SearchResult::new(*title, *url, format!("snippet for {title}")))
            .collect();
        self.rows.insert((query.into(), lane.into()), rows);
        self
    }

    fn fail(mut self, query: &str, lane: &str) -> Self {
        self.failing.push((query.into(), lane.into()));
        self
    }

    fn calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl SearchBackend for ScriptedBackend {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn search(
        &self,
        query: &str,
        lane: &str,
        limit: usize,
    ) -> Result<Vec<SearchResult>, FetchError> {
        let key = (query.to_string(), lane.to_string());
        self.calls.lock().unwrap().push(key.clone());
        if self.failing.contains(&key) {
            return Err(FetchError::Network("connection reset".into()));
        }
        Ok(self
            .rows
            .get(&key)
            .map(|rows| rows.iter().take(limit).cloned().collect())
            .unwrap_or_default())
    }
}

fn config() -> AppConfig {
    let mut config = AppConfig::default();
    config.mirror.base_url = MIRROR.into();
    config.github.api_url = GITHUB_API.into();
    config.github.raw_url = GITHUB_RAW.into();
    config
}

fn engine(backend: Arc<ScriptedBackend>, transport: Arc<StaticTransport>) -> ContextEngine {
    ContextEngine::new(config(), backend, transport)
}

fn widgets_repo(transport: StaticTransport) -> StaticTransport {
    transport
        .route(
            format!("{GITHUB_API}/repos/acme/widgets"),
            Reply::Respond(HttpResponse::json(
                &serde_json::json!({"default_branch": "main"}),
            )),
        )
        .route(
            format!("{GITHUB_API}/repos/acme/widgets/git/trees/main?recursive=1"),
            Reply::Respond(HttpResponse::json(&serde_json::json!({"tree": [
                {"path": "README.md", "type": "blob"},
                {"path": "Cargo.toml", "type": "blob"},
                {"path": "src", "type": "tree"},
                {"path": "docs/design.md", "type": "blob"}
            ]}))),
        )
        .ok(
            format!("{GITHUB_RAW}/acme/widgets/main/README.md"),
            "Widgets is a UI toolkit. It renders fast.",
        )
        .ok(
            format!("{GITHUB_RAW}/acme/widgets/main/Cargo.toml"),
            "[package]\nname = \"widgets\"",
        )
        .ok(
            format!("{GITHUB_RAW}/acme/widgets/main/docs/design.md"),
            "Design notes.",
        )
}

// ── Scenario A: plain quick search ───────────────────────────────────────

#[tokio::test]
async fn quick_search_without_urls() {
    let backend = Arc::new(ScriptedBackend::default().answer(
        "rust async runtimes",
        "general",
        &[
            ("Tokio", "https://tokio.rs/"),
            ("Tokio again", "https://TOKIO.rs/"),
            ("smol", "https://github.com/smol-rs/smol"),
            ("async-std", "https://async.rs/"),
            ("glommio", "https://github.com/DataDog/glommio"),
        ],
    ));
    let transport = Arc::new(StaticTransport::new());
    let response = engine(backend, transport.clone())
        .search_quick(QuickSearchRequest {
            limit: 3,
            ..QuickSearchRequest::new("rust async runtimes")
        })
        .await
        .unwrap();

    assert!(response.count <= 3);
    assert_eq!(response.count, response.results.len());
    let mut keys: Vec<String> = response.results.iter().map(|r| r.dedup_key()).collect();
    keys.sort();
    keys.dedup();
    assert_eq!(keys.len(), response.results.len());
    assert!(!response.repo_scope_enforced);
    assert!(response.repo_scopes.is_empty());
    assert!(transport.requested_urls().is_empty());
}

// ── Scenario B: repository URL in the query, strict mode ────────────────

#[tokio::test]
async fn embedded_repository_url_with_strict_mode() {
    let scoped = "site:github.com/acme/widgets summarize please";
    let backend = Arc::new(ScriptedBackend::default().answer(
        scoped,
        "general",
        &[
            ("review", "https://blog.example.com/widgets"),
            ("issue", "https://github.com/acme/widgets/issues/12"),
            ("fork", "https://github.com/someone/widgets"),
        ],
    ));
    let transport = Arc::new(widgets_repo(
        StaticTransport::new().ok(format!("{MIRROR}/github.com/acme/widgets"), "Widgets repository."),
    ));

    let response = engine(backend, transport)
        .search_quick(QuickSearchRequest {
            strict_repo_only: true,
            ..QuickSearchRequest::new("summarize https://github.com/acme/widgets please")
        })
        .await
        .unwrap();

    assert_eq!(response.urls_detected, vec!["https://github.com/acme/widgets"]);
    assert_eq!(response.repo_scopes.len(), 1);
    assert_eq!(response.repo_scopes[0].owner, "acme");
    assert_eq!(response.repo_scopes[0].repo, "widgets");
    assert_eq!(response.query, scoped);
    assert!(response.strict_repo_only);
    assert!(!response.results.is_empty());
    for row in &response.results {
        assert!(row.url.starts_with("https://github.com/acme/widgets"), "{}", row.url);
    }
    assert!(
        response
            .context_items
            .iter()
            .any(|i| i.source == ContextSource::GithubFile)
    );
    assert!(response.analysis_hint.grounding_required);
}

// ── Scenario C: mirror down, direct fetch serves HTML ───────────────────

#[tokio::test]
async fn mirror_503_falls_back_to_direct() {
    let transport = Arc::new(
        StaticTransport::new()
            .status(format!("{MIRROR}/example.org/guide"), 503)
            .route(
                "https://example.org/guide",
                Reply::Respond(HttpResponse::html(
                    "<!doctype html><html><head><style>h1{color:red}</style>\
                     <script>var x = '<b>';</script></head>\
                     <body><h1>Guide</h1><p>Step one &mdash; install.</p></body></html>",
                )),
            ),
    );
    let response = engine(Arc::new(ScriptedBackend::default()), transport)
        .fetch_url(FetchRequest::new("https://example.org/guide"))
        .await
        .unwrap();

    assert_eq!(response.source, ContextSource::Direct);
    assert!(!response.context.contains('<'));
    assert!(!response.context.contains('>'));
    assert!(response.context.starts_with("Guide Step one"));
    assert!(response.error.is_none());
}

// ── Scenario D: smart fetch with a link budget ──────────────────────────

#[tokio::test]
async fn smart_fetch_follows_only_same_host_links_within_budget() {
    let page = "Index. Read https://docs.test/a, https://docs.test/b, https://docs.test/c, \
                https://docs.test/d and https://docs.test/e. External: \
                https://elsewhere.test/1 https://another.test/2";
    let transport = Arc::new(
        StaticTransport::new()
            .ok(format!("{MIRROR}/docs.test/index"), page)
            .route_prefix(
                format!("{MIRROR}/docs.test/"),
                Reply::Respond(HttpResponse::ok("Linked page.")),
            ),
    );
    let response = engine(Arc::new(ScriptedBackend::default()), transport.clone())
        .fetch_smart(SmartFetchRequest {
            max_urls: 3,
            ..SmartFetchRequest::new("https://docs.test/index")
        })
        .await
        .unwrap();

    let followed = &response.urls_visited[1..];
    assert_eq!(followed.len(), 2);
    assert!(followed.iter().all(|u| u.starts_with("https://docs.test/")));
    assert_eq!(response.count, 3);
    assert_eq!(transport.count_prefix(&format!("{MIRROR}/elsewhere.test")), 0);
    assert_eq!(transport.count_prefix(&format!("{MIRROR}/another.test")), 0);
    assert!(response.merged_context.starts_with("URL: https://docs.test/index"));
}

// ── Scenario E: deep search with one failing call ───────────────────────

#[tokio::test]
async fn deep_search_survives_a_failing_lane() {
    let backend = Arc::new(
        ScriptedBackend::default()
            .answer("ownership", "general", &[("g1", "https://g.test/1")])
            .answer("ownership", "science", &[("s1", "https://s.test/1")])
            .answer("ownership", "news", &[("n1", "https://n.test/1")])
            .answer("borrowing", "general", &[("g2", "https://g.test/2")])
            .fail("borrowing", "science")
            .answer("borrowing", "news", &[("n2", "https://n.test/2")]),
    );
    let response = engine(backend.clone(), Arc::new(StaticTransport::new()))
        .search_deep(DeepSearchRequest {
            queries: vec!["ownership".into(), "borrowing".into()],
            include_context: false,
            ..DeepSearchRequest::default()
        })
        .await
        .unwrap();

    assert_eq!(backend.calls(), 6);
    assert_eq!(response.count, 5);
    let titles: Vec<&str> = response.results.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["g1", "s1", "n1", "g2", "n2"]);
}

// ── Tool dispatch ───────────────────────────────────────────────────────

#[tokio::test]
async fn tool_call_round_trip() {
    let backend = Arc::new(ScriptedBackend::default().answer(
        "what is ctxscout",
        "general",
        &[("home", "https://ctxscout.test/")],
    ));
    let engine = Arc::new(engine(backend, Arc::new(StaticTransport::new())));
    let registry = default_registry(engine);

    let result = registry
        .execute(&ToolCall {
            name: "search_quick".into(),
            arguments: serde_json::json!({"query": "what is ctxscout"}),
        })
        .await
        .unwrap();
    let data = result.data.unwrap();
    assert_eq!(data["count"], 1);
    assert_eq!(data["analysis_hint"]["priority_sources"][0], "context_items");

    let err = registry
        .execute(&ToolCall {
            name: "search_deep".into(),
            arguments: serde_json::json!({"limit": 2}),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ToolError::InvalidArguments(_)));
}
