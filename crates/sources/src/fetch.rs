//! Page-text fetch pipeline: an ordered fallback chain with per-tier timeouts.
//!
//! The primary tier asks a text-extraction mirror for the page; when that
//! fails (non-200, network error, timeout) the direct tier fetches the page
//! itself and strips the markup. The chain always ends in a
//! [`FetchOutcome`]; it never surfaces an error to the caller.

use async_trait::async_trait;
use ctxscout_config::AppConfig;
use ctxscout_core::{
    ContextItem, ContextSource, FetchError, FetchOutcome, HttpRequest, HttpTransport,
};
use ctxscout_extract::{compact_text, dedupe_urls, strip_html_to_text, validate_http_url};
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// One way of turning a URL into compacted text.
#[async_trait]
pub trait FetchTier: Send + Sync {
    /// Tier name, used in logs and error messages.
    fn name(&self) -> &str;

    /// The source tag attached to text this tier produces.
    fn source(&self) -> ContextSource;

    /// Fetch `url` and compact the text to `max_chars`.
    async fn fetch(&self, url: &str, max_chars: usize) -> Result<String, FetchError>;
}

/// Primary tier: the text-extraction mirror.
pub struct MirrorTier {
    base_url: String,
    transport: Arc<dyn HttpTransport>,
}

impl MirrorTier {
    pub fn new(base_url: impl Into<String>, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            transport,
        }
    }

    /// `{mirror}/{url without its scheme}`.
    pub fn mirror_url(&self, url: &str) -> String {
        let stripped = url
            .strip_prefix("https://")
            .or_else(|| url.strip_prefix("http://"))
            .unwrap_or(url);
        format!("{}/{}", self.base_url, stripped)
    }
}

#[async_trait]
impl FetchTier for MirrorTier {
    fn name(&self) -> &str {
        "mirror"
    }

    fn source(&self) -> ContextSource {
        ContextSource::Mirror
    }

    async fn fetch(&self, url: &str, max_chars: usize) -> Result<String, FetchError> {
        validate_http_url(url)?;
        let response = self
            .transport
            .get(HttpRequest::get(self.mirror_url(url)))
            .await?;
        if !response.is_ok() {
            return Err(FetchError::UpstreamHttp {
                service: self.name().into(),
                status: response.status,
            });
        }
        Ok(compact_text(&response.body, max_chars))
    }
}

/// Fallback tier: fetch the page directly with browser-like headers.
pub struct DirectTier {
    user_agent: String,
    accept: String,
    transport: Arc<dyn HttpTransport>,
}

impl DirectTier {
    pub fn new(
        user_agent: impl Into<String>,
        accept: impl Into<String>,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            user_agent: user_agent.into(),
            accept: accept.into(),
            transport,
        }
    }
}

#[async_trait]
impl FetchTier for DirectTier {
    fn name(&self) -> &str {
        "direct"
    }

    fn source(&self) -> ContextSource {
        ContextSource::Direct
    }

    async fn fetch(&self, url: &str, max_chars: usize) -> Result<String, FetchError> {
        validate_http_url(url)?;
        let request = HttpRequest::get(url)
            .header("User-Agent", self.user_agent.as_str())
            .header("Accept", self.accept.as_str())
            .follow_redirects(true);
        let response = self.transport.get(request).await?;
        if !response.is_ok() {
            return Err(FetchError::UpstreamHttp {
                service: self.name().into(),
                status: response.status,
            });
        }
        let text = if response.is_html() {
            strip_html_to_text(&response.body)
        } else {
            response.body
        };
        Ok(compact_text(&text, max_chars))
    }
}

/// A single entry in the fallback chain.
struct FallbackEntry {
    tier: Arc<dyn FetchTier>,
    timeout: Duration,
}

/// Tries each tier in order until one succeeds.
#[derive(Default)]
pub struct FallbackFetcher {
    chain: Vec<FallbackEntry>,
}

impl FallbackFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tier to the chain with its own timeout.
    pub fn add(mut self, tier: Arc<dyn FetchTier>, timeout: Duration) -> Self {
        self.chain.push(FallbackEntry { tier, timeout });
        self
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    /// Run the chain for `url`. A failure carries the last tier's error.
    pub async fn fetch(&self, url: &str, max_chars: usize) -> FetchOutcome {
        let mut last_error = "no fetch tiers configured".to_string();

        for (i, entry) in self.chain.iter().enumerate() {
            let tier = entry.tier.name();
            debug!(
                url,
                tier,
                attempt = i + 1,
                total = self.chain.len(),
                "Fallback: trying tier"
            );

            match tokio::time::timeout(entry.timeout, entry.tier.fetch(url, max_chars)).await {
                Ok(Ok(text)) => {
                    return FetchOutcome::Success {
                        text,
                        source: entry.tier.source(),
                    };
                }
                Ok(Err(e)) => {
                    warn!(url, tier, error = %e, "Fallback: tier failed, trying next");
                    last_error = e.to_string();
                }
                Err(_) => {
                    warn!(
                        url,
                        tier,
                        timeout_secs = entry.timeout.as_secs(),
                        "Fallback: tier timed out, trying next"
                    );
                    last_error = FetchError::Timeout {
                        service: tier.to_string(),
                        timeout_secs: entry.timeout.as_secs(),
                    }
                    .to_string();
                }
            }
        }

        FetchOutcome::Failure { error: last_error }
    }
}

/// Run one tier under `timeout`, attributing an elapsed timer to the tier.
async fn fetch_bounded(
    tier: &dyn FetchTier,
    timeout: Duration,
    url: &str,
    max_chars: usize,
) -> Result<String, FetchError> {
    match tokio::time::timeout(timeout, tier.fetch(url, max_chars)).await {
        Ok(result) => result,
        Err(_) => Err(FetchError::Timeout {
            service: tier.name().to_string(),
            timeout_secs: timeout.as_secs(),
        }),
    }
}

/// The page-text fetcher used by the engines: each tier on its own plus
/// the mirror → direct fallback chain.
pub struct ContextFetcher {
    mirror: Arc<MirrorTier>,
    mirror_timeout: Duration,
    direct: Arc<DirectTier>,
    direct_timeout: Duration,
    chain: FallbackFetcher,
}

impl ContextFetcher {
    pub fn new(config: &AppConfig, transport: Arc<dyn HttpTransport>) -> Self {
        let mirror = Arc::new(MirrorTier::new(
            config.mirror.base_url.clone(),
            transport.clone(),
        ));
        let direct = Arc::new(DirectTier::new(
            config.direct.user_agent.clone(),
            config.direct.accept.clone(),
            transport,
        ));
        let chain = FallbackFetcher::new()
            .add(mirror.clone(), config.mirror.timeout())
            .add(direct.clone(), config.direct.timeout());

        Self {
            mirror,
            mirror_timeout: config.mirror.timeout(),
            direct,
            direct_timeout: config.direct.timeout(),
            chain,
        }
    }

    /// Mirror only; the failure is returned so the caller can decide what
    /// to fall back to.
    pub async fn fetch_clean_context(
        &self,
        url: &str,
        max_chars: usize,
    ) -> Result<String, FetchError> {
        fetch_bounded(self.mirror.as_ref(), self.mirror_timeout, url, max_chars).await
    }

    /// Direct GET only, markup stripped.
    pub async fn fetch_direct_context(
        &self,
        url: &str,
        max_chars: usize,
    ) -> Result<String, FetchError> {
        fetch_bounded(self.direct.as_ref(), self.direct_timeout, url, max_chars).await
    }

    /// Mirror first, then direct. Never fails; see [`FetchOutcome`].
    pub async fn fetch_with_fallback(&self, url: &str, max_chars: usize) -> FetchOutcome {
        if let Err(e) = validate_http_url(url) {
            return FetchOutcome::Failure {
                error: e.to_string(),
            };
        }
        self.chain.fetch(url, max_chars).await
    }

    /// [`fetch_with_fallback`](Self::fetch_with_fallback) packaged as a
    /// context item for `url`.
    pub async fn fetch_item(&self, url: &str, max_chars: usize) -> ContextItem {
        ContextItem::from_outcome(url, self.fetch_with_fallback(url, max_chars).await)
    }

    /// Mirror-fetch the first `max_urls` distinct URLs concurrently. Failed
    /// or empty fetches are left out; order follows `urls`.
    pub async fn fetch_context_items(
        &self,
        urls: &[String],
        max_urls: usize,
        max_chars: usize,
    ) -> Vec<ContextItem> {
        let picked: Vec<String> = dedupe_urls(urls).into_iter().take(max_urls).collect();
        if picked.is_empty() {
            return Vec::new();
        }

        info!(count = picked.len(), max_chars, "Fetching context items");
        let fetched = join_all(picked.iter().map(|u| self.fetch_clean_context(u, max_chars))).await;

        picked
            .into_iter()
            .zip(fetched)
            .filter_map(|(url, result)| match result {
                Ok(text) if !text.is_empty() => {
                    Some(ContextItem::new(url, text, ContextSource::Mirror))
                }
                Ok(_) => None,
                Err(e) => {
                    warn!(url = %url, error = %e, "Context fetch failed, skipping");
                    None
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ctxscout_core::{HttpResponse, Reply, StaticTransport};

    const MIRROR: &str = "https://mirror.test";

    fn config() -> AppConfig {
        let mut config = AppConfig::default();
        config.mirror.base_url = MIRROR.into();
        config
    }

    fn fetcher(transport: Arc<StaticTransport>) -> ContextFetcher {
        ContextFetcher::new(&config(), transport)
    }

    #[test]
    fn mirror_url_strips_scheme() {
        let tier = MirrorTier::new("https://mirror.test/", Arc::new(StaticTransport::new()));
        assert_eq!(
            tier.mirror_url("https://example.com/a?b=1"),
            "https://mirror.test/example.com/a?b=1"
        );
        assert_eq!(
            tier.mirror_url("http://example.com"),
            "https://mirror.test/example.com"
        );
    }

    #[tokio::test]
    async fn mirror_success_is_tagged_mirror() {
        let transport = Arc::new(
            StaticTransport::new().ok(format!("{MIRROR}/example.com/page"), "Hello   from the mirror."),
        );
        let outcome = fetcher(transport.clone())
            .fetch_with_fallback("https://example.com/page", 1000)
            .await;
        assert_eq!(
            outcome,
            FetchOutcome::Success {
                text: "Hello from the mirror.".into(),
                source: ContextSource::Mirror,
            }
        );
        assert_eq!(transport.requested_urls().len(), 1);
    }

    #[tokio::test]
    async fn mirror_503_falls_back_to_direct_html() {
        let transport = Arc::new(
            StaticTransport::new()
                .status(format!("{MIRROR}/example.com/page"), 503)
                .route(
                    "https://example.com/page",
                    Reply::Respond(HttpResponse::html(
                        "<html><script>track()</script><body><h1>Docs</h1><p>Plain &amp; simple.</p></body></html>",
                    )),
                ),
        );
        let outcome = fetcher(transport)
            .fetch_with_fallback("https://example.com/page", 1000)
            .await;

        match outcome {
            FetchOutcome::Success { text, source } => {
                assert_eq!(source, ContextSource::Direct);
                assert_eq!(text, "Docs Plain & simple.");
                assert!(!text.contains('<'));
            }
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn direct_non_html_body_is_kept_verbatim() {
        let transport = Arc::new(
            StaticTransport::new()
                .status(format!("{MIRROR}/example.com/notes.txt"), 500)
                .route(
                    "https://example.com/notes.txt",
                    Reply::Respond(HttpResponse::ok("a <b> c").with_content_type("text/plain")),
                ),
        );
        let outcome = fetcher(transport)
            .fetch_with_fallback("https://example.com/notes.txt", 1000)
            .await;
        assert_eq!(outcome.text(), "a <b> c");
    }

    #[tokio::test]
    async fn both_tiers_failing_reports_fallback_error() {
        let transport = Arc::new(
            StaticTransport::new()
                .status(format!("{MIRROR}/example.com/gone"), 503)
                .status("https://example.com/gone", 410),
        );
        let item = fetcher(transport)
            .fetch_item("https://example.com/gone", 1000)
            .await;
        assert_eq!(item.source, ContextSource::None);
        assert!(item.context.is_empty());
        assert_eq!(item.error.as_deref(), Some("direct returned HTTP 410"));
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_mirror_times_out_then_direct_answers() {
        let transport = Arc::new(
            StaticTransport::new()
                .route(format!("{MIRROR}/slow.test/"), Reply::Stall)
                .ok("https://slow.test/", "direct text"),
        );
        let outcome = fetcher(transport)
            .fetch_with_fallback("https://slow.test/", 1000)
            .await;
        assert_eq!(
            outcome,
            FetchOutcome::Success {
                text: "direct text".into(),
                source: ContextSource::Direct,
            }
        );
    }

    #[tokio::test]
    async fn invalid_url_fails_without_network() {
        let transport = Arc::new(StaticTransport::new());
        let outcome = fetcher(transport.clone())
            .fetch_with_fallback("ftp://example.com/file", 1000)
            .await;
        assert!(!outcome.is_success());
        assert!(transport.requested_urls().is_empty());
    }

    #[tokio::test]
    async fn clean_context_surfaces_mirror_failure() {
        let transport = Arc::new(StaticTransport::new().status(format!("{MIRROR}/example.com/x"), 429));
        let err = fetcher(transport)
            .fetch_clean_context("https://example.com/x", 500)
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::UpstreamHttp { status: 429, .. }));
    }

    #[tokio::test]
    async fn direct_context_sends_browser_headers() {
        let transport = Arc::new(
            StaticTransport::new().route(
                "https://example.com/",
                Reply::Respond(HttpResponse::html("<p>hi</p>")),
            ),
        );
        let text = fetcher(transport.clone())
            .fetch_direct_context("https://example.com/", 100)
            .await
            .unwrap();
        assert_eq!(text, "hi");

        let sent = transport.requests();
        assert!(sent[0].follow_redirects);
        assert!(sent[0].headers.iter().any(|(k, v)| k == "User-Agent" && v.contains("ctxscout/")));
        assert!(sent[0].headers.iter().any(|(k, _)| k == "Accept"));
    }

    #[tokio::test]
    async fn context_items_keep_order_and_drop_failures() {
        let transport = Arc::new(
            StaticTransport::new()
                .ok(format!("{MIRROR}/a.test/1"), "one")
                .status(format!("{MIRROR}/b.test/2"), 500)
                .ok(format!("{MIRROR}/c.test/3"), "three")
                .ok(format!("{MIRROR}/d.test/4"), "four"),
        );
        let urls = vec![
            "https://a.test/1".to_string(),
            "https://A.test/1".to_string(),
            "https://b.test/2".to_string(),
            "not a url".to_string(),
            "https://c.test/3".to_string(),
            "https://d.test/4".to_string(),
        ];
        let items = fetcher(transport.clone())
            .fetch_context_items(&urls, 3, 500)
            .await;

        let got: Vec<&str> = items.iter().map(|i| i.url.as_str()).collect();
        assert_eq!(got, vec!["https://a.test/1", "https://c.test/3"]);
        assert!(items.iter().all(|i| i.source == ContextSource::Mirror));
        // d.test is past the budget and never requested
        assert_eq!(transport.count_prefix(&format!("{MIRROR}/d.test")), 0);
    }

    #[tokio::test]
    async fn empty_chain_fails() {
        let outcome = FallbackFetcher::new().fetch("https://example.com", 100).await;
        assert_eq!(
            outcome,
            FetchOutcome::Failure {
                error: "no fetch tiers configured".into()
            }
        );
    }
}
