//! HTTP transport trait, the single seam through which every outbound
//! request travels.
//!
//! Implementations: the reqwest-backed transport in `ctxscout-sources`,
//! and [`StaticTransport`], an in-memory route table for tests and
//! offline runs.

use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;

use crate::error::FetchError;

/// An outbound GET request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// Fully-qualified URL, including any encoded query string.
    pub url: String,

    /// Extra request headers.
    pub headers: Vec<(String, String)>,

    /// Whether 3xx responses should be followed.
    pub follow_redirects: bool,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: Vec::new(),
            follow_redirects: false,
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn follow_redirects(mut self, follow: bool) -> Self {
        self.follow_redirects = follow;
        self
    }
}

/// A fully-buffered response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: None,
            body: body.into(),
        }
    }

    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(200, body)
    }

    /// A 200 response with a `text/html` content type.
    pub fn html(body: impl Into<String>) -> Self {
        Self::ok(body).with_content_type("text/html; charset=utf-8")
    }

    /// A 200 response carrying a JSON document.
    pub fn json(value: &serde_json::Value) -> Self {
        Self::ok(value.to_string()).with_content_type("application/json")
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    /// Whether the content type indicates markup that needs stripping.
    pub fn is_html(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|ct| ct.to_lowercase().contains("html"))
    }
}

/// Sends HTTP requests. Errors are transport failures only; non-200
/// statuses come back as ordinary responses.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn get(&self, request: HttpRequest) -> Result<HttpResponse, FetchError>;
}

/// What a [`StaticTransport`] route answers with.
#[derive(Debug, Clone)]
pub enum Reply {
    Respond(HttpResponse),
    Fail(FetchError),
    /// Never answers; used to exercise timeouts.
    Stall,
}

enum Matcher {
    Exact(String),
    Prefix(String),
}

impl Matcher {
    fn matches(&self, url: &str) -> bool {
        match self {
            Self::Exact(u) => u == url,
            Self::Prefix(p) => url.starts_with(p.as_str()),
        }
    }
}

/// In-memory transport answering from a route table.
///
/// Routes are checked in registration order; unmatched URLs get a 404.
/// Every request is recorded so tests can assert on traffic.
#[derive(Default)]
pub struct StaticTransport {
    routes: Vec<(Matcher, Reply)>,
    seen: Mutex<Vec<HttpRequest>>,
}

impl StaticTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer requests for exactly `url`.
    pub fn route(mut self, url: impl Into<String>, reply: Reply) -> Self {
        self.routes.push((Matcher::Exact(url.into()), reply));
        self
    }

    /// Answer requests whose URL starts with `prefix`.
    pub fn route_prefix(mut self, prefix: impl Into<String>, reply: Reply) -> Self {
        self.routes.push((Matcher::Prefix(prefix.into()), reply));
        self
    }

    /// Shorthand for a 200 response with the given body.
    pub fn ok(self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.route(url, Reply::Respond(HttpResponse::ok(body)))
    }

    /// Shorthand for an empty response with the given status.
    pub fn status(self, url: impl Into<String>, status: u16) -> Self {
        self.route(url, Reply::Respond(HttpResponse::new(status, "")))
    }

    /// Requests received so far, in arrival order.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.seen
            .lock()
            .map(|seen| seen.clone())
            .unwrap_or_default()
    }

    /// URLs requested so far, in arrival order.
    pub fn requested_urls(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.url).collect()
    }

    /// Number of requests whose URL starts with `prefix`.
    pub fn count_prefix(&self, prefix: &str) -> usize {
        self.requested_urls()
            .iter()
            .filter(|u| u.starts_with(prefix))
            .count()
    }
}

#[async_trait]
impl HttpTransport for StaticTransport {
    async fn get(&self, request: HttpRequest) -> Result<HttpResponse, FetchError> {
        let reply = self
            .routes
            .iter()
            .find(|(m, _)| m.matches(&request.url))
            .map(|(_, r)| r.clone());

        if let Ok(mut seen) = self.seen.lock() {
            seen.push(request);
        }

        match reply {
            Some(Reply::Respond(response)) => Ok(response),
            Some(Reply::Fail(err)) => Err(err),
            Some(Reply::Stall) => {
                tokio::time::sleep(Duration::from_secs(24 * 60 * 60)).await;
                Err(FetchError::Network("stalled route".into()))
            }
            None => Ok(HttpResponse::new(404, "not found")),
        }
    }
}
