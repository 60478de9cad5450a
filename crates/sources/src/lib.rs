//! Network sources for ctxscout.
//!
//! - [`http`]: the reqwest-backed [`HttpTransport`](ctxscout_core::HttpTransport)
//! - [`searx`]: the SearxNG search backend
//! - [`fetch`]: the mirror/direct fallback chain for page text
//! - [`github`]: repository scope detection and curated file fetches
//!
//! Every outbound call is bounded by its own timeout and reports failure
//! as a [`FetchError`](ctxscout_core::FetchError) value.

pub mod fetch;
pub mod github;
pub mod http;
pub mod searx;

pub use fetch::{ContextFetcher, DirectTier, FallbackFetcher, FetchTier, MirrorTier};
pub use github::{
    GithubRepoFetcher, build_scoped_queries, detect_scopes, filter_by_scope, parse_repo,
};
pub use http::{ReqwestTransport, send_with_timeout};
pub use searx::SearxBackend;
