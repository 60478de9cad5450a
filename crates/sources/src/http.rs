//! reqwest-backed HTTP transport.

use async_trait::async_trait;
use ctxscout_core::{FetchError, HttpRequest, HttpResponse, HttpTransport};
use std::time::Duration;
use tracing::{debug, trace};

/// Production transport. Holds one client that follows redirects and one
/// that does not, picked per request.
pub struct ReqwestTransport {
    client: reqwest::Client,
    redirecting: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| FetchError::Network(format!("failed to build HTTP client: {e}")))?;

        let redirecting = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| FetchError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            redirecting,
        })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, request: HttpRequest) -> Result<HttpResponse, FetchError> {
        let client = if request.follow_redirects {
            &self.redirecting
        } else {
            &self.client
        };

        let mut builder = client.get(&request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        trace!(url = %request.url, "GET");
        let response = builder
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))?;

        debug!(url = %request.url, status, bytes = body.len(), "Response received");

        Ok(HttpResponse {
            status,
            content_type,
            body,
        })
    }
}

/// Send `request`, converting an elapsed `timeout` into
/// [`FetchError::Timeout`] attributed to `service`.
pub async fn send_with_timeout(
    transport: &dyn HttpTransport,
    service: &str,
    timeout: Duration,
    request: HttpRequest,
) -> Result<HttpResponse, FetchError> {
    match tokio::time::timeout(timeout, transport.get(request)).await {
        Ok(result) => result,
        Err(_) => Err(FetchError::Timeout {
            service: service.to_string(),
            timeout_secs: timeout.as_secs(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ctxscout_core::{Reply, StaticTransport};

    #[test]
    fn transport_builds() {
        assert!(ReqwestTransport::new().is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_request_times_out() {
        let transport = StaticTransport::new().route("https://slow.test/", Reply::Stall);
        let err = send_with_timeout(
            &transport,
            "mirror",
            Duration::from_secs(25),
            HttpRequest::get("https://slow.test/"),
        )
        .await
        .unwrap_err();
        assert_eq!(
            err,
            FetchError::Timeout {
                service: "mirror".into(),
                timeout_secs: 25
            }
        );
    }

    #[tokio::test]
    async fn fast_request_passes_through() {
        let transport = StaticTransport::new().ok("https://fast.test/", "body");
        let resp = send_with_timeout(
            &transport,
            "direct",
            Duration::from_secs(1),
            HttpRequest::get("https://fast.test/"),
        )
        .await
        .unwrap();
        assert_eq!(resp.body, "body");
    }
}
