use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use std::time::Duration;

use crate::{
    types::{JsonRpcRequest, JsonRpcResponse},
    upstream::UpstreamError,
};

/// Maximum number of response body characters kept in an `HttpError`.
const MAX_ERROR_BODY_CHARS: usize = 256;

/// Transport used to forward uncached requests to the upstream node.
///
/// JSON-RPC error objects are surfaced as [`UpstreamError::RpcError`] so callers can tell a
/// node-side failure apart from a successful result.
#[async_trait]
pub trait UpstreamClient: Send + Sync {
    /// Sends `request` and returns the upstream's successful response.
    ///
    /// # Errors
    ///
    /// Returns an [`UpstreamError`] for transport failures, non-2xx statuses, undecodable bodies
    /// and JSON-RPC error responses.
    async fn send(&self, request: &JsonRpcRequest) -> Result<JsonRpcResponse, UpstreamError>;
}

/// JSON-RPC over HTTP POST to a single upstream URL.
///
/// Each request is bounded by the configured timeout. No retries are attempted; a failed
/// request is reported to the caller as-is.
pub struct HttpUpstream {
    client: Client,
    url: String,
    timeout: Duration,
}

impl HttpUpstream {
    /// Creates a client for `url` with a per-request `timeout`.
    ///
    /// # Errors
    ///
    /// Returns `UpstreamError::ConnectionFailed` if the underlying reqwest client fails to build.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, UpstreamError> {
        let client = ClientBuilder::new()
            .pool_idle_timeout(Duration::from_secs(30))
            .connect_timeout(timeout.min(Duration::from_secs(5)))
            .timeout(timeout)
            .use_rustls_tls()
            .redirect(reqwest::redirect::Policy::none())
            .user_agent(concat!("rpc-cache/", env!("CARGO_PKG_VERSION")))
            .tcp_nodelay(true)
            .build()
            .map_err(|e| {
                tracing::error!(error = %e, "failed to build http client");
                UpstreamError::ConnectionFailed(format!("HTTP client build failed: {e}"))
            })?;

        Ok(Self { client, url: url.into(), timeout })
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Sanitizes network errors to prevent information disclosure.
    fn sanitize_network_error(error: &reqwest::Error) -> String {
        if error.is_connect() {
            "connection refused or unreachable".to_string()
        } else if error.is_request() {
            "request failed".to_string()
        } else if error.is_body() {
            "response body error".to_string()
        } else if error.is_decode() {
            "response decode error".to_string()
        } else if error.is_redirect() {
            "too many redirects".to_string()
        } else {
            "network error".to_string()
        }
    }
}

#[async_trait]
impl UpstreamClient for HttpUpstream {
    async fn send(&self, request: &JsonRpcRequest) -> Result<JsonRpcResponse, UpstreamError> {
        tracing::trace!(method = %request.method, url = %self.url, "sending request to upstream");

        let response = self
            .client
            .post(&self.url)
            .json(request)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    UpstreamError::Timeout
                } else {
                    UpstreamError::ConnectionFailed(Self::sanitize_network_error(&e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let raw_text = response.text().await.unwrap_or_default();
            let sanitized_text: String = raw_text.chars().take(MAX_ERROR_BODY_CHARS).collect();
            tracing::trace!(status = status.as_u16(), "upstream returned non-success status");
            return Err(UpstreamError::HttpError(status.as_u16(), sanitized_text));
        }

        let body = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                UpstreamError::Timeout
            } else {
                UpstreamError::Network(e)
            }
        })?;

        let json_response: JsonRpcResponse = serde_json::from_slice(&body)
            .map_err(|e| UpstreamError::InvalidResponse(format!("Invalid JSON: {e}")))?;

        if let Some(error) = &json_response.error {
            return Err(UpstreamError::RpcError(error.code, error.message.clone()));
        }

        Ok(json_response)
    }
}
