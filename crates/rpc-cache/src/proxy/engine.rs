use std::sync::Arc;
use tracing::{debug, warn};

use super::errors::ProxyError;
use crate::{
    cache::RpcCache,
    types::{CacheStatus, JsonRpcRequest, JsonRpcResponse, JSONRPC_VERSION},
    upstream::{UpstreamClient, UpstreamError},
};

/// Serves requests from the cache when possible and forwards everything else upstream.
///
/// The cache is strictly an optimization: a failing lookup or write never fails the request.
pub struct ProxyEngine {
    rpc_cache: Option<Arc<RpcCache>>,
    upstream: Arc<dyn UpstreamClient>,
}

impl ProxyEngine {
    /// Creates an engine. Passing `None` for `rpc_cache` forwards every request.
    #[must_use]
    pub fn new(rpc_cache: Option<Arc<RpcCache>>, upstream: Arc<dyn UpstreamClient>) -> Self {
        Self { rpc_cache, upstream }
    }

    #[must_use]
    pub fn is_caching_enabled(&self) -> bool {
        self.rpc_cache.is_some()
    }

    #[must_use]
    pub fn rpc_cache(&self) -> Option<&Arc<RpcCache>> {
        self.rpc_cache.as_ref()
    }

    /// Processes one JSON-RPC request.
    ///
    /// Cache hits come back tagged [`CacheStatus::Hit`] with the caller's id. Everything else is
    /// forwarded upstream, tagged [`CacheStatus::Miss`], and offered to the cache.
    ///
    /// # Errors
    ///
    /// Returns [`ProxyError::InvalidRequest`] for a wrong protocol version or empty method, and
    /// [`ProxyError::Upstream`] when the upstream could not produce a response. JSON-RPC error
    /// responses from the node are returned as `Ok` with the error populated.
    pub async fn process_request(
        &self,
        request: JsonRpcRequest,
    ) -> Result<JsonRpcResponse, ProxyError> {
        if request.jsonrpc != JSONRPC_VERSION {
            return Err(ProxyError::InvalidRequest(format!(
                "unsupported jsonrpc version: {}",
                request.jsonrpc
            )));
        }
        if request.method.is_empty() {
            return Err(ProxyError::InvalidRequest("method must not be empty".to_string()));
        }

        let Some(rpc_cache) = &self.rpc_cache else {
            return self.forward_to_upstream(&request).await;
        };

        match rpc_cache.get_rpc(&request).await {
            Ok(Some(cached)) => return Ok(cached.with_id(&request.id)),
            Ok(None) => {}
            Err(e) => {
                warn!(method = %request.method, error = %e, "cache lookup failed, using upstream");
            }
        }

        let response = self.forward_to_upstream(&request).await?;

        if response.error.is_none() {
            if let Err(e) = rpc_cache.put_rpc(&request, &response).await {
                warn!(method = %request.method, error = %e, "cache write failed");
            }
        }

        Ok(response)
    }

    /// Forwards a request to upstream and marks the response as cache miss.
    ///
    /// JSON-RPC errors (e.g., "header not found") are returned as `Ok(JsonRpcResponse)` with the
    /// error field populated.
    async fn forward_to_upstream(
        &self,
        request: &JsonRpcRequest,
    ) -> Result<JsonRpcResponse, ProxyError> {
        match self.upstream.send(request).await {
            Ok(response) => {
                let mut response = response.with_id(&request.id);
                response.cache_status = Some(CacheStatus::Miss);
                Ok(response)
            }
            Err(UpstreamError::RpcError(code, message)) => {
                debug!(method = %request.method, code, "upstream returned rpc error");
                let mut response = JsonRpcResponse::error(code, message, Arc::clone(&request.id));
                response.cache_status = Some(CacheStatus::Miss);
                Ok(response)
            }
            Err(e) => {
                warn!(method = %request.method, error = %e, "upstream request failed");
                Err(e.into())
            }
        }
    }
}
