//! Helpers for assembling a cache stack against a mock upstream.

use rpc_cache::{
    cache::{CacheBackend, CompressedCache, MemoryCache, RpcCache},
    chain::ChainState,
    metrics::MetricsCollector,
    proxy::ProxyEngine,
    types::JsonRpcRequest,
    upstream::HttpUpstream,
};
use serde_json::Value;
use std::{sync::Arc, time::Duration};

/// A `ProxyEngine` plus handles on the pieces tests inspect.
pub struct CacheStack {
    pub engine: ProxyEngine,
    pub chain_state: Arc<ChainState>,
    pub metrics: Arc<MetricsCollector>,
    pub storage: Arc<MemoryCache>,
}

/// Options for [`build_cache_stack`].
#[derive(Debug, Clone, Copy)]
pub struct StackOptions {
    pub tip: Option<u64>,
    pub confirmations: u64,
    pub compression: bool,
}

impl Default for StackOptions {
    fn default() -> Self {
        Self { tip: Some(100), confirmations: 10, compression: false }
    }
}

/// Builds memory-backed caching in front of an `HttpUpstream` at `upstream_url`.
pub async fn build_cache_stack(upstream_url: &str, options: StackOptions) -> CacheStack {
    let chain_state = Arc::new(ChainState::new());
    if let Some(tip) = options.tip {
        chain_state.update_block_number(tip).await;
    }

    let storage = Arc::new(MemoryCache::new(1024).expect("capacity"));
    let backend: Arc<dyn CacheBackend> = if options.compression {
        Arc::new(CompressedCache::new(storage.clone()))
    } else {
        storage.clone()
    };

    let metrics = Arc::new(MetricsCollector::new());
    let rpc_cache = Arc::new(RpcCache::new(
        backend,
        chain_state.clone(),
        options.confirmations,
        metrics.clone(),
    ));

    let upstream = Arc::new(
        HttpUpstream::new(upstream_url, Duration::from_secs(5)).expect("http upstream"),
    );
    let engine = ProxyEngine::new(Some(rpc_cache), upstream);

    CacheStack { engine, chain_state, metrics, storage }
}

/// Builds a request with `id: 1`.
#[must_use]
pub fn rpc_request(method: &str, params: Value) -> JsonRpcRequest {
    JsonRpcRequest::new(method, Some(params), serde_json::json!(1))
}
