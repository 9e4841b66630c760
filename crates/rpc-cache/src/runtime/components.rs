//! Core component container for the cache runtime.

use crate::{
    cache::RpcCache, chain::ChainState, metrics::MetricsCollector, proxy::ProxyEngine,
    upstream::UpstreamClient,
};
use std::sync::Arc;

/// Container for all initialized components.
///
/// All components are wrapped in `Arc` for sharing across threads and tasks.
#[derive(Clone)]
pub struct CacheComponents {
    metrics_collector: Arc<MetricsCollector>,
    chain_state: Arc<ChainState>,
    rpc_cache: Option<Arc<RpcCache>>,
    upstream: Arc<dyn UpstreamClient>,
    proxy_engine: Arc<ProxyEngine>,
}

impl CacheComponents {
    /// Called by `CacheRuntimeBuilder` during initialization.
    #[must_use]
    pub fn new(
        metrics_collector: Arc<MetricsCollector>,
        chain_state: Arc<ChainState>,
        rpc_cache: Option<Arc<RpcCache>>,
        upstream: Arc<dyn UpstreamClient>,
        proxy_engine: Arc<ProxyEngine>,
    ) -> Self {
        Self { metrics_collector, chain_state, rpc_cache, upstream, proxy_engine }
    }

    #[must_use]
    pub fn metrics_collector(&self) -> &Arc<MetricsCollector> {
        &self.metrics_collector
    }

    #[must_use]
    pub fn chain_state(&self) -> &Arc<ChainState> {
        &self.chain_state
    }

    /// Returns the cache, or `None` when caching is disabled.
    #[must_use]
    pub fn rpc_cache(&self) -> Option<&Arc<RpcCache>> {
        self.rpc_cache.as_ref()
    }

    #[must_use]
    pub fn upstream(&self) -> &Arc<dyn UpstreamClient> {
        &self.upstream
    }

    #[must_use]
    pub fn proxy_engine(&self) -> &Arc<ProxyEngine> {
        &self.proxy_engine
    }
}
