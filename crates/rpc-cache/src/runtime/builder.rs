//! Builder for initializing the cache runtime from [`AppConfig`].

use crate::{
    cache::{CacheBackend, CacheError, CompressedCache, MemoryCache, RedisCache, RpcCache},
    chain::{ChainState, OraclePoller},
    config::{AppConfig, CacheBackendKind},
    metrics::{CacheMetrics, MetricsCollector},
    proxy::ProxyEngine,
    upstream::{HttpUpstream, UpstreamClient, UpstreamError},
};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{debug, info};

use super::{lifecycle::CacheRuntime, CacheComponents};

/// Errors that can occur during runtime initialization.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// Configuration missing or rejected by [`AppConfig::validate`]
    #[error("Configuration validation failed: {0}")]
    ConfigValidation(String),

    /// Storage backend could not be constructed (e.g. Redis unreachable)
    #[error("Cache initialization failed: {0}")]
    Cache(#[from] CacheError),

    /// Upstream HTTP client could not be constructed
    #[error("Upstream initialization failed: {0}")]
    Upstream(#[from] UpstreamError),
}

#[derive(Clone)]
struct RuntimeOptions {
    enable_oracle_poller: Option<bool>,
    shutdown_channel_capacity: usize,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self { enable_oracle_poller: None, shutdown_channel_capacity: 16 }
    }
}

/// Builder for constructing a [`CacheRuntime`].
///
/// # Examples
///
/// ```no_run
/// # use rpc_cache::{config::AppConfig, runtime::CacheRuntimeBuilder};
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = AppConfig::load()?;
///
/// let runtime = CacheRuntimeBuilder::new().with_config(config).build().await?;
/// let proxy = runtime.proxy_engine();
/// # let _ = proxy;
/// runtime.shutdown().await;
/// # Ok(())
/// # }
/// ```
pub struct CacheRuntimeBuilder {
    config: Option<AppConfig>,
    upstream: Option<Arc<dyn UpstreamClient>>,
    options: RuntimeOptions,
}

impl CacheRuntimeBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self { config: None, upstream: None, options: RuntimeOptions::default() }
    }

    #[must_use]
    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Uses `upstream` instead of an [`HttpUpstream`] built from `upstream.url`.
    ///
    /// The same client serves forwarded requests and oracle polls.
    #[must_use]
    pub fn with_upstream(mut self, upstream: Arc<dyn UpstreamClient>) -> Self {
        self.upstream = Some(upstream);
        self
    }

    /// Starts the oracle poller regardless of `oracle.enabled`.
    #[must_use]
    pub fn enable_oracle_poller(mut self) -> Self {
        self.options.enable_oracle_poller = Some(true);
        self
    }

    /// Skips the oracle poller regardless of `oracle.enabled`.
    ///
    /// The embedding application is then responsible for feeding the runtime's `ChainState`.
    #[must_use]
    pub fn disable_oracle_poller(mut self) -> Self {
        self.options.enable_oracle_poller = Some(false);
        self
    }

    /// Sets custom shutdown channel capacity (default: 16, minimum: 1).
    #[must_use]
    pub fn with_shutdown_channel_capacity(mut self, capacity: usize) -> Self {
        self.options.shutdown_channel_capacity = capacity.max(1);
        self
    }

    /// Builds the runtime, connecting the storage backend and starting the oracle poller.
    ///
    /// # Errors
    ///
    /// Returns `RuntimeError` if configuration is missing or invalid, the Redis backend cannot
    /// be reached, or the upstream client fails to build.
    pub async fn build(self) -> Result<CacheRuntime, RuntimeError> {
        let config = self.config.ok_or_else(|| {
            RuntimeError::ConfigValidation("No configuration provided".to_string())
        })?;

        config.validate().map_err(RuntimeError::ConfigValidation)?;

        let poller_enabled = self.options.enable_oracle_poller.unwrap_or(config.oracle.enabled);

        info!(
            cache_enabled = config.cache.enabled,
            backend = ?config.cache.backend,
            compression = config.cache.compression,
            block_confirmations = config.cache.block_confirmations,
            oracle_poller_enabled = poller_enabled,
            "Initializing rpc-cache runtime"
        );

        let (shutdown_tx, _) = broadcast::channel::<()>(self.options.shutdown_channel_capacity);

        let chain_state = Arc::new(ChainState::new());
        let metrics_collector = Arc::new(MetricsCollector::new());

        let rpc_cache = if config.cache.enabled {
            let backend = build_backend(&config, metrics_collector.clone()).await?;
            debug!("Cache backend initialized");
            Some(Arc::new(RpcCache::new(
                backend,
                chain_state.clone(),
                config.cache.block_confirmations,
                metrics_collector.clone(),
            )))
        } else {
            debug!("Caching disabled, all requests forwarded");
            None
        };

        let upstream: Arc<dyn UpstreamClient> = match self.upstream {
            Some(upstream) => upstream,
            None => Arc::new(HttpUpstream::new(&config.upstream.url, config.upstream_timeout())?),
        };
        debug!("Upstream client initialized");

        let proxy_engine = Arc::new(ProxyEngine::new(rpc_cache.clone(), upstream.clone()));

        let poller = poller_enabled.then(|| {
            OraclePoller::new(upstream.clone(), chain_state.clone(), config.poll_interval())
        });

        let components = CacheComponents::new(
            metrics_collector,
            chain_state,
            rpc_cache,
            upstream,
            proxy_engine,
        );
        let runtime = CacheRuntime::new(components, shutdown_tx, config, poller);

        info!("rpc-cache runtime initialization complete");

        Ok(runtime)
    }
}

impl Default for CacheRuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Creates the configured backend, wrapped in compression when enabled.
async fn build_backend(
    config: &AppConfig,
    metrics: Arc<dyn CacheMetrics>,
) -> Result<Arc<dyn CacheBackend>, CacheError> {
    let backend: Arc<dyn CacheBackend> = match config.cache.backend {
        CacheBackendKind::Memory => Arc::new(MemoryCache::new(config.cache.memory_capacity)?),
        CacheBackendKind::Redis => {
            let url = config.cache.redis_url.as_deref().ok_or_else(|| {
                CacheError::InvalidConfig("redis backend requires redis_url".to_string())
            })?;
            Arc::new(RedisCache::connect(url, config.redis_timeout(), metrics).await?)
        }
    };

    if config.cache.compression {
        Ok(Arc::new(CompressedCache::new(backend)))
    } else {
        Ok(backend)
    }
}
