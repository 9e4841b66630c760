//! Runtime lifecycle management including background tasks and graceful shutdown.

use crate::{
    cache::RpcCache,
    chain::{ChainState, OraclePoller},
    config::AppConfig,
    metrics::MetricsCollector,
    proxy::ProxyEngine,
};
use std::sync::Arc;
use tokio::{sync::broadcast, task::JoinHandle};
use tracing::{debug, error, info, warn};

use super::{builder::CacheRuntimeBuilder, CacheComponents};

/// Owns the initialized components and the oracle poller task.
///
/// `shutdown()` broadcasts on the shutdown channel and waits for the poller to exit.
pub struct CacheRuntime {
    components: CacheComponents,
    shutdown_tx: broadcast::Sender<()>,
    config: AppConfig,
    poller_task: Option<JoinHandle<()>>,
}

impl CacheRuntime {
    /// Creates a new builder for constructing a `CacheRuntime`.
    #[must_use]
    pub fn builder() -> CacheRuntimeBuilder {
        CacheRuntimeBuilder::new()
    }

    /// Called by `CacheRuntimeBuilder` once all components exist.
    pub(super) fn new(
        components: CacheComponents,
        shutdown_tx: broadcast::Sender<()>,
        config: AppConfig,
        poller: Option<OraclePoller>,
    ) -> Self {
        let poller_task = poller.map(|poller| {
            let handle = poller.start_with_shutdown(shutdown_tx.subscribe());
            debug!("Oracle poller task started");
            handle
        });

        Self { components, shutdown_tx, config, poller_task }
    }

    #[must_use]
    pub fn components(&self) -> &CacheComponents {
        &self.components
    }

    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[must_use]
    pub fn proxy_engine(&self) -> &Arc<ProxyEngine> {
        self.components.proxy_engine()
    }

    #[must_use]
    pub fn rpc_cache(&self) -> Option<&Arc<RpcCache>> {
        self.components.rpc_cache()
    }

    #[must_use]
    pub fn chain_state(&self) -> &Arc<ChainState> {
        self.components.chain_state()
    }

    #[must_use]
    pub fn metrics_collector(&self) -> &Arc<MetricsCollector> {
        self.components.metrics_collector()
    }

    #[must_use]
    pub fn has_oracle_poller(&self) -> bool {
        self.poller_task.is_some()
    }

    /// Creates a new shutdown receiver for external shutdown coordination.
    #[must_use]
    pub fn shutdown_receiver(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    /// Signals background tasks to stop and waits for them.
    pub async fn shutdown(self) {
        info!("Initiating rpc-cache runtime shutdown");
        if let Err(e) = self.shutdown_tx.send(()) {
            warn!(error = %e, "Failed to send shutdown signal (no receivers)");
        }

        if let Some(poller_task) = self.poller_task {
            match poller_task.await {
                Ok(()) => debug!("Oracle poller task completed"),
                Err(e) if e.is_cancelled() => debug!("Oracle poller task cancelled"),
                Err(e) => error!(error = %e, "Oracle poller task failed"),
            }
        }

        info!("rpc-cache runtime shutdown complete");
    }

    /// Waits for a shutdown signal sent through [`Self::shutdown_receiver`]'s channel, then
    /// performs cleanup.
    pub async fn wait_for_shutdown(self) {
        let mut shutdown_rx = self.shutdown_tx.subscribe();
        let _ = shutdown_rx.recv().await;
        info!("Shutdown signal received, runtime terminating");
        self.shutdown().await;
    }
}
