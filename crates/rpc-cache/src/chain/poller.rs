use std::{sync::Arc, time::Duration};

use serde_json::json;
use tokio::{sync::broadcast, time::interval};
use tracing::{debug, info, warn};

use super::{oracle::OracleError, state::ChainState};
use crate::{
    types::JsonRpcRequest,
    upstream::{UpstreamClient, UpstreamError},
    utils::BlockParameter,
};

/// Periodically refreshes [`ChainState`] from the upstream node.
///
/// Every `poll_interval` the poller sends `eth_blockNumber` and `eth_gasPrice` and stores the
/// parsed results. A failed poll keeps the previous values, so staleness is bounded by the
/// interval as long as the upstream eventually answers.
pub struct OraclePoller {
    upstream: Arc<dyn UpstreamClient>,
    chain_state: Arc<ChainState>,
    poll_interval: Duration,
}

impl OraclePoller {
    #[must_use]
    pub fn new(
        upstream: Arc<dyn UpstreamClient>,
        chain_state: Arc<ChainState>,
        poll_interval: Duration,
    ) -> Self {
        Self { upstream, chain_state, poll_interval }
    }

    /// Spawns the polling loop. The first poll runs immediately.
    ///
    /// The task exits when `shutdown_rx` receives a value or its sender is dropped.
    #[must_use]
    pub fn start_with_shutdown(
        self,
        mut shutdown_rx: broadcast::Receiver<()>,
    ) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = interval(self.poll_interval);
            info!(interval = ?self.poll_interval, "oracle poller started");

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        self.poll_once().await;
                    }
                    _ = shutdown_rx.recv() => {
                        info!("oracle poller shutting down");
                        break;
                    }
                }
            }
        })
    }

    /// Runs a single refresh of block number and gas price.
    ///
    /// Failures are logged; each value is refreshed independently.
    pub async fn poll_once(&self) {
        match self.fetch_quantity("eth_blockNumber").await {
            Ok(block_number) => {
                if self.chain_state.update_block_number(block_number).await {
                    debug!(block = block_number, "oracle advanced chain tip");
                }
            }
            Err(e) => warn!(error = %e, method = "eth_blockNumber", "oracle poll failed"),
        }

        match self.fetch_quantity("eth_gasPrice").await {
            Ok(gas_price) => self.chain_state.update_gas_price(gas_price),
            Err(e) => warn!(error = %e, method = "eth_gasPrice", "oracle poll failed"),
        }
    }

    async fn fetch_quantity(&self, method: &'static str) -> Result<u64, OracleError> {
        let request = JsonRpcRequest::new(method, Some(json!([])), json!(1));

        let response = self.upstream.send(&request).await.map_err(|e: UpstreamError| {
            if !e.is_transient() {
                debug!(error = %e, method, "non-transient upstream error while polling");
            }
            OracleError::Upstream(e.to_string())
        })?;

        let value = response
            .result
            .ok_or_else(|| OracleError::InvalidValue(format!("{method} returned no result")))?;

        value
            .as_str()
            .and_then(BlockParameter::parse_hex)
            .ok_or_else(|| OracleError::InvalidValue(format!("{method} returned {value}")))
    }
}
