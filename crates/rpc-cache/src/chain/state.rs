//! Shared chain state tracking.
//!
//! `ChainState` is the single source of truth for the latest block number and gas price.
//! A background poller writes to it; the cache handlers read from it through the
//! [`ChainOracle`] trait.

use arc_swap::ArcSwap;
use async_trait::async_trait;
use std::{
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        Arc,
    },
    time::{SystemTime, UNIX_EPOCH},
};
use tokio::sync::RwLock;
use tracing::trace;

use super::oracle::{ChainOracle, OracleError};

/// Latest observed tip. `observed` stays `false` until the first update.
#[derive(Clone, Copy, Debug, Default)]
struct ChainTip {
    block_number: u64,
    observed: bool,
}

/// Shared chain state tracking the latest block number and gas price.
///
/// # Thread Safety
///
/// Reads are wait-free: the tip lives behind an `ArcSwap` and the gas price in an atomic.
/// Tip writes are serialized through an async lock so that the compare-and-advance in
/// [`update_block_number`](Self::update_block_number) is never lost to a racing writer.
///
/// # Example
///
/// ```no_run
/// use rpc_cache::chain::{ChainOracle, ChainState};
/// use std::sync::Arc;
///
/// # async fn example() {
/// let chain_state = Arc::new(ChainState::new());
///
/// chain_state.update_block_number(1000).await;
/// chain_state.update_gas_price(30_000_000_000);
///
/// assert_eq!(chain_state.latest_block_number().await, Ok(1000));
/// assert_eq!(chain_state.current_tip(), Some(1000));
/// # }
/// ```
#[derive(Clone)]
pub struct ChainState {
    tip: Arc<ArcSwap<ChainTip>>,

    tip_write_lock: Arc<RwLock<()>>,

    gas_price: Arc<AtomicU64>,

    gas_price_observed: Arc<AtomicBool>,

    /// Unix timestamp (seconds) of the last tip update.
    last_tip_update: Arc<AtomicU64>,
}

fn current_unix_timestamp() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or(0)
}

impl Default for ChainState {
    fn default() -> Self {
        Self::new()
    }
}

impl ChainState {
    /// Creates a new `ChainState` with no observed values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tip: Arc::new(ArcSwap::from_pointee(ChainTip::default())),
            tip_write_lock: Arc::new(RwLock::new(())),
            gas_price: Arc::new(AtomicU64::new(0)),
            gas_price_observed: Arc::new(AtomicBool::new(false)),
            last_tip_update: Arc::new(AtomicU64::new(current_unix_timestamp())),
        }
    }

    /// Returns the latest block number, or `None` before the first update.
    #[inline]
    #[must_use]
    pub fn current_tip(&self) -> Option<u64> {
        let tip = self.tip.load();
        tip.observed.then_some(tip.block_number)
    }

    /// Returns the latest gas price, or `None` before the first update.
    #[inline]
    #[must_use]
    pub fn current_gas_price(&self) -> Option<u64> {
        self.gas_price_observed
            .load(Ordering::Acquire)
            .then(|| self.gas_price.load(Ordering::Acquire))
    }

    /// Returns the number of seconds since the last tip update.
    #[inline]
    #[must_use]
    pub fn tip_age_seconds(&self) -> u64 {
        let last_update = self.last_tip_update.load(Ordering::Acquire);
        current_unix_timestamp().saturating_sub(last_update)
    }

    /// Advances the tip to `block_number`.
    ///
    /// Only updates if the new block is newer than the current tip (or no tip has been
    /// observed yet).
    ///
    /// # Returns
    ///
    /// `true` if the tip was updated, `false` if the new block is not newer
    pub async fn update_block_number(&self, block_number: u64) -> bool {
        let _guard = self.tip_write_lock.write().await;

        let current = **self.tip.load();
        if current.observed && block_number <= current.block_number {
            return false;
        }

        self.tip.store(Arc::new(ChainTip { block_number, observed: true }));
        self.last_tip_update.store(current_unix_timestamp(), Ordering::Release);
        trace!(block = block_number, "chain tip updated");
        true
    }

    /// Sets the tip to `block_number` even if it is lower than the current tip.
    ///
    /// For rollbacks where the upstream reports a shorter canonical chain.
    pub async fn force_block_number(&self, block_number: u64) {
        let _guard = self.tip_write_lock.write().await;
        self.tip.store(Arc::new(ChainTip { block_number, observed: true }));
        self.last_tip_update.store(current_unix_timestamp(), Ordering::Release);
        trace!(block = block_number, "chain tip force updated (rollback)");
    }

    /// Stores the latest gas price.
    pub fn update_gas_price(&self, gas_price: u64) {
        self.gas_price.store(gas_price, Ordering::Release);
        self.gas_price_observed.store(true, Ordering::Release);
        trace!(gas_price, "gas price updated");
    }
}

#[async_trait]
impl ChainOracle for ChainState {
    async fn latest_block_number(&self) -> Result<u64, OracleError> {
        self.current_tip().ok_or(OracleError::Unavailable("latest block number"))
    }

    async fn latest_gas_price(&self) -> Result<u64, OracleError> {
        self.current_gas_price().ok_or(OracleError::Unavailable("latest gas price"))
    }
}
