//! Chain state management module.
//!
//! Cache handlers need two frequently changing values: the latest block number (to decide
//! whether a block is deep enough to survive a reorg) and the current gas price. They read
//! them through the [`ChainOracle`] trait and never wait on the network to do so.
//!
//! # Architecture: Shared Ownership Pattern
//!
//! ```text
//!                  ┌─────────────────┐
//!                  │   ChainState    │
//!                  │  (single inst)  │
//!                  └────────┬────────┘
//!                           │ Arc<ChainState> shared by:
//!             ┌─────────────┴─────────────┐
//!             ▼                           ▼
//!     ┌──────────────┐            ┌──────────────┐
//!     │ OraclePoller │            │   RpcCache   │
//!     │   WRITES     │            │ reads tip,   │
//!     │ tip, gas     │            │ gas price    │
//!     └──────────────┘            └──────────────┘
//! ```
//!
//! ## Thread Safety
//!
//! - **Reads** (`current_tip()`, `current_gas_price()`, the [`ChainOracle`] methods): wait-free.
//! - **Writes** (`update_block_number()`, `force_block_number()`): serialized by an async lock
//!   inside `ChainState`. `update_gas_price()` is a plain atomic store.
//!
//! ## Usage Pattern
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use rpc_cache::chain::{ChainState, OraclePoller};
//!
//! let chain_state = Arc::new(ChainState::new());
//! let poller = OraclePoller::new(upstream, chain_state.clone(), Duration::from_secs(2));
//! let rpc_cache = RpcCache::new(backend, chain_state, 5, metrics);
//! ```

pub mod oracle;
pub mod poller;
pub mod state;

pub use oracle::{ChainOracle, OracleError};
pub use poller::OraclePoller;
pub use state::ChainState;
