//! # rpc-cache
//!
//! Reorg-aware response cache for an Ethereum JSON-RPC proxy.
//!
//! Some RPC results never change (the chain id), some are immutable only once enough blocks
//! have been mined on top of them (a block by number), and some must always reflect the chain
//! tip (the latest block number, the gas price). This crate stores the first two kinds behind a
//! pluggable key/value backend and answers the third from a chain oracle instead of storage.
//!
//! - **[`cache`]**: storage backends (in-process LRU, Redis), the compression decorator,
//!   per-method caching policies and the [`RpcCache`](cache::RpcCache) façade.
//!
//! - **[`chain`]**: the [`ChainOracle`](chain::ChainOracle) abstraction, the atomic
//!   [`ChainState`](chain::ChainState) implementation and the poller that feeds it.
//!
//! - **[`proxy`]**: cache-then-upstream request processing.
//!
//! - **[`upstream`]**: HTTP transport to the node.
//!
//! - **[`runtime`]**: wiring everything together from [`config::AppConfig`].
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         ProxyEngine                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────┐  │
//! │  │    RpcCache     │  │ UpstreamClient  │  │   Metrics   │  │
//! │  └────────┬────────┘  └────────┬────────┘  └─────────────┘  │
//! │           │                    │                            │
//! │  ┌────────▼────────┐  ┌────────▼────────┐                   │
//! │  │ MethodHandlers  │  │  OraclePoller   │                   │
//! │  │  CacheBackend   │  │   ChainState    │                   │
//! │  └─────────────────┘  └─────────────────┘                   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Cached Methods
//!
//! | Method | Policy |
//! |--------|--------|
//! | `eth_chainId`, `net_version` | cached forever, params ignored |
//! | `eth_getBlockByNumber` | cached once the block is confirmed; tags never |
//! | `eth_getBlockRange` | cached once the upper bound is confirmed; tags never |
//! | `eth_call` | cached when pinned to a confirmed block number |
//! | `eth_blockNumber`, `eth_gasPrice` | answered from the oracle, never stored |

pub mod cache;
pub mod chain;
pub mod config;
pub mod logging;
pub mod metrics;
pub mod proxy;
pub mod runtime;
pub mod types;
pub mod upstream;
pub mod utils;
