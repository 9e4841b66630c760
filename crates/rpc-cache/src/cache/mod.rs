//! Reorg-aware response cache for Ethereum JSON-RPC.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                            RpcCache                                 │
//! │     (method name → MethodHandler, hit/miss telemetry)               │
//! └─────────────────────────────────────────────────────────────────────┘
//!        │                │                 │                 │
//!   ┌────▼─────┐   ┌──────▼──────┐   ┌──────▼──────┐   ┌──────▼──────┐
//!   │  Static  │   │ BlockByNum  │   │    Call     │   │ BlockNumber │
//!   │          │   │ BlockRange  │   │             │   │  GasPrice   │
//!   └────┬─────┘   └──────┬──────┘   └──────┬──────┘   └──────┬──────┘
//!        │                │ confirmations   │                 │
//!        │                ├─────────────────┴──────► ChainOracle ◄┘
//!        ▼                ▼
//!   ┌──────────────────────────────────────────────┐
//!   │        CompressedCache<B> (optional)          │
//!   └──────────────────────┬───────────────────────┘
//!                          ▼
//!           ┌──────────────┴──────────────┐
//!           │ MemoryCache  │  RedisCache  │
//!           └─────────────────────────────┘
//! ```
//!
//! # Consistency
//!
//! Results tied to a block number are only written once the block is `confirmations` deep
//! below the latest block reported by the [`ChainOracle`](crate::chain::ChainOracle). Block tags
//! are never cached, and the oracle-backed methods never touch storage. There is no
//! invalidation: anything written is treated as immutable.
//!
//! # Storage
//!
//! Backends implement [`CacheBackend`] over opaque byte payloads (the JSON text of the
//! response `result`). Nothing is written with an expiry. [`MemoryCache`] bounds itself with
//! LRU eviction; [`RedisCache`] relies on the server's eviction policy.

pub mod backend;
pub mod compression;
pub mod errors;
pub mod handlers;
pub mod memory;
pub mod redis;
pub mod rpc_cache;

pub use backend::CacheBackend;
pub use compression::CompressedCache;
pub use errors::CacheError;
pub use handlers::MethodHandler;
pub use memory::{MemoryCache, DEFAULT_MEMORY_CAPACITY};
pub use self::redis::{RedisCache, DEFAULT_REDIS_TIMEOUT};
pub use rpc_cache::{RpcCache, DEFAULT_BLOCK_CONFIRMATIONS};
