//! Integration tests for the rpc-cache workspace.
//!
//! - `caching_tests`: request flow through `ProxyEngine`, `RpcCache` and a mocked upstream
//! - `oracle_tests`: `OraclePoller` feeding `ChainState` from a mocked node
//! - `redis_tests`: `RedisCache` against an in-process RESP server
//! - `runtime_tests`: `CacheRuntime` built from configuration, including backend failures
//! - `mock_infrastructure`: reusable mockito wrappers and stack builders
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --package tests
//! ```
//!
//! No external services are required; Redis is replaced by `MockRedisServer`.

#[cfg(test)]
mod caching_tests;

#[cfg(test)]
mod oracle_tests;



/// Mock infrastructure for testing
pub mod mock_infrastructure;
