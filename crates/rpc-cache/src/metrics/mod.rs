//! # Metrics Architecture
//!
//! Cache instrumentation goes through the [`CacheMetrics`] trait so the cache core never depends
//! on a particular recorder.
//!
//! ## Hot Path (Lock-Free)
//!
//! [`MetricsCollector`] increments `metrics` crate counters on every event:
//!
//! | Counter | Labels | Trigger |
//! |---------|--------|---------|
//! | `rpc_cache_hits_total` | `method` | handler answered from cache or oracle |
//! | `rpc_cache_misses_total` | `method` | handler had nothing to answer with |
//! | `rpc_cache_backend_errors_total` | `operation` | storage backend get/put failed |
//!
//! Installing a recorder (and any exposition endpoint) is the embedding application's job; with
//! no recorder installed the counters are no-ops.
//!
//! ## Aggregation Path
//!
//! The collector also keeps process-local atomic totals, readable through
//! [`MetricsCollector::snapshot`] without a recorder.

use metrics::counter;
use serde::{Deserialize, Serialize};
use std::{
    borrow::Cow,
    sync::atomic::{AtomicU64, Ordering},
};

/// Instrumentation hooks invoked by the cache.
///
/// Implementations must be cheap and must not block; they are called on the request path.
pub trait CacheMetrics: Send + Sync {
    /// A cached (or oracle-synthesized) response was returned for `method`.
    fn record_cache_hit(&self, method: &str);

    /// A known method had no cached answer.
    fn record_cache_miss(&self, method: &str);

    /// A storage backend operation (`cache_get` / `cache_put`) failed.
    fn record_backend_error(&self, operation: &str);
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopMetrics;

impl CacheMetrics for NoopMetrics {
    fn record_cache_hit(&self, _method: &str) {}

    fn record_cache_miss(&self, _method: &str) {}

    fn record_backend_error(&self, _operation: &str) {}
}

#[inline]
fn method_to_static(method: &str) -> Cow<'static, str> {
    match method {
        "eth_chainId" => Cow::Borrowed("eth_chainId"),
        "net_version" => Cow::Borrowed("net_version"),
        "eth_getBlockByNumber" => Cow::Borrowed("eth_getBlockByNumber"),
        "eth_getBlockRange" => Cow::Borrowed("eth_getBlockRange"),
        "eth_blockNumber" => Cow::Borrowed("eth_blockNumber"),
        "eth_gasPrice" => Cow::Borrowed("eth_gasPrice"),
        "eth_call" => Cow::Borrowed("eth_call"),
        _ => Cow::Owned(method.to_string()),
    }
}

#[inline]
fn operation_to_static(operation: &str) -> Cow<'static, str> {
    match operation {
        "cache_get" => Cow::Borrowed("cache_get"),
        "cache_put" => Cow::Borrowed("cache_put"),
        _ => Cow::Owned(operation.to_string()),
    }
}

/// Point-in-time totals kept by [`MetricsCollector`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheMetricsSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub backend_errors: u64,
}

impl CacheMetricsSnapshot {
    /// Fraction of lookups served from cache, or `0.0` before any lookup.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// [`CacheMetrics`] backed by the `metrics` facade.
#[derive(Debug, Default)]
pub struct MetricsCollector {
    hits: AtomicU64,
    misses: AtomicU64,
    backend_errors: AtomicU64,
}

impl MetricsCollector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the totals recorded by this collector since construction.
    #[must_use]
    pub fn snapshot(&self) -> CacheMetricsSnapshot {
        CacheMetricsSnapshot {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            backend_errors: self.backend_errors.load(Ordering::Relaxed),
        }
    }
}

impl CacheMetrics for MetricsCollector {
    fn record_cache_hit(&self, method: &str) {
        self.hits.fetch_add(1, Ordering::Relaxed);
        let method_cow = method_to_static(method);
        counter!("rpc_cache_hits_total", "method" => method_cow).increment(1);
    }

    fn record_cache_miss(&self, method: &str) {
        self.misses.fetch_add(1, Ordering::Relaxed);
        let method_cow = method_to_static(method);
        counter!("rpc_cache_misses_total", "method" => method_cow).increment(1);
    }

    fn record_backend_error(&self, operation: &str) {
        self.backend_errors.fetch_add(1, Ordering::Relaxed);
        let operation_cow = operation_to_static(operation);
        counter!("rpc_cache_backend_errors_total", "operation" => operation_cow).increment(1);
    }
}
