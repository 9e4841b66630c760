use async_trait::async_trait;
use redis::{aio::ConnectionManager, Client};
use std::{future::Future, sync::Arc, time::Duration};
use tracing::{debug, trace, warn};

use super::{backend::CacheBackend, errors::CacheError};
use crate::metrics::CacheMetrics;

/// Default bound on a single Redis round trip.
pub const DEFAULT_REDIS_TIMEOUT: Duration = Duration::from_millis(500);

/// Networked backend on top of Redis.
///
/// Values are written with plain `SET` (no expiry); eviction is left to the server's
/// `maxmemory` policy. Every operation is bounded by `timeout`, and failures are reported to
/// [`CacheMetrics::record_backend_error`] with the operation label `cache_get` or `cache_put`.
pub struct RedisCache {
    connection: ConnectionManager,
    timeout: Duration,
    metrics: Arc<dyn CacheMetrics>,
}

impl RedisCache {
    /// Connects to `url` and verifies the server with `PING`.
    ///
    /// # Errors
    ///
    /// - `CacheError::InvalidConfig` if `url` cannot be parsed
    /// - `CacheError::Connection` if the server cannot be reached or does not answer `PING`
    ///   within `timeout`
    pub async fn connect(
        url: &str,
        timeout: Duration,
        metrics: Arc<dyn CacheMetrics>,
    ) -> Result<Self, CacheError> {
        let client = Client::open(url)
            .map_err(|e| CacheError::InvalidConfig(format!("invalid redis url: {e}")))?;

        let mut connection = tokio::time::timeout(timeout, client.get_connection_manager())
            .await
            .map_err(|_| CacheError::Connection("redis connection timed out".to_string()))?
            .map_err(|e| CacheError::Connection(format!("redis connection failed: {e}")))?;

        tokio::time::timeout(timeout, async {
            let pong: String = redis::cmd("PING").query_async(&mut connection).await?;
            Ok::<_, redis::RedisError>(pong)
        })
        .await
        .map_err(|_| CacheError::Connection("redis PING timed out".to_string()))?
        .map_err(|e| CacheError::Connection(format!("redis PING failed: {e}")))?;

        debug!(timeout = ?timeout, "redis cache connected");
        Ok(Self { connection, timeout, metrics })
    }

    /// Runs `operation` under the configured timeout, recording any failure.
    async fn bounded<T, F>(&self, label: &'static str, operation: F) -> Result<T, CacheError>
    where
        F: Future<Output = Result<T, redis::RedisError>>,
    {
        match tokio::time::timeout(self.timeout, operation).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                warn!(operation = label, error = %e, "redis operation failed");
                self.metrics.record_backend_error(label);
                Err(CacheError::from(e))
            }
            Err(_) => {
                warn!(operation = label, "redis operation timed out");
                self.metrics.record_backend_error(label);
                Err(CacheError::Timeout(label))
            }
        }
    }
}

#[async_trait]
impl CacheBackend for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let mut connection = self.connection.clone();
        let value = self
            .bounded("cache_get", async move {
                let value: Option<Vec<u8>> =
                    redis::cmd("GET").arg(key).query_async(&mut connection).await?;
                Ok(value)
            })
            .await?;

        trace!(key, hit = value.is_some(), "redis cache get");
        Ok(value)
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> Result<(), CacheError> {
        let mut connection = self.connection.clone();
        self.bounded("cache_put", async move {
            let () = redis::cmd("SET").arg(key).arg(value).query_async(&mut connection).await?;
            Ok(())
        })
        .await?;

        trace!(key, "redis cache put");
        Ok(())
    }
}
