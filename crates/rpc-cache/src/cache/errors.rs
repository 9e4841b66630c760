use thiserror::Error;

use crate::chain::OracleError;

/// Errors produced by cache backends, method handlers and the [`RpcCache`](super::RpcCache).
///
/// A missing entry is never an error; lookups report it as `Ok(None)`.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Invalid construction parameter (zero capacity, unparseable Redis URL).
    #[error("Invalid cache configuration: {0}")]
    InvalidConfig(String),

    /// The backend could not be reached while constructing it.
    #[error("Cache connection failed: {0}")]
    Connection(String),

    /// A backend operation failed after construction.
    #[error("Cache backend error: {0}")]
    Backend(String),

    /// A backend operation did not finish within the configured timeout.
    #[error("Cache operation timed out: {0}")]
    Timeout(&'static str),

    /// A stored payload could not be decompressed.
    #[error("Failed to decode cached value: {0}")]
    Decode(String),

    /// A value could not be compressed for storage.
    #[error("Failed to encode value for cache: {0}")]
    Encode(String),

    /// Request params for a cached method have the wrong shape.
    #[error("Invalid params for {method}: {reason}")]
    InvalidParams { method: &'static str, reason: String },

    /// A cached payload or response result is not valid JSON.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The block/gas oracle had no value to offer.
    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl CacheError {
    pub(crate) fn invalid_params(method: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParams { method, reason: reason.into() }
    }
}

impl From<redis::RedisError> for CacheError {
    fn from(err: redis::RedisError) -> Self {
        Self::Backend(err.to_string())
    }
}
