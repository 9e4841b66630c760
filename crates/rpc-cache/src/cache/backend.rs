use async_trait::async_trait;
use std::sync::Arc;

use super::errors::CacheError;

/// Minimal key/value contract shared by every storage backend.
///
/// Values are opaque byte payloads. Nothing is written with an expiry; eviction, if any, is
/// the backend's own policy.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Returns the stored payload, or `Ok(None)` if the key is absent.
    ///
    /// # Errors
    ///
    /// Returns a [`CacheError`] when the backend itself fails. Absence is not an error.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    /// Stores `value` under `key`, replacing any previous payload.
    ///
    /// # Errors
    ///
    /// Returns a [`CacheError`] when the backend rejects or fails the write.
    async fn put(&self, key: &str, value: Vec<u8>) -> Result<(), CacheError>;
}

#[async_trait]
impl<B: CacheBackend + ?Sized> CacheBackend for Arc<B> {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        (**self).get(key).await
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> Result<(), CacheError> {
        (**self).put(key, value).await
    }
}
