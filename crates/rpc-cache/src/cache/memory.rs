use async_trait::async_trait;
use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use tracing::trace;

use super::{backend::CacheBackend, errors::CacheError};

/// Default number of entries held by [`MemoryCache`].
pub const DEFAULT_MEMORY_CAPACITY: usize = 4096;

/// Bounded in-process LRU backend.
///
/// Both reads and writes refresh an entry's recency. When full, inserting a new key evicts the
/// least recently used one. The lock is only held for the map operation itself.
pub struct MemoryCache {
    entries: Mutex<LruCache<String, Vec<u8>>>,
    capacity: NonZeroUsize,
}

impl MemoryCache {
    /// Creates a cache holding at most `capacity` entries.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::InvalidConfig` if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self, CacheError> {
        let capacity = NonZeroUsize::new(capacity).ok_or_else(|| {
            CacheError::InvalidConfig("memory cache capacity must be non-zero".to_string())
        })?;
        Ok(Self { entries: Mutex::new(LruCache::new(capacity)), capacity })
    }

    /// Creates a cache with [`DEFAULT_MEMORY_CAPACITY`] entries.
    #[must_use]
    pub fn with_default_capacity() -> Self {
        let capacity = NonZeroUsize::new(DEFAULT_MEMORY_CAPACITY).unwrap_or(NonZeroUsize::MIN);
        Self { entries: Mutex::new(LruCache::new(capacity)), capacity }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}

#[async_trait]
impl CacheBackend for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let value = self.entries.lock().get(key).cloned();
        trace!(key, hit = value.is_some(), "memory cache get");
        Ok(value)
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> Result<(), CacheError> {
        let evicted = self.entries.lock().push(key.to_string(), value);
        if let Some((evicted_key, _)) = evicted.filter(|(k, _)| k != key) {
            trace!(key, evicted = %evicted_key, "memory cache evicted entry");
        }
        Ok(())
    }
}
