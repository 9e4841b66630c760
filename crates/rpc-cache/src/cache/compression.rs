use async_trait::async_trait;
use flate2::{read::GzDecoder, write::GzEncoder, Compression};
use std::io::{Read, Write};
use tracing::trace;

use super::{backend::CacheBackend, errors::CacheError};

/// Gzip-compressing decorator over any [`CacheBackend`].
///
/// Writes compress before delegating; reads delegate and then decompress. An absent or empty
/// stored payload is a miss and never reaches the decoder, and a payload that decodes to zero
/// bytes is reported as a miss as well.
pub struct CompressedCache<B> {
    inner: B,
    level: Compression,
}

impl<B: CacheBackend> CompressedCache<B> {
    #[must_use]
    pub fn new(inner: B) -> Self {
        Self { inner, level: Compression::default() }
    }

    #[must_use]
    pub fn with_level(inner: B, level: Compression) -> Self {
        Self { inner, level }
    }

    #[must_use]
    pub fn inner(&self) -> &B {
        &self.inner
    }
}

/// Gzip-compresses `value`.
///
/// # Errors
///
/// Returns `CacheError::Encode` if the encoder fails.
pub fn encode(value: &[u8], level: Compression) -> Result<Vec<u8>, CacheError> {
    let mut encoder = GzEncoder::new(Vec::with_capacity(value.len() / 2 + 32), level);
    encoder.write_all(value).map_err(|e| CacheError::Encode(e.to_string()))?;
    encoder.finish().map_err(|e| CacheError::Encode(e.to_string()))
}

/// Decompresses a gzip payload produced by [`encode`].
///
/// # Errors
///
/// Returns `CacheError::Decode` for truncated or corrupt input.
pub fn decode(payload: &[u8]) -> Result<Vec<u8>, CacheError> {
    let mut decoded = Vec::with_capacity(payload.len() * 2);
    GzDecoder::new(payload)
        .read_to_end(&mut decoded)
        .map_err(|e| CacheError::Decode(e.to_string()))?;
    Ok(decoded)
}

#[async_trait]
impl<B: CacheBackend> CacheBackend for CompressedCache<B> {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let Some(payload) = self.inner.get(key).await? else {
            return Ok(None);
        };
        if payload.is_empty() {
            return Ok(None);
        }

        let decoded = decode(&payload)?;
        trace!(key, stored = payload.len(), decoded = decoded.len(), "decompressed cache entry");
        Ok((!decoded.is_empty()).then_some(decoded))
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> Result<(), CacheError> {
        let encoded = encode(&value, self.level)?;
        self.inner.put(key, encoded).await
    }
}
