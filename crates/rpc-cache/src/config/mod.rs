//! Application configuration with layered loading.
//!
//! # Configuration Hierarchy
//!
//! Configuration is loaded in this order (later overrides earlier):
//!
//! 1. **Compiled defaults**: Hardcoded in struct `Default` implementations
//! 2. **Config file**: TOML file specified by `RPC_CACHE_CONFIG` env var
//! 3. **Environment variables**: `RPC_CACHE__*` env vars override specific fields
//!
//! # Configuration Sections
//!
//! - [`CacheConfig`]: backend selection, capacity, compression and confirmation depth
//! - [`UpstreamConfig`]: the node uncached requests are forwarded to
//! - [`OracleConfig`]: block number / gas price polling
//! - [`LoggingConfig`]: Log level and format
//!
//! # Validation
//!
//! [`AppConfig::validate`] rejects zero capacities, timeouts and intervals, a Redis backend
//! without a URL, and non-HTTP upstream URLs.
//!
//! # Example
//!
//! ```toml
//! [cache]
//! backend = "redis"
//! redis_url = "redis://127.0.0.1:6379/0"
//! compression = true
//! block_confirmations = 12
//!
//! [upstream]
//! url = "https://eth-mainnet.example.com"
//! timeout_seconds = 10
//! ```

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::{path::Path, time::Duration};

use crate::cache::{DEFAULT_BLOCK_CONFIRMATIONS, DEFAULT_MEMORY_CAPACITY};

/// Storage backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackendKind {
    /// Bounded in-process LRU.
    Memory,
    /// Shared Redis server.
    Redis,
}

/// Caching configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Whether responses are cached at all. Defaults to `true`.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Storage backend. Defaults to `memory`.
    #[serde(default = "default_backend")]
    pub backend: CacheBackendKind,

    /// Maximum entries held by the memory backend. Defaults to `4096`.
    #[serde(default = "default_memory_capacity")]
    pub memory_capacity: usize,

    /// Redis connection URL (`redis://host:port/db`). Required for the Redis backend.
    #[serde(default)]
    pub redis_url: Option<String>,

    /// Bound on each Redis operation in milliseconds. Defaults to `500`.
    #[serde(default = "default_redis_timeout_ms")]
    pub redis_timeout_ms: u64,

    /// Gzip-compress stored values. Defaults to `false`.
    #[serde(default)]
    pub compression: bool,

    /// Blocks that must be mined on top of a block before its data is cached. Defaults to `10`.
    #[serde(default = "default_block_confirmations")]
    pub block_confirmations: u64,
}

/// Upstream node configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// JSON-RPC HTTP endpoint. Must start with `http` or `https`.
    #[serde(default = "default_upstream_url")]
    pub url: String,

    /// Request timeout in seconds. Defaults to `30`.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

/// Block number / gas price poller configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleConfig {
    /// Whether the built-in poller runs. Defaults to `true`.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Polling interval in milliseconds. Defaults to `2000`.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

/// Application logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (e.g., "trace", "debug", "info", "warn", "error"). Defaults to `"info"`.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: `"json"` or `"pretty"`. Defaults to `"pretty"`.
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_true() -> bool {
    true
}

fn default_backend() -> CacheBackendKind {
    CacheBackendKind::Memory
}

fn default_memory_capacity() -> usize {
    DEFAULT_MEMORY_CAPACITY
}

fn default_redis_timeout_ms() -> u64 {
    500
}

fn default_block_confirmations() -> u64 {
    DEFAULT_BLOCK_CONFIRMATIONS
}

fn default_upstream_url() -> String {
    "http://127.0.0.1:8545".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_poll_interval_ms() -> u64 {
    2000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            backend: default_backend(),
            memory_capacity: default_memory_capacity(),
            redis_url: None,
            redis_timeout_ms: default_redis_timeout_ms(),
            compression: false,
            block_confirmations: default_block_confirmations(),
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self { url: default_upstream_url(), timeout_seconds: default_timeout_seconds() }
    }
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self { enabled: true, poll_interval_ms: default_poll_interval_ms() }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level(), format: default_log_format() }
    }
}

/// Root application configuration containing all subsystem settings.
///
/// Loaded with the `RPC_CACHE` prefix for environment overrides using `__` as a separator,
/// e.g. `RPC_CACHE__CACHE__BACKEND=redis`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub upstream: UpstreamConfig,

    #[serde(default)]
    pub oracle: OracleConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Loads configuration from a TOML file with environment variable overrides.
    ///
    /// A missing file is not an error; defaults and environment overrides still apply.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be parsed or deserialized.
    pub fn from_file<P: AsRef<Path>>(config_path: P) -> Result<Self, ConfigError> {
        let config_builder = Config::builder()
            .set_default("cache.enabled", true)?
            .set_default("cache.backend", "memory")?
            .set_default("cache.memory_capacity", default_memory_capacity() as u64)?
            .set_default("cache.redis_timeout_ms", default_redis_timeout_ms())?
            .set_default("cache.compression", false)?
            .set_default("cache.block_confirmations", default_block_confirmations())?
            .set_default("upstream.url", default_upstream_url())?
            .set_default("upstream.timeout_seconds", default_timeout_seconds())?
            .set_default("oracle.enabled", true)?
            .set_default("oracle.poll_interval_ms", default_poll_interval_ms())?
            .set_default("logging.level", default_log_level())?
            .set_default("logging.format", default_log_format())?
            .add_source(File::with_name(&config_path.as_ref().to_string_lossy()).required(false))
            .add_source(Environment::with_prefix("RPC_CACHE").separator("__"))
            .build()?;

        config_builder.try_deserialize()
    }

    /// Loads configuration from `config/config.toml` with fallback to defaults.
    ///
    /// The config file path can be overridden using the `RPC_CACHE_CONFIG` environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the configuration cannot be loaded or parsed.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("RPC_CACHE_CONFIG").unwrap_or_else(|_| "config/config.toml".to_string());
        Self::from_file(&config_path)
    }

    /// Validates configuration values.
    ///
    /// # Errors
    ///
    /// Returns a descriptive error string if validation fails.
    pub fn validate(&self) -> Result<(), String> {
        if self.cache.memory_capacity == 0 {
            return Err("Memory cache capacity must be greater than 0".to_string());
        }

        if self.cache.backend == CacheBackendKind::Redis {
            match self.cache.redis_url.as_deref() {
                None | Some("") => {
                    return Err("Redis backend selected but no redis_url configured".to_string())
                }
                Some(url) if !url.starts_with("redis") => {
                    return Err(format!("Invalid Redis URL: {url}"));
                }
                Some(_) => {}
            }
            if self.cache.redis_timeout_ms == 0 {
                return Err("Redis timeout must be greater than 0".to_string());
            }
        }

        if !self.upstream.url.starts_with("http") {
            return Err(format!("Invalid upstream URL: {}", self.upstream.url));
        }

        if self.upstream.timeout_seconds == 0 {
            return Err("Upstream timeout must be greater than 0".to_string());
        }

        if self.oracle.enabled && self.oracle.poll_interval_ms == 0 {
            return Err("Oracle poll interval must be greater than 0".to_string());
        }

        if !["json", "pretty"].contains(&self.logging.format.as_str()) {
            return Err("Logging format must be 'json' or 'pretty'".to_string());
        }

        Ok(())
    }

    #[must_use]
    pub fn redis_timeout(&self) -> Duration {
        Duration::from_millis(self.cache.redis_timeout_ms)
    }

    #[must_use]
    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream.timeout_seconds)
    }

    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.oracle.poll_interval_ms)
    }
}
