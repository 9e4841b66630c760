//! Pull interface for frequently changing chain values.

use async_trait::async_trait;
use thiserror::Error;

/// Errors returned by a [`ChainOracle`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OracleError {
    /// The value has not been observed yet (e.g. the poller has not completed a cycle).
    #[error("{0} not yet available")]
    Unavailable(&'static str),

    /// The source the oracle reads from failed.
    #[error("oracle upstream error: {0}")]
    Upstream(String),

    /// The source returned a value that could not be parsed.
    #[error("invalid oracle value: {0}")]
    InvalidValue(String),
}

/// Accessor for the latest known block number and gas price.
///
/// Implementations must not block on the request path: a read returns whatever value was
/// last observed, and callers tolerate staleness bounded by the refresh cadence of whatever
/// keeps the oracle current.
#[async_trait]
pub trait ChainOracle: Send + Sync {
    /// Returns the latest known block number.
    async fn latest_block_number(&self) -> Result<u64, OracleError>;

    /// Returns the latest known gas price in wei.
    async fn latest_gas_price(&self) -> Result<u64, OracleError>;
}
