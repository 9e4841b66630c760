//! Per-method caching policy.
//!
//! Each supported RPC method family gets one [`MethodHandler`] variant that decides whether a
//! request is cacheable, how its key is derived and when a response may be written.
//!
//! | Method | Variant | Key | Write condition |
//! |--------|---------|-----|-----------------|
//! | `eth_chainId`, `net_version` | `Static` | `method:<name>` | always |
//! | `eth_getBlockByNumber` | `BlockByNumber` | `method:<name>:<block>:<fullTx>` | block confirmed |
//! | `eth_getBlockRange` | `BlockRange` | `method:<name>:<start>:<end>:<fullTx>` | upper bound confirmed |
//! | `eth_call` | `Call` | `method:<name>:<call object>:<block>` | block confirmed |
//! | `eth_blockNumber` | `BlockNumber` | none, answered from the oracle | never |
//! | `eth_gasPrice` | `GasPrice` | none, answered from the oracle | never |
//!
//! Block numbers in keys are always the canonical `0x` hex spelling, so `0x01` and `0x1` share
//! an entry. Block tags never produce a key.

mod blocks;
mod call;
mod static_method;
mod tip;

use std::sync::Arc;

pub use blocks::{BlockByNumberHandler, BlockRangeHandler};
pub use call::CallHandler;
pub use static_method::StaticMethodHandler;
pub use tip::{BlockNumberHandler, GasPriceHandler};

use super::{backend::CacheBackend, errors::CacheError};
use crate::{
    chain::ChainOracle,
    types::{CacheStatus, JsonRpcRequest, JsonRpcResponse},
    utils::{BlockParameter, BlockRef},
};

/// Collaborators shared by every handler.
#[derive(Clone)]
pub struct HandlerContext {
    pub backend: Arc<dyn CacheBackend>,
    pub oracle: Arc<dyn ChainOracle>,
    /// Blocks that must be mined on top of a block before it is written.
    pub confirmations: u64,
}

impl HandlerContext {
    #[must_use]
    pub fn new(
        backend: Arc<dyn CacheBackend>,
        oracle: Arc<dyn ChainOracle>,
        confirmations: u64,
    ) -> Self {
        Self { backend, oracle, confirmations }
    }

    /// Returns `true` if `block` is at least `confirmations` deep below the latest block.
    ///
    /// Nothing is eligible while the chain is shorter than the confirmation depth.
    ///
    /// # Errors
    ///
    /// Propagates the oracle's error if no block number is available.
    pub async fn is_confirmed(&self, block: u64) -> Result<bool, CacheError> {
        let latest = self.oracle.latest_block_number().await?;
        Ok(latest.checked_sub(self.confirmations).is_some_and(|safe| block <= safe))
    }

    /// Reads `key` and wraps the stored result in a response tagged with the request's id.
    pub(crate) async fn read(
        &self,
        key: &str,
        request: &JsonRpcRequest,
    ) -> Result<Option<JsonRpcResponse>, CacheError> {
        let Some(payload) = self.backend.get(key).await? else {
            return Ok(None);
        };
        let result: serde_json::Value = serde_json::from_slice(&payload)?;
        Ok(Some(cached_response(result, request)))
    }

    /// Stores the response's result under `key` if the response is cacheable.
    pub(crate) async fn write(
        &self,
        key: &str,
        response: &JsonRpcResponse,
    ) -> Result<(), CacheError> {
        let Some(result) = response.cacheable_result() else {
            return Ok(());
        };
        let payload = serde_json::to_vec(result)?;
        self.backend.put(key, payload).await
    }
}

/// One variant per supported method family.
pub enum MethodHandler {
    Static(StaticMethodHandler),
    BlockByNumber(BlockByNumberHandler),
    BlockRange(BlockRangeHandler),
    BlockNumber(BlockNumberHandler),
    GasPrice(GasPriceHandler),
    Call(CallHandler),
}

impl MethodHandler {
    /// Looks the request up. `Ok(None)` means not cached or not cacheable.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::InvalidParams` for malformed params, otherwise backend and oracle
    /// errors.
    pub async fn get(
        &self,
        request: &JsonRpcRequest,
    ) -> Result<Option<JsonRpcResponse>, CacheError> {
        match self {
            Self::Static(handler) => handler.get(request).await,
            Self::BlockByNumber(handler) => handler.get(request).await,
            Self::BlockRange(handler) => handler.get(request).await,
            Self::BlockNumber(handler) => handler.get(request).await,
            Self::GasPrice(handler) => handler.get(request).await,
            Self::Call(handler) => handler.get(request).await,
        }
    }

    /// Stores the response if the method and response are eligible.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::InvalidParams` for malformed params, otherwise backend and oracle
    /// errors.
    pub async fn put(
        &self,
        request: &JsonRpcRequest,
        response: &JsonRpcResponse,
    ) -> Result<(), CacheError> {
        match self {
            Self::Static(handler) => handler.put(request, response).await,
            Self::BlockByNumber(handler) => handler.put(request, response).await,
            Self::BlockRange(handler) => handler.put(request, response).await,
            Self::BlockNumber(_) | Self::GasPrice(_) => Ok(()),
            Self::Call(handler) => handler.put(request, response).await,
        }
    }
}

/// Builds `method:<name>[:<part>...]`.
pub(crate) fn cache_key(method: &str, parts: &[&str]) -> String {
    let capacity = 7 + method.len() + parts.iter().map(|p| p.len() + 1).sum::<usize>();
    let mut key = String::with_capacity(capacity);
    key.push_str("method:");
    key.push_str(method);
    for part in parts {
        key.push(':');
        key.push_str(part);
    }
    key
}

/// Wraps a result taken from cache (or the oracle) in a response for `request`.
pub(crate) fn cached_response(
    result: serde_json::Value,
    request: &JsonRpcRequest,
) -> JsonRpcResponse {
    let mut response = JsonRpcResponse::success(result, Arc::clone(&request.id));
    response.cache_status = Some(CacheStatus::Hit);
    response
}

/// Parses a required block selector at `index`.
pub(crate) fn block_param(
    method: &'static str,
    params: &[serde_json::Value],
    index: usize,
) -> Result<BlockRef, CacheError> {
    let value = params
        .get(index)
        .ok_or_else(|| CacheError::invalid_params(method, format!("missing param {index}")))?;
    BlockParameter::from_json_value(value)
        .map_err(|e| CacheError::invalid_params(method, e.to_string()))
}

/// Parses the optional full-transaction flag at `index`; absent or `null` means `false`.
pub(crate) fn full_tx_param(
    method: &'static str,
    params: &[serde_json::Value],
    index: usize,
) -> Result<bool, CacheError> {
    match params.get(index) {
        None | Some(serde_json::Value::Null) => Ok(false),
        Some(serde_json::Value::Bool(flag)) => Ok(*flag),
        Some(other) => Err(CacheError::invalid_params(
            method,
            format!("full transaction flag must be a boolean, got {other}"),
        )),
    }
}
