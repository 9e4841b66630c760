use std::{collections::HashMap, sync::Arc};
use tracing::debug;

use super::{
    backend::CacheBackend,
    errors::CacheError,
    handlers::{
        BlockByNumberHandler, BlockNumberHandler, BlockRangeHandler, CallHandler, GasPriceHandler,
        HandlerContext, MethodHandler, StaticMethodHandler,
    },
};
use crate::{
    chain::ChainOracle,
    metrics::CacheMetrics,
    types::{JsonRpcRequest, JsonRpcResponse},
};

/// Default number of confirmations required before a block-scoped result is cached.
pub const DEFAULT_BLOCK_CONFIRMATIONS: u64 = 10;

/// Routes requests to their [`MethodHandler`] and records hit/miss telemetry.
///
/// Methods without a handler are simply uncacheable: lookups return `Ok(None)`, writes are
/// no-ops and neither produces telemetry.
///
/// # Example
///
/// ```no_run
/// use rpc_cache::{
///     cache::{MemoryCache, RpcCache},
///     chain::ChainState,
///     metrics::NoopMetrics,
///     types::JsonRpcRequest,
/// };
/// use serde_json::json;
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), rpc_cache::cache::CacheError> {
/// let rpc_cache = RpcCache::new(
///     Arc::new(MemoryCache::default()),
///     Arc::new(ChainState::new()),
///     10,
///     Arc::new(NoopMetrics),
/// );
///
/// let request = JsonRpcRequest::new("eth_chainId", None, json!(1));
/// if let Some(cached) = rpc_cache.get_rpc(&request).await? {
///     println!("{:?}", cached.result);
/// }
/// # Ok(())
/// # }
/// ```
pub struct RpcCache {
    handlers: HashMap<&'static str, MethodHandler>,
    metrics: Arc<dyn CacheMetrics>,
    confirmations: u64,
}

impl RpcCache {
    #[must_use]
    pub fn new(
        backend: Arc<dyn CacheBackend>,
        oracle: Arc<dyn ChainOracle>,
        confirmations: u64,
        metrics: Arc<dyn CacheMetrics>,
    ) -> Self {
        let ctx = HandlerContext::new(backend, oracle, confirmations);

        let handlers = HashMap::from([
            (
                "eth_chainId",
                MethodHandler::Static(StaticMethodHandler::new(ctx.clone(), "eth_chainId")),
            ),
            (
                "net_version",
                MethodHandler::Static(StaticMethodHandler::new(ctx.clone(), "net_version")),
            ),
            (
                "eth_getBlockByNumber",
                MethodHandler::BlockByNumber(BlockByNumberHandler::new(ctx.clone())),
            ),
            ("eth_getBlockRange", MethodHandler::BlockRange(BlockRangeHandler::new(ctx.clone()))),
            ("eth_blockNumber", MethodHandler::BlockNumber(BlockNumberHandler::new(ctx.clone()))),
            ("eth_gasPrice", MethodHandler::GasPrice(GasPriceHandler::new(ctx.clone()))),
            ("eth_call", MethodHandler::Call(CallHandler::new(ctx))),
        ]);

        Self { handlers, metrics, confirmations }
    }

    /// Returns `true` if `method` has a caching policy.
    #[must_use]
    pub fn is_cached_method(&self, method: &str) -> bool {
        self.handlers.contains_key(method)
    }

    #[must_use]
    pub fn confirmations(&self) -> u64 {
        self.confirmations
    }

    /// Looks up a cached response for `request`.
    ///
    /// Records a hit for `Ok(Some)` on known methods; anything else (including an error) is a miss.
    ///
    /// # Errors
    ///
    /// Propagates handler errors (malformed params, backend or oracle failures).
    pub async fn get_rpc(
        &self,
        request: &JsonRpcRequest,
    ) -> Result<Option<JsonRpcResponse>, CacheError> {
        let Some((&method, handler)) = self.handlers.get_key_value(request.method.as_str()) else {
            return Ok(None);
        };

        let result = handler.get(request).await;
        if matches!(result, Ok(Some(_))) {
            debug!(method, "cache hit");
            self.metrics.record_cache_hit(method);
        } else {
            debug!(method, "cache miss");
            self.metrics.record_cache_miss(method);
        }
        result
    }

    /// Offers an upstream response to the method's handler for storage.
    ///
    /// # Errors
    ///
    /// Propagates handler errors. Unknown methods are a no-op.
    pub async fn put_rpc(
        &self,
        request: &JsonRpcRequest,
        response: &JsonRpcResponse,
    ) -> Result<(), CacheError> {
        match self.handlers.get(request.method.as_str()) {
            Some(handler) => handler.put(request, response).await,
            None => Ok(()),
        }
    }
}
