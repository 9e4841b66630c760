use super::{cache_key, HandlerContext};
use crate::{
    cache::errors::CacheError,
    types::{JsonRpcRequest, JsonRpcResponse},
};

/// Methods whose result never changes for the lifetime of a chain (`eth_chainId`,
/// `net_version`). Params are ignored.
pub struct StaticMethodHandler {
    ctx: HandlerContext,
    key: String,
}

impl StaticMethodHandler {
    #[must_use]
    pub fn new(ctx: HandlerContext, method: &'static str) -> Self {
        Self { ctx, key: cache_key(method, &[]) }
    }

    pub(crate) async fn get(
        &self,
        request: &JsonRpcRequest,
    ) -> Result<Option<JsonRpcResponse>, CacheError> {
        self.ctx.read(&self.key, request).await
    }

    pub(crate) async fn put(
        &self,
        _request: &JsonRpcRequest,
        response: &JsonRpcResponse,
    ) -> Result<(), CacheError> {
        self.ctx.write(&self.key, response).await
    }
}
