use serde_json::Value;

use super::{cached_response, HandlerContext};
use crate::{
    cache::errors::CacheError,
    types::{JsonRpcRequest, JsonRpcResponse},
    utils::BlockParameter,
};

/// Answers `eth_blockNumber` from the chain oracle. Never touches storage.
pub struct BlockNumberHandler {
    ctx: HandlerContext,
}

impl BlockNumberHandler {
    #[must_use]
    pub fn new(ctx: HandlerContext) -> Self {
        Self { ctx }
    }

    pub(crate) async fn get(
        &self,
        request: &JsonRpcRequest,
    ) -> Result<Option<JsonRpcResponse>, CacheError> {
        let block_number = self.ctx.oracle.latest_block_number().await?;
        Ok(Some(cached_response(Value::String(BlockParameter::format_hex(block_number)), request)))
    }
}

/// Answers `eth_gasPrice` from the chain oracle. Never touches storage.
pub struct GasPriceHandler {
    ctx: HandlerContext,
}

impl GasPriceHandler {
    #[must_use]
    pub fn new(ctx: HandlerContext) -> Self {
        Self { ctx }
    }

    pub(crate) async fn get(
        &self,
        request: &JsonRpcRequest,
    ) -> Result<Option<JsonRpcResponse>, CacheError> {
        let gas_price = self.ctx.oracle.latest_gas_price().await?;
        Ok(Some(cached_response(Value::String(BlockParameter::format_hex(gas_price)), request)))
    }
}
