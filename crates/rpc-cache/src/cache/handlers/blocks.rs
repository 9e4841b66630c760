use tracing::debug;

use super::{block_param, cache_key, full_tx_param, HandlerContext};
use crate::{
    cache::errors::CacheError,
    types::{JsonRpcRequest, JsonRpcResponse},
    utils::BlockParameter,
};

const GET_BLOCK_BY_NUMBER: &str = "eth_getBlockByNumber";
const GET_BLOCK_RANGE: &str = "eth_getBlockRange";

/// Cache key and the block that must be confirmed before writing it.
struct BlockKey {
    key: String,
    confirm_block: u64,
}

/// `eth_getBlockByNumber(block, fullTx)`.
pub struct BlockByNumberHandler {
    ctx: HandlerContext,
}

impl BlockByNumberHandler {
    #[must_use]
    pub fn new(ctx: HandlerContext) -> Self {
        Self { ctx }
    }

    /// Returns `None` for block tags.
    fn key_for(request: &JsonRpcRequest) -> Result<Option<BlockKey>, CacheError> {
        let params = request.params_array();
        let block = block_param(GET_BLOCK_BY_NUMBER, params, 0)?;
        let full_tx = full_tx_param(GET_BLOCK_BY_NUMBER, params, 1)?;

        Ok(block.number().map(|number| BlockKey {
            key: cache_key(
                GET_BLOCK_BY_NUMBER,
                &[BlockParameter::format_hex(number).as_str(), bool_str(full_tx)],
            ),
            confirm_block: number,
        }))
    }

    pub(crate) async fn get(
        &self,
        request: &JsonRpcRequest,
    ) -> Result<Option<JsonRpcResponse>, CacheError> {
        match Self::key_for(request)? {
            Some(block_key) => self.ctx.read(&block_key.key, request).await,
            None => Ok(None),
        }
    }

    pub(crate) async fn put(
        &self,
        request: &JsonRpcRequest,
        response: &JsonRpcResponse,
    ) -> Result<(), CacheError> {
        match Self::key_for(request)? {
            Some(block_key) => write_if_confirmed(&self.ctx, block_key, response).await,
            None => Ok(()),
        }
    }
}

/// `eth_getBlockRange(start, end, fullTx)`.
pub struct BlockRangeHandler {
    ctx: HandlerContext,
}

impl BlockRangeHandler {
    #[must_use]
    pub fn new(ctx: HandlerContext) -> Self {
        Self { ctx }
    }

    /// Returns `None` if either bound is a tag.
    fn key_for(request: &JsonRpcRequest) -> Result<Option<BlockKey>, CacheError> {
        let params = request.params_array();
        let start = block_param(GET_BLOCK_RANGE, params, 0)?;
        let end = block_param(GET_BLOCK_RANGE, params, 1)?;
        let full_tx = full_tx_param(GET_BLOCK_RANGE, params, 2)?;

        let (Some(start), Some(end)) = (start.number(), end.number()) else {
            return Ok(None);
        };

        Ok(Some(BlockKey {
            key: cache_key(
                GET_BLOCK_RANGE,
                &[
                    BlockParameter::format_hex(start).as_str(),
                    BlockParameter::format_hex(end).as_str(),
                    bool_str(full_tx),
                ],
            ),
            confirm_block: start.max(end),
        }))
    }

    pub(crate) async fn get(
        &self,
        request: &JsonRpcRequest,
    ) -> Result<Option<JsonRpcResponse>, CacheError> {
        match Self::key_for(request)? {
            Some(block_key) => self.ctx.read(&block_key.key, request).await,
            None => Ok(None),
        }
    }

    pub(crate) async fn put(
        &self,
        request: &JsonRpcRequest,
        response: &JsonRpcResponse,
    ) -> Result<(), CacheError> {
        match Self::key_for(request)? {
            Some(block_key) => write_if_confirmed(&self.ctx, block_key, response).await,
            None => Ok(()),
        }
    }
}

async fn write_if_confirmed(
    ctx: &HandlerContext,
    block_key: BlockKey,
    response: &JsonRpcResponse,
) -> Result<(), CacheError> {
    if response.cacheable_result().is_none() {
        return Ok(());
    }
    if !ctx.is_confirmed(block_key.confirm_block).await? {
        debug!(
            key = %block_key.key,
            block = block_key.confirm_block,
            "block not yet confirmed, skipping cache write"
        );
        return Ok(());
    }
    ctx.write(&block_key.key, response).await
}

fn bool_str(flag: bool) -> &'static str {
    if flag {
        "true"
    } else {
        "false"
    }
}
