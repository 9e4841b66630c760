use serde_json::{Map, Value};
use tracing::debug;

use super::{cache_key, HandlerContext};
use crate::{
    cache::errors::CacheError,
    types::{JsonRpcRequest, JsonRpcResponse},
    utils::{BlockParameter, BlockRef},
};

const ETH_CALL: &str = "eth_call";

/// `eth_call(callObject, block?)` pinned to a confirmed block number.
///
/// Calls against a tag, without a block, or with an EIP-1898 block object are not cached.
pub struct CallHandler {
    ctx: HandlerContext,
}

impl CallHandler {
    #[must_use]
    pub fn new(ctx: HandlerContext) -> Self {
        Self { ctx }
    }

    /// Returns the key and pinned block, or `None` when the call is not pinned to a number.
    fn key_for(request: &JsonRpcRequest) -> Result<Option<(String, u64)>, CacheError> {
        let params = request.params_array();
        let call_object = params
            .first()
            .filter(|value| value.is_object())
            .ok_or_else(|| CacheError::invalid_params(ETH_CALL, "call object must be an object"))?;

        let block = match params.get(1) {
            None | Some(Value::Null) => return Ok(None),
            Some(Value::String(selector)) => BlockParameter::parse(selector)
                .map_err(|e| CacheError::invalid_params(ETH_CALL, e.to_string()))?,
            Some(_) => return Ok(None),
        };
        let BlockRef::Number(number) = block else {
            return Ok(None);
        };

        let canonical = serde_json::to_string(&canonicalize(call_object))?;
        let block_hex = BlockParameter::format_hex(number);
        let key = cache_key(ETH_CALL, &[canonical.as_str(), block_hex.as_str()]);
        Ok(Some((key, number)))
    }

    pub(crate) async fn get(
        &self,
        request: &JsonRpcRequest,
    ) -> Result<Option<JsonRpcResponse>, CacheError> {
        match Self::key_for(request)? {
            Some((key, _)) => self.ctx.read(&key, request).await,
            None => Ok(None),
        }
    }

    pub(crate) async fn put(
        &self,
        request: &JsonRpcRequest,
        response: &JsonRpcResponse,
    ) -> Result<(), CacheError> {
        let Some((key, block)) = Self::key_for(request)? else {
            return Ok(());
        };
        if response.cacheable_result().is_none() {
            return Ok(());
        }
        if !self.ctx.is_confirmed(block).await? {
            debug!(block, "call block not yet confirmed, skipping cache write");
            return Ok(());
        }
        self.ctx.write(&key, response).await
    }
}

/// Normalizes a call object so equivalent requests serialize identically.
///
/// Object keys are emitted in sorted order and `0x` hex strings are lowercased.
fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            let mut sorted = Map::with_capacity(entries.len());
            for (key, value) in entries {
                sorted.insert(key.clone(), canonicalize(value));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        Value::String(s) if s.starts_with("0x") || s.starts_with("0X") => {
            Value::String(s.to_ascii_lowercase())
        }
        other => other.clone(),
    }
}
