//! Core type definitions for JSON-RPC requests and responses.
//!
//! # Type Categories
//!
//! - [`JsonRpcRequest`], [`JsonRpcResponse`], [`JsonRpcError`]: Protocol conformance
//! - [`CacheStatus`]: extension field indicating whether a response came from cache
//!
//! # Performance Notes
//!
//! The `jsonrpc` field is a `Cow<'static, str>` so requests and responses built in-process
//! never allocate the version string, and `id` is an `Arc` so a cached response can be
//! re-tagged with the caller's id without deep-copying the JSON value.

use serde::{Deserialize, Serialize};
use std::{borrow::Cow, sync::Arc};

/// JSON-RPC protocol version constant to avoid repeated allocations.
pub const JSONRPC_VERSION: &str = "2.0";

/// Pre-allocated `Cow` for JSON-RPC version - zero allocation for static usage.
pub const JSONRPC_VERSION_COW: Cow<'static, str> = Cow::Borrowed(JSONRPC_VERSION);

/// Describes how a request was served.
///
/// # Example
///
/// ```
/// use rpc_cache::types::CacheStatus;
///
/// assert_eq!(CacheStatus::Hit.to_string(), "HIT");
/// assert_eq!(CacheStatus::Miss.to_string(), "MISS");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum CacheStatus {
    /// The response was served from cache or synthesized from the chain oracle.
    Hit,
    /// The response was fetched from the upstream node.
    Miss,
}

impl std::fmt::Display for CacheStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheStatus::Hit => write!(f, "HIT"),
            CacheStatus::Miss => write!(f, "MISS"),
        }
    }
}

/// JSON-RPC 2.0 request structure.
///
/// # Example
///
/// ```
/// use rpc_cache::types::JsonRpcRequest;
/// use serde_json::json;
///
/// let request = JsonRpcRequest::new("eth_getBlockByNumber", Some(json!(["0x1", true])), json!(1));
///
/// assert_eq!(request.method, "eth_getBlockByNumber");
/// assert_eq!(request.params_array().len(), 2);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: Cow<'static, str>,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<serde_json::Value>,
    pub id: Arc<serde_json::Value>,
}

impl JsonRpcRequest {
    /// Creates a new JSON-RPC request with zero allocation for the version string.
    #[must_use]
    pub fn new(
        method: impl Into<String>,
        params: Option<serde_json::Value>,
        id: serde_json::Value,
    ) -> Self {
        Self { jsonrpc: JSONRPC_VERSION_COW, method: method.into(), params, id: Arc::new(id) }
    }

    /// Returns positional params, or an empty slice when params are absent or not an array.
    #[must_use]
    pub fn params_array(&self) -> &[serde_json::Value] {
        self.params.as_ref().and_then(serde_json::Value::as_array).map_or(&[], Vec::as_slice)
    }
}

/// JSON-RPC 2.0 response structure.
///
/// A response contains either a `result` (success) or an `error` (failure), but never both.
///
/// # Example
///
/// ```
/// use rpc_cache::types::JsonRpcResponse;
/// use serde_json::json;
/// use std::sync::Arc;
///
/// let response = JsonRpcResponse::success(json!("0x1234"), Arc::new(json!(1)));
/// assert!(response.is_success());
///
/// let response =
///     JsonRpcResponse::error(-32600, "Invalid Request".to_string(), Arc::new(json!(1)));
/// assert!(!response.is_success());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: Cow<'static, str>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
    pub id: Arc<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_status: Option<CacheStatus>,
}

impl JsonRpcResponse {
    /// Creates a successful JSON-RPC response with zero allocation for the version string.
    #[must_use]
    pub fn success(result: serde_json::Value, id: Arc<serde_json::Value>) -> Self {
        Self { jsonrpc: JSONRPC_VERSION_COW, result: Some(result), error: None, id, cache_status: None }
    }

    /// Creates an error JSON-RPC response with zero allocation for the version string.
    #[must_use]
    pub fn error(code: i32, message: String, id: Arc<serde_json::Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION_COW,
            result: None,
            error: Some(JsonRpcError { code, message, data: None }),
            id,
            cache_status: None,
        }
    }

    /// Returns `true` when the response carries a result and no error.
    ///
    /// Only such responses are eligible for caching.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.error.is_none() && self.result.is_some()
    }

    /// Returns the result if this response may be written to cache.
    ///
    /// Error responses and `null` results (e.g. a block the upstream has not seen yet) are
    /// never cacheable.
    #[must_use]
    pub fn cacheable_result(&self) -> Option<&serde_json::Value> {
        if self.error.is_some() {
            return None;
        }
        self.result.as_ref().filter(|result| !result.is_null())
    }

    /// Returns the response with its id replaced by `id` (cheap `Arc` clone).
    #[must_use]
    pub fn with_id(mut self, id: &Arc<serde_json::Value>) -> Self {
        self.id = Arc::clone(id);
        self
    }
}

/// JSON-RPC 2.0 error object.
///
/// Standard error codes follow the JSON-RPC 2.0 convention:
///
/// - `-32700`: Parse error (invalid JSON)
/// - `-32600`: Invalid request (malformed JSON-RPC)
/// - `-32601`: Method not found
/// - `-32602`: Invalid params
/// - `-32603`: Internal error
/// - `-32000` to `-32099`: Server-defined errors (implementation-specific)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}
