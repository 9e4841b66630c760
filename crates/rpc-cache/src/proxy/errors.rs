use crate::upstream::errors::UpstreamError;

#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Preserves concrete `UpstreamError` type for retry/fallback decisions.
    #[error("Upstream error: {0}")]
    Upstream(#[from] UpstreamError),
}

impl ProxyError {
    /// JSON-RPC error code to report to the client.
    #[must_use]
    pub fn rpc_code(&self) -> i32 {
        match self {
            ProxyError::InvalidRequest(_) => -32600,
            ProxyError::Upstream(_) => -32603,
        }
    }
}
