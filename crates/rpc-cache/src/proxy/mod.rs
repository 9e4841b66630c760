//! Request processing in front of the upstream node.
//!
//! # Request Processing Flow
//!
//! ```text
//! Client Request
//!       │
//!       ▼
//! ┌─────────────┐
//! │  Validation │ ─── Invalid ──► ProxyError::InvalidRequest
//! └──────┬──────┘
//!        │ Valid
//!        ▼
//! ┌─────────────────┐   hit
//! │ RpcCache.get_rpc│ ───────► response (id re-tagged, HIT)
//! └────────┬────────┘
//!          │ miss / cache error
//!          ▼
//! ┌─────────────────┐
//! │  UpstreamClient │ ─── transport error ──► ProxyError::Upstream
//! └────────┬────────┘
//!          │ response (MISS)
//!          ▼
//! ┌─────────────────┐
//! │ RpcCache.put_rpc│  (success responses only; failures logged)
//! └─────────────────┘
//! ```

pub mod engine;
pub mod errors;

pub use engine::ProxyEngine;
pub use errors::ProxyError;
