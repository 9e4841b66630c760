//! Upstream node communication.
//!
//! Requests the cache cannot answer are forwarded through an [`UpstreamClient`]. The bundled
//! [`HttpUpstream`] speaks JSON-RPC over HTTP POST to a single node; selecting between several
//! nodes is left to whatever sits in front of this crate.

pub mod errors;
pub mod http_client;

pub use errors::UpstreamError;
pub use http_client::{HttpUpstream, UpstreamClient};
