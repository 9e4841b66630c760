//! Runtime initialization and lifecycle management.
//!
//! Builds the full stack (storage backend, [`RpcCache`](crate::cache::RpcCache), upstream
//! client, [`ProxyEngine`](crate::proxy::ProxyEngine) and the oracle poller) from an
//! [`AppConfig`](crate::config::AppConfig), and coordinates shutdown of background tasks.
//!
//! # Examples
//!
//! ```no_run
//! use rpc_cache::{config::AppConfig, runtime::CacheRuntime, types::JsonRpcRequest};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let runtime = CacheRuntime::builder().with_config(config).build().await?;
//!
//!     let request = JsonRpcRequest::new("eth_chainId", None, json!(1));
//!     let response = runtime.proxy_engine().process_request(request).await?;
//!     println!("{:?}", response.result);
//!
//!     runtime.shutdown().await;
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod components;
pub mod lifecycle;

pub use builder::{CacheRuntimeBuilder, RuntimeError};
pub use components::CacheComponents;
pub use lifecycle::CacheRuntime;
