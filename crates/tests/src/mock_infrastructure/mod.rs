//! Mock infrastructure for testing the cache against a fake upstream node.
//!
//! ## Usage
//!
//! ```ignore
//! use tests::mock_infrastructure::{BlockResponseBuilder, RpcMockBuilder};
//!
//! let mut mock = RpcMockBuilder::new().await;
//! mock.mock_get_block_by_number(1, &BlockResponseBuilder::new(1).build(), 1).await;
//!
//! // Use mock.url() to point an HttpUpstream at it
//! ```

pub mod redis_mock;
pub mod test_helpers;

pub use redis_mock::{DataCommandMode, MockRedisServer};
pub use rpc_mock::{BlockResponseBuilder, RpcMockBuilder};
pub use test_helpers::*;
