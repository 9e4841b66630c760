//! Shared parsing helpers.
//!
//! ## Block Parameter Parsing (`block_param`)
//! - Tag recognition for `latest`, `pending`, `earliest`, `safe`, `finalized`
//! - Strict `0x` hex quantities, plus the canonical hex spelling used in cache keys

pub mod block_param;

pub use block_param::{BlockParameter, BlockRef, BlockTag, ParseError as BlockParseError};
