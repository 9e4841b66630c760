//! Centralized block parameter parsing utilities.
//!
//! Provides consistent parsing for block numbers and block tags across all cached RPC
//! methods, and the canonical hex form used when a block number becomes part of a cache key.

use thiserror::Error;

/// Error types for block parameter parsing
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid hex string: {0}")]
    InvalidHex(String),
    #[error("block number must be 0x-prefixed hex: {0}")]
    MissingPrefix(String),
    #[error("block parameter must be a string")]
    NotAString,
}

/// Block reference types supported by Ethereum JSON-RPC
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockRef {
    /// Specific block number
    Number(u64),
    /// Block tag (latest, earliest, etc.)
    Tag(BlockTag),
}

impl BlockRef {
    /// Returns the block number if this reference names a fixed block.
    #[inline]
    #[must_use]
    pub fn number(self) -> Option<u64> {
        match self {
            BlockRef::Number(n) => Some(n),
            BlockRef::Tag(_) => None,
        }
    }
}

/// Standard Ethereum block tags.
///
/// Every tag names a moving target: `earliest` can be pruned or re-genesised by a node
/// operator, and the others advance with the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockTag {
    /// The most recent block in the canonical chain
    Latest,
    /// The block currently being built
    Pending,
    /// The earliest/genesis block
    Earliest,
    /// The most recent safe head block
    Safe,
    /// The most recent finalized block
    Finalized,
}

/// Centralized block parameter parsing
pub struct BlockParameter;

impl BlockParameter {
    /// Parse a block parameter from a string (JSON-RPC request parameter).
    ///
    /// Numbers must be `0x`-prefixed hex, as in the Ethereum JSON-RPC specification. Decimal
    /// strings are rejected so that `"100"` can never share a cache entry with `"0x64"`.
    ///
    /// # Examples
    /// ```
    /// use rpc_cache::utils::block_param::{BlockParameter, BlockRef, BlockTag};
    ///
    /// assert_eq!(BlockParameter::parse("latest").unwrap(), BlockRef::Tag(BlockTag::Latest));
    /// assert_eq!(BlockParameter::parse("0x10").unwrap(), BlockRef::Number(16));
    /// assert!(BlockParameter::parse("100").is_err());
    /// ```
    ///
    /// # Errors
    /// Returns `ParseError` if the input is not a valid block parameter.
    pub fn parse(param: &str) -> Result<BlockRef, ParseError> {
        match param {
            "latest" => Ok(BlockRef::Tag(BlockTag::Latest)),
            "pending" => Ok(BlockRef::Tag(BlockTag::Pending)),
            "earliest" => Ok(BlockRef::Tag(BlockTag::Earliest)),
            "safe" => Ok(BlockRef::Tag(BlockTag::Safe)),
            "finalized" => Ok(BlockRef::Tag(BlockTag::Finalized)),
            s => {
                let hex_str =
                    s.strip_prefix("0x").ok_or_else(|| ParseError::MissingPrefix(s.to_string()))?;
                parse_hex_digits(hex_str)
                    .map(BlockRef::Number)
                    .ok_or_else(|| ParseError::InvalidHex(s.to_string()))
            }
        }
    }

    /// Parse a block parameter held in a JSON value.
    ///
    /// # Errors
    /// Returns `ParseError::NotAString` for non-string values, otherwise as [`Self::parse`].
    pub fn from_json_value(value: &serde_json::Value) -> Result<BlockRef, ParseError> {
        value.as_str().ok_or(ParseError::NotAString).and_then(Self::parse)
    }

    /// Parse a hex quantity (with or without `0x` prefix), as returned in RPC results.
    ///
    /// # Examples
    /// ```
    /// use rpc_cache::utils::block_param::BlockParameter;
    ///
    /// assert_eq!(BlockParameter::parse_hex("0xff"), Some(255));
    /// assert_eq!(BlockParameter::parse_hex("invalid"), None);
    /// ```
    #[must_use]
    pub fn parse_hex(s: &str) -> Option<u64> {
        parse_hex_digits(s.strip_prefix("0x").unwrap_or(s))
    }

    /// Formats a quantity as minimal `0x`-prefixed lowercase hex.
    ///
    /// This is the canonical spelling used in cache keys and in synthesized responses.
    #[inline]
    #[must_use]
    pub fn format_hex(n: u64) -> String {
        format!("0x{n:x}")
    }
}

/// Parses bare hex digits. `from_str_radix` alone would also accept a leading sign.
fn parse_hex_digits(digits: &str) -> Option<u64> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u64::from_str_radix(digits, 16).ok()
}
