use crate::types::{BlockHash, BlockHashParseError};
use std::str::FromStr;
use thiserror::Error;

/// A `{blockId}` path segment: a `0x` hash or a decimal height
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockId {
    Hash(BlockHash),
    Number(u64),
}

#[derive(Debug, Error, PartialEq)]
pub enum BlockIdParseError {
    #[error("Invalid block hash '{id}': {source}")]
    InvalidHash {
        id: String,
        #[source]
        source: BlockHashParseError,
    },

    #[error("Invalid block identifier '{0}': expected a 0x-prefixed hash or a block number")]
    InvalidNumber(String),
}

impl FromStr for BlockId {
    type Err = BlockIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.starts_with("0x") {
            return s
                .parse()
                .map(BlockId::Hash)
                .map_err(|source| BlockIdParseError::InvalidHash {
                    id: s.to_string(),
                    source,
                });
        }
        s.parse()
            .map(BlockId::Number)
            .map_err(|_| BlockIdParseError::InvalidNumber(s.to_string()))
    }
}
