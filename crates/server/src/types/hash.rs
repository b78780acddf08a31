use serde::{Deserialize, Serialize};
use sp_core::H256;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A block hash, always rendered as `0x` followed by 64 lowercase hex characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockHash(pub H256);

impl BlockHash {
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum BlockHashParseError {
    #[error("missing 0x prefix")]
    MissingPrefix,

    #[error("invalid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    #[error("expected 32 bytes, got {0}")]
    InvalidLength(usize),
}

impl From<H256> for BlockHash {
    fn from(hash: H256) -> Self {
        Self(hash)
    }
}

impl From<BlockHash> for H256 {
    fn from(hash: BlockHash) -> Self {
        hash.0
    }
}

impl fmt::Display for BlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0.as_bytes()))
    }
}

impl FromStr for BlockHash {
    type Err = BlockHashParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("0x")
            .ok_or(BlockHashParseError::MissingPrefix)?;
        let bytes = hex::decode(digits)?;
        let raw = <[u8; 32]>::try_from(bytes.as_slice())
            .map_err(|_| BlockHashParseError::InvalidLength(bytes.len()))?;
        Ok(Self(H256::from(raw)))
    }
}

impl Serialize for BlockHash {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for BlockHash {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HASH: &str = "0x4242424242424242424242424242424242424242424242424242424242424242";

    #[test]
    fn test_block_hash_display() {
        let hash = BlockHash(H256::from([0x42; 32]));
        assert_eq!(hash.to_string(), HASH);
        assert_eq!(serde_json::to_string(&hash).unwrap(), format!("\"{HASH}\""));
    }

    #[test]
    fn test_block_hash_parse() {
        let hash: BlockHash = HASH.parse().unwrap();
        assert_eq!(hash.0, H256::from([0x42; 32]));

        let hash: BlockHash = serde_json::from_str(&format!("\"{HASH}\"")).unwrap();
        assert_eq!(hash.0, H256::from([0x42; 32]));
    }

    #[test]
    fn test_block_hash_parse_errors() {
        assert_eq!(
            HASH[2..].parse::<BlockHash>(),
            Err(BlockHashParseError::MissingPrefix)
        );
        assert_eq!(
            "0x4242".parse::<BlockHash>(),
            Err(BlockHashParseError::InvalidLength(2))
        );
        assert_eq!(
            "0xzz".parse::<BlockHash>(),
            Err(BlockHashParseError::InvalidHex(
                hex::FromHexError::InvalidHexCharacter { c: 'z', index: 0 }
            ))
        );
    }

    #[test]
    fn test_zero_hash() {
        assert!(BlockHash::from(H256::zero()).is_zero());
        assert!(!BlockHash(H256::from([0x42; 32])).is_zero());
    }
}
