//! Content digests.

use alloy::hex;
use alloy::primitives::{keccak256, B256};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Keccak-256 digest addressing a blob in the content store.
///
/// Also used as the announcement identifier (`txHash`), since the module
/// publishes the keccak of the hash image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentDigest(pub B256);

impl ContentDigest {
    /// Digest of a byte sequence.
    pub fn of(bytes: &[u8]) -> Self {
        Self(keccak256(bytes))
    }

    /// Raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0 .0
    }

    /// Whether `bytes` hash to this digest.
    pub fn matches(&self, bytes: &[u8]) -> bool {
        Self::of(bytes) == *self
    }
}

impl fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode_prefixed(self.0))
    }
}

impl FromStr for ContentDigest {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        B256::from_str(s).map(Self)
    }
}

impl From<B256> for ContentDigest {
    fn from(hash: B256) -> Self {
        Self(hash)
    }
}

impl From<ContentDigest> for B256 {
    fn from(digest: ContentDigest) -> Self {
        digest.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_digest() {
        let digest = ContentDigest::of(&[]);
        assert_eq!(
            digest.to_string(),
            "0xc5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn test_digest_is_deterministic() {
        let a = ContentDigest::of(b"rescue");
        let b = ContentDigest::of(b"rescue");
        assert_eq!(a, b);
        assert!(a.matches(b"rescue"));
        assert!(!a.matches(b"rescuE"));
    }

    #[test]
    fn test_parse_roundtrip() {
        let digest = ContentDigest::of(b"payload");
        let parsed: ContentDigest = digest.to_string().parse().unwrap();
        assert_eq!(parsed, digest);
        assert!("0x1234".parse::<ContentDigest>().is_err());
    }
}
