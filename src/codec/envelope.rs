//! EIP-712 style hash image wrapping a transaction image digest.
//!
//! The module announces `keccak(0x19 ‖ 0x01 ‖ domainSeparator ‖ keccak(image))`,
//! so resolving an announcement goes through this envelope first.

use alloy::primitives::B256;

use crate::codec::digest::ContentDigest;
use crate::codec::types::DecodeError;

/// Byte length of an encoded hash image.
pub const HASH_IMAGE_LEN: usize = 66;

const PREFIX: [u8; 2] = [0x19, 0x01];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashImage {
    pub domain_separator: B256,
    pub image_digest: ContentDigest,
}

impl HashImage {
    pub fn new(domain_separator: B256, image_digest: ContentDigest) -> Self {
        Self {
            domain_separator,
            image_digest,
        }
    }

    pub fn encode(&self) -> [u8; HASH_IMAGE_LEN] {
        let mut out = [0u8; HASH_IMAGE_LEN];
        out[..2].copy_from_slice(&PREFIX);
        out[2..34].copy_from_slice(self.domain_separator.as_slice());
        out[34..].copy_from_slice(self.image_digest.as_bytes());
        out
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        if bytes.len() != HASH_IMAGE_LEN {
            return Err(DecodeError::Length {
                expected: HASH_IMAGE_LEN,
                actual: bytes.len(),
            });
        }
        if bytes[..2] != PREFIX {
            return Err(DecodeError::EnvelopePrefix);
        }
        Ok(Self {
            domain_separator: B256::from_slice(&bytes[2..34]),
            image_digest: ContentDigest(B256::from_slice(&bytes[34..])),
        })
    }

    /// Announcement identifier the module derives from this envelope.
    pub fn tx_hash(&self) -> ContentDigest {
        ContentDigest::of(&self.encode())
    }
}
