//! Canonical transaction image.
//!
//! Seven big-endian 32-byte words, identical to the module's
//! `abi.encode(bytes32, address, address, uint256, bytes32, uint8, uint256)`:
//!
//! ```text
//! word0  format magic
//! word1  executor            (left-padded address)
//! word2  to                  (left-padded address)
//! word3  value               (uint256)
//! word4  keccak(data)
//! word5  operation           (uint8, low byte)
//! word6  nonce               (uint256)
//! ```

use alloy::primitives::{b256, Address, Bytes, B256, U256};

use crate::codec::digest::ContentDigest;
use crate::codec::types::{AnnouncementDetails, DecodeError, Operation};

/// Size of one ABI word.
pub const WORD: usize = 32;

/// Number of words in a transaction image.
pub const IMAGE_WORDS: usize = 7;

/// Exact byte length of a transaction image.
pub const IMAGE_LEN: usize = WORD * IMAGE_WORDS;

/// Magic word of the first (and current) image layout.
pub const IMAGE_MAGIC_V1: B256 =
    b256!("26b3c09c30e365f49b0eb65e39ec1e16b5ebaded063648e49599b6b8abc3ba86");

/// Known image layouts, identified by their leading word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    V1,
}

impl ImageFormat {
    /// Layout written by `encode`.
    pub const CURRENT: Self = Self::V1;

    /// Leading word for this layout.
    pub fn magic(self) -> B256 {
        match self {
            Self::V1 => IMAGE_MAGIC_V1,
        }
    }

    /// Identify a layout from its leading word.
    pub fn from_magic(word: &B256) -> Option<Self> {
        if *word == IMAGE_MAGIC_V1 {
            Some(Self::V1)
        } else {
            None
        }
    }
}

/// Decoded transaction image. Carries the digest of `data`, not `data` itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionImage {
    pub format: ImageFormat,
    pub executor: Address,
    pub to: Address,
    pub value: U256,
    pub data_digest: ContentDigest,
    pub operation: Operation,
    pub nonce: U256,
}

impl TransactionImage {
    /// Build the image for a set of announcement details.
    pub fn from_details(details: &AnnouncementDetails) -> Self {
        Self {
            format: ImageFormat::CURRENT,
            executor: details.executor,
            to: details.to,
            value: details.value,
            data_digest: ContentDigest::of(&details.data),
            operation: details.operation,
            nonce: details.nonce,
        }
    }

    /// Canonical byte encoding.
    pub fn encode(&self) -> [u8; IMAGE_LEN] {
        let mut out = [0u8; IMAGE_LEN];
        write_word(&mut out, 0, self.format.magic().0);
        write_word(&mut out, 1, self.executor.into_word().0);
        write_word(&mut out, 2, self.to.into_word().0);
        write_word(&mut out, 3, self.value.to_be_bytes::<32>());
        write_word(&mut out, 4, *self.data_digest.as_bytes());
        out[6 * WORD - 1] = self.operation.into();
        write_word(&mut out, 6, self.nonce.to_be_bytes::<32>());
        out
    }

    /// Parse a canonical byte encoding.
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        if bytes.len() != IMAGE_LEN {
            return Err(DecodeError::Length {
                expected: IMAGE_LEN,
                actual: bytes.len(),
            });
        }

        let magic = B256::from_slice(word(bytes, 0));
        let format = ImageFormat::from_magic(&magic).ok_or(DecodeError::UnknownFormat(magic))?;

        Ok(Self {
            format,
            executor: read_address(bytes, 1)?,
            to: read_address(bytes, 2)?,
            value: U256::from_be_slice(word(bytes, 3)),
            data_digest: ContentDigest(B256::from_slice(word(bytes, 4))),
            operation: read_operation(bytes, 5)?,
            nonce: U256::from_be_slice(word(bytes, 6)),
        })
    }

    /// Digest of the canonical encoding.
    pub fn digest(&self) -> ContentDigest {
        ContentDigest::of(&self.encode())
    }

    /// Reattach call data resolved from the store.
    ///
    /// Fails if `data` does not hash to the committed digest.
    pub fn with_data(self, data: Bytes) -> Result<AnnouncementDetails, DecodeError> {
        if !self.data_digest.matches(&data) {
            return Err(DecodeError::DataMismatch(self.data_digest.0));
        }
        Ok(AnnouncementDetails {
            executor: self.executor,
            to: self.to,
            value: self.value,
            data,
            operation: self.operation,
            nonce: self.nonce,
        })
    }
}

/// Encode announcement details into their 224-byte image.
pub fn encode(details: &AnnouncementDetails) -> [u8; IMAGE_LEN] {
    TransactionImage::from_details(details).encode()
}

/// Decode a 224-byte image.
pub fn decode(bytes: &[u8]) -> Result<TransactionImage, DecodeError> {
    TransactionImage::decode(bytes)
}

fn write_word(out: &mut [u8; IMAGE_LEN], index: usize, value: [u8; WORD]) {
    out[index * WORD..(index + 1) * WORD].copy_from_slice(&value);
}

fn word(bytes: &[u8], index: usize) -> &[u8] {
    &bytes[index * WORD..(index + 1) * WORD]
}

fn read_address(bytes: &[u8], index: usize) -> Result<Address, DecodeError> {
    let w = word(bytes, index);
    if w[..12].iter().any(|b| *b != 0) {
        return Err(DecodeError::DirtyAddress { word: index });
    }
    Ok(Address::from_slice(&w[12..]))
}

fn read_operation(bytes: &[u8], index: usize) -> Result<Operation, DecodeError> {
    let w = word(bytes, index);
    if w[..WORD - 1].iter().any(|b| *b != 0) {
        return Err(DecodeError::OperationOverflow);
    }
    Operation::try_from(w[WORD - 1])
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;
    use alloy::sol_types::SolValue;

    fn sample() -> AnnouncementDetails {
        AnnouncementDetails {
            executor: address!("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa"),
            to: address!("bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb"),
            value: U256::from(42u64),
            data: Bytes::from_static(&[0x0d, 0x58, 0x2f, 0x13]),
            operation: Operation::DelegateCall,
            nonce: U256::from(1_710_000_000_000u64),
        }
    }

    #[test]
    fn test_roundtrip_preserves_scalars() {
        let details = sample();
        let image = decode(&encode(&details)).unwrap();

        assert_eq!(image.format, ImageFormat::V1);
        assert_eq!(image.executor, details.executor);
        assert_eq!(image.to, details.to);
        assert_eq!(image.value, details.value);
        assert_eq!(image.operation, details.operation);
        assert_eq!(image.nonce, details.nonce);
        assert_eq!(image.data_digest, ContentDigest::of(&details.data));
    }

    #[test]
    fn test_layout_matches_abi_encoding() {
        let details = sample();
        let expected = (
            IMAGE_MAGIC_V1,
            details.executor,
            details.to,
            details.value,
            ContentDigest::of(&details.data).0,
            U256::from(u8::from(details.operation)),
            details.nonce,
        )
            .abi_encode();

        assert_eq!(encode(&details).to_vec(), expected);
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let details = sample();
        assert_eq!(encode(&details), encode(&details));
        assert_eq!(
            TransactionImage::from_details(&details).digest(),
            TransactionImage::from_details(&details).digest()
        );
    }

    #[test]
    fn test_rejects_wrong_length() {
        let bytes = encode(&sample());
        for len in [0, 1, IMAGE_LEN - 1, IMAGE_LEN + 1] {
            let input: Vec<u8> = bytes.iter().copied().cycle().take(len).collect();
            assert_eq!(
                decode(&input).unwrap_err(),
                DecodeError::Length {
                    expected: IMAGE_LEN,
                    actual: len
                }
            );
        }
    }

    #[test]
    fn test_rejects_unknown_magic() {
        let mut bytes = encode(&sample());
        bytes[0] ^= 0xff;
        assert!(matches!(
            decode(&bytes).unwrap_err(),
            DecodeError::UnknownFormat(_)
        ));
    }

    #[test]
    fn test_rejects_dirty_address_and_operation() {
        let mut bytes = encode(&sample());
        bytes[WORD + 3] = 1;
        assert_eq!(
            decode(&bytes).unwrap_err(),
            DecodeError::DirtyAddress { word: 1 }
        );

        let mut bytes = encode(&sample());
        bytes[6 * WORD - 1] = 7;
        assert_eq!(decode(&bytes).unwrap_err(), DecodeError::InvalidOperation(7));

        let mut bytes = encode(&sample());
        bytes[5 * WORD] = 1;
        assert_eq!(decode(&bytes).unwrap_err(), DecodeError::OperationOverflow);
    }

    #[test]
    fn test_with_data_checks_digest() {
        let details = sample();
        let image = decode(&encode(&details)).unwrap();

        let restored = image.clone().with_data(details.data.clone()).unwrap();
        assert_eq!(restored, details);

        let err = image.with_data(Bytes::from_static(b"other")).unwrap_err();
        assert!(matches!(err, DecodeError::DataMismatch(_)));
    }
}
