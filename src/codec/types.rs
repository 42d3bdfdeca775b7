//! Announcement payload types and codec errors.

use alloy::primitives::{Address, Bytes, B256, U256};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Call type executed by the safe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Operation {
    Call = 0,
    DelegateCall = 1,
}

impl From<Operation> for u8 {
    fn from(op: Operation) -> Self {
        op as u8
    }
}

impl TryFrom<u8> for Operation {
    type Error = DecodeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Call),
            1 => Ok(Self::DelegateCall),
            other => Err(DecodeError::InvalidOperation(other)),
        }
    }
}

/// A proposed transaction, as announced by a rescuer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnouncementDetails {
    /// Safe that will execute the transaction.
    pub executor: Address,
    /// Call target.
    pub to: Address,
    /// Native value forwarded with the call.
    pub value: U256,
    /// Call data. Stored separately in the content store.
    pub data: Bytes,
    /// Call or delegate call.
    pub operation: Operation,
    /// Distinguishes otherwise identical announcements.
    pub nonce: U256,
}

/// Errors produced while decoding byte images and log events.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Input is not the size the format requires.
    #[error("expected {expected} bytes, got {actual}")]
    Length { expected: usize, actual: usize },

    /// Leading word is not a known format magic.
    #[error("unknown transaction image format {0}")]
    UnknownFormat(B256),

    /// An address word carries non-zero padding.
    #[error("word {word} is not a left-padded address")]
    DirtyAddress { word: usize },

    /// Operation word is outside {0, 1}.
    #[error("invalid operation {0}")]
    InvalidOperation(u8),

    /// Operation word has bits set above the low byte.
    #[error("operation word is not a uint8")]
    OperationOverflow,

    /// Hash image does not start with the EIP-191 `0x1901` prefix.
    #[error("hash image does not start with 0x1901")]
    EnvelopePrefix,

    /// Call data does not hash to the digest committed in the image.
    #[error("call data does not match image digest {0}")]
    DataMismatch(B256),

    /// Ledger log could not be decoded as the expected event.
    #[error("event decoding failed: {0}")]
    Event(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_conversion() {
        assert_eq!(Operation::try_from(0).unwrap(), Operation::Call);
        assert_eq!(Operation::try_from(1).unwrap(), Operation::DelegateCall);
        assert_eq!(u8::from(Operation::DelegateCall), 1);
        assert_eq!(
            Operation::try_from(2).unwrap_err(),
            DecodeError::InvalidOperation(2)
        );
    }

    #[test]
    fn test_error_display() {
        let err = DecodeError::Length {
            expected: 224,
            actual: 10,
        };
        assert_eq!(err.to_string(), "expected 224 bytes, got 10");
    }
}
