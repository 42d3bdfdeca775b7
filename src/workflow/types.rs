//! Workflow results and the error taxonomy surfaced to callers.

use alloy::primitives::Address;
use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::blockchain::{BlockchainError, SubmissionHandle};
use crate::cache::CacheError;
use crate::codec::{ContentDigest, DecodeError};
use crate::events::AnnouncementState;
use crate::gate::Eligibility;
use crate::store::StoreError;

/// Failure of one workflow operation, or of one item within a listing.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Malformed image, envelope or log.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Digest absent from the store.
    #[error("{0} not found in store")]
    NotFound(ContentDigest),

    /// Store or ledger unreachable. The whole operation may be retried.
    #[error("network failure: {0}")]
    NetworkFailure(String),

    /// The ledger answered with an error, e.g. a reverted call.
    #[error("ledger call failed: {0}")]
    LedgerCall(String),

    /// Bytes or hashes that do not commit to what was expected.
    #[error("integrity check failed: {0}")]
    Integrity(String),

    #[error("local cache failure: {0}")]
    Cache(#[from] CacheError),

    /// The delay gate refused execution.
    #[error("announcement {tx_hash} is not executable: {eligibility:?}")]
    NotEligible {
        tx_hash: ContentDigest,
        eligibility: Eligibility,
    },

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl WorkflowError {
    /// Whether retrying the same operation later may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::NetworkFailure(_) | Self::NotEligible { .. })
    }
}

impl From<StoreError> for WorkflowError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(digest) => Self::NotFound(digest),
            StoreError::Network(msg) => Self::NetworkFailure(msg),
            e @ StoreError::UnexpectedCid { .. } => Self::Integrity(e.to_string()),
        }
    }
}

impl From<BlockchainError> for WorkflowError {
    fn from(e: BlockchainError) -> Self {
        if e.is_transport() {
            Self::NetworkFailure(e.to_string())
        } else {
            Self::LedgerCall(e.to_string())
        }
    }
}

pub type WorkflowResult<T> = Result<T, WorkflowError>;

/// A listing item that could not be produced.
#[derive(Debug, Error, Serialize)]
#[error("{subject}: {error}")]
pub struct ItemError {
    /// txHash or log position of the failed item.
    pub subject: String,
    #[serde(serialize_with = "display")]
    pub error: WorkflowError,
}

fn display<S: Serializer>(error: &WorkflowError, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

/// Items that resolved, plus inline failures for those that did not.
#[derive(Debug, Serialize)]
pub struct Listing<T> {
    pub items: Vec<T>,
    pub failures: Vec<ItemError>,
}

impl<T> Default for Listing<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            failures: Vec::new(),
        }
    }
}

impl<T> Listing<T> {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// A live announcement and where it stands against its delay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingAnnouncement {
    #[serde(flatten)]
    pub state: AnnouncementState,
    pub eligibility: Eligibility,
}

/// What `announce` published.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Announced {
    /// Identifier the module emits in `NewAnnouncement`.
    pub tx_hash: ContentDigest,
    pub image_digest: ContentDigest,
    pub data_digest: ContentDigest,
    pub handle: SubmissionHandle,
}

/// Module identity and whether a safe has it enabled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleStatus {
    pub module: Address,
    pub name: String,
    pub safe: Address,
    pub enabled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ContentId;

    #[test]
    fn test_store_error_mapping() {
        let digest = ContentDigest::of(b"x");
        assert!(matches!(
            WorkflowError::from(StoreError::NotFound(digest)),
            WorkflowError::NotFound(d) if d == digest
        ));
        assert!(matches!(
            WorkflowError::from(StoreError::Network("refused".into())),
            WorkflowError::NetworkFailure(_)
        ));
        let mismatch = StoreError::UnexpectedCid {
            expected: ContentId::from(digest),
            returned: ContentId::from(ContentDigest::of(b"y")),
        };
        assert!(matches!(WorkflowError::from(mismatch), WorkflowError::Integrity(_)));
    }

    #[test]
    fn test_blockchain_error_mapping() {
        let err = WorkflowError::from(BlockchainError::Rpc("timeout".into()));
        assert!(matches!(err, WorkflowError::NetworkFailure(_)));
        assert!(err.is_transient());

        let err = WorkflowError::from(BlockchainError::Reverted("GS013".into()));
        assert!(matches!(&err, WorkflowError::LedgerCall(msg) if msg.contains("GS013")));
        assert!(!err.is_transient());
    }

    #[test]
    fn test_item_error_serializes_message() {
        let item = ItemError {
            subject: "log 1:0:0".into(),
            error: WorkflowError::InvalidInput("bad".into()),
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["subject"], "log 1:0:0");
        assert_eq!(json["error"], "invalid input: bad");
        assert_eq!(item.to_string(), "log 1:0:0: invalid input: bad");
    }
}
