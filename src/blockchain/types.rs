//! Chain-specific types and error definitions.

use thiserror::Error;

/// Chain ID type for strong typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId(pub u64);

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ChainId> for u64 {
    fn from(id: ChainId) -> Self {
        id.0
    }
}

/// Errors that can occur during ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlockchainError {
    /// No RPC provider could be reached.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// The node answered with an error, e.g. a reverted call.
    #[error("Call reverted: {0}")]
    Reverted(String),

    /// Return data did not match the expected ABI.
    #[error("Invalid return data: {0}")]
    InvalidReturn(String),

    /// Chain configuration mismatch.
    #[error("Chain ID mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: u64, actual: u64 },

    /// The write collaborator could not accept the transaction.
    #[error("Submission failed: {0}")]
    Submission(String),
}

impl BlockchainError {
    /// Whether the failure happened before the ledger answered.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Rpc(_))
    }
}

/// Result type for ledger operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;
