//! Boundary to the content-addressed network.

use alloy::primitives::Bytes;
use async_trait::async_trait;

use crate::store::cid::ContentId;
use crate::store::StoreResult;

/// Raw block transport. Owns its own timeout policy.
#[async_trait]
pub trait BlobTransport: Send + Sync {
    /// Store `bytes` as a raw keccak-256 block and return the identifier the store assigned.
    async fn put(&self, bytes: Bytes) -> StoreResult<ContentId>;

    /// Fetch the raw block for `cid`. Absent blocks are `StoreError::NotFound`.
    async fn get(&self, cid: &ContentId) -> StoreResult<Bytes>;
}
