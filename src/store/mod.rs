//! Content-addressed store client.
//!
//! # Data Flow
//! ```text
//! push: bytes → keccak → ContentId (CIDv1 raw, keccak-256 multihash)
//!           → transport.rs put → verify returned CID → content cache
//! pull: digest → content cache ─hit─▶ bytes
//!                              └miss─▶ transport.rs get → verify keccak → cache → bytes
//! ```
//!
//! # Design Decisions
//! - Transport failures surface unmodified; no internal retries
//! - Bytes that do not hash to the requested digest count as not found
//! - Cache entries are never invalidated

pub mod cid;
pub mod client;
pub mod ipfs;
pub mod transport;

use thiserror::Error;

use crate::codec::ContentDigest;

pub use cid::ContentId;
pub use client::StoreClient;
pub use ipfs::IpfsHttpTransport;
pub use transport::BlobTransport;

/// Errors surfaced by the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The network holds no object for this digest.
    #[error("no object stored under {0}")]
    NotFound(ContentDigest),

    /// Transport-level failure reaching the store.
    #[error("store transport failure: {0}")]
    Network(String),

    /// The store addressed pushed content differently than expected.
    #[error("store acknowledged {returned} for content {expected}")]
    UnexpectedCid { expected: ContentId, returned: ContentId },
}

pub type StoreResult<T> = Result<T, StoreError>;
