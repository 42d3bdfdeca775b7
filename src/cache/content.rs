//! Cache for immutable content-addressed blobs.

use alloy::hex;
use alloy::primitives::Bytes;
use std::sync::Arc;

use crate::cache::KeyValueStore;
use crate::codec::ContentDigest;
use crate::observability::metrics;

const NAMESPACE: &str = "cache/";

/// Digest → bytes. Entries are never invalidated: content under a digest cannot change.
#[derive(Clone)]
pub struct ContentCache {
    store: Arc<dyn KeyValueStore>,
}

impl ContentCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Storage key for a digest.
    pub fn key(digest: &ContentDigest) -> String {
        format!("{NAMESPACE}{digest}")
    }

    /// Cached bytes for `digest`.
    ///
    /// Entries that fail to decode or no longer hash to their key are treated as misses.
    pub fn get(&self, digest: &ContentDigest) -> Option<Bytes> {
        let hit = self
            .store
            .get(&Self::key(digest))
            .and_then(|encoded| match hex::decode(&encoded) {
                Ok(bytes) if digest.matches(&bytes) => Some(Bytes::from(bytes)),
                _ => {
                    tracing::warn!(digest = %digest, "Ignoring corrupt content cache entry");
                    None
                }
            });
        metrics::record_cache_lookup("content", hit.is_some());
        hit
    }

    pub fn insert(&self, digest: &ContentDigest, bytes: &[u8]) {
        self.store.set(&Self::key(digest), hex::encode(bytes));
    }
}

impl std::fmt::Debug for ContentCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentCache")
            .field("entries", &self.store.len())
            .finish()
    }
}
