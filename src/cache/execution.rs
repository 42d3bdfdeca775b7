//! Cache for announcement execution metadata.

use std::sync::Arc;

use crate::cache::KeyValueStore;
use crate::codec::ContentDigest;
use crate::gate::{requires_refresh, ExecutionMetadata};
use crate::observability::metrics;

const NAMESPACE: &str = "announcement/";

/// txHash → execution metadata.
///
/// Unlike content, an entry is only trusted once it has settled: executed, or not yet
/// due. Overdue-but-unexecuted entries are reported as stale on every lookup.
#[derive(Clone)]
pub struct ExecutionCache {
    store: Arc<dyn KeyValueStore>,
}

impl ExecutionCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn key(tx_hash: &ContentDigest) -> String {
        format!("{NAMESPACE}{tx_hash}")
    }

    /// Raw cached entry, fresh or not.
    pub fn get(&self, tx_hash: &ContentDigest) -> Option<ExecutionMetadata> {
        let raw = self.store.get(&Self::key(tx_hash))?;
        match serde_json::from_str(&raw) {
            Ok(meta) => Some(meta),
            Err(e) => {
                tracing::warn!(tx_hash = %tx_hash, error = %e, "Ignoring corrupt execution cache entry");
                None
            }
        }
    }

    /// Cached entry if it may be trusted at `now` without asking the ledger.
    pub fn fresh(&self, tx_hash: &ContentDigest, now: u64) -> Option<ExecutionMetadata> {
        let cached = self.get(tx_hash);
        let fresh = if requires_refresh(cached.as_ref(), now) {
            None
        } else {
            cached
        };
        metrics::record_cache_lookup("execution", fresh.is_some());
        fresh
    }

    /// Overwrite with authoritative metadata.
    pub fn store(&self, tx_hash: &ContentDigest, meta: &ExecutionMetadata) {
        match serde_json::to_string(meta) {
            Ok(raw) => self.store.set(&Self::key(tx_hash), raw),
            Err(e) => tracing::warn!(tx_hash = %tx_hash, error = %e, "Failed to encode execution metadata"),
        }
    }
}

impl std::fmt::Debug for ExecutionCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutionCache").finish_non_exhaustive()
    }
}
