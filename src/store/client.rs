//! Read-through / write-through store client.

use alloy::primitives::Bytes;
use std::sync::Arc;

use crate::cache::ContentCache;
use crate::codec::ContentDigest;
use crate::observability::metrics;
use crate::store::cid::ContentId;
use crate::store::transport::BlobTransport;
use crate::store::{StoreError, StoreResult};

/// Content store client with a local, never-invalidated cache.
#[derive(Clone)]
pub struct StoreClient {
    transport: Arc<dyn BlobTransport>,
    cache: ContentCache,
}

impl StoreClient {
    pub fn new(transport: Arc<dyn BlobTransport>, cache: ContentCache) -> Self {
        Self { transport, cache }
    }

    /// Publish `bytes` and return their digest.
    ///
    /// Idempotent: identical bytes always yield the same digest.
    pub async fn push(&self, bytes: &[u8]) -> StoreResult<ContentDigest> {
        let digest = ContentDigest::of(bytes);
        let expected = ContentId::from(digest);

        let stored = match self.transport.put(Bytes::copy_from_slice(bytes)).await {
            Ok(cid) => cid,
            Err(e) => {
                metrics::record_store_request("push", "error");
                tracing::warn!(digest = %digest, error = %e, "Store push failed");
                return Err(e);
            }
        };

        if stored != expected {
            metrics::record_store_request("push", "mismatch");
            return Err(StoreError::UnexpectedCid {
                expected,
                returned: stored,
            });
        }

        metrics::record_store_request("push", "ok");
        self.cache.insert(&digest, bytes);
        tracing::debug!(digest = %digest, cid = %stored, size = bytes.len(), "Pushed blob");
        Ok(digest)
    }

    /// Fetch the bytes stored under `digest`, from cache when possible.
    pub async fn pull(&self, digest: &ContentDigest) -> StoreResult<Bytes> {
        if let Some(bytes) = self.cache.get(digest) {
            tracing::trace!(digest = %digest, "Content cache hit");
            return Ok(bytes);
        }

        let bytes = match self.transport.get(&ContentId::from(*digest)).await {
            Ok(bytes) => bytes,
            Err(e) => {
                let outcome = match e {
                    StoreError::NotFound(_) => "not_found",
                    _ => "error",
                };
                metrics::record_store_request("pull", outcome);
                return Err(e);
            }
        };

        if !digest.matches(&bytes) {
            metrics::record_store_request("pull", "not_found");
            tracing::warn!(digest = %digest, size = bytes.len(), "Store returned bytes for a different digest");
            return Err(StoreError::NotFound(*digest));
        }

        metrics::record_store_request("pull", "ok");
        self.cache.insert(digest, &bytes);
        tracing::debug!(digest = %digest, size = bytes.len(), "Pulled blob");
        Ok(bytes)
    }

    pub fn cache(&self) -> &ContentCache {
        &self.cache
    }
}

impl std::fmt::Debug for StoreClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreClient")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryStore;
    use async_trait::async_trait;
    use dashmap::DashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingTransport {
        blocks: DashMap<ContentId, Bytes>,
        gets: AtomicUsize,
        puts: AtomicUsize,
        corrupt: bool,
    }

    #[async_trait]
    impl BlobTransport for CountingTransport {
        async fn put(&self, bytes: Bytes) -> StoreResult<ContentId> {
            self.puts.fetch_add(1, Ordering::SeqCst);
            let cid = ContentId::from(ContentDigest::of(&bytes));
            self.blocks.insert(cid, bytes);
            Ok(cid)
        }

        async fn get(&self, cid: &ContentId) -> StoreResult<Bytes> {
            self.gets.fetch_add(1, Ordering::SeqCst);
            if self.corrupt {
                return Ok(Bytes::from_static(b"garbage"));
            }
            self.blocks
                .get(cid)
                .map(|r| r.value().clone())
                .ok_or(StoreError::NotFound(cid.digest()))
        }
    }

    fn client(transport: Arc<CountingTransport>) -> StoreClient {
        StoreClient::new(transport, ContentCache::new(Arc::new(MemoryStore::new())))
    }

    #[tokio::test]
    async fn test_pull_reads_through_cache() {
        let transport = Arc::new(CountingTransport::default());
        let digest = ContentDigest::of(b"payload");
        transport
            .blocks
            .insert(ContentId::from(digest), Bytes::from_static(b"payload"));
        let store = client(transport.clone());

        assert_eq!(store.pull(&digest).await.unwrap().as_ref(), b"payload");
        assert_eq!(store.pull(&digest).await.unwrap().as_ref(), b"payload");
        assert_eq!(transport.gets.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_push_is_idempotent_and_writes_through() {
        let transport = Arc::new(CountingTransport::default());
        let store = client(transport.clone());

        let first = store.push(b"payload").await.unwrap();
        let second = store.push(b"payload").await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first, ContentDigest::of(b"payload"));

        store.pull(&first).await.unwrap();
        assert_eq!(transport.gets.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_and_mismatched_content_is_not_found() {
        let transport = Arc::new(CountingTransport::default());
        let store = client(transport);
        let digest = ContentDigest::of(b"absent");
        assert_eq!(store.pull(&digest).await, Err(StoreError::NotFound(digest)));

        let corrupt = Arc::new(CountingTransport {
            corrupt: true,
            ..Default::default()
        });
        let store = client(corrupt.clone());
        assert_eq!(store.pull(&digest).await, Err(StoreError::NotFound(digest)));
        // not cached, so a retry goes back to the network
        assert!(store.pull(&digest).await.is_err());
        assert_eq!(corrupt.gets.load(Ordering::SeqCst), 2);
    }
}
