//! Shared in-memory collaborators for integration tests.
#![allow(dead_code)]

use alloy::primitives::{address, Address, Bytes, B256, U256};
use alloy::sol_types::SolEvent;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use delayed_tx::blockchain::contract::IDelayedTxModule::{NewAnnouncement, UpdatedConfig};
use delayed_tx::blockchain::{
    BlockchainError, BlockchainResult, LedgerReader, LedgerWriter, LogQuery, SubmissionHandle,
};
use delayed_tx::cache::{ContentCache, ExecutionCache, KeyValueStore, MemoryStore};
use delayed_tx::codec::{AnnouncementDetails, ContentDigest, HashImage, TransactionImage};
use delayed_tx::events::{EventOrdinal, RawLogEvent};
use delayed_tx::gate::ExecutionMetadata;
use delayed_tx::store::{BlobTransport, ContentId, StoreClient, StoreError, StoreResult};
use delayed_tx::workflow::Workflow;

pub const MODULE: Address = address!("0000000000000000000000000000000000000d17");
pub const SAFE: Address = address!("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa");
pub const RESCUER: Address = address!("bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb");
pub const OTHER_RESCUER: Address = address!("cccccccccccccccccccccccccccccccccccccccc");

/// Content store kept in memory, counting network reads.
#[derive(Default)]
pub struct MemoryTransport {
    pub blocks: DashMap<ContentId, Bytes>,
    pub gets: AtomicUsize,
    pub puts: AtomicUsize,
    pub offline: AtomicBool,
}

impl MemoryTransport {
    pub fn gets(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    pub fn go_offline(&self) {
        self.offline.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl BlobTransport for MemoryTransport {
    async fn put(&self, bytes: Bytes) -> StoreResult<ContentId> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Network("connection refused".into()));
        }
        self.puts.fetch_add(1, Ordering::SeqCst);
        let cid = ContentId::from(ContentDigest::of(&bytes));
        self.blocks.insert(cid, bytes);
        Ok(cid)
    }

    async fn get(&self, cid: &ContentId) -> StoreResult<Bytes> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Network("connection refused".into()));
        }
        self.blocks
            .get(cid)
            .map(|r| r.value().clone())
            .ok_or(StoreError::NotFound(cid.digest()))
    }
}

/// Ledger whose logs and announcement metadata are set by the test.
pub struct ScriptedLedger {
    pub domain_separator: B256,
    pub logs: Mutex<Vec<RawLogEvent>>,
    pub metadata: DashMap<ContentDigest, ExecutionMetadata>,
    pub failing_metadata: DashMap<ContentDigest, ()>,
    pub metadata_calls: AtomicUsize,
    pub log_calls: AtomicUsize,
    pub enabled_on: DashMap<Address, ()>,
    /// Report a hash image for a different transaction image.
    pub drift: AtomicBool,
    pub logs_down: AtomicBool,
}

impl Default for ScriptedLedger {
    fn default() -> Self {
        Self {
            domain_separator: B256::repeat_byte(0x5e),
            logs: Mutex::new(Vec::new()),
            metadata: DashMap::new(),
            failing_metadata: DashMap::new(),
            metadata_calls: AtomicUsize::new(0),
            log_calls: AtomicUsize::new(0),
            enabled_on: DashMap::new(),
            drift: AtomicBool::new(false),
            logs_down: AtomicBool::new(false),
        }
    }
}

impl ScriptedLedger {
    pub fn push_log(&self, log: RawLogEvent) {
        self.logs.lock().unwrap().push(log);
    }

    pub fn set_metadata(&self, tx_hash: ContentDigest, exec_time: u64, executed: bool) {
        self.metadata.insert(tx_hash, ExecutionMetadata { exec_time, executed });
    }

    pub fn metadata_calls(&self) -> usize {
        self.metadata_calls.load(Ordering::SeqCst)
    }

    pub fn log_calls(&self) -> usize {
        self.log_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LedgerReader for ScriptedLedger {
    async fn log_events(&self, query: &LogQuery) -> BlockchainResult<Vec<RawLogEvent>> {
        self.log_calls.fetch_add(1, Ordering::SeqCst);
        if self.logs_down.load(Ordering::SeqCst) {
            return Err(BlockchainError::Rpc("All providers failed to get logs".into()));
        }
        Ok(self
            .logs
            .lock()
            .unwrap()
            .iter()
            .filter(|log| query.matches(log))
            .cloned()
            .collect())
    }

    async fn announcement_metadata(&self, tx_hash: &ContentDigest) -> BlockchainResult<ExecutionMetadata> {
        self.metadata_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_metadata.contains_key(tx_hash) {
            return Err(BlockchainError::Rpc("timeout".into()));
        }
        Ok(self.metadata.get(tx_hash).map(|m| *m.value()).unwrap_or_default())
    }

    async fn transaction_hash_data(&self, details: &AnnouncementDetails) -> BlockchainResult<Bytes> {
        let mut digest = TransactionImage::from_details(details).digest();
        if self.drift.load(Ordering::SeqCst) {
            digest = ContentDigest::of(digest.as_bytes());
        }
        Ok(Bytes::copy_from_slice(&HashImage::new(self.domain_separator, digest).encode()))
    }

    async fn module_name(&self) -> BlockchainResult<String> {
        Ok("Delayed Transaction Module".to_string())
    }

    async fn is_module_enabled(&self, safe: Address) -> BlockchainResult<bool> {
        Ok(self.enabled_on.contains_key(&safe))
    }
}

/// Writer remembering every proposed transaction.
#[derive(Default)]
pub struct RecordingWriter {
    pub submitted: Mutex<Vec<(Address, U256, Bytes)>>,
}

impl RecordingWriter {
    pub fn submitted(&self) -> Vec<(Address, U256, Bytes)> {
        self.submitted.lock().unwrap().clone()
    }
}

#[async_trait]
impl LedgerWriter for RecordingWriter {
    async fn submit_transaction(&self, to: Address, value: U256, data: Bytes) -> BlockchainResult<SubmissionHandle> {
        let mut submitted = self.submitted.lock().unwrap();
        submitted.push((to, value, data));
        Ok(SubmissionHandle(format!("tx-{}", submitted.len())))
    }
}

pub struct Harness {
    pub workflow: Workflow,
    pub transport: Arc<MemoryTransport>,
    pub ledger: Arc<ScriptedLedger>,
    pub writer: Arc<RecordingWriter>,
    pub kv: Arc<dyn KeyValueStore>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_store(Arc::new(MemoryStore::new()))
    }

    pub fn with_store(kv: Arc<dyn KeyValueStore>) -> Self {
        let transport = Arc::new(MemoryTransport::default());
        let ledger = Arc::new(ScriptedLedger::default());
        let writer = Arc::new(RecordingWriter::default());
        let store = StoreClient::new(transport.clone(), ContentCache::new(kv.clone()));
        let workflow = Workflow::new(
            MODULE,
            ledger.clone(),
            writer.clone(),
            store,
            ExecutionCache::new(kv.clone()),
        );
        Self {
            workflow,
            transport,
            ledger,
            writer,
            kv,
        }
    }

    pub fn with_policy(mut self, default_delay: u64, require_executor: bool) -> Self {
        self.workflow = self.workflow.with_rescuer_policy(default_delay, require_executor);
        self
    }
}

pub fn announcement_log(
    executor: Address,
    announcer: Address,
    tx_hash: ContentDigest,
    ordinal: (u64, u64, u64),
) -> RawLogEvent {
    let event = NewAnnouncement {
        executor,
        announcer,
        txHash: tx_hash.0,
    };
    RawLogEvent::new(EventOrdinal::new(ordinal.0, ordinal.1, ordinal.2), event.encode_log_data())
}

pub fn config_log(executor: Address, announcer: Address, delay: u64, ordinal: (u64, u64, u64)) -> RawLogEvent {
    let event = UpdatedConfig {
        executor,
        announcer,
        delay,
        requireExecutor: true,
    };
    RawLogEvent::new(EventOrdinal::new(ordinal.0, ordinal.1, ordinal.2), event.encode_log_data())
}

/// A log carrying the NewAnnouncement topics but a truncated body.
pub fn truncated_announcement_log(announcer: Address, ordinal: (u64, u64, u64)) -> RawLogEvent {
    let mut log = announcement_log(SAFE, announcer, ContentDigest::of(b"x"), ordinal);
    log.data = Bytes::from_static(&[0u8; 7]);
    log
}
