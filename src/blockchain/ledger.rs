//! Boundaries to the ledger: what the workflow reads and what it publishes.

use alloy::primitives::{Address, Bytes, B256, U256};
use alloy::sol_types::SolEvent;
use async_trait::async_trait;
use serde::Serialize;

use crate::blockchain::contract::IDelayedTxModule::{NewAnnouncement, UpdatedConfig};
use crate::blockchain::types::BlockchainResult;
use crate::codec::{AnnouncementDetails, ContentDigest};
use crate::events::RawLogEvent;
use crate::gate::ExecutionMetadata;

/// Module events the workflow consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModuleEvent {
    UpdatedConfig,
    NewAnnouncement,
}

impl ModuleEvent {
    /// topic0 of the event.
    pub fn signature_hash(self) -> B256 {
        match self {
            Self::UpdatedConfig => UpdatedConfig::SIGNATURE_HASH,
            Self::NewAnnouncement => NewAnnouncement::SIGNATURE_HASH,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::UpdatedConfig => "UpdatedConfig",
            Self::NewAnnouncement => "NewAnnouncement",
        }
    }
}

/// Log filter: one event, optionally narrowed on its indexed addresses.
///
/// Both module events index `executor` as topic1 and `announcer` as topic2.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogQuery {
    pub event: ModuleEvent,
    pub executor: Option<Address>,
    pub announcer: Option<Address>,
}

impl LogQuery {
    pub fn for_executor(event: ModuleEvent, executor: Address) -> Self {
        Self {
            event,
            executor: Some(executor),
            announcer: None,
        }
    }

    pub fn for_announcer(event: ModuleEvent, announcer: Address) -> Self {
        Self {
            event,
            executor: None,
            announcer: Some(announcer),
        }
    }

    /// Whether `log` satisfies this query. Used by log sources that cannot filter server-side.
    pub fn matches(&self, log: &RawLogEvent) -> bool {
        let topic_matches = |idx: usize, want: Option<Address>| match want {
            None => true,
            Some(addr) => log.topics.get(idx) == Some(&addr.into_word()),
        };
        log.topics.first() == Some(&self.event.signature_hash())
            && topic_matches(1, self.executor)
            && topic_matches(2, self.announcer)
    }
}

/// Read side of the ledger.
#[async_trait]
pub trait LedgerReader: Send + Sync {
    /// All logs matching `query`, in any order.
    async fn log_events(&self, query: &LogQuery) -> BlockchainResult<Vec<RawLogEvent>>;

    /// Authoritative `{execTime, executed}` for an announcement.
    async fn announcement_metadata(&self, tx_hash: &ContentDigest) -> BlockchainResult<ExecutionMetadata>;

    /// The hash image the module computes for `details`.
    async fn transaction_hash_data(&self, details: &AnnouncementDetails) -> BlockchainResult<Bytes>;

    /// The module's self-reported name.
    async fn module_name(&self) -> BlockchainResult<String>;

    /// Whether the module is enabled on `safe`.
    async fn is_module_enabled(&self, safe: Address) -> BlockchainResult<bool>;
}

/// Opaque reference to a published transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SubmissionHandle(pub String);

impl std::fmt::Display for SubmissionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Write side of the ledger. Fire-and-observe: no confirmation is awaited.
#[async_trait]
pub trait LedgerWriter: Send + Sync {
    async fn submit_transaction(&self, to: Address, value: U256, data: Bytes) -> BlockchainResult<SubmissionHandle>;
}
