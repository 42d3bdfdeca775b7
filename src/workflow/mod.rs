//! Announcement workflow.
//!
//! # Data Flow
//! ```text
//! announce:  details → codec (image) → LedgerReader (hash image, drift check)
//!                    → StoreClient (data, image, hash image) → LedgerWriter
//! pending:   LedgerReader (NewAnnouncement logs) → events (reconcile)
//!                    → ExecutionCache / LedgerReader (metadata) → gate
//! execute:   txHash → StoreClient (hash image → image → data) → gate → LedgerWriter
//! rescuers:  LedgerReader (UpdatedConfig logs) → events (reconcile) ; LedgerWriter
//! ```
//!
//! Every failure is returned as a [`WorkflowError`]; listings report failed items
//! inline and keep going.

pub mod announce;
pub mod monitor;
pub mod pending;
pub mod rescuers;
pub mod types;

pub use monitor::PendingMonitor;
pub use types::{
    Announced, ItemError, Listing, ModuleStatus, PendingAnnouncement, WorkflowError,
    WorkflowResult,
};

use alloy::primitives::{Address, U256};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::blockchain::{contract, LedgerReader, LedgerWriter, SubmissionHandle};
use crate::cache::ExecutionCache;
use crate::config::ModuleConfig;
use crate::store::StoreClient;

/// Orchestrates codec, store, reconciler and delay gate against one module.
#[derive(Clone)]
pub struct Workflow {
    module: Address,
    reader: Arc<dyn LedgerReader>,
    writer: Arc<dyn LedgerWriter>,
    store: StoreClient,
    executions: ExecutionCache,
    default_delay: u64,
    require_executor: bool,
}

impl Workflow {
    pub fn new(
        module: Address,
        reader: Arc<dyn LedgerReader>,
        writer: Arc<dyn LedgerWriter>,
        store: StoreClient,
        executions: ExecutionCache,
    ) -> Self {
        let defaults = ModuleConfig::default();
        Self {
            module,
            reader,
            writer,
            store,
            executions,
            default_delay: defaults.default_rescuer_delay_secs,
            require_executor: defaults.require_executor,
        }
    }

    /// Policy applied to rescuers added without an explicit delay.
    pub fn with_rescuer_policy(mut self, default_delay: u64, require_executor: bool) -> Self {
        self.default_delay = default_delay;
        self.require_executor = require_executor;
        self
    }

    pub fn module(&self) -> Address {
        self.module
    }

    pub fn store(&self) -> &StoreClient {
        &self.store
    }

    /// Module NAME and whether `safe` has it enabled.
    pub async fn module_status(&self, safe: Address) -> WorkflowResult<ModuleStatus> {
        let name = self.reader.module_name().await?;
        let enabled = self.reader.is_module_enabled(safe).await?;
        Ok(ModuleStatus {
            module: self.module,
            name,
            safe,
            enabled,
        })
    }

    /// Propose `enableModule(module)` on `safe`.
    pub async fn enable_module(&self, safe: Address) -> WorkflowResult<SubmissionHandle> {
        let handle = self
            .writer
            .submit_transaction(safe, U256::ZERO, contract::enable_module(self.module))
            .await?;
        tracing::info!(safe = %safe, module = %self.module, handle = %handle, "Module enable proposed");
        Ok(handle)
    }
}

impl std::fmt::Debug for Workflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workflow")
            .field("module", &self.module)
            .field("default_delay", &self.default_delay)
            .field("require_executor", &self.require_executor)
            .finish_non_exhaustive()
    }
}

/// Current unix time in seconds.
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Current unix time in milliseconds, used as announcement nonce.
pub fn unix_now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
