//! Polls pending announcements and reports those whose delay has elapsed.

use alloy::primitives::Address;
use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

use crate::cache::FileStore;
use crate::codec::ContentDigest;
use crate::config::MonitorConfig;
use crate::resilience::Backoff;
use crate::workflow::types::{PendingAnnouncement, WorkflowResult};
use crate::workflow::{unix_now, Workflow};

/// Service re-listing an announcer's pending announcements on an interval.
pub struct PendingMonitor {
    workflow: Workflow,
    announcer: Address,
    config: MonitorConfig,
    checkpoint: Option<Arc<FileStore>>,
    reported: HashSet<ContentDigest>,
}

impl PendingMonitor {
    pub fn new(workflow: Workflow, announcer: Address, config: MonitorConfig) -> Self {
        Self {
            workflow,
            announcer,
            config,
            checkpoint: None,
            reported: HashSet::new(),
        }
    }

    /// Save this cache file after every poll.
    pub fn with_checkpoint(mut self, store: Arc<FileStore>) -> Self {
        self.checkpoint = Some(store);
        self
    }

    /// Run until `shutdown` resolves.
    pub async fn run<F>(mut self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let interval = Duration::from_secs(self.config.poll_interval_secs);
        let mut backoff = Backoff::from_config(&self.config);

        tracing::info!(
            announcer = %self.announcer,
            module = %self.workflow.module(),
            interval_secs = self.config.poll_interval_secs,
            "Starting pending announcement monitor"
        );

        loop {
            let wait = match self.poll(unix_now()).await {
                Ok(_) => {
                    backoff.reset();
                    interval
                }
                Err(e) => {
                    let delay = backoff.fail();
                    tracing::error!(
                        error = %e,
                        failures = backoff.failures(),
                        retry_in_ms = delay.as_millis() as u64,
                        "Error polling pending announcements"
                    );
                    delay
                }
            };
            self.save_checkpoint();

            tokio::select! {
                _ = &mut shutdown => break,
                _ = sleep(wait) => {}
            }
        }

        tracing::info!("Pending announcement monitor stopped");
    }

    /// Number of announcements already reported and still pending.
    pub fn tracked(&self) -> usize {
        self.reported.len()
    }

    /// One listing pass. Returns the announcements that became eligible since the last pass.
    pub async fn poll(&mut self, now: u64) -> WorkflowResult<Vec<PendingAnnouncement>> {
        let listing = self.workflow.list_pending(self.announcer, now).await?;

        for failure in &listing.failures {
            tracing::warn!(item = %failure.subject, error = %failure.error, "Pending item unavailable");
        }

        // Executed or vanished announcements are forgotten. Unresolved ones keep
        // their entry so a transient failure does not report them twice.
        let listed: HashSet<ContentDigest> = listing
            .items
            .iter()
            .map(|item| item.state.tx_hash)
            .chain(listing.failures.iter().filter_map(|f| f.subject.parse().ok()))
            .collect();
        self.reported.retain(|tx_hash| listed.contains(tx_hash));

        let mut newly_eligible = Vec::new();
        for item in listing.items {
            if item.eligibility.is_eligible() && self.reported.insert(item.state.tx_hash) {
                tracing::info!(
                    tx_hash = %item.state.tx_hash,
                    executor = %item.state.executor,
                    exec_time = item.state.exec_time,
                    "Announcement is ready to execute"
                );
                newly_eligible.push(item);
            }
        }
        Ok(newly_eligible)
    }

    fn save_checkpoint(&self) {
        if let Some(store) = &self.checkpoint {
            if let Err(e) = store.save_to_file() {
                tracing::warn!(path = %store.path().display(), error = %e, "Failed to save cache");
            }
        }
    }
}
