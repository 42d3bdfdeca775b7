//! Pending announcements of an announcer and their eligibility.

use alloy::primitives::Address;

use crate::blockchain::{LogQuery, ModuleEvent};
use crate::events;
use crate::gate::Eligibility;
use crate::observability::metrics;
use crate::workflow::types::{ItemError, Listing, PendingAnnouncement, WorkflowError, WorkflowResult};
use crate::workflow::Workflow;

impl Workflow {
    /// Unexecuted announcements made by `announcer`, with eligibility at `now`.
    ///
    /// Fails as a whole only when the logs cannot be read. Undecodable logs and
    /// announcements whose metadata cannot be resolved are reported in
    /// [`Listing::failures`].
    pub async fn list_pending(&self, announcer: Address, now: u64) -> WorkflowResult<Listing<PendingAnnouncement>> {
        let logs = self
            .reader
            .log_events(&LogQuery::for_announcer(ModuleEvent::NewAnnouncement, announcer))
            .await?;
        let reconciled = events::reconcile_announcements(&logs);

        let mut listing = Listing::default();
        for (ordinal, e) in reconciled.rejected {
            listing.failures.push(ItemError {
                subject: format!("log {ordinal}"),
                error: WorkflowError::Decode(e),
            });
        }

        for (tx_hash, state) in reconciled.latest {
            match self.execution_metadata(&tx_hash, now).await {
                Ok(meta) => {
                    let state = state.with_metadata(meta);
                    if !state.is_pending() {
                        continue;
                    }
                    let eligibility = Eligibility::evaluate(&state, now);
                    listing.items.push(PendingAnnouncement { state, eligibility });
                }
                Err(e) => {
                    tracing::warn!(tx_hash = %tx_hash, error = %e, "Could not resolve announcement");
                    listing.failures.push(ItemError {
                        subject: tx_hash.to_string(),
                        error: e,
                    });
                }
            }
        }

        let eligible = listing.items.iter().filter(|p| p.eligibility.is_eligible()).count();
        metrics::record_pending(listing.items.len(), eligible);
        tracing::debug!(
            announcer = %announcer,
            pending = listing.items.len(),
            eligible,
            failures = listing.failures.len(),
            "Listed pending announcements"
        );
        Ok(listing)
    }
}
