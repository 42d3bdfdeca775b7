//! Rescuer configuration: listing and updates.

use alloy::primitives::{Address, U256};

use crate::blockchain::{contract, LogQuery, ModuleEvent, SubmissionHandle};
use crate::events::{self, Reconciled, RescuerConfig};
use crate::workflow::types::{ItemError, Listing, WorkflowError, WorkflowResult};
use crate::workflow::Workflow;

fn into_listing<K>(reconciled: Reconciled<K, RescuerConfig>) -> Listing<RescuerConfig> {
    let items = events::live_rescuers(&reconciled.latest);
    let failures = reconciled
        .rejected
        .into_iter()
        .map(|(ordinal, e)| ItemError {
            subject: format!("log {ordinal}"),
            error: WorkflowError::Decode(e),
        })
        .collect();
    Listing { items, failures }
}

impl Workflow {
    /// Announcers currently allowed to rescue `safe`.
    pub async fn list_rescuers(&self, safe: Address) -> WorkflowResult<Listing<RescuerConfig>> {
        let logs = self
            .reader
            .log_events(&LogQuery::for_executor(ModuleEvent::UpdatedConfig, safe))
            .await?;
        let listing = into_listing(events::reconcile_rescuers(&logs));
        tracing::debug!(safe = %safe, live = listing.items.len(), "Listed rescuers");
        Ok(listing)
    }

    /// Safes that `announcer` is currently allowed to rescue.
    pub async fn list_rescue_targets(&self, announcer: Address) -> WorkflowResult<Listing<RescuerConfig>> {
        let logs = self
            .reader
            .log_events(&LogQuery::for_announcer(ModuleEvent::UpdatedConfig, announcer))
            .await?;
        let listing = into_listing(events::reconcile_rescue_targets(&logs));
        tracing::debug!(announcer = %announcer, live = listing.items.len(), "Listed rescue targets");
        Ok(listing)
    }

    /// Propose `updateConfig(announcer, delay, requireExecutor)`.
    ///
    /// `None` uses the configured default delay. A zero delay would remove the
    /// rescuer and is rejected; use [`Workflow::remove_rescuer`].
    pub async fn add_rescuer(&self, announcer: Address, delay: Option<u64>) -> WorkflowResult<SubmissionHandle> {
        let delay = delay.unwrap_or(self.default_delay);
        if delay == 0 {
            return Err(WorkflowError::InvalidInput(
                "rescuer delay must be greater than zero".to_string(),
            ));
        }

        let data = contract::update_config(announcer, delay, self.require_executor);
        let handle = self.writer.submit_transaction(self.module, U256::ZERO, data).await?;
        tracing::info!(announcer = %announcer, delay, handle = %handle, "Rescuer addition proposed");
        Ok(handle)
    }

    /// Propose `updateConfig(announcer, 0, false)`.
    pub async fn remove_rescuer(&self, announcer: Address) -> WorkflowResult<SubmissionHandle> {
        let data = contract::update_config(announcer, 0, false);
        let handle = self.writer.submit_transaction(self.module, U256::ZERO, data).await?;
        tracing::info!(announcer = %announcer, handle = %handle, "Rescuer removal proposed");
        Ok(handle)
    }
}
