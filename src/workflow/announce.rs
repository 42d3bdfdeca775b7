//! Announce, resolve and execute delayed transactions.

use alloy::primitives::{Address, U256};

use crate::blockchain::{contract, SubmissionHandle};
use crate::codec::{AnnouncementDetails, ContentDigest, HashImage, Operation, TransactionImage};
use crate::gate::{Eligibility, ExecutionMetadata};
use crate::workflow::types::{Announced, WorkflowError, WorkflowResult};
use crate::workflow::Workflow;

impl Workflow {
    /// Publish `details` to the store and propose `announceTransaction(details)`.
    ///
    /// The store receives the call data, the transaction image and the module's hash
    /// image, so that the announcement can later be resolved from its txHash alone.
    /// Nothing is proposed if the module would commit to a different image than the
    /// one encoded here.
    pub async fn announce(&self, details: &AnnouncementDetails) -> WorkflowResult<Announced> {
        let image = TransactionImage::from_details(details);
        let image_bytes = image.encode();
        let image_digest = image.digest();

        let hash_data = self.reader.transaction_hash_data(details).await?;
        let hash_image = HashImage::decode(&hash_data)?;
        if hash_image.image_digest != image_digest {
            return Err(WorkflowError::Integrity(format!(
                "module commits to image {} but local image is {}",
                hash_image.image_digest, image_digest
            )));
        }

        let data_digest = self.store.push(&details.data).await?;
        self.store.push(&image_bytes).await?;
        let tx_hash = self.store.push(&hash_data).await?;

        let handle = self
            .writer
            .submit_transaction(self.module, U256::ZERO, contract::announce_transaction(details))
            .await?;

        tracing::info!(
            tx_hash = %tx_hash,
            executor = %details.executor,
            nonce = %details.nonce,
            handle = %handle,
            "Announcement proposed"
        );

        Ok(Announced {
            tx_hash,
            image_digest,
            data_digest,
            handle,
        })
    }

    /// Announce `addOwnerWithThreshold(new_owner, 1)` on `target`, nonce `now_ms`.
    pub async fn announce_owner_recovery(
        &self,
        target: Address,
        new_owner: Address,
        now_ms: u64,
    ) -> WorkflowResult<Announced> {
        let details = AnnouncementDetails {
            executor: target,
            to: target,
            value: U256::ZERO,
            data: contract::add_owner_with_threshold(new_owner, 1),
            operation: Operation::Call,
            nonce: U256::from(now_ms),
        };
        self.announce(&details).await
    }

    /// Resolve the announced details behind `tx_hash` from the store.
    pub async fn details(&self, tx_hash: &ContentDigest) -> WorkflowResult<AnnouncementDetails> {
        let hash_data = self.store.pull(tx_hash).await?;
        let hash_image = HashImage::decode(&hash_data)?;

        let image_bytes = self.store.pull(&hash_image.image_digest).await?;
        let image = TransactionImage::decode(&image_bytes)?;

        let data = self.store.pull(&image.data_digest).await?;
        let details = image.with_data(data)?;

        tracing::debug!(tx_hash = %tx_hash, executor = %details.executor, "Resolved announcement");
        Ok(details)
    }

    /// Execution metadata for `tx_hash`, from cache when settled, else from the ledger.
    pub async fn execution_metadata(&self, tx_hash: &ContentDigest, now: u64) -> WorkflowResult<ExecutionMetadata> {
        if let Some(meta) = self.executions.fresh(tx_hash, now) {
            return Ok(meta);
        }
        let meta = self.reader.announcement_metadata(tx_hash).await?;
        self.executions.store(tx_hash, &meta);
        tracing::debug!(
            tx_hash = %tx_hash,
            exec_time = meta.exec_time,
            executed = meta.executed,
            "Refreshed execution metadata"
        );
        Ok(meta)
    }

    /// Propose `executeTransaction` for `tx_hash` once its delay has elapsed.
    pub async fn execute(&self, tx_hash: &ContentDigest, now: u64) -> WorkflowResult<SubmissionHandle> {
        let meta = self.execution_metadata(tx_hash, now).await?;
        let eligibility = Eligibility::from_metadata(&meta, now);
        if !eligibility.is_eligible() {
            return Err(WorkflowError::NotEligible {
                tx_hash: *tx_hash,
                eligibility,
            });
        }

        let details = self.details(tx_hash).await?;
        let handle = self
            .writer
            .submit_transaction(self.module, U256::ZERO, contract::execute_transaction(&details))
            .await?;

        tracing::info!(tx_hash = %tx_hash, executor = %details.executor, handle = %handle, "Execution proposed");
        Ok(handle)
    }
}
