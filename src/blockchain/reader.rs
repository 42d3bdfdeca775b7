//! `LedgerReader` backed by JSON-RPC.

use alloy::primitives::{Address, Bytes};
use alloy::rpc::types::{Filter, Log};
use alloy::sol_types::SolCall;
use async_trait::async_trait;

use crate::blockchain::client::BlockchainClient;
use crate::blockchain::contract::{self, IDelayedTxModule, ISafe};
use crate::blockchain::ledger::{LedgerReader, LogQuery};
use crate::blockchain::types::{BlockchainError, BlockchainResult};
use crate::codec::{AnnouncementDetails, ContentDigest};
use crate::events::{EventOrdinal, RawLogEvent};
use crate::gate::ExecutionMetadata;

/// Reads module state and logs through a [`BlockchainClient`].
#[derive(Debug, Clone)]
pub struct ModuleReader {
    client: BlockchainClient,
    module: Address,
    from_block: u64,
}

impl ModuleReader {
    pub fn new(client: BlockchainClient, module: Address) -> Self {
        let from_block = client.config().from_block;
        Self {
            client,
            module,
            from_block,
        }
    }

    pub fn module(&self) -> Address {
        self.module
    }

    fn filter(&self, query: &LogQuery) -> Filter {
        let mut filter = Filter::new()
            .address(self.module)
            .event_signature(query.event.signature_hash())
            .from_block(self.from_block);
        if let Some(executor) = query.executor {
            filter = filter.topic1(executor.into_word());
        }
        if let Some(announcer) = query.announcer {
            filter = filter.topic2(announcer.into_word());
        }
        filter
    }
}

/// Convert an RPC log, dropping pending logs that have no position yet.
fn to_raw_event(log: Log) -> Option<RawLogEvent> {
    let ordinal = EventOrdinal::new(log.block_number?, log.transaction_index?, log.log_index?);
    Some(RawLogEvent::new(ordinal, log.inner.data))
}

fn invalid_return(call: &str, e: impl std::fmt::Display) -> BlockchainError {
    BlockchainError::InvalidReturn(format!("{call}: {e}"))
}

#[async_trait]
impl LedgerReader for ModuleReader {
    async fn log_events(&self, query: &LogQuery) -> BlockchainResult<Vec<RawLogEvent>> {
        let logs = self.client.get_logs(&self.filter(query)).await?;
        let total = logs.len();
        let events: Vec<RawLogEvent> = logs.into_iter().filter_map(to_raw_event).collect();
        if events.len() < total {
            tracing::debug!(
                event = query.event.name(),
                skipped = total - events.len(),
                "Ignoring logs without a block position"
            );
        }
        tracing::debug!(event = query.event.name(), count = events.len(), "Fetched module logs");
        Ok(events)
    }

    async fn announcement_metadata(&self, tx_hash: &ContentDigest) -> BlockchainResult<ExecutionMetadata> {
        let input = IDelayedTxModule::announcementsCall { txHash: tx_hash.0 }.abi_encode();
        let output = self.client.call(self.module, input.into()).await?;
        let ret = IDelayedTxModule::announcementsCall::abi_decode_returns(&output)
            .map_err(|e| invalid_return("announcements", e))?;
        Ok(ExecutionMetadata {
            exec_time: ret.execTime,
            executed: ret.executed,
        })
    }

    async fn transaction_hash_data(&self, details: &AnnouncementDetails) -> BlockchainResult<Bytes> {
        let input = contract::generate_transaction_hash_data(details);
        let output = self.client.call(self.module, input).await?;
        IDelayedTxModule::generateTransactionHashDataCall::abi_decode_returns(&output)
            .map_err(|e| invalid_return("generateTransactionHashData", e))
    }

    async fn module_name(&self) -> BlockchainResult<String> {
        let input = IDelayedTxModule::NAMECall {}.abi_encode();
        let output = self.client.call(self.module, input.into()).await?;
        IDelayedTxModule::NAMECall::abi_decode_returns(&output).map_err(|e| invalid_return("NAME", e))
    }

    async fn is_module_enabled(&self, safe: Address) -> BlockchainResult<bool> {
        let input = ISafe::isModuleEnabledCall { module: self.module }.abi_encode();
        let output = self.client.call(safe, input.into()).await?;
        ISafe::isModuleEnabledCall::abi_decode_returns(&output)
            .map_err(|e| invalid_return("isModuleEnabled", e))
    }
}
