//! Raw ledger logs and the entity views decoded from them.

use alloy::primitives::{Address, Bytes, LogData, B256};
use alloy::sol_types::SolEvent;
use serde::{Deserialize, Serialize};

use crate::blockchain::contract::IDelayedTxModule::{NewAnnouncement, UpdatedConfig};
use crate::codec::{ContentDigest, DecodeError};
use crate::events::ordinal::{EventOrdinal, Ordered};
use crate::gate::ExecutionMetadata;

/// A ledger log as delivered by the log source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLogEvent {
    pub block_number: u64,
    pub transaction_index: u64,
    pub log_index: u64,
    pub topics: Vec<B256>,
    pub data: Bytes,
}

impl RawLogEvent {
    pub fn new(ordinal: EventOrdinal, log: LogData) -> Self {
        let (topics, data) = log.split();
        Self {
            block_number: ordinal.block_number,
            transaction_index: ordinal.transaction_index,
            log_index: ordinal.log_index,
            topics,
            data,
        }
    }

    /// Decode as a typed module event.
    pub fn decode<E: SolEvent>(&self) -> Result<E, DecodeError> {
        E::decode_raw_log(self.topics.iter().copied(), &self.data)
            .map_err(|e| DecodeError::Event(format!("{}: {e}", E::SIGNATURE)))
    }
}

impl Ordered for RawLogEvent {
    fn ordinal(&self) -> EventOrdinal {
        EventOrdinal::new(self.block_number, self.transaction_index, self.log_index)
    }
}

/// Latest `UpdatedConfig` for one (safe, announcer) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RescuerConfig {
    /// Safe the announcer may rescue.
    pub executor: Address,
    pub announcer: Address,
    /// Seconds between announcement and execution. Zero means removed.
    pub delay: u64,
    pub require_executor: bool,
    pub ordinal: EventOrdinal,
}

impl RescuerConfig {
    pub fn from_log(event: &RawLogEvent) -> Result<Self, DecodeError> {
        let decoded: UpdatedConfig = event.decode()?;
        Ok(Self {
            executor: decoded.executor,
            announcer: decoded.announcer,
            delay: decoded.delay,
            require_executor: decoded.requireExecutor,
            ordinal: event.ordinal(),
        })
    }

    pub fn is_active(&self) -> bool {
        self.delay > 0
    }
}

impl Ordered for RescuerConfig {
    fn ordinal(&self) -> EventOrdinal {
        self.ordinal
    }
}

/// One announced transaction, keyed by its txHash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnouncementState {
    pub tx_hash: ContentDigest,
    pub executor: Address,
    pub announcer: Address,
    pub executed: bool,
    /// Unix seconds. Zero until execution metadata has been resolved.
    pub exec_time: u64,
    pub ordinal: EventOrdinal,
}

impl AnnouncementState {
    /// State as known from the log alone, before metadata resolution.
    pub fn from_log(event: &RawLogEvent) -> Result<Self, DecodeError> {
        let decoded: NewAnnouncement = event.decode()?;
        Ok(Self {
            tx_hash: ContentDigest(decoded.txHash),
            executor: decoded.executor,
            announcer: decoded.announcer,
            executed: false,
            exec_time: 0,
            ordinal: event.ordinal(),
        })
    }

    pub fn with_metadata(mut self, meta: ExecutionMetadata) -> Self {
        self.exec_time = meta.exec_time;
        self.executed = meta.executed;
        self
    }

    pub fn is_pending(&self) -> bool {
        !self.executed && self.exec_time > 0
    }
}

impl Ordered for AnnouncementState {
    fn ordinal(&self) -> EventOrdinal {
        self.ordinal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    #[test]
    fn test_decode_updated_config() {
        let log = UpdatedConfig {
            executor: address!("1111111111111111111111111111111111111111"),
            announcer: address!("2222222222222222222222222222222222222222"),
            delay: 60,
            requireExecutor: true,
        }
        .encode_log_data();
        let event = RawLogEvent::new(EventOrdinal::new(7, 1, 3), log);

        let config = RescuerConfig::from_log(&event).unwrap();
        assert_eq!(config.executor, address!("1111111111111111111111111111111111111111"));
        assert_eq!(config.announcer, address!("2222222222222222222222222222222222222222"));
        assert_eq!(config.delay, 60);
        assert!(config.require_executor);
        assert_eq!(config.ordinal, EventOrdinal::new(7, 1, 3));
    }

    #[test]
    fn test_decode_wrong_event_fails() {
        let log = NewAnnouncement {
            executor: Address::ZERO,
            announcer: Address::ZERO,
            txHash: B256::ZERO,
        }
        .encode_log_data();
        let event = RawLogEvent::new(EventOrdinal::default(), log);

        assert!(matches!(
            RescuerConfig::from_log(&event),
            Err(DecodeError::Event(_))
        ));
        let state = AnnouncementState::from_log(&event).unwrap();
        assert_eq!(state.exec_time, 0);
        assert!(!state.is_pending());
    }

    #[test]
    fn test_with_metadata() {
        let log = NewAnnouncement {
            executor: Address::ZERO,
            announcer: Address::ZERO,
            txHash: B256::repeat_byte(0xd0),
        }
        .encode_log_data();
        let state = AnnouncementState::from_log(&RawLogEvent::new(EventOrdinal::default(), log))
            .unwrap()
            .with_metadata(ExecutionMetadata { exec_time: 500, executed: false });

        assert!(state.is_pending());
        assert_eq!(state.tx_hash, ContentDigest(B256::repeat_byte(0xd0)));
    }
}
