//! Position of a log within the ledger.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// `(blockNumber, transactionIndex, logIndex)`. A tie-break key, not a timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct EventOrdinal {
    pub block_number: u64,
    pub transaction_index: u64,
    pub log_index: u64,
}

impl EventOrdinal {
    pub const fn new(block_number: u64, transaction_index: u64, log_index: u64) -> Self {
        Self {
            block_number,
            transaction_index,
            log_index,
        }
    }
}

impl Ord for EventOrdinal {
    fn cmp(&self, other: &Self) -> Ordering {
        self.block_number
            .cmp(&other.block_number)
            .then(self.transaction_index.cmp(&other.transaction_index))
            .then(self.log_index.cmp(&other.log_index))
    }
}

impl PartialOrd for EventOrdinal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for EventOrdinal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.block_number, self.transaction_index, self.log_index
        )
    }
}

/// Anything positioned by a ledger event.
pub trait Ordered {
    fn ordinal(&self) -> EventOrdinal;
}
