//! Ledger integration subsystem.
//!
//! # Data Flow
//! ```text
//! RPC URLs (config)
//!     → client.rs (alloy providers with failover and timeouts)
//!     → reader.rs (module logs, announcement metadata, hash data) ── LedgerReader
//!
//! prepared calls (workflow)
//!     → proposal.rs (JSON lines for the wallet to sign)            ── LedgerWriter
//! ```
//!
//! # Security Constraints
//! - No key material is handled here; transactions are proposed, never signed
//! - All RPC calls have configurable timeouts
//! - Fire-and-observe: submissions are not polled for confirmation

pub mod client;
pub mod contract;
pub mod ledger;
pub mod proposal;
pub mod reader;
pub mod types;

pub use client::BlockchainClient;
pub use ledger::{LedgerReader, LedgerWriter, LogQuery, ModuleEvent, SubmissionHandle};
pub use proposal::ProposalWriter;
pub use reader::ModuleReader;
pub use types::{BlockchainError, BlockchainResult, ChainId};
