//! Off-chain companion for a Safe delayed-transaction module.

pub mod blockchain;
pub mod cache;
pub mod codec;
pub mod config;
pub mod events;
pub mod gate;
pub mod observability;
pub mod resilience;
pub mod store;
pub mod workflow;

pub use config::schema::RelayConfig;
pub use workflow::{Workflow, WorkflowError};
