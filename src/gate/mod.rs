//! Delay gate.
//!
//! # Responsibilities
//! - Decide whether an announced transaction may be executed now
//! - Decide whether cached execution metadata must be re-read from the ledger
//!
//! # State Transitions
//! ```text
//! not fetched ──fetch──▶ pending (execTime > now)  ── trusted until due
//!                        pending (execTime <= now) ── re-fetched on every access
//!                        executed                  ── trusted forever
//! ```

use serde::{Deserialize, Serialize};

use crate::events::AnnouncementState;

/// Authoritative execution metadata read from the module's `announcements` mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionMetadata {
    /// Unix seconds after which the transaction may execute. Zero if unknown.
    pub exec_time: u64,
    pub executed: bool,
}

/// Where an announcement stands relative to its delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "exec_time")]
pub enum Eligibility {
    /// Delay has elapsed and the transaction has not run.
    Eligible,
    /// Delay still running.
    WaitUntil(u64),
    /// Already executed.
    Executed,
    /// Execution metadata not resolved yet.
    Unresolved,
}

impl Eligibility {
    pub fn evaluate(state: &AnnouncementState, now: u64) -> Self {
        let meta = ExecutionMetadata {
            exec_time: state.exec_time,
            executed: state.executed,
        };
        Self::from_metadata(&meta, now)
    }

    pub fn from_metadata(meta: &ExecutionMetadata, now: u64) -> Self {
        if meta.executed {
            Self::Executed
        } else if meta.exec_time == 0 {
            Self::Unresolved
        } else if meta.exec_time <= now {
            Self::Eligible
        } else {
            Self::WaitUntil(meta.exec_time)
        }
    }

    pub fn is_eligible(&self) -> bool {
        matches!(self, Self::Eligible)
    }
}

/// Whether `state` may be executed at `now`.
pub fn is_eligible(state: &AnnouncementState, now: u64) -> bool {
    !state.executed && state.exec_time > 0 && state.exec_time <= now
}

/// Whether cached metadata must be re-read from the ledger before use.
///
/// Absent entries and overdue-but-unexecuted entries are refreshed; executed or
/// not-yet-due entries are trusted.
pub fn requires_refresh(cached: Option<&ExecutionMetadata>, now: u64) -> bool {
    match cached {
        None => true,
        Some(meta) => !meta.executed && meta.exec_time <= now,
    }
}
