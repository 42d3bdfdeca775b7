//! Ledger event reconciliation.
//!
//! # Data Flow
//! ```text
//! RawLogEvent (unordered, possibly duplicated)
//!     → types.rs (decode UpdatedConfig / NewAnnouncement)
//!     → reconcile.rs (latest-by-ordinal fold per key)
//!     → live sets (rescuers with delay > 0, unexecuted resolved announcements)
//! ```
//!
//! # Design Decisions
//! - Output depends only on event ordinals, never on delivery order
//! - Pure: no I/O, no clock
//! - Rescuer configs and announcements never share a key space

pub mod ordinal;
pub mod reconcile;
pub mod types;

pub use ordinal::{EventOrdinal, Ordered};
pub use reconcile::{
    live_pending, live_rescuers, reconcile, reconcile_announcements, reconcile_rescue_targets,
    reconcile_rescuers, supersedes, Reconciled,
};
pub use types::{AnnouncementState, RawLogEvent, RescuerConfig};
