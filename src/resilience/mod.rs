//! Resilience helpers for long-running loops.
//!
//! Individual workflow calls never retry on their own; a failed call is surfaced and
//! the caller decides. Only the `watch` loop re-runs work, pacing itself with
//! [`backoff::Backoff`] after consecutive failures.

pub mod backoff;

pub use backoff::{calculate_backoff, Backoff};
