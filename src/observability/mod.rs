//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! store / cache / events / workflow
//!     → logging.rs (structured tracing events)
//!     → metrics.rs (counters and gauges)
//!
//! Consumers:
//!     → stderr log output (EnvFilter controlled)
//!     → Prometheus scrape endpoint (watch mode only)
//! ```
//!
//! # Design Decisions
//! - Structured fields (`tx_hash`, `announcer`) instead of formatted messages
//! - Metrics are recorded unconditionally; without an installed recorder they are no-ops

pub mod logging;
pub mod metrics;
