//! Metrics collection and exposition.
//!
//! # Metrics
//! - `delayed_tx_store_requests_total` (counter): store calls by op, outcome
//! - `delayed_tx_cache_lookups_total` (counter): cache lookups by cache, result
//! - `delayed_tx_events_reconciled_total` (counter): log events by event, outcome
//! - `delayed_tx_pending_announcements` (gauge): live pending announcements
//! - `delayed_tx_eligible_announcements` (gauge): announcements past their delay

use ::metrics::{counter, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Start the Prometheus scrape endpoint. Must run inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a store push or pull.
pub fn record_store_request(op: &'static str, outcome: &'static str) {
    counter!("delayed_tx_store_requests_total", "op" => op, "outcome" => outcome).increment(1);
}

/// Record a cache lookup.
pub fn record_cache_lookup(cache: &'static str, hit: bool) {
    let result = if hit { "hit" } else { "miss" };
    counter!("delayed_tx_cache_lookups_total", "cache" => cache, "result" => result).increment(1);
}

/// Record a log event folded (or rejected) by the reconciler.
pub fn record_event(event: &'static str, outcome: &'static str) {
    counter!("delayed_tx_events_reconciled_total", "event" => event, "outcome" => outcome)
        .increment(1);
}

/// Publish the size of the latest pending listing.
pub fn record_pending(pending: usize, eligible: usize) {
    gauge!("delayed_tx_pending_announcements").set(pending as f64);
    gauge!("delayed_tx_eligible_announcements").set(eligible as f64);
}
