//! Latest-by-ordinal fold over ledger events.

use alloy::primitives::Address;
use std::collections::BTreeMap;

use crate::codec::{ContentDigest, DecodeError};
use crate::events::ordinal::{EventOrdinal, Ordered};
use crate::events::types::{AnnouncementState, RawLogEvent, RescuerConfig};
use crate::observability::metrics;

/// Result of a reconciliation: one value per key, plus the events that failed to decode.
#[derive(Debug, Clone)]
pub struct Reconciled<K, V> {
    pub latest: BTreeMap<K, V>,
    pub rejected: Vec<(EventOrdinal, DecodeError)>,
}

impl<K, V> Default for Reconciled<K, V> {
    fn default() -> Self {
        Self {
            latest: BTreeMap::new(),
            rejected: Vec::new(),
        }
    }
}

/// Whether `candidate` replaces `existing`: strictly later ledger position.
pub fn supersedes<V: Ordered>(existing: &V, candidate: &V) -> bool {
    candidate.ordinal() > existing.ordinal()
}

/// Fold `events` into the latest value per key.
///
/// An entry is replaced only when `supersedes(existing, candidate)` holds, so the
/// result is independent of input order and of duplicated events.
pub fn reconcile<'a, K, V, I, D, KF, S>(
    events: I,
    decode: D,
    key_of: KF,
    supersedes: S,
) -> Reconciled<K, V>
where
    I: IntoIterator<Item = &'a RawLogEvent>,
    K: Ord,
    D: Fn(&RawLogEvent) -> Result<V, DecodeError>,
    KF: Fn(&V) -> K,
    S: Fn(&V, &V) -> bool,
{
    let mut out = Reconciled::default();

    for event in events {
        let value = match decode(event) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(ordinal = %event.ordinal(), error = %e, "Skipping undecodable log");
                out.rejected.push((event.ordinal(), e));
                continue;
            }
        };

        let key = key_of(&value);
        let replace = match out.latest.get(&key) {
            Some(existing) => supersedes(existing, &value),
            None => true,
        };
        if replace {
            out.latest.insert(key, value);
        }
    }

    out
}

/// Rescuers configured on a safe, keyed by announcer.
pub fn reconcile_rescuers<'a, I>(events: I) -> Reconciled<Address, RescuerConfig>
where
    I: IntoIterator<Item = &'a RawLogEvent>,
{
    let out = reconcile(events, RescuerConfig::from_log, |c: &RescuerConfig| c.announcer, supersedes);
    record("updated_config", &out);
    out
}

/// Safes an announcer may rescue, keyed by executor.
pub fn reconcile_rescue_targets<'a, I>(events: I) -> Reconciled<Address, RescuerConfig>
where
    I: IntoIterator<Item = &'a RawLogEvent>,
{
    let out = reconcile(events, RescuerConfig::from_log, |c: &RescuerConfig| c.executor, supersedes);
    record("updated_config", &out);
    out
}

/// Announcements, keyed by txHash.
pub fn reconcile_announcements<'a, I>(events: I) -> Reconciled<ContentDigest, AnnouncementState>
where
    I: IntoIterator<Item = &'a RawLogEvent>,
{
    let out = reconcile(
        events,
        AnnouncementState::from_log,
        |a: &AnnouncementState| a.tx_hash,
        supersedes,
    );
    record("new_announcement", &out);
    out
}

/// Rescuers whose delay is non-zero.
pub fn live_rescuers<K>(configs: &BTreeMap<K, RescuerConfig>) -> Vec<RescuerConfig> {
    configs.values().filter(|c| c.is_active()).cloned().collect()
}

/// Announcements that are resolved and not executed.
pub fn live_pending<K>(announcements: &BTreeMap<K, AnnouncementState>) -> Vec<AnnouncementState> {
    announcements
        .values()
        .filter(|a| a.is_pending())
        .cloned()
        .collect()
}

fn record<K, V>(event: &'static str, out: &Reconciled<K, V>) {
    for _ in &out.rejected {
        metrics::record_event(event, "rejected");
    }
    for _ in out.latest.values() {
        metrics::record_event(event, "live");
    }
}
