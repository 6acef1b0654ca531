//! Bounded in-memory event store
//!
//! Keeps the newest `retention` events, the latest output list and the
//! per-instance statistics reported by each forwarder.

use std::collections::{BTreeMap, HashMap, VecDeque};
use tokio::sync::RwLock;

use super::types::{IngestPayload, SecurityEvent, Snapshot};

/// Key of the aggregated counter holding the sum of every other counter
pub const TOTAL_KEY: &str = "total";

/// Retention-limited store of security events
pub struct EventStore {
    inner: RwLock<StoreInner>,
    retention: usize,
}

#[derive(Default)]
struct StoreInner {
    events: VecDeque<SecurityEvent>,
    stats_by_uuid: HashMap<String, BTreeMap<String, i64>>,
    stats: BTreeMap<String, i64>,
    outputs: Vec<String>,
}

impl EventStore {
    /// Create an empty store keeping at most `retention` events
    ///
    /// A retention of zero is raised to one; configuration rejects it earlier.
    pub fn new(retention: usize) -> Self {
        let retention = retention.max(1);
        Self {
            inner: RwLock::new(StoreInner {
                events: VecDeque::with_capacity(retention),
                ..Default::default()
            }),
            retention,
        }
    }

    /// Maximum number of events kept
    pub fn retention(&self) -> usize {
        self.retention
    }

    /// Record an ingested event and return the resulting snapshot
    pub async fn ingest(&self, payload: IngestPayload) -> Snapshot {
        let mut inner = self.inner.write().await;

        inner.outputs = payload.outputs;

        while inner.events.len() >= self.retention {
            inner.events.pop_front();
        }
        inner.events.push_back(payload.event);

        inner.stats_by_uuid.insert(payload.uuid, payload.stats);
        inner.stats = aggregate_stats(&inner.stats_by_uuid);

        tracing::debug!(
            events = inner.events.len(),
            instances = inner.stats_by_uuid.len(),
            "Event ingested"
        );

        self.snapshot_of(&inner)
    }

    /// Current state of the store
    pub async fn snapshot(&self) -> Snapshot {
        let inner = self.inner.read().await;
        self.snapshot_of(&inner)
    }

    /// Number of events currently held
    pub async fn len(&self) -> usize {
        self.inner.read().await.events.len()
    }

    /// Whether no event has been ingested yet
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.events.is_empty()
    }

    fn snapshot_of(&self, inner: &StoreInner) -> Snapshot {
        Snapshot {
            events: inner.events.iter().cloned().collect(),
            stats: inner.stats.clone(),
            outputs: inner.outputs.clone(),
            retention: self.retention,
        }
    }
}

/// Sum counters across all forwarder instances, adding a `total` key
///
/// Counters come from untrusted request bodies; sums saturate at the
/// `i64` bounds.
fn aggregate_stats(stats_by_uuid: &HashMap<String, BTreeMap<String, i64>>) -> BTreeMap<String, i64> {
    let mut totals: BTreeMap<String, i64> = BTreeMap::new();
    for stats in stats_by_uuid.values() {
        for (key, count) in stats {
            let entry = totals.entry(key.clone()).or_insert(0);
            *entry = entry.saturating_add(*count);
            let total = totals.entry(TOTAL_KEY.to_string()).or_insert(0);
            *total = total.saturating_add(*count);
        }
    }
    totals
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(uuid: &str, rule: &str, stats: &[(&str, i64)]) -> IngestPayload {
        IngestPayload {
            uuid: uuid.to_string(),
            event: SecurityEvent::new(rule, "Warning", format!("{} fired", rule)),
            stats: stats.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
            outputs: vec!["webui".to_string()],
        }
    }

    #[tokio::test]
    async fn test_retention_keeps_newest_events() {
        let store = EventStore::new(3);

        for i in 0..5 {
            store.ingest(payload("a", &format!("rule-{}", i), &[])).await;
        }

        let snapshot = store.snapshot().await;
        let rules: Vec<_> = snapshot.events.iter().map(|e| e.rule.as_str()).collect();
        assert_eq!(rules, vec!["rule-2", "rule-3", "rule-4"]);
        assert_eq!(snapshot.retention, 3);
    }

    #[tokio::test]
    async fn test_retention_of_one() {
        let store = EventStore::new(1);

        store.ingest(payload("a", "first", &[])).await;
        let snapshot = store.ingest(payload("a", "second", &[])).await;

        assert_eq!(snapshot.events.len(), 1);
        assert_eq!(snapshot.events[0].rule, "second");
    }

    #[tokio::test]
    async fn test_zero_retention_is_raised() {
        let store = EventStore::new(0);
        assert_eq!(store.retention(), 1);

        store.ingest(payload("a", "only", &[])).await;
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_stats_replaced_per_instance() {
        let store = EventStore::new(10);

        store.ingest(payload("a", "r", &[("warning", 2)])).await;
        let snapshot = store.ingest(payload("a", "r", &[("warning", 5)])).await;

        assert_eq!(snapshot.stats["warning"], 5);
        assert_eq!(snapshot.stats[TOTAL_KEY], 5);
    }

    #[tokio::test]
    async fn test_stats_summed_across_instances() {
        let store = EventStore::new(10);

        store
            .ingest(payload("a", "r", &[("warning", 2), ("critical", 1)]))
            .await;
        let snapshot = store.ingest(payload("b", "r", &[("warning", 3)])).await;

        assert_eq!(snapshot.stats["warning"], 5);
        assert_eq!(snapshot.stats["critical"], 1);
        assert_eq!(snapshot.stats[TOTAL_KEY], 6);
    }

    #[tokio::test]
    async fn test_huge_counters_saturate_instead_of_overflowing() {
        let store = EventStore::new(10);

        store.ingest(payload("a", "r", &[("warning", i64::MAX)])).await;
        let snapshot = store.ingest(payload("b", "r", &[("warning", 1)])).await;
        assert_eq!(snapshot.stats["warning"], i64::MAX);
        assert_eq!(snapshot.stats[TOTAL_KEY], i64::MAX);

        // Later ingests keep working
        let snapshot = store.ingest(payload("c", "r", &[("error", i64::MIN)])).await;
        assert_eq!(snapshot.events.len(), 3);
        assert_eq!(snapshot.stats["error"], i64::MIN);
    }

    #[tokio::test]
    async fn test_outputs_follow_latest_payload() {
        let store = EventStore::new(10);

        let mut first = payload("a", "r", &[]);
        first.outputs = vec!["slack".to_string(), "webui".to_string()];
        store.ingest(first).await;

        let snapshot = store.ingest(payload("a", "r", &[])).await;
        assert_eq!(snapshot.outputs, vec!["webui"]);
    }

    #[tokio::test]
    async fn test_empty_store() {
        let store = EventStore::new(200);

        assert!(store.is_empty().await);
        let snapshot = store.snapshot().await;
        assert!(snapshot.events.is_empty());
        assert!(snapshot.stats.is_empty());
        assert_eq!(snapshot.retention, 200);
    }
}
