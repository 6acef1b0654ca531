//! Application Store
//!
//! Reactive state container built on Leptos signals. Every mutation goes
//! through [`Store::dispatch`]; components only read.

use chrono::{DateTime, Duration, DurationRound, Utc};
use leptos::*;
use serde::Deserialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// Wire name of the action that carries every inbound server snapshot
pub const RECEIVE_EVENTS: &str = "RECEIVE_EVENTS";

/// Counter key holding the sum of all other counters
pub const TOTAL_KEY: &str = "total";

/// Named state transitions accepted by the store
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// A snapshot pushed by the server, still as raw JSON
    ReceiveEvents(serde_json::Value),
    /// A snapshot fetched over HTTP at start-up, ignored once a pushed
    /// snapshot has arrived
    SeedEvents(serde_json::Value),
    /// The realtime channel opened or dropped
    ConnectionChanged(bool),
    SetDisplayMode(DisplayMode),
    ReportError(String),
    /// Clear the error only if it is still the given message
    ExpireError(String),
    ClearError,
}

impl Action {
    /// Identifier used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Action::ReceiveEvents(_) => RECEIVE_EVENTS,
            Action::SeedEvents(_) => "SEED_EVENTS",
            Action::ConnectionChanged(_) => "CONNECTION_CHANGED",
            Action::SetDisplayMode(_) => "SET_DISPLAY_MODE",
            Action::ReportError(_) => "REPORT_ERROR",
            Action::ExpireError(_) => "EXPIRE_ERROR",
            Action::ClearError => "CLEAR_ERROR",
        }
    }
}

/// Anything that accepts store actions
///
/// Implemented by [`Store`]; the realtime channel is written against this
/// trait so it can be exercised without a reactive runtime.
pub trait Dispatch {
    fn dispatch(&self, action: Action);
}

/// Errors raised while applying an action
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("server snapshot has an unexpected shape: {0}")]
    UnexpectedShape(#[from] serde_json::Error),
}

/// Theme of the dashboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    #[default]
    Light,
    Dark,
}

/// Event severity, ordered from most to least severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(from = "String")]
pub enum Priority {
    Emergency,
    Alert,
    Critical,
    Error,
    Warning,
    Notice,
    Informational,
    Debug,
    Unknown,
}

impl Priority {
    pub const ALL: [Priority; 9] = [
        Priority::Emergency,
        Priority::Alert,
        Priority::Critical,
        Priority::Error,
        Priority::Warning,
        Priority::Notice,
        Priority::Informational,
        Priority::Debug,
        Priority::Unknown,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Priority::Emergency => "emergency",
            Priority::Alert => "alert",
            Priority::Critical => "critical",
            Priority::Error => "error",
            Priority::Warning => "warning",
            Priority::Notice => "notice",
            Priority::Informational => "informational",
            Priority::Debug => "debug",
            Priority::Unknown => "unknown",
        }
    }

    /// Parse a priority name, case-insensitively
    pub fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "emergency" => Priority::Emergency,
            "alert" => Priority::Alert,
            "critical" => Priority::Critical,
            "error" => Priority::Error,
            "warning" => Priority::Warning,
            "notice" => Priority::Notice,
            "informational" | "info" => Priority::Informational,
            "debug" => Priority::Debug,
            _ => Priority::Unknown,
        }
    }

    /// Tailwind classes for priority badges
    pub fn badge_class(&self) -> &'static str {
        match self {
            Priority::Emergency | Priority::Alert | Priority::Critical => "bg-red-700 text-white",
            Priority::Error => "bg-red-500 text-white",
            Priority::Warning => "bg-yellow-500 text-gray-900",
            Priority::Notice => "bg-blue-500 text-white",
            Priority::Informational => "bg-teal-500 text-white",
            Priority::Debug | Priority::Unknown => "bg-gray-500 text-white",
        }
    }
}

impl From<String> for Priority {
    fn from(value: String) -> Self {
        Priority::parse(&value)
    }
}

/// A single security event as pushed by the server
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SecurityEvent {
    #[serde(default)]
    pub output: String,
    pub priority: Priority,
    #[serde(default)]
    pub rule: String,
    pub time: DateTime<Utc>,
    #[serde(default)]
    pub output_fields: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Everything the server knows, replaced wholesale on every snapshot
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DashboardState {
    #[serde(default)]
    pub events: Vec<SecurityEvent>,
    #[serde(default)]
    pub stats: BTreeMap<String, i64>,
    #[serde(default)]
    pub outputs: Vec<String>,
    #[serde(default)]
    pub retention: usize,
}

impl DashboardState {
    /// Decode a server snapshot
    pub fn from_value(value: serde_json::Value) -> Result<Self, StoreError> {
        Ok(serde_json::from_value(value)?)
    }

    /// Aggregated counter across all forwarders
    pub fn total(&self) -> i64 {
        self.stats.get(TOTAL_KEY).copied().unwrap_or(0)
    }

    /// Server-side counters per priority, most severe first, zeros skipped
    pub fn counts_by_priority(&self) -> Vec<(Priority, i64)> {
        let mut counts: BTreeMap<Priority, i64> = BTreeMap::new();
        for (key, count) in &self.stats {
            if key == TOTAL_KEY || *count == 0 {
                continue;
            }
            *counts.entry(Priority::parse(key)).or_insert(0) += count;
        }
        counts.into_iter().collect()
    }

    /// Rules ranked by how many retained events they produced
    pub fn top_rules(&self, limit: usize) -> Vec<(String, i64)> {
        let mut counts: BTreeMap<&str, i64> = BTreeMap::new();
        for event in &self.events {
            *counts.entry(event.rule.as_str()).or_insert(0) += 1;
        }

        let mut ranked: Vec<(String, i64)> = counts
            .into_iter()
            .map(|(rule, count)| (rule.to_string(), count))
            .collect();
        // Stable sort keeps alphabetical order among equal counts
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(limit);
        ranked
    }

    /// Retained events counted per time bucket, oldest bucket first
    pub fn timeline(&self, bucket: Duration) -> Vec<(DateTime<Utc>, i64)> {
        let mut buckets: BTreeMap<DateTime<Utc>, i64> = BTreeMap::new();
        for event in &self.events {
            let start = event.time.duration_trunc(bucket).unwrap_or(event.time);
            *buckets.entry(start).or_insert(0) += 1;
        }
        buckets.into_iter().collect()
    }

    /// Events matching a priority and a free-text query, newest first
    pub fn filtered(&self, priority: Option<Priority>, query: &str) -> Vec<SecurityEvent> {
        let query = query.trim().to_lowercase();
        self.events
            .iter()
            .rev()
            .filter(|e| priority.map_or(true, |p| e.priority == p))
            .filter(|e| {
                query.is_empty()
                    || e.rule.to_lowercase().contains(&query)
                    || e.output.to_lowercase().contains(&query)
                    || e.hostname
                        .as_deref()
                        .map_or(false, |h| h.to_lowercase().contains(&query))
            })
            .cloned()
            .collect()
    }
}

/// Shared application store
///
/// A `Copy` handle over signals, created once at the root and handed to
/// components as a prop.
#[derive(Clone, Copy)]
pub struct Store {
    /// Latest server snapshot
    pub snapshot: RwSignal<DashboardState>,
    /// Whether the realtime channel is open
    pub connected: RwSignal<bool>,
    /// When the last snapshot arrived
    pub last_sync: RwSignal<Option<DateTime<Utc>>>,
    pub display_mode: RwSignal<DisplayMode>,
    /// Error message to display
    pub error: RwSignal<Option<String>>,
}

impl Store {
    /// Create an empty store in the current reactive owner
    pub fn new() -> Self {
        Self {
            snapshot: create_rw_signal(DashboardState::default()),
            connected: create_rw_signal(false),
            last_sync: create_rw_signal(None),
            display_mode: create_rw_signal(DisplayMode::default()),
            error: create_rw_signal(None),
        }
    }

    fn apply(&self, action: Action) -> Result<(), StoreError> {
        match action {
            Action::ReceiveEvents(value) => {
                let state = DashboardState::from_value(value)?;
                self.snapshot.set(state);
                self.last_sync.set(Some(Utc::now()));
            }
            Action::SeedEvents(value) => {
                if self.last_sync.get_untracked().is_some() {
                    tracing::debug!("Realtime snapshot already applied, skipping seed");
                    return Ok(());
                }
                let state = DashboardState::from_value(value)?;
                self.snapshot.set(state);
            }
            Action::ConnectionChanged(connected) => self.connected.set(connected),
            Action::SetDisplayMode(mode) => self.display_mode.set(mode),
            Action::ReportError(message) => self.error.set(Some(message)),
            Action::ExpireError(message) => {
                if self.error.with_untracked(|e| e.as_deref() == Some(message.as_str())) {
                    self.error.set(None);
                }
            }
            Action::ClearError => self.error.set(None),
        }
        Ok(())
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatch for Store {
    fn dispatch(&self, action: Action) {
        let name = action.name();
        tracing::trace!(action = name, "dispatch");

        if let Err(e) = self.apply(action) {
            tracing::warn!(action = name, error = %e, "Action rejected");
            self.error.set(Some(e.to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn event(rule: &str, priority: &str, time: &str) -> serde_json::Value {
        json!({"rule": rule, "priority": priority, "output": format!("{} output", rule), "time": time})
    }

    fn sample_state() -> DashboardState {
        DashboardState::from_value(json!({
            "events": [
                event("Write below etc", "Error", "2021-03-01T10:00:05Z"),
                event("Terminal shell", "Notice", "2021-03-01T10:00:40Z"),
                event("Terminal shell", "Notice", "2021-03-01T10:01:10Z"),
            ],
            "stats": {"error": 1, "notice": 2, "warning": 0, "total": 3},
            "outputs": ["webui"],
            "retention": 200
        }))
        .unwrap()
    }

    #[test]
    fn test_priority_parse_is_case_insensitive() {
        assert_eq!(Priority::parse("Critical"), Priority::Critical);
        assert_eq!(Priority::parse("WARNING"), Priority::Warning);
        assert_eq!(Priority::parse("info"), Priority::Informational);
        assert_eq!(Priority::parse("whatever"), Priority::Unknown);
    }

    #[test]
    fn test_from_value_defaults_missing_fields() {
        let state = DashboardState::from_value(json!({"retention": 10})).unwrap();
        assert!(state.events.is_empty());
        assert_eq!(state.total(), 0);
        assert_eq!(state.retention, 10);
    }

    #[test]
    fn test_from_value_rejects_wrong_shape() {
        let result = DashboardState::from_value(json!({"events": "not a list"}));
        assert!(matches!(result, Err(StoreError::UnexpectedShape(_))));
    }

    #[test]
    fn test_counts_by_priority_skips_total_and_zero() {
        let counts = sample_state().counts_by_priority();
        assert_eq!(counts, vec![(Priority::Error, 1), (Priority::Notice, 2)]);
    }

    #[test]
    fn test_top_rules() {
        let rules = sample_state().top_rules(5);
        assert_eq!(
            rules,
            vec![
                ("Terminal shell".to_string(), 2),
                ("Write below etc".to_string(), 1)
            ]
        );
        assert_eq!(sample_state().top_rules(1).len(), 1);
    }

    #[test]
    fn test_timeline_buckets_by_minute() {
        let timeline = sample_state().timeline(Duration::minutes(1));
        let counts: Vec<i64> = timeline.iter().map(|(_, c)| *c).collect();
        assert_eq!(counts, vec![2, 1]);
        assert_eq!(timeline[0].0.to_rfc3339(), "2021-03-01T10:00:00+00:00");
    }

    #[test]
    fn test_filtered_newest_first() {
        let state = sample_state();

        let notices = state.filtered(Some(Priority::Notice), "");
        assert_eq!(notices.len(), 2);
        assert!(notices[0].time > notices[1].time);

        let by_text = state.filtered(None, "  BELOW ");
        assert_eq!(by_text.len(), 1);
        assert_eq!(by_text[0].rule, "Write below etc");
    }

    #[test]
    fn test_action_names() {
        assert_eq!(Action::ReceiveEvents(json!({})).name(), RECEIVE_EVENTS);
        assert_eq!(Action::ClearError.name(), "CLEAR_ERROR");
    }

    #[test]
    fn test_store_dispatch() {
        let runtime = create_runtime();
        let store = Store::new();

        store.dispatch(Action::ReceiveEvents(json!({"stats": {"total": 7}, "retention": 50})));
        assert_eq!(store.snapshot.get_untracked().total(), 7);
        assert!(store.last_sync.get_untracked().is_some());

        store.dispatch(Action::ConnectionChanged(true));
        assert!(store.connected.get_untracked());

        store.dispatch(Action::SetDisplayMode(DisplayMode::Dark));
        assert_eq!(store.display_mode.get_untracked(), DisplayMode::Dark);

        runtime.dispose();
    }

    #[test]
    fn test_seed_never_overrides_pushed_snapshot() {
        let runtime = create_runtime();

        let store = Store::new();
        store.dispatch(Action::SeedEvents(json!({"retention": 3})));
        assert_eq!(store.snapshot.get_untracked().retention, 3);
        assert!(store.last_sync.get_untracked().is_none());

        store.dispatch(Action::ReceiveEvents(json!({"stats": {"total": 9}, "retention": 3})));
        store.dispatch(Action::SeedEvents(json!({"stats": {"total": 1}, "retention": 3})));
        assert_eq!(store.snapshot.get_untracked().total(), 9);
        assert!(store.error.get_untracked().is_none());

        runtime.dispose();
    }

    #[test]
    fn test_expiring_an_old_error_keeps_the_newer_one() {
        let runtime = create_runtime();
        let store = Store::new();

        store.dispatch(Action::ReportError("first".to_string()));
        store.dispatch(Action::ReportError("second".to_string()));
        store.dispatch(Action::ExpireError("first".to_string()));
        assert_eq!(store.error.get_untracked().as_deref(), Some("second"));

        store.dispatch(Action::ExpireError("second".to_string()));
        assert!(store.error.get_untracked().is_none());

        runtime.dispose();
    }

    #[test]
    fn test_store_rejects_bad_snapshot_without_touching_state() {
        let runtime = create_runtime();
        let store = Store::new();

        store.dispatch(Action::ReceiveEvents(json!({"retention": 5})));
        store.dispatch(Action::ReceiveEvents(json!({"events": 3})));

        assert_eq!(store.snapshot.get_untracked().retention, 5);
        assert!(store.error.get_untracked().is_some());

        store.dispatch(Action::ClearError);
        assert!(store.error.get_untracked().is_none());

        runtime.dispose();
    }
}
