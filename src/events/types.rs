//! Event data types
//!
//! Wire types shared by the ingest endpoint, the `/events` endpoint and the
//! WebSocket snapshot stream:
//! - `SecurityEvent`: a single alert as forwarded by the event router
//! - `IngestPayload`: the body of `POST /`
//! - `Snapshot`: the full store state pushed to dashboards

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single security event
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SecurityEvent {
    /// Human readable alert line
    #[serde(default)]
    pub output: String,
    /// Priority as sent by the producer (e.g. "Warning", "Critical")
    #[serde(default)]
    pub priority: String,
    /// Name of the rule that fired
    #[serde(default)]
    pub rule: String,
    /// When the event happened
    pub time: DateTime<Utc>,
    /// Structured fields extracted by the rule
    #[serde(default)]
    pub output_fields: BTreeMap<String, serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl SecurityEvent {
    /// Create an event stamped with the current time
    pub fn new(rule: impl Into<String>, priority: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            priority: priority.into(),
            rule: rule.into(),
            time: Utc::now(),
            output_fields: BTreeMap::new(),
            source: None,
            hostname: None,
            tags: Vec::new(),
        }
    }

    /// Builder method: add an output field
    pub fn field(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.output_fields.insert(key.into(), value.into());
        self
    }
}

/// Body of an ingest request
///
/// `stats` are the cumulative counters of the forwarding instance
/// identified by `uuid`; they replace whatever that instance sent before.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestPayload {
    #[serde(default)]
    pub uuid: String,
    pub event: SecurityEvent,
    #[serde(default)]
    pub stats: BTreeMap<String, i64>,
    #[serde(default)]
    pub outputs: Vec<String>,
}

/// Full store state as seen by dashboards
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Snapshot {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<SecurityEvent>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub stats: BTreeMap<String, i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub outputs: Vec<String>,
    #[serde(default)]
    pub retention: usize,
}
