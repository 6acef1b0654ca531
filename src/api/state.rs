//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, Mutex};

use crate::config::{Config, DisplayMode};
use crate::events::{EventStore, IngestPayload};
use crate::websocket::{ConnectionHub, ConnectionId, Frame, HubConfig, HubError};

/// Shared application state for all handlers
pub struct AppState {
    /// Retention-limited event store
    pub store: Arc<EventStore>,
    /// WebSocket connection hub for snapshot streaming
    pub ws_hub: Arc<ConnectionHub>,
    /// Theme reported to the dashboard
    pub display_mode: DisplayMode,
    /// Directory served under `/ui`
    pub ui_dir: PathBuf,
    /// Server start time for uptime tracking
    pub start_time: Instant,
    /// Orders store updates with the snapshots sent to dashboards
    publish_lock: Mutex<()>,
}

impl AppState {
    /// Create the state described by a configuration
    pub fn new(config: &Config) -> Self {
        Self {
            store: Arc::new(EventStore::new(config.events.retention)),
            ws_hub: Arc::new(ConnectionHub::new(HubConfig {
                max_connections: config.websocket.max_connections,
            })),
            display_mode: config.display.mode(),
            ui_dir: config.server.ui_dir.clone(),
            start_time: Instant::now(),
            publish_lock: Mutex::new(()),
        }
    }

    /// Store an event and push the resulting snapshot to every dashboard
    ///
    /// Dashboards receive snapshots in the order the store produced them.
    /// Returns the number of dashboards the snapshot was queued for.
    pub async fn ingest(&self, payload: IngestPayload) -> Result<usize, HubError> {
        let _publish = self.publish_lock.lock().await;
        let snapshot = self.store.ingest(payload).await;
        self.ws_hub.broadcast(&snapshot).await
    }

    /// Register a dashboard and queue the current snapshot as its first frame
    ///
    /// No broadcast can slip in between registration and the initial frame.
    pub async fn subscribe(&self, sender: mpsc::UnboundedSender<Frame>) -> Result<ConnectionId, HubError> {
        let _publish = self.publish_lock.lock().await;
        let id = self.ws_hub.register(sender).await?;

        let snapshot = self.store.snapshot().await;
        if let Err(e) = self.ws_hub.send_to(&id, &snapshot).await {
            self.ws_hub.unregister(&id).await;
            return Err(e);
        }
        Ok(id)
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Get WebSocket connection count
    pub async fn ws_connection_count(&self) -> usize {
        self.ws_hub.connection_count().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{SecurityEvent, Snapshot};
    use std::sync::Arc;

    fn payload(i: usize) -> IngestPayload {
        IngestPayload {
            uuid: "router-1".to_string(),
            event: SecurityEvent::new(format!("rule-{}", i), "Notice", "fired"),
            stats: [("notice".to_string(), i as i64)].into_iter().collect(),
            outputs: vec!["webui".to_string()],
        }
    }

    fn decode(frame: &Frame) -> Snapshot {
        serde_json::from_str(frame).unwrap()
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_concurrent_ingests_reach_dashboards_in_store_order() {
        let mut config = Config::default();
        config.events.retention = 1000;
        let state = Arc::new(AppState::new(&config));

        let (tx, mut rx) = mpsc::unbounded_channel();
        state.subscribe(tx).await.unwrap();
        assert!(decode(&rx.recv().await.unwrap()).events.is_empty());

        let tasks: Vec<_> = (0..500)
            .map(|i| {
                let state = Arc::clone(&state);
                tokio::spawn(async move { state.ingest(payload(i)).await.unwrap() })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }

        let mut lengths = Vec::new();
        while let Ok(frame) = rx.try_recv() {
            lengths.push(decode(&frame).events.len());
        }
        assert_eq!(lengths, (1..=500).collect::<Vec<_>>());
        assert_eq!(state.store.len().await, 500);
    }

    #[tokio::test]
    async fn test_subscribe_sends_current_snapshot_first() {
        let state = AppState::new(&Config::default());
        state.ingest(payload(1)).await.unwrap();

        let (tx, mut rx) = mpsc::unbounded_channel();
        state.subscribe(tx).await.unwrap();
        state.ingest(payload(2)).await.unwrap();

        assert_eq!(decode(&rx.recv().await.unwrap()).events.len(), 1);
        assert_eq!(decode(&rx.recv().await.unwrap()).events.len(), 2);
        assert_eq!(state.ws_connection_count().await, 1);
    }
}
