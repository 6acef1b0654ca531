//! WebSocket Connection Hub
//!
//! Tracks every live dashboard connection and fans store snapshots out to
//! all of them. Snapshots are serialized once per broadcast and shared.

use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

use crate::events::Snapshot;

/// Unique identifier for a WebSocket connection
pub type ConnectionId = String;

/// A serialized snapshot ready to be written as a text frame
pub type Frame = Arc<str>;

/// Manages all WebSocket connections
pub struct ConnectionHub {
    /// Active connections: ConnectionId → sender for that socket's writer task
    connections: RwLock<HashMap<ConnectionId, mpsc::UnboundedSender<Frame>>>,
    config: HubConfig,
}

/// Configuration for the connection hub
#[derive(Debug, Clone)]
pub struct HubConfig {
    /// Maximum number of concurrent connections
    pub max_connections: usize,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            max_connections: 1000,
        }
    }
}

impl ConnectionHub {
    /// Create a new connection hub
    pub fn new(config: HubConfig) -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
            config,
        }
    }

    /// Register a new WebSocket connection
    ///
    /// Returns the connection ID on success, or an error if the connection
    /// limit has been reached.
    pub async fn register(
        &self,
        sender: mpsc::UnboundedSender<Frame>,
    ) -> Result<ConnectionId, HubError> {
        let mut connections = self.connections.write().await;
        if connections.len() >= self.config.max_connections {
            return Err(HubError::TooManyConnections(self.config.max_connections));
        }

        let id = Uuid::new_v4().to_string();
        connections.insert(id.clone(), sender);

        tracing::info!(connection_id = %id, "WebSocket connected");
        Ok(id)
    }

    /// Unregister a connection
    pub async fn unregister(&self, id: &str) {
        if self.connections.write().await.remove(id).is_some() {
            tracing::info!(connection_id = %id, "WebSocket disconnected");
        }
    }

    /// Send a snapshot to every connection
    ///
    /// Connections whose writer has gone away are dropped from the hub.
    /// Returns the number of connections the snapshot was queued for.
    pub async fn broadcast(&self, snapshot: &Snapshot) -> Result<usize, HubError> {
        let frame = encode(snapshot)?;

        let mut stale = Vec::new();
        let mut sent_count = 0;
        {
            let connections = self.connections.read().await;
            for (id, sender) in connections.iter() {
                if sender.send(Arc::clone(&frame)).is_ok() {
                    sent_count += 1;
                } else {
                    stale.push(id.clone());
                }
            }
        }

        if !stale.is_empty() {
            let mut connections = self.connections.write().await;
            for id in &stale {
                connections.remove(id);
            }
            tracing::debug!(pruned = stale.len(), "Removed closed WebSocket connections");
        }

        tracing::trace!(subscribers = sent_count, "Broadcast snapshot");
        Ok(sent_count)
    }

    /// Send a snapshot to a single connection
    pub async fn send_to(&self, id: &str, snapshot: &Snapshot) -> Result<(), HubError> {
        let frame = encode(snapshot)?;
        let connections = self.connections.read().await;
        let sender = connections.get(id).ok_or(HubError::ConnectionNotFound)?;

        sender.send(frame).map_err(|_| HubError::SendFailed)
    }

    /// Get the current connection count
    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }
}

fn encode(snapshot: &Snapshot) -> Result<Frame, HubError> {
    let text = serde_json::to_string(snapshot)?;
    Ok(Arc::from(text))
}

/// Errors that can occur in the connection hub
#[derive(Debug, Error)]
pub enum HubError {
    #[error("Too many connections (limit: {0})")]
    TooManyConnections(usize),

    #[error("Connection not found")]
    ConnectionNotFound,

    #[error("Failed to send message")]
    SendFailed,

    #[error("Failed to encode snapshot: {0}")]
    Encode(#[from] serde_json::Error),
}
