//! # Eventdeck
//!
//! Realtime security event dashboard. Event routers `POST` alerts to the
//! server, which keeps the most recent ones in memory and streams every
//! change to browser dashboards over WebSocket.
//!
//! ## Modules
//!
//! - [`events`]: Retention-limited event store and wire types
//! - [`websocket`]: Connection hub and `/ws` snapshot streaming
//! - [`api`]: HTTP API server with Axum
//! - [`config`]: TOML / environment configuration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use eventdeck::events::{EventStore, IngestPayload, SecurityEvent};
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = EventStore::new(200);
//!
//!     let snapshot = store
//!         .ingest(IngestPayload {
//!             uuid: "router-1".to_string(),
//!             event: SecurityEvent::new("Terminal shell in container", "Notice", "shell spawned"),
//!             stats: [("notice".to_string(), 1)].into_iter().collect(),
//!             outputs: vec!["webui".to_string()],
//!         })
//!         .await;
//!
//!     println!("{} events, {} total", snapshot.events.len(), snapshot.stats["total"]);
//! }
//! ```

pub mod api;
pub mod config;
pub mod events;
pub mod websocket;

pub use api::{build_router, serve, serve_on, ApiError, AppState};

pub use config::{Config, ConfigError, DisplayMode, LoggingConfig};

pub use events::{EventStore, IngestPayload, SecurityEvent, Snapshot};

pub use websocket::{websocket_handler, ConnectionHub, HubConfig, HubError};
