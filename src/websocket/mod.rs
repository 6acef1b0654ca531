//! WebSocket Snapshot Streaming
//!
//! Pushes the event store to dashboards in real time.
//!
//! ## Architecture
//!
//! - **ConnectionHub**: Registry of live connections, fans snapshots out
//! - **Handler**: Upgrades `/ws` requests and runs each socket's writer/reader
//!
//! ## Wire format
//!
//! Every text frame is a complete store snapshot:
//!
//! ```json
//! {"events": [...], "stats": {"warning": 3, "total": 3}, "outputs": ["webui"], "retention": 200}
//! ```
//!
//! Messages sent by the client are ignored.

mod handler;
mod hub;

pub use handler::websocket_handler;
pub use hub::{ConnectionHub, ConnectionId, Frame, HubConfig, HubError};
