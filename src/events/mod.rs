//! Security Event Store
//!
//! In-memory, retention-limited storage for the events forwarded to the
//! dashboard, plus the aggregated counters shown on its summary cards.

mod store;
mod types;

pub use store::{EventStore, TOTAL_KEY};
pub use types::{IngestPayload, SecurityEvent, Snapshot};
