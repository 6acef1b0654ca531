//! Events Route
//!
//! `GET /events` returns the current store snapshot, the same document the
//! WebSocket stream pushes.

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::state::AppState;
use crate::events::Snapshot;

/// GET /events
pub async fn list_events(State(state): State<Arc<AppState>>) -> Json<Snapshot> {
    Json(state.store.snapshot().await)
}
