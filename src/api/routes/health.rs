//! Health Route
//!
//! - GET /healthz - Liveness probe with basic runtime figures

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::dto::HealthResponse;
use crate::api::state::AppState;

/// GET /healthz
///
/// Always reports "ok" while the process serves requests.
pub async fn healthz(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.uptime_seconds(),
        connections: state.ws_connection_count().await,
        events: state.store.len().await,
    })
}
