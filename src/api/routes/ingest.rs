//! Ingest Route
//!
//! `POST /` accepts one event from the event router, stores it and pushes
//! the resulting snapshot to every connected dashboard.

use axum::{body::Bytes, extract::State, Json};
use std::sync::Arc;

use crate::api::dto::StatusResponse;
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::events::IngestPayload;

/// POST /
pub async fn ingest_event(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> ApiResult<Json<StatusResponse>> {
    let payload = parse_payload(&body)?;

    tracing::debug!(
        rule = %payload.event.rule,
        priority = %payload.event.priority,
        source_uuid = %payload.uuid,
        "Received event"
    );

    let delivered = state.ingest(payload).await?;

    tracing::debug!(dashboards = delivered, "Snapshot pushed");
    Ok(Json(StatusResponse::ok()))
}

/// Decode and validate a request body
fn parse_payload(body: &[u8]) -> ApiResult<IngestPayload> {
    if body.is_empty() {
        return Err(ApiError::Validation(
            "Please send a valid request body".to_string(),
        ));
    }

    serde_json::from_slice(body)
        .map_err(|e| ApiError::Validation(format!("Please send a valid request body: {}", e)))
}
