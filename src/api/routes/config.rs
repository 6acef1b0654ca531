//! Config Route
//!
//! `GET /config` tells the dashboard which theme to start with.

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::dto::UiConfigResponse;
use crate::api::state::AppState;

/// GET /config
pub async fn get_config(State(state): State<Arc<AppState>>) -> Json<UiConfigResponse> {
    Json(UiConfigResponse {
        display_mode: state.display_mode,
    })
}
