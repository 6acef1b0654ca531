//! Data Transfer Objects
//!
//! Response types for the API endpoints that are not plain store snapshots.

use serde::Serialize;

use crate::config::DisplayMode;

/// Generic acknowledgement body
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

/// Response of `GET /healthz`
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub connections: usize,
    pub events: usize,
}

/// Response of `GET /config`, read by the dashboard on startup
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UiConfigResponse {
    pub display_mode: DisplayMode,
}
