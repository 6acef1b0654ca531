//! HTTP API Client
//!
//! Start-up requests to the Eventdeck server. Live updates arrive over the
//! realtime channel instead.

use gloo_net::http::Request;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::state::DisplayMode;

/// Errors returned by API calls
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(#[from] gloo_net::Error),

    #[error("Server responded with status {0}")]
    Status(u16),
}

/// Response of `GET /config`
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiConfig {
    #[serde(default)]
    pub display_mode: DisplayMode,
}

/// Response of `GET /healthz`
#[derive(Debug, Clone, serde::Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub uptime_seconds: u64,
    #[serde(default)]
    pub connections: usize,
    #[serde(default)]
    pub events: usize,
}

async fn get_json<T: DeserializeOwned>(url: &str) -> Result<T, ApiError> {
    let response = Request::get(url).send().await?;

    if !response.ok() {
        return Err(ApiError::Status(response.status()));
    }

    Ok(response.json().await?)
}

/// Fetch the dashboard start-up configuration
pub async fn fetch_config(api_base: &str) -> Result<UiConfig, ApiError> {
    get_json(&format!("{}/config", api_base)).await
}

/// Fetch the current store snapshot as raw JSON
///
/// Kept untyped so it enters the store through the same action as
/// realtime frames.
pub async fn fetch_events(api_base: &str) -> Result<serde_json::Value, ApiError> {
    get_json(&format!("{}/events", api_base)).await
}

/// Check server health
pub async fn check_health(api_base: &str) -> Result<HealthResponse, ApiError> {
    get_json(&format!("{}/healthz", api_base)).await
}
