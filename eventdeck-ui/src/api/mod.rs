//! Server API
//!
//! Typed wrappers for the Eventdeck HTTP endpoints.

mod client;

pub use client::{check_health, fetch_config, fetch_events, ApiError, HealthResponse, UiConfig};
