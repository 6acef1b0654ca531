//! Server Endpoints
//!
//! Release builds talk to the server that served the page. Debug builds
//! (served by a dev server on another port) use addresses fixed at compile
//! time through `EVENTDECK_WS` and `EVENTDECK_API`.

/// WebSocket address used by debug builds when `EVENTDECK_WS` is unset
pub const DEFAULT_DEV_WS: &str = "ws://localhost:2802/ws";

/// API base used by debug builds when `EVENTDECK_API` is unset
pub const DEFAULT_DEV_API: &str = "http://localhost:2802";

/// Build mode deciding where the server lives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Production,
    Development,
}

impl Mode {
    /// Mode of the running binary
    pub fn current() -> Self {
        if cfg!(debug_assertions) {
            Mode::Development
        } else {
            Mode::Production
        }
    }
}

/// WebSocket endpoint for the realtime channel
pub fn select_ws_endpoint(mode: Mode, page_host: &str, configured: &str) -> String {
    match mode {
        Mode::Production => format!("ws://{}/ws", page_host),
        Mode::Development => configured.to_string(),
    }
}

/// Base URL of the HTTP API, without trailing slash
pub fn select_api_base(mode: Mode, page_host: &str, configured: &str) -> String {
    match mode {
        Mode::Production => format!("http://{}", page_host),
        Mode::Development => configured.trim_end_matches('/').to_string(),
    }
}

/// Addresses resolved once at start-up
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoints {
    pub ws: String,
    pub api: String,
}

impl Endpoints {
    /// Resolve both addresses for the current mode and page
    pub fn resolve() -> Self {
        let mode = Mode::current();
        let host = page_host().unwrap_or_else(|| {
            tracing::warn!("Page host unavailable, assuming localhost:2802");
            "localhost:2802".to_string()
        });

        let endpoints = Self {
            ws: select_ws_endpoint(mode, &host, option_env!("EVENTDECK_WS").unwrap_or(DEFAULT_DEV_WS)),
            api: select_api_base(mode, &host, option_env!("EVENTDECK_API").unwrap_or(DEFAULT_DEV_API)),
        };
        tracing::info!(mode = ?mode, ws = %endpoints.ws, api = %endpoints.api, "Resolved endpoints");
        endpoints
    }
}

/// `host:port` of the current page
fn page_host() -> Option<String> {
    web_sys::window()?.location().host().ok()
}
