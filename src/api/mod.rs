//! Eventdeck HTTP API
//!
//! HTTP API layer for Eventdeck, built with Axum.
//!
//! # Endpoints
//!
//! - `POST /` - Ingest one event from the event router
//! - `GET /events` - Current store snapshot
//! - `GET /config` - Dashboard start-up configuration
//! - `GET /healthz` - Liveness probe
//! - `GET /ws` - Snapshot stream for dashboards
//! - `GET /ui/*` - The dashboard itself
//!
//! # Example
//!
//! ```rust,ignore
//! use eventdeck::api::{serve, AppState};
//! use eventdeck::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     serve(AppState::new(&config), &config.server.addr()).await?;
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::websocket::websocket_handler;

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    // Unknown paths under /ui belong to the client-side router
    let ui = ServeDir::new(&state.ui_dir)
        .fallback(ServeFile::new(state.ui_dir.join("index.html")));

    let shared_state = Arc::new(state);

    Router::new()
        .route("/", post(routes::ingest::ingest_event))
        .route("/events", get(routes::events::list_events))
        .route("/config", get(routes::config::get_config))
        .route("/healthz", get(routes::health::healthz))
        .route("/ws", get(websocket_handler))
        .nest_service("/ui", ui)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(shared_state)
}

/// Start the API server
pub async fn serve(state: AppState, addr: &str) -> Result<(), ApiError> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    serve_on(listener, state).await
}

/// Run the API server on an already bound listener
pub async fn serve_on(listener: tokio::net::TcpListener, state: AppState) -> Result<(), ApiError> {
    let router = build_router(state);

    tracing::info!("Eventdeck listening on {}", listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Eventdeck shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
