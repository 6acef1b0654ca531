//! Eventdeck Dashboard
//!
//! Realtime security event dashboard built with Leptos (WASM).
//!
//! # Features
//!
//! - Live event stream over WebSocket
//! - Priority and rule charts with an events-per-minute timeline
//! - Filterable event list
//! - Light and dark themes
//!
//! # Architecture
//!
//! This is a client-side rendered (CSR) Leptos application that compiles to
//! WebAssembly. Snapshots arrive from the Eventdeck server on `/ws` and are
//! dispatched into a single store that every component reads from.

mod api;
mod app;
mod components;
mod endpoint;
mod pages;
mod state;

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();

    if let Err(e) = app::mount_app() {
        tracing::error!(error = %e, "Failed to start dashboard");
    }
}
