//! Pages
//!
//! Top-level page components for each route.

pub mod dashboard;
pub mod events;

pub use dashboard::Dashboard;
pub use events::Events;
