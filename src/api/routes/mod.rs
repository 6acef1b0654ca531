//! API Routes
//!
//! Route handlers organized by functionality.

pub mod config;
pub mod events;
pub mod health;
pub mod ingest;
