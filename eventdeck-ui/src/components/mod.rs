//! UI Components
//!
//! Reusable Leptos components for the dashboard.

pub mod chart;
pub mod event_table;
pub mod nav;
pub mod stat_card;
pub mod toast;

pub use chart::{BarChart, BarDatum, ChartPalette, TimelineChart};
pub use event_table::EventTable;
pub use nav::Nav;
pub use stat_card::StatCard;
pub use toast::Toast;
