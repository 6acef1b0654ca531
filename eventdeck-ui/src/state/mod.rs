//! State Management
//!
//! Application store and the realtime channel that feeds it.

pub mod channel;
pub mod store;

pub use channel::{pass_to_store, ChannelError, ChannelEvent, ChannelOptions, RealtimeChannel};
pub use store::{
    Action, DashboardState, Dispatch, DisplayMode, Priority, SecurityEvent, Store, StoreError,
    RECEIVE_EVENTS,
};
