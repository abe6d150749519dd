//! HTTP handlers

pub mod events;
pub mod health;

pub use events::{
    duplicate_events, get_event, list_events, preview_duplicates, DuplicateRequest,
    DuplicateResponse,
};
pub use health::{health, HealthStatus};
