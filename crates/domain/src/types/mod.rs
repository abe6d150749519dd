//! Domain types and models

pub mod event;
pub mod instance;
pub mod query;
pub mod timestamp;

// Re-export types for convenience
pub use event::{AccountId, Event, EventDraft, EventFields, EventId, EventOverrides};
pub use instance::{DuplicateInstance, InstanceWindow};
pub use query::EventQuery;
pub use timestamp::EventTimestamp;
