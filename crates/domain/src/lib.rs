//! # EventForge Domain
//!
//! Business domain types and models for EventForge.
//!
//! This crate contains:
//! - Event data types (Event, EventDraft, EventOverrides, EventTimestamp)
//! - Duplication request types (DuplicateInstance, InstanceWindow)
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Domain constants
//!
//! ## Architecture
//! - No dependencies on other EventForge crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
