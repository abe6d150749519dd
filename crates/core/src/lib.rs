//! # EventForge Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port interfaces (traits) for the remote event store
//! - Instance planning rules (dates, durations, names)
//! - The duplication service
//!
//! ## Architecture Principles
//! - Only depends on `eventforge-domain`
//! - No HTTP, credentials or configuration loading
//! - All external dependencies via traits

pub mod duplication;

pub use duplication::{
    plan_instance, DuplicationMode, DuplicationReport, DuplicationService, EventGateway,
    InstanceFailure, InstancePlan, NameFormat,
};
