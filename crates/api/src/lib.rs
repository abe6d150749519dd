//! # EventForge API
//!
//! Collaborator layer around the duplication core.
//!
//! This crate contains:
//! - HTTP handlers for listing, fetching and duplicating events
//! - The axum router and listener loop
//! - Application context (dependency injection)
//! - The `eventforge` command-line entry point
//!
//! ## Architecture
//! - Depends on `domain`, `core`, and `infra`
//! - Wires up the hexagonal architecture
//! - Holds no business rules of its own

pub mod commands;
pub mod context;
pub mod error;
pub mod router;
pub mod utils;

// Re-export for convenience
pub use context::AppContext;
pub use error::ApiError;
pub use router::{build_router, run_server};
