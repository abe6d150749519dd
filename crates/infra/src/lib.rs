//! # EventForge Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - The membership API adapter (tokens, account id, events)
//! - The shared HTTP client
//! - Configuration loading and tracing setup
//!
//! ## Architecture
//! - Implements traits defined in `eventforge-core`
//! - Contains all "impure" code (network, filesystem, environment)

pub mod config;
pub mod errors;
pub mod http;
pub mod membership;
pub mod observability;

// Re-export commonly used items
pub use errors::InfraError;
pub use http::HttpClient;
pub use membership::{AccessTokenProvider, AccountResolver, MembershipClient, TokenManager};
pub use observability::{init_tracing, LogFormat};
