//! Error conversions from infrastructure crates into `EventForgeError`

pub mod conversions;

pub use conversions::{status_error, InfraError};
