//! Shared helpers for commands and handlers

pub mod env;
pub mod logging;
