//! Shared test helpers for `eventforge-core` integration tests.

pub mod gateway;
