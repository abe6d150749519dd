//! `tracing` subscriber installation
//!
//! Everything logs through `tracing`; the binaries call [`init_tracing`] once
//! at startup. Output goes to stderr so CLI results on stdout stay parseable.

use eventforge_domain::{EventForgeError, Result};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Log line format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human readable, compact lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

eventforge_domain::impl_domain_status_conversions!(LogFormat {
    Text => "text",
    Json => "json",
});

/// Filter built from `RUST_LOG`, falling back to `info`.
pub fn env_filter() -> EnvFilter {
    EnvFilter::builder().with_default_directive(LevelFilter::INFO.into()).from_env_lossy()
}

/// Install the global subscriber.
///
/// # Errors
/// Returns `EventForgeError::Internal` when a global subscriber is already set.
pub fn init_tracing(format: LogFormat) -> Result<()> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_target(false)
        .with_writer(std::io::stderr);

    let installed = match format {
        LogFormat::Text => builder.compact().try_init(),
        LogFormat::Json => builder.json().with_current_span(false).try_init(),
    };

    installed.map_err(|e| EventForgeError::Internal(format!("failed to install tracing subscriber: {e}")))
}
