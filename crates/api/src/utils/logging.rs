use std::time::Duration;

use eventforge_domain::EventForgeError;
use tracing::{info, warn};

/// Log the outcome of a command execution with structured fields.
///
/// # Parameters
/// * `command` - Logical command identifier (e.g. `"events::duplicate"`).
/// * `elapsed` - Duration the command execution took.
/// * `success` - Whether the command completed successfully.
///
/// Callers must avoid forwarding sensitive values in `command`.
#[inline]
pub fn log_command_execution(command: &str, elapsed: Duration, success: bool) {
    let duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);

    if success {
        info!(command, duration_ms, "command_execution_success");
    } else {
        warn!(command, duration_ms, "command_execution_failure");
    }
}

/// Log a finished command from its result, tagging failures with their kind.
pub fn log_command_result<T>(command: &str, elapsed: Duration, result: &Result<T, EventForgeError>) {
    log_command_execution(command, elapsed, result.is_ok());

    if let Err(error) = result {
        warn!(command, kind = error_label(error), error = %error, "command_error");
    }
}

/// Convert an `EventForgeError` into a stable label suitable for logging.
#[inline]
pub fn error_label(error: &EventForgeError) -> &'static str {
    error.label()
}
