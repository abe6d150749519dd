//! Conversions from external infrastructure errors into domain errors.

use eventforge_domain::EventForgeError;
use reqwest::{Error as HttpError, StatusCode};
use serde_json::Error as JsonError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub EventForgeError);

impl From<InfraError> for EventForgeError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<EventForgeError> for InfraError {
    fn from(value: EventForgeError) -> Self {
        InfraError(value)
    }
}

trait IntoEventForgeError {
    fn into_eventforge(self) -> EventForgeError;
}

/// Map a non-success remote status onto the domain taxonomy.
///
/// 404 becomes `NotFound` (described by `context`); anything else keeps the
/// upstream status and body verbatim in `Remote`.
pub fn status_error(status: StatusCode, context: &str, body: String) -> EventForgeError {
    if status == StatusCode::NOT_FOUND {
        let message = if body.is_empty() { context.to_string() } else { format!("{context}: {body}") };
        return EventForgeError::NotFound(message);
    }

    EventForgeError::Remote { status: status.as_u16(), body }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → EventForgeError */
/* -------------------------------------------------------------------------- */

impl IntoEventForgeError for HttpError {
    fn into_eventforge(self) -> EventForgeError {
        if self.is_timeout() {
            return EventForgeError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return EventForgeError::Network(format!("HTTP connection failure: {self}"));
        }

        if self.is_decode() {
            return EventForgeError::Internal(format!("failed to decode HTTP response: {self}"));
        }

        if let Some(status) = self.status() {
            return status_error(status, "HTTP resource", String::new());
        }

        EventForgeError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_eventforge())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → EventForgeError */
/* -------------------------------------------------------------------------- */

impl IntoEventForgeError for JsonError {
    fn into_eventforge(self) -> EventForgeError {
        EventForgeError::Internal(format!("invalid JSON payload: {self}"))
    }
}

impl From<JsonError> for InfraError {
    fn from(value: JsonError) -> Self {
        InfraError(value.into_eventforge())
    }
}
