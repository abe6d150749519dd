//! HTTP error responses

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use eventforge_domain::EventForgeError;
use serde_json::{json, Value};

/// Error returned by every handler, rendered as `{error, details?}`
#[derive(Debug)]
pub struct ApiError(pub EventForgeError);

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self(EventForgeError::InvalidInput(message.into()))
    }

    pub fn status(&self) -> StatusCode {
        match &self.0 {
            EventForgeError::NotFound(_) => StatusCode::NOT_FOUND,
            EventForgeError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            EventForgeError::Authentication { .. }
            | EventForgeError::Discovery(_)
            | EventForgeError::Remote { .. }
            | EventForgeError::CloneFailed(_)
            | EventForgeError::Network(_) => StatusCode::BAD_GATEWAY,
            EventForgeError::Config(_) | EventForgeError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Upstream payload worth showing to a caller, if any.
    fn details(&self) -> Option<Value> {
        match &self.0 {
            EventForgeError::Authentication { status, .. } => {
                status.map(|status| json!({ "status": status }))
            }
            EventForgeError::Remote { status, body } => {
                Some(json!({ "status": status, "body": body }))
            }
            EventForgeError::CloneFailed(failure) => serde_json::to_value(failure).ok(),
            _ => None,
        }
    }
}

impl From<EventForgeError> for ApiError {
    fn from(error: EventForgeError) -> Self {
        Self(error)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut body = json!({ "error": self.0.to_string() });
        if let Some(details) = self.details() {
            body["details"] = details;
        }
        (self.status(), Json(body)).into_response()
    }
}
