//! Error types used throughout the application

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Event, EventId};

/// Main error type for EventForge
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "details")]
pub enum EventForgeError {
    #[error("Authentication error: {message}")]
    Authentication { status: Option<u16>, message: String },

    #[error("Account discovery error: {0}")]
    Discovery(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    CloneFailed(Box<CloneFailure>),

    #[error("Remote API error (status {status}): {body}")]
    Remote { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl EventForgeError {
    /// HTTP status reported by the remote API, when the error came from one.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            Self::Authentication { status, .. } => *status,
            Self::NotFound(_) => Some(404),
            Self::Remote { status, .. } => Some(*status),
            Self::CloneFailed(failure) => failure.status,
            _ => None,
        }
    }

    /// Response body (or best available description) from the remote API.
    pub fn upstream_body(&self) -> String {
        match self {
            Self::Authentication { message, .. } => message.clone(),
            Self::Remote { body, .. } => body.clone(),
            Self::CloneFailed(failure) => failure.body.clone(),
            Self::Discovery(message)
            | Self::NotFound(message)
            | Self::Network(message)
            | Self::Config(message)
            | Self::InvalidInput(message)
            | Self::Internal(message) => message.clone(),
        }
    }

    /// Stable label suitable for logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Authentication { .. } => "authentication",
            Self::Discovery(_) => "discovery",
            Self::NotFound(_) => "not_found",
            Self::CloneFailed(_) => "clone_failed",
            Self::Remote { .. } => "remote",
            Self::Network(_) => "network",
            Self::Config(_) => "config",
            Self::InvalidInput(_) => "invalid_input",
            Self::Internal(_) => "internal",
        }
    }
}

/// Step of the clone protocol that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CloneStage {
    /// The remote clone call itself
    Clone,
    /// Fetching the freshly cloned event
    Fetch,
    /// Writing overrides back onto the clone
    Update,
}

crate::impl_domain_status_conversions!(CloneStage {
    Clone => "clone",
    Fetch => "fetch",
    Update => "update",
});

/// Details of a failed clone or clone-with-overrides call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloneFailure {
    pub template_id: EventId,
    pub stage: CloneStage,
    pub status: Option<u16>,
    pub body: String,
    /// The clone that already exists remotely when only the update failed.
    pub clone: Option<Event>,
}

impl CloneFailure {
    /// Wrap an upstream error raised while cloning `template_id`.
    pub fn from_error(template_id: EventId, stage: CloneStage, error: &EventForgeError) -> Self {
        Self {
            template_id,
            stage,
            status: error.upstream_status(),
            body: error.upstream_body(),
            clone: None,
        }
    }

    /// Attach the already-created clone.
    pub fn with_clone(mut self, clone: Event) -> Self {
        self.clone = Some(clone);
        self
    }
}

impl fmt::Display for CloneFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Clone of event {} failed during {} step", self.template_id, self.stage)?;
        if let Some(status) = self.status {
            write!(f, " (status {status})")?;
        }
        if !self.body.is_empty() {
            write!(f, ": {}", self.body)?;
        }
        if let Some(clone) = &self.clone {
            write!(f, "; clone {} was created without overrides", clone.id)?;
        }
        Ok(())
    }
}

impl From<CloneFailure> for EventForgeError {
    fn from(failure: CloneFailure) -> Self {
        Self::CloneFailed(Box::new(failure))
    }
}

/// Result type alias for EventForge operations
pub type Result<T> = std::result::Result<T, EventForgeError>;
