//! Duplication requests
//!
//! A caller asks for one new event per `DuplicateInstance`. The instance is
//! either a bare start timestamp or a `{start, end?}` pair; both normalize to
//! the same `InstanceWindow`.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use super::event::Event;
use super::timestamp::EventTimestamp;
use crate::errors::{EventForgeError, Result};

/// One requested new event, as supplied by a caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DuplicateInstance {
    Start(EventTimestamp),
    Window(InstanceWindow),
}

impl DuplicateInstance {
    /// Collapse both request shapes into a window.
    pub fn normalize(self) -> InstanceWindow {
        match self {
            Self::Start(start) => InstanceWindow { start, end: None },
            Self::Window(window) => window,
        }
    }
}

impl From<EventTimestamp> for DuplicateInstance {
    fn from(start: EventTimestamp) -> Self {
        Self::Start(start)
    }
}

impl From<InstanceWindow> for DuplicateInstance {
    fn from(window: InstanceWindow) -> Self {
        Self::Window(window)
    }
}

/// Normalized start/end request for one new event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceWindow {
    pub start: EventTimestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<EventTimestamp>,
}

impl InstanceWindow {
    pub fn new(start: EventTimestamp, end: Option<EventTimestamp>) -> Self {
        Self { start, end }
    }

    /// Window obtained by moving the template's own start (and end) by
    /// `offset_minutes`.
    ///
    /// # Errors
    /// Returns `EventForgeError::InvalidInput` if the offset or the shifted
    /// timestamps are out of range.
    pub fn shifted(template: &Event, offset_minutes: i64) -> Result<Self> {
        let offset = Duration::try_minutes(offset_minutes).ok_or_else(|| {
            EventForgeError::InvalidInput(format!("offset of {offset_minutes} minutes is out of range"))
        })?;
        let start = template.start_date.checked_add(offset)?;
        let end = template.end_date.map(|end| end.checked_add(offset)).transpose()?;
        Ok(Self { start, end })
    }
}
