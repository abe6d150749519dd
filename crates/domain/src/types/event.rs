//! Remote event records
//!
//! Events carry a handful of typed fields the duplication logic needs and an
//! explicit `extra` bag for everything else the remote API sends (location,
//! tags, access rules, registration types, ...). The bag is written back
//! verbatim, so fields this crate knows nothing about survive a clone.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::timestamp::EventTimestamp;
use crate::constants::REMOTE_OWNED_EVENT_FIELDS;
use crate::errors::{EventForgeError, Result};

/// Remote-assigned event identifier
pub type EventId = u64;

/// Tenant identifier scoping every event operation
pub type AccountId = u64;

/// Extension bag for remote fields without a typed counterpart
pub type EventFields = Map<String, Value>;

/// Event as returned by the remote API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Event {
    pub id: EventId,
    pub name: String,
    pub start_date: EventTimestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<EventTimestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(flatten)]
    pub extra: EventFields,
}

impl Event {
    /// Check that `EndDate`, when present, is strictly after `StartDate`.
    ///
    /// # Errors
    /// Returns `EventForgeError::InvalidInput` when the window is empty or
    /// inverted.
    pub fn validate_window(&self) -> Result<()> {
        validate_window(&self.start_date, self.end_date.as_ref())
    }

    /// Merge `overrides` onto this event. Overrides win; `Id` never changes.
    pub fn apply_overrides(&mut self, overrides: EventOverrides) {
        let EventOverrides { name, start_date, end_date, extra } = overrides;

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(start_date) = start_date {
            self.start_date = start_date;
        }
        if let Some(end_date) = end_date {
            self.end_date = Some(end_date);
        }
        for (key, value) in extra {
            merge_extra_field(&mut self.extra, key, value, &mut self.url);
        }
    }

    /// Copy of this event with `overrides` applied.
    pub fn with_overrides(&self, overrides: EventOverrides) -> Self {
        let mut merged = self.clone();
        merged.apply_overrides(overrides);
        merged
    }
}

fn merge_extra_field(extra: &mut EventFields, key: String, value: Value, url: &mut Option<String>) {
    match key.as_str() {
        // typed fields are only set through their own override slots
        "Id" | "Name" | "StartDate" | "EndDate" => {}
        "Url" => *url = value.as_str().map(str::to_string),
        _ => {
            extra.insert(key, value);
        }
    }
}

/// Payload for creating an event; has no `Id` by construction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EventDraft {
    pub name: String,
    pub start_date: EventTimestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<EventTimestamp>,
    #[serde(flatten)]
    pub extra: EventFields,
}

impl EventDraft {
    /// Build a create payload from a fetched event, dropping the fields the
    /// remote API owns (`Id`, `Url`, `RegistrationsCount`, timestamps of record).
    pub fn from_template(template: &Event) -> Self {
        let extra = template
            .extra
            .iter()
            .filter(|(key, _)| !REMOTE_OWNED_EVENT_FIELDS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Self {
            name: template.name.clone(),
            start_date: template.start_date,
            end_date: template.end_date,
            extra,
        }
    }

    /// Apply overrides onto the draft. `Id` and `Url` keys are ignored.
    pub fn apply_overrides(&mut self, overrides: EventOverrides) {
        let EventOverrides { name, start_date, end_date, extra } = overrides;

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(start_date) = start_date {
            self.start_date = start_date;
        }
        if let Some(end_date) = end_date {
            self.end_date = Some(end_date);
        }
        for (key, value) in extra {
            if !REMOTE_OWNED_EVENT_FIELDS.contains(&key.as_str()) {
                self.extra.insert(key, value);
            }
        }
    }

    /// # Errors
    /// Returns `EventForgeError::InvalidInput` when `EndDate` is not after
    /// `StartDate`.
    pub fn validate_window(&self) -> Result<()> {
        validate_window(&self.start_date, self.end_date.as_ref())
    }
}

/// Fields that replace a clone's fields on merge
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EventOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<EventTimestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<EventTimestamp>,
    #[serde(flatten)]
    pub extra: EventFields,
}

impl EventOverrides {
    /// True when applying these overrides would change nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
            && self.extra.is_empty()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn start_date(mut self, start: EventTimestamp) -> Self {
        self.start_date = Some(start);
        self
    }

    pub fn end_date(mut self, end: Option<EventTimestamp>) -> Self {
        self.end_date = end;
        self
    }

    pub fn field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

fn validate_window(start: &EventTimestamp, end: Option<&EventTimestamp>) -> Result<()> {
    match end {
        Some(end) if !end.is_after(start) => Err(EventForgeError::InvalidInput(format!(
            "end {end} must be later than start {start}"
        ))),
        _ => Ok(()),
    }
}
