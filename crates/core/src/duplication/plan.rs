//! Per-instance planning: start, end and name of each new event
//!
//! Planning is pure; nothing here talks to the remote API. The service runs
//! the same planner for real duplication and for dry-run previews.

use eventforge_domain::constants::{DAY_TOKEN, MONTH_TOKEN, NAME_TOKEN, YEAR_TOKEN};
use eventforge_domain::{
    Event, EventForgeError, EventOverrides, EventTimestamp, InstanceWindow, Result,
};
use serde::{Deserialize, Serialize};

/// Name template such as `"${NAME} (${MM}/${DD})"`
///
/// Supported tokens: `${NAME}` (template name), `${YYYY}` (4-digit year),
/// `${MM}` and `${DD}` (zero-padded month and day of the instance start).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NameFormat(String);

impl NameFormat {
    pub fn new(format: impl Into<String>) -> Self {
        Self(format.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Substitute every token occurrence for an instance starting at `start`.
    pub fn render(&self, template_name: &str, start: &EventTimestamp) -> String {
        // date tokens first so a template name containing "${MM}" stays literal
        self.0
            .replace(YEAR_TOKEN, &format!("{:04}", start.year()))
            .replace(MONTH_TOKEN, &format!("{:02}", start.month()))
            .replace(DAY_TOKEN, &format!("{:02}", start.day()))
            .replace(NAME_TOKEN, template_name)
    }
}

impl From<&str> for NameFormat {
    fn from(format: &str) -> Self {
        Self::new(format)
    }
}

impl From<String> for NameFormat {
    fn from(format: String) -> Self {
        Self(format)
    }
}

/// Computed fields for one new event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstancePlan {
    pub name: String,
    pub start: EventTimestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<EventTimestamp>,
}

impl InstancePlan {
    /// Overrides that turn a fresh clone of the template into this instance.
    pub fn to_overrides(&self) -> EventOverrides {
        EventOverrides::default().name(self.name.clone()).start_date(self.start).end_date(self.end)
    }
}

/// Plan one instance against `template`.
///
/// The end is the explicit window end when given; otherwise the template's
/// duration is preserved from the new start; a template without an end gives
/// an instance without one.
///
/// # Errors
/// Returns `EventForgeError::InvalidInput` when the resulting end is not
/// strictly after the start.
pub fn plan_instance(
    template: &Event,
    window: InstanceWindow,
    name_format: Option<&NameFormat>,
) -> Result<InstancePlan> {
    let end = match (window.end, template.end_date) {
        (Some(end), _) => Some(end),
        (None, Some(template_end)) => {
            let duration = template_end.duration_since(&template.start_date);
            Some(window.start.checked_add(duration)?)
        }
        (None, None) => None,
    };

    if let Some(end) = &end {
        if !end.is_after(&window.start) {
            return Err(EventForgeError::InvalidInput(format!(
                "end {end} must be later than start {}",
                window.start
            )));
        }
    }

    let name = match name_format {
        Some(format) => format.render(&template.name, &window.start),
        None => template.name.clone(),
    };

    Ok(InstancePlan { name, start: window.start, end })
}
