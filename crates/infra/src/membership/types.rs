//! Wire shapes of the membership API that never leave this module

use eventforge_domain::{AccountId, Event, EventForgeError, EventId, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Successful client-credentials exchange
#[derive(Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: i64,
}

/// Body of `POST /rpc/{account}/CloneEvent`
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CloneEventRequest {
    pub event_id: EventId,
}

/// `GET /accounts/{a}/events` answers with either a bare array or an envelope.
#[derive(Deserialize)]
#[serde(untagged)]
pub enum EventsPayload {
    List(Vec<Event>),
    Envelope {
        #[serde(rename = "Events", default)]
        events: Vec<Event>,
    },
}

impl EventsPayload {
    pub fn into_events(self) -> Vec<Event> {
        match self {
            Self::List(events) | Self::Envelope { events } => events,
        }
    }
}

/// Decode the events listing. Unknown shapes yield an empty list.
///
/// # Errors
/// Returns `EventForgeError::Internal` when an item in a recognized shape is
/// not a valid event.
pub fn parse_events(body: Value) -> Result<Vec<Event>> {
    let recognized = body.is_array() || body.get("Events").is_some_and(Value::is_array);
    if !recognized {
        return Ok(Vec::new());
    }

    serde_json::from_value::<EventsPayload>(body)
        .map(EventsPayload::into_events)
        .map_err(|e| EventForgeError::Internal(format!("malformed events listing: {e}")))
}

/// Extract the numeric id of the first account in `GET /accounts`.
///
/// # Errors
/// Returns `EventForgeError::Discovery` for an empty list, a non-array body
/// or a missing, zero or non-numeric `Id`.
pub fn first_account_id(body: &Value) -> Result<AccountId> {
    let first = body
        .as_array()
        .and_then(|accounts| accounts.first())
        .ok_or_else(|| EventForgeError::Discovery("no accounts returned by the API".into()))?;

    let id = first
        .get("Id")
        .ok_or_else(|| EventForgeError::Discovery("first account has no Id".into()))?;

    numeric_id(id).filter(|account| *account != 0).ok_or_else(|| {
        EventForgeError::Discovery(format!("account Id is not a positive number: {id}"))
    })
}

/// Extract the new event id from a `CloneEvent` response: a number, a
/// numeric string, or an object with `Id`.
pub fn cloned_event_id(body: &Value) -> Option<EventId> {
    match body {
        Value::Object(map) => map.get("Id").and_then(numeric_id),
        other => numeric_id(other),
    }
}

fn numeric_id(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
