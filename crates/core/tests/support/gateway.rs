//! In-memory `EventGateway` for service tests

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use eventforge_core::EventGateway;
use eventforge_domain::{
    CloneFailure, CloneStage, Event, EventDraft, EventForgeError, EventId, EventQuery,
    Result as DomainResult,
};
use parking_lot::Mutex;
use serde_json::json;

/// Gateway call as observed by the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Get(EventId),
    Create(String),
    List,
    Clone(EventId),
    Update(EventId),
}

/// Records every call and keeps cloned/created events in memory.
///
/// Each call yields to the scheduler while marked in flight so overlapping
/// calls would show up in `max_in_flight`.
#[derive(Default, Clone)]
pub struct MockEventGateway {
    events: Arc<Mutex<HashMap<EventId, Event>>>,
    calls: Arc<Mutex<Vec<Call>>>,
    failing_update_starts: Arc<Mutex<HashSet<String>>>,
    next_id: Arc<AtomicUsize>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

impl MockEventGateway {
    /// Gateway seeded with one template event.
    pub fn with_template(template: Event) -> Self {
        let gateway = Self::default();
        gateway.next_id.store(1000, Ordering::SeqCst);
        gateway.events.lock().insert(template.id, template);
        gateway
    }

    /// Make `update_event` fail for events whose start renders as `start`.
    pub fn fail_update_for_start(self, start: &str) -> Self {
        self.failing_update_starts.lock().insert(start.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    async fn enter(&self, call: Call) {
        self.calls.lock().push(call);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        tokio::task::yield_now().await;
    }

    fn leave(&self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }

    fn allocate_id(&self) -> EventId {
        self.next_id.fetch_add(1, Ordering::SeqCst) as EventId + 1
    }
}

#[async_trait]
impl EventGateway for MockEventGateway {
    async fn get_event(&self, event_id: EventId) -> DomainResult<Event> {
        self.enter(Call::Get(event_id)).await;
        let found = self.events.lock().get(&event_id).cloned();
        self.leave();
        found.ok_or_else(|| EventForgeError::NotFound(format!("event {event_id}")))
    }

    async fn create_event(&self, draft: &EventDraft) -> DomainResult<Event> {
        self.enter(Call::Create(draft.name.clone())).await;
        let event = Event {
            id: self.allocate_id(),
            name: draft.name.clone(),
            start_date: draft.start_date,
            end_date: draft.end_date,
            url: None,
            extra: draft.extra.clone(),
        };
        self.events.lock().insert(event.id, event.clone());
        self.leave();
        Ok(event)
    }

    async fn list_events(&self, _query: &EventQuery) -> DomainResult<Vec<Event>> {
        self.enter(Call::List).await;
        let mut events: Vec<Event> = self.events.lock().values().cloned().collect();
        events.sort_by_key(|event| event.id);
        self.leave();
        Ok(events)
    }

    async fn clone_event(&self, template_id: EventId) -> DomainResult<Event> {
        self.enter(Call::Clone(template_id)).await;
        let template = self.events.lock().get(&template_id).cloned();
        let result = match template {
            Some(template) => {
                let mut clone = template;
                clone.id = self.allocate_id();
                self.events.lock().insert(clone.id, clone.clone());
                Ok(clone)
            }
            None => Err(CloneFailure::from_error(
                template_id,
                CloneStage::Clone,
                &EventForgeError::NotFound(format!("event {template_id}")),
            )
            .into()),
        };
        self.leave();
        result
    }

    async fn update_event(&self, event: &Event) -> DomainResult<Event> {
        self.enter(Call::Update(event.id)).await;
        let fail = self.failing_update_starts.lock().contains(&event.start_date.to_string());
        let result = if fail {
            Err(EventForgeError::Remote {
                status: 400,
                body: json!({ "message": "Invalid StartDate" }).to_string(),
            })
        } else {
            self.events.lock().insert(event.id, event.clone());
            Ok(event.clone())
        };
        self.leave();
        result
    }
}

/// Template event `100` named "Open House", 18:00 to 20:00 on 2025-09-01.
pub fn open_house() -> Event {
    serde_json::from_value(json!({
        "Id": 100,
        "Name": "Open House",
        "StartDate": "2025-09-01T18:00:00",
        "EndDate": "2025-09-01T20:00:00",
        "Location": "Main Hall",
        "RegistrationsCount": 12,
        "Url": "https://api.example.org/v2.2/accounts/42/events/100",
    }))
    .expect("valid template fixture")
}
