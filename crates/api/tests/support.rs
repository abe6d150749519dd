//! Shared fixtures for HTTP route tests

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, Response};
use axum::Router;
use eventforge_api::{build_router, AppContext};
use eventforge_core::EventGateway;
use eventforge_domain::{
    Config, Event, EventDraft, EventForgeError, EventId, EventQuery, Result as DomainResult,
};
use parking_lot::Mutex;
use serde_json::{json, Value};
use tower::ServiceExt;

/// In-memory gateway: clones get sequential ids starting at 500.
#[derive(Default)]
pub struct FakeGateway {
    events: Mutex<HashMap<EventId, Event>>,
    queries: Mutex<Vec<EventQuery>>,
    next_id: Mutex<EventId>,
}

impl FakeGateway {
    pub fn with_events(events: impl IntoIterator<Item = Event>) -> Arc<Self> {
        let gateway = Self { next_id: Mutex::new(500), ..Self::default() };
        gateway.events.lock().extend(events.into_iter().map(|event| (event.id, event)));
        Arc::new(gateway)
    }

    pub fn empty() -> Arc<Self> {
        Self::with_events(Vec::new())
    }

    pub fn queries(&self) -> Vec<EventQuery> {
        self.queries.lock().clone()
    }

    fn store(&self, mut event: Event) -> Event {
        let mut next_id = self.next_id.lock();
        event.id = *next_id;
        *next_id += 1;
        self.events.lock().insert(event.id, event.clone());
        event
    }
}

#[async_trait]
impl EventGateway for FakeGateway {
    async fn get_event(&self, event_id: EventId) -> DomainResult<Event> {
        self.events
            .lock()
            .get(&event_id)
            .cloned()
            .ok_or_else(|| EventForgeError::NotFound(format!("event {event_id}")))
    }

    async fn create_event(&self, draft: &EventDraft) -> DomainResult<Event> {
        Ok(self.store(Event {
            id: 0,
            name: draft.name.clone(),
            start_date: draft.start_date,
            end_date: draft.end_date,
            url: None,
            extra: draft.extra.clone(),
        }))
    }

    async fn list_events(&self, query: &EventQuery) -> DomainResult<Vec<Event>> {
        self.queries.lock().push(query.clone());
        let mut events: Vec<Event> = self.events.lock().values().cloned().collect();
        events.sort_by_key(|event| event.start_date.ordering_key());
        Ok(events)
    }

    async fn clone_event(&self, template_id: EventId) -> DomainResult<Event> {
        let template = self.get_event(template_id).await?;
        Ok(self.store(template))
    }

    async fn update_event(&self, event: &Event) -> DomainResult<Event> {
        self.events.lock().insert(event.id, event.clone());
        Ok(event.clone())
    }
}

pub fn event(id: EventId, name: &str, start: &str, end: &str) -> Event {
    serde_json::from_value(json!({
        "Id": id,
        "Name": name,
        "StartDate": start,
        "EndDate": end,
        "Location": "Main Hall",
    }))
    .expect("valid event fixture")
}

pub fn router_for(gateway: Arc<FakeGateway>) -> Router {
    let ctx = AppContext::with_gateway(Config::with_api_key("test-key"), gateway);
    build_router(Arc::new(ctx))
}

pub async fn send(router: Router, request: Request<Body>) -> (Response<Body>, Value) {
    let response = router.oneshot(request).await.expect("router response");
    let (parts, body) = response.into_parts();
    let bytes = to_bytes(body, usize::MAX).await.expect("read response body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("response body is json")
    };
    (Response::from_parts(parts, Body::empty()), value)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().method("GET").uri(uri).body(Body::empty()).expect("request")
}

pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}
