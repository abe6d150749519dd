//! Event commands: listing, lookup, duplication and dry-run previews
//!
//! Each handler times itself and reports through
//! `log_command_result`, mirroring how the CLI logs the same operations.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::Json;
use eventforge_core::{DuplicationMode, DuplicationReport, InstanceFailure, InstancePlan, NameFormat};
use eventforge_domain::{DuplicateInstance, Event, EventId, EventQuery, EventTimestamp};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::context::AppContext;
use crate::error::ApiError;
use crate::utils::logging::log_command_result;

/// Body of `POST /api/events/duplicate` and its preview
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateRequest {
    pub template_id: i64,
    #[serde(default)]
    pub instances: Vec<DuplicateInstance>,
    /// Bare start times, appended after `instances`
    #[serde(default)]
    pub starts: Vec<EventTimestamp>,
    #[serde(default)]
    pub name_format: Option<NameFormat>,
    #[serde(default)]
    pub mode: DuplicationMode,
}

impl DuplicateRequest {
    /// Validated template id and the combined instance list.
    ///
    /// # Errors
    /// Rejects a non-positive template id or an empty instance list.
    pub fn into_parts(self) -> Result<(EventId, Vec<DuplicateInstance>), ApiError> {
        let template_id = positive_id(self.template_id, "templateId")?;

        let mut instances = self.instances;
        instances.extend(self.starts.into_iter().map(DuplicateInstance::Start));
        if instances.is_empty() {
            return Err(ApiError::bad_request("at least one instance is required"));
        }

        Ok((template_id, instances))
    }
}

/// Body returned by `POST /api/events/duplicate`
#[derive(Debug, Clone, Serialize)]
pub struct DuplicateResponse {
    pub created: Vec<Event>,
    pub failures: Vec<InstanceFailure>,
}

impl From<DuplicationReport> for DuplicateResponse {
    fn from(report: DuplicationReport) -> Self {
        Self { created: report.created, failures: report.failures }
    }
}

/// `GET /api/events`
pub async fn list_events(
    State(ctx): State<Arc<AppContext>>,
    query: Result<Query<EventQuery>, QueryRejection>,
) -> Result<Json<Vec<Event>>, ApiError> {
    let Query(query) = query?;
    let start = Instant::now();

    let result = ctx.duplication.list_events(&query).await;
    log_command_result("events::list", start.elapsed(), &result);

    Ok(Json(result?))
}

/// `GET /api/events/{id}`
pub async fn get_event(
    State(ctx): State<Arc<AppContext>>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Event>, ApiError> {
    let Path(id) = id?;
    let event_id = positive_id(id, "event id")?;
    let start = Instant::now();

    let result = ctx.duplication.get_event(event_id).await;
    log_command_result("events::get", start.elapsed(), &result);

    Ok(Json(result?))
}

/// `POST /api/events/duplicate`
///
/// Per-instance failures are part of a successful response; only a bad
/// request or an unreachable template turns into an error status.
pub async fn duplicate_events(
    State(ctx): State<Arc<AppContext>>,
    body: Result<Json<DuplicateRequest>, JsonRejection>,
) -> Result<Json<DuplicateResponse>, ApiError> {
    let Json(request) = body?;
    let name_format = request.name_format.clone();
    let mode = request.mode;
    let (template_id, instances) = request.into_parts()?;
    info!(template_id, instances = instances.len(), %mode, "Duplicate request received");
    let start = Instant::now();

    let result =
        ctx.duplication.duplicate(template_id, instances, name_format.as_ref(), mode).await;
    log_command_result("events::duplicate", start.elapsed(), &result);

    Ok(Json(result?.into()))
}

/// `POST /api/events/duplicate/preview`
pub async fn preview_duplicates(
    State(ctx): State<Arc<AppContext>>,
    body: Result<Json<DuplicateRequest>, JsonRejection>,
) -> Result<Json<Vec<InstancePlan>>, ApiError> {
    let Json(request) = body?;
    let name_format = request.name_format.clone();
    let (template_id, instances) = request.into_parts()?;
    let start = Instant::now();

    let result = ctx.duplication.preview(template_id, instances, name_format.as_ref()).await;
    log_command_result("events::preview", start.elapsed(), &result);

    Ok(Json(result?))
}

fn positive_id(raw: i64, field: &str) -> Result<EventId, ApiError> {
    EventId::try_from(raw)
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| ApiError::bad_request(format!("{field} must be a positive integer")))
}
