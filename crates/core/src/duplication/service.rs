//! Event duplication service - core business logic

use std::sync::Arc;

use eventforge_domain::{
    DuplicateInstance, Event, EventDraft, EventForgeError, EventId, EventQuery, InstanceWindow,
    Result,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use super::plan::{plan_instance, InstancePlan, NameFormat};
use super::ports::EventGateway;

/// How each new event is produced from the template
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicationMode {
    /// Remote clone primitive followed by an override update
    #[default]
    Clone,
    /// Fresh create call built from the template's fields
    Create,
}

eventforge_domain::impl_domain_status_conversions!(DuplicationMode {
    Clone => "clone",
    Create => "create",
});

/// A requested instance that did not produce an event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceFailure {
    /// Position of the instance in the request
    pub index: usize,
    pub window: InstanceWindow,
    pub error: EventForgeError,
}

/// Outcome of one duplication batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicationReport {
    pub template_id: EventId,
    /// Created events in request order; failed instances are skipped
    pub created: Vec<Event>,
    pub failures: Vec<InstanceFailure>,
}

impl DuplicationReport {
    fn new(template_id: EventId, capacity: usize) -> Self {
        Self { template_id, created: Vec::with_capacity(capacity), failures: Vec::new() }
    }

    /// True when every requested instance produced an event.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Number of instances the batch was asked for.
    pub fn requested(&self) -> usize {
        self.created.len() + self.failures.len()
    }
}

/// Duplicates a template event across many dates
pub struct DuplicationService {
    gateway: Arc<dyn EventGateway>,
}

impl DuplicationService {
    /// Create a new duplication service
    pub fn new(gateway: Arc<dyn EventGateway>) -> Self {
        Self { gateway }
    }

    /// Fetch a single event.
    pub async fn get_event(&self, event_id: EventId) -> Result<Event> {
        self.gateway.get_event(event_id).await
    }

    /// Create an event from a full payload.
    pub async fn create_event(&self, draft: &EventDraft) -> Result<Event> {
        self.gateway.create_event(draft).await
    }

    /// List events matching `query`.
    pub async fn list_events(&self, query: &EventQuery) -> Result<Vec<Event>> {
        self.gateway.list_events(query).await
    }

    /// Clone `template_id` once per instance using the remote clone primitive.
    ///
    /// # Errors
    /// Only a failed template fetch fails the call; per-instance failures are
    /// recorded in the report and the batch carries on.
    pub async fn clone_event_to_dates(
        &self,
        template_id: EventId,
        instances: Vec<DuplicateInstance>,
        name_format: Option<&NameFormat>,
    ) -> Result<DuplicationReport> {
        self.duplicate(template_id, instances, name_format, DuplicationMode::Clone).await
    }

    /// Duplicate `template_id` once per instance.
    ///
    /// Instances are processed strictly one after another: each clone is a
    /// two-step remote mutation and the API offers no isolation between
    /// overlapping mutations of the same template.
    ///
    /// # Errors
    /// Fails only when the template itself cannot be fetched.
    #[instrument(skip(self, instances, name_format), fields(instances = instances.len()))]
    pub async fn duplicate(
        &self,
        template_id: EventId,
        instances: Vec<DuplicateInstance>,
        name_format: Option<&NameFormat>,
        mode: DuplicationMode,
    ) -> Result<DuplicationReport> {
        let template = self.gateway.get_event(template_id).await?;
        info!(template_id, name = %template.name, %mode, "Loaded template event");

        let mut report = DuplicationReport::new(template_id, instances.len());

        for (index, instance) in instances.into_iter().enumerate() {
            let window = instance.normalize();

            match self.duplicate_one(&template, window, name_format, mode).await {
                Ok(event) => {
                    info!(index, event_id = event.id, start = %event.start_date, "Created event");
                    report.created.push(event);
                }
                Err(error) => {
                    warn!(
                        index,
                        start = %window.start,
                        error = %error,
                        kind = error.label(),
                        "Failed to duplicate instance, continuing with the rest"
                    );
                    report.failures.push(InstanceFailure { index, window, error });
                }
            }
        }

        info!(
            template_id,
            created = report.created.len(),
            failed = report.failures.len(),
            "Duplication batch finished"
        );
        Ok(report)
    }

    /// Plan every instance without creating anything.
    ///
    /// # Errors
    /// Fails when the template cannot be fetched or an instance cannot be
    /// planned.
    pub async fn preview(
        &self,
        template_id: EventId,
        instances: Vec<DuplicateInstance>,
        name_format: Option<&NameFormat>,
    ) -> Result<Vec<InstancePlan>> {
        let template = self.gateway.get_event(template_id).await?;

        instances
            .into_iter()
            .enumerate()
            .map(|(index, instance)| {
                plan_instance(&template, instance.normalize(), name_format).map_err(|err| {
                    EventForgeError::InvalidInput(format!("instance #{}: {err}", index + 1))
                })
            })
            .collect()
    }

    async fn duplicate_one(
        &self,
        template: &Event,
        window: InstanceWindow,
        name_format: Option<&NameFormat>,
        mode: DuplicationMode,
    ) -> Result<Event> {
        let plan = plan_instance(template, window, name_format)?;
        debug!(name = %plan.name, start = %plan.start, "Planned instance");

        match mode {
            DuplicationMode::Clone => {
                self.gateway.clone_event_with_overrides(template.id, plan.to_overrides()).await
            }
            DuplicationMode::Create => {
                let mut draft = EventDraft::from_template(template);
                draft.apply_overrides(plan.to_overrides());
                // a template without an end must not leak its own end into the copy
                draft.end_date = plan.end;
                self.gateway.create_event(&draft).await
            }
        }
    }
}
