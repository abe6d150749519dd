//! Port interfaces for event duplication

use async_trait::async_trait;
use eventforge_domain::{
    CloneFailure, CloneStage, Event, EventDraft, EventId, EventOverrides, EventQuery, Result,
};
use tracing::warn;

/// Typed read/write operations against the remote event resource
///
/// Implementations resolve credentials and the account id themselves; callers
/// only deal in events.
#[async_trait]
pub trait EventGateway: Send + Sync {
    /// Fetch a single event.
    ///
    /// Fails with `NotFound` when the remote reports 404 and `Remote` for any
    /// other non-success status.
    async fn get_event(&self, event_id: EventId) -> Result<Event>;

    /// Create an event from a full payload.
    async fn create_event(&self, draft: &EventDraft) -> Result<Event>;

    /// List events matching `query`, ordered by `StartDate` ascending.
    async fn list_events(&self, query: &EventQuery) -> Result<Vec<Event>>;

    /// Invoke the remote clone primitive and materialize the new event.
    ///
    /// Any failure, in the clone call or in the follow-up fetch, is reported
    /// as `CloneFailed` carrying the template id and upstream status/body.
    async fn clone_event(&self, template_id: EventId) -> Result<Event>;

    /// Write the full event object (including `Id`) back to the remote API.
    async fn update_event(&self, event: &Event) -> Result<Event>;

    /// Clone `template_id`, then write `overrides` onto the clone.
    ///
    /// With empty overrides this is exactly `clone_event`. The remote API has
    /// no atomic clone-with-overrides, so when the update step fails the error
    /// carries the bare clone that now exists remotely.
    async fn clone_event_with_overrides(
        &self,
        template_id: EventId,
        overrides: EventOverrides,
    ) -> Result<Event> {
        let clone = self.clone_event(template_id).await?;
        if overrides.is_empty() {
            return Ok(clone);
        }

        let merged = clone.with_overrides(overrides);
        match self.update_event(&merged).await {
            Ok(updated) => Ok(updated),
            Err(err) => {
                warn!(
                    template_id,
                    clone_id = clone.id,
                    error = %err,
                    "clone created but applying overrides failed"
                );
                Err(CloneFailure::from_error(template_id, CloneStage::Update, &err)
                    .with_clone(clone)
                    .into())
            }
        }
    }
}
