//! Event lifecycle - save, then recompute date instances
//!
//! Recomputation only ever runs after the repository has committed the
//! event and its recurrence rows, so instances are never materialised for a
//! save that was rolled back.

use std::sync::Arc;

use tracing::{error, info, instrument};
use wiss_domain::{EventDraft, EventId, Result, WissError};

use super::instances::DateInstanceStore;
use super::ports::EventRepository;

/// Event lifecycle service
pub struct EventLifecycle {
    events: Arc<dyn EventRepository>,
    instances: DateInstanceStore,
}

impl EventLifecycle {
    /// Create a new lifecycle service
    pub fn new(events: Arc<dyn EventRepository>, instances: DateInstanceStore) -> Self {
        Self { events, instances }
    }

    /// Persist an event, then materialise its instances.
    ///
    /// A recompute failure is returned as [`WissError::RecomputeFailed`];
    /// the event itself has already been committed at that point.
    #[instrument(skip(self, draft), fields(title = %draft.title))]
    pub fn save_event(&self, draft: &EventDraft) -> Result<EventId> {
        let event_id = self.events.save_event(draft)?;
        self.on_event_saved(event_id)?;

        info!(event_id, "Saved event");
        Ok(event_id)
    }

    /// Regenerate the instances of an already committed event.
    ///
    /// Idempotent for unchanged recurrence rows. The rows are read inside
    /// the same write as the replacement, so a concurrent save of the event
    /// cannot leave the cache built from superseded rows. On failure the
    /// previously stored instances stay in place.
    #[instrument(skip(self))]
    pub fn on_event_saved(&self, event_id: EventId) -> Result<usize> {
        self.instances.rebuild_from_rules(event_id).map_err(|err| {
            error!(event_id, error = %err, "Failed to recompute date instances");
            match err {
                WissError::RecomputeFailed { .. } => err,
                other => WissError::RecomputeFailed { event_id, reason: other.to_string() },
            }
        })
    }

    /// Delete an event; its recurrence rows and instances go with it.
    #[instrument(skip(self))]
    pub fn delete_event(&self, event_id: EventId) -> Result<()> {
        self.events.delete_event(event_id)?;
        info!(event_id, "Deleted event");
        Ok(())
    }
}
