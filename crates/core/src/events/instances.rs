//! Materialised date-instance store
//!
//! Keeps the `(event, date)` cache in step with the recurrence rows. The
//! cache is always replaced wholesale; individual instances are never edited.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info, instrument};
use wiss_domain::{DateRange, EventDate, EventDateInstance, EventId, LocaleId, Result};

use super::ports::DateInstanceRepository;
use super::recurrence::expand_rules;

/// Date-instance store service
#[derive(Clone)]
pub struct DateInstanceStore {
    repository: Arc<dyn DateInstanceRepository>,
}

impl DateInstanceStore {
    /// Create a new store over the given repository
    pub fn new(repository: Arc<dyn DateInstanceRepository>) -> Self {
        Self { repository }
    }

    /// Replace the event's instances with the deduplicated `dates`.
    ///
    /// Returns the number of distinct dates stored.
    #[instrument(skip(self, dates))]
    pub fn rebuild<I>(&self, event_id: EventId, dates: I) -> Result<usize>
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        let unique: BTreeSet<NaiveDate> = dates.into_iter().collect();
        self.repository.replace_instances(event_id, &unique)?;

        info!(event_id, count = unique.len(), "Rebuilt date instances");
        Ok(unique.len())
    }

    /// Regenerate the event's instances from its current recurrence rows.
    ///
    /// The rows are read and the instances replaced as one serialised write.
    #[instrument(skip(self))]
    pub fn rebuild_from_rules(&self, event_id: EventId) -> Result<usize> {
        let count = self
            .repository
            .rebuild_from_rules(event_id, &|rules: &[EventDate]| expand_rules(rules))?;

        info!(event_id, count, "Rebuilt date instances from recurrence rows");
        Ok(count)
    }

    /// Events in the locale with at least one instance inside `range`.
    #[instrument(skip(self))]
    pub fn query(&self, range: &DateRange, locale_id: LocaleId) -> Result<BTreeSet<EventId>> {
        let ids: BTreeSet<EventId> =
            self.repository.first_occurrences(range, locale_id)?.into_keys().collect();

        debug!(count = ids.len(), "Events with instances in range");
        Ok(ids)
    }

    /// Earliest instance date inside `range` per event in the locale.
    pub fn first_occurrences(
        &self,
        range: &DateRange,
        locale_id: LocaleId,
    ) -> Result<HashMap<EventId, NaiveDate>> {
        self.repository.first_occurrences(range, locale_id)
    }

    /// Stored instances of one event, ordered by date.
    pub fn instances(&self, event_id: EventId) -> Result<Vec<EventDateInstance>> {
        self.repository.instances_for_event(event_id)
    }
}
