//! Event filtering by category, date range and area within one locale
//!
//! Date matching reads the materialised instances, never the recurrence
//! rows. Area matching goes through translation keys so that areas picked
//! in one locale select events tagged with the locale-specific copies.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, instrument};
use uuid::Uuid;
use wiss_domain::{
    CategoryId, DateRange, Event, EventArea, EventId, EventsCategory, Locale, Result,
};

use super::instances::DateInstanceStore;
use super::ports::EventRepository;

/// Filter criteria; empty collections and an unbounded range disable the
/// corresponding predicate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventFilter {
    pub categories: Vec<EventsCategory>,
    pub dates: DateRange,
    pub areas: Vec<EventArea>,
}

impl EventFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Match events in any of these categories.
    pub fn with_categories(mut self, categories: Vec<EventsCategory>) -> Self {
        self.categories = categories;
        self
    }

    /// Match events with an instance on or between these dates.
    pub fn with_dates(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.dates = DateRange::new(from, to);
        self
    }

    /// Match events tagged with any translation of these areas.
    pub fn with_areas(mut self, areas: Vec<EventArea>) -> Self {
        self.areas = areas;
        self
    }

    fn category_ids(&self) -> Vec<CategoryId> {
        self.categories.iter().map(|c| c.id).collect()
    }

    fn area_keys(&self) -> Vec<Uuid> {
        self.areas.iter().map(|a| a.translation_key).collect()
    }
}

/// Event filter engine
#[derive(Clone)]
pub struct EventFilterEngine {
    events: Arc<dyn EventRepository>,
    instances: DateInstanceStore,
}

impl EventFilterEngine {
    /// Create a new filter engine
    pub fn new(events: Arc<dyn EventRepository>, instances: DateInstanceStore) -> Self {
        Self { events, instances }
    }

    /// Non-archived events of `locale` matching every active predicate.
    ///
    /// Results are ordered by their earliest instance date (inside the date
    /// range when one is given) ascending. Events without any instance come
    /// last. Ties are broken by event id.
    #[instrument(skip(self, filter), fields(locale = %locale))]
    pub fn filter(&self, filter: &EventFilter, locale: &Locale) -> Result<Vec<Event>> {
        let category_ids = filter.category_ids();
        let area_keys = filter.area_keys();
        let first_dates = self.instances.first_occurrences(&filter.dates, locale.id)?;

        let mut events: Vec<Event> = self
            .events
            .list_published(locale.id)?
            .into_iter()
            .filter(|e| !e.archived && e.locale_id == locale.id)
            .filter(|e| category_ids.is_empty() || e.has_any_category(&category_ids))
            .filter(|e| filter.dates.is_unbounded() || first_dates.contains_key(&e.id))
            .filter(|e| area_keys.is_empty() || e.has_any_area_group(&area_keys))
            .collect();

        events.sort_by(|a, b| by_first_occurrence(&first_dates, a, b));
        events.dedup_by_key(|e| e.id);

        debug!(count = events.len(), "Filtered events");
        Ok(events)
    }
}

fn by_first_occurrence(first: &HashMap<EventId, NaiveDate>, a: &Event, b: &Event) -> Ordering {
    match (first.get(&a.id), first.get(&b.id)) {
        (Some(x), Some(y)) => x.cmp(y).then(a.id.cmp(&b.id)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.id.cmp(&b.id),
    }
}
