//! Port interfaces for event storage
//!
//! These traits define the boundaries between core business logic
//! and infrastructure implementations. They are synchronous; every call is
//! a short, bounded store operation.

use std::collections::{BTreeSet, HashMap};

use chrono::NaiveDate;
use uuid::Uuid;
use wiss_domain::{
    AreaId, DateRange, Event, EventArea, EventDate, EventDateInstance, EventDraft, EventId,
    Label, LocaleId, Result,
};

/// Trait for persisting events and their recurrence rows
pub trait EventRepository: Send + Sync {
    /// Write the event, its recurrence rows and its category/area links in
    /// one transaction. Returns only after the transaction has committed.
    fn save_event(&self, draft: &EventDraft) -> Result<EventId>;

    /// Load one event with its categories and areas
    fn find_event(&self, id: EventId) -> Result<Option<Event>>;

    /// Recurrence rows belonging to an event
    fn event_dates(&self, event_id: EventId) -> Result<Vec<EventDate>>;

    /// Delete an event together with everything it owns
    fn delete_event(&self, id: EventId) -> Result<()>;

    /// All non-archived events in a locale, with categories and areas
    fn list_published(&self, locale_id: LocaleId) -> Result<Vec<Event>>;
}

/// Trait for the materialised `(event, date)` cache
pub trait DateInstanceRepository: Send + Sync {
    /// Atomically replace every instance of an event with `dates`.
    ///
    /// On failure the previously stored instances must be left untouched.
    fn replace_instances(&self, event_id: EventId, dates: &BTreeSet<NaiveDate>) -> Result<()>;

    /// Read the event's recurrence rows and replace every instance of the
    /// event with `expand(rows)`, returning the number of dates stored.
    ///
    /// The read and the replacement form one unit that is serialised against
    /// every other write, so two rebuilds of the same event never interleave
    /// and the cache always reflects the rows it was read from. On failure
    /// the previously stored instances must be left untouched.
    fn rebuild_from_rules(
        &self,
        event_id: EventId,
        expand: &dyn Fn(&[EventDate]) -> BTreeSet<NaiveDate>,
    ) -> Result<usize>;

    /// Instances of one event, ordered by date
    fn instances_for_event(&self, event_id: EventId) -> Result<Vec<EventDateInstance>>;

    /// Earliest instance date within `range` for every event in the locale
    /// that has at least one instance there.
    fn first_occurrences(
        &self,
        range: &DateRange,
        locale_id: LocaleId,
    ) -> Result<HashMap<EventId, NaiveDate>>;
}

/// Trait for translatable lookup records
pub trait TaxonomyRepository: Send + Sync {
    /// Areas with the given row ids, in any locale
    fn areas_by_ids(&self, ids: &[AreaId]) -> Result<Vec<EventArea>>;

    /// Areas of one locale belonging to any of the translation groups
    fn areas_by_translation_keys(
        &self,
        keys: &[Uuid],
        locale_id: LocaleId,
    ) -> Result<Vec<EventArea>>;

    /// Every area of a locale, ordered by name
    fn areas_for_locale(&self, locale_id: LocaleId) -> Result<Vec<EventArea>>;

    /// UI labels of a locale
    fn labels_for_locale(&self, locale_id: LocaleId) -> Result<Vec<Label>>;
}
