//! Mock repository implementations for testing
//!
//! Provides in-memory mocks for all core repository ports, enabling
//! deterministic tests without database dependencies.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use uuid::Uuid;
use wiss_core::{DateInstanceRepository, EventRepository, MapPolygonRepository, TaxonomyRepository};
use wiss_domain::{
    AreaId, DateRange, Event, EventArea, EventDate, EventDateInstance, EventDraft, EventId,
    EventsCategory, Label, LocaleId, MapPolygon, PolygonId, Result as DomainResult, WissError,
};

#[derive(Default)]
struct EventState {
    next_event_id: EventId,
    next_date_id: i64,
    events: BTreeMap<EventId, Event>,
    dates: BTreeMap<EventId, Vec<EventDate>>,
}

/// In-memory mock for `EventRepository`.
///
/// Resolves category and area ids against the catalogues it was built with.
#[derive(Default, Clone)]
pub struct MockEventRepository {
    state: Arc<Mutex<EventState>>,
    categories: Arc<Vec<EventsCategory>>,
    areas: Arc<Vec<EventArea>>,
}

impl MockEventRepository {
    pub fn new(categories: Vec<EventsCategory>, areas: Vec<EventArea>) -> Self {
        Self { categories: Arc::new(categories), areas: Arc::new(areas), ..Self::default() }
    }

    /// Locale of a stored event, used by the instance mock for scoping.
    pub fn locale_of(&self, id: EventId) -> Option<LocaleId> {
        self.state.lock().unwrap().events.get(&id).map(|e| e.locale_id)
    }

    pub fn event_count(&self) -> usize {
        self.state.lock().unwrap().events.len()
    }
}

impl EventRepository for MockEventRepository {
    fn save_event(&self, draft: &EventDraft) -> DomainResult<EventId> {
        let mut state = self.state.lock().unwrap();

        let id = match draft.id {
            Some(id) if state.events.contains_key(&id) => id,
            Some(id) => return Err(WissError::NotFound(format!("event {id}"))),
            None => {
                state.next_event_id += 1;
                state.next_event_id
            }
        };

        let event = Event {
            id,
            title: draft.title.clone(),
            slug: draft.slug.clone(),
            description: draft.description.clone(),
            location: draft.location.clone(),
            geolocation: draft.geolocation.clone(),
            address: draft.address.clone(),
            zoom: draft.zoom,
            page_link: draft.page_link.clone(),
            use_page_title: draft.use_page_title,
            url_link: draft.url_link.clone(),
            archived: draft.archived,
            locale_id: draft.locale_id,
            translation_key: draft.translation_key.unwrap_or_else(Uuid::new_v4),
            categories: self
                .categories
                .iter()
                .filter(|c| draft.category_ids.contains(&c.id))
                .cloned()
                .collect(),
            areas: self.areas.iter().filter(|a| draft.area_ids.contains(&a.id)).cloned().collect(),
        };

        let mut rows = Vec::with_capacity(draft.dates.len());
        for d in &draft.dates {
            state.next_date_id += 1;
            rows.push(EventDate {
                id: state.next_date_id,
                event_id: id,
                start_date: d.start_date,
                end_date: d.end_date,
                frequency: d.frequency,
                interval: d.interval,
            });
        }

        state.events.insert(id, event);
        state.dates.insert(id, rows);
        Ok(id)
    }

    fn find_event(&self, id: EventId) -> DomainResult<Option<Event>> {
        Ok(self.state.lock().unwrap().events.get(&id).cloned())
    }

    fn event_dates(&self, event_id: EventId) -> DomainResult<Vec<EventDate>> {
        Ok(self.state.lock().unwrap().dates.get(&event_id).cloned().unwrap_or_default())
    }

    fn delete_event(&self, id: EventId) -> DomainResult<()> {
        let mut state = self.state.lock().unwrap();
        state.events.remove(&id).ok_or_else(|| WissError::NotFound(format!("event {id}")))?;
        state.dates.remove(&id);
        Ok(())
    }

    fn list_published(&self, locale_id: LocaleId) -> DomainResult<Vec<Event>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .events
            .values()
            .filter(|e| !e.archived && e.locale_id == locale_id)
            .cloned()
            .collect())
    }
}

/// In-memory mock for `DateInstanceRepository`.
///
/// `fail_next_replace` makes the next replacement fail without touching the
/// stored set, the way an aborted transaction would.
#[derive(Clone)]
pub struct MockInstanceRepository {
    events: MockEventRepository,
    instances: Arc<Mutex<BTreeMap<EventId, BTreeSet<NaiveDate>>>>,
    fail_next: Arc<AtomicBool>,
    replace_calls: Arc<Mutex<usize>>,
}

impl MockInstanceRepository {
    pub fn new(events: MockEventRepository) -> Self {
        Self {
            events,
            instances: Arc::default(),
            fail_next: Arc::new(AtomicBool::new(false)),
            replace_calls: Arc::default(),
        }
    }

    pub fn fail_next_replace(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    pub fn dates_of(&self, event_id: EventId) -> BTreeSet<NaiveDate> {
        self.instances.lock().unwrap().get(&event_id).cloned().unwrap_or_default()
    }

    pub fn replace_calls(&self) -> usize {
        *self.replace_calls.lock().unwrap()
    }

    fn begin_replace(&self) -> DomainResult<()> {
        *self.replace_calls.lock().unwrap() += 1;
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(WissError::Database("database is locked".into()));
        }
        Ok(())
    }
}

impl DateInstanceRepository for MockInstanceRepository {
    fn replace_instances(
        &self,
        event_id: EventId,
        dates: &BTreeSet<NaiveDate>,
    ) -> DomainResult<()> {
        let mut instances = self.instances.lock().unwrap();
        self.begin_replace()?;
        instances.insert(event_id, dates.clone());
        Ok(())
    }

    fn rebuild_from_rules(
        &self,
        event_id: EventId,
        expand: &dyn Fn(&[EventDate]) -> BTreeSet<NaiveDate>,
    ) -> DomainResult<usize> {
        // Holding the instance lock across the read serialises rebuilds.
        let mut instances = self.instances.lock().unwrap();
        self.begin_replace()?;
        let dates = expand(&self.events.event_dates(event_id)?);
        let count = dates.len();
        instances.insert(event_id, dates);
        Ok(count)
    }

    fn instances_for_event(&self, event_id: EventId) -> DomainResult<Vec<EventDateInstance>> {
        Ok(self
            .dates_of(event_id)
            .into_iter()
            .map(|date| EventDateInstance { event_id, date })
            .collect())
    }

    fn first_occurrences(
        &self,
        range: &DateRange,
        locale_id: LocaleId,
    ) -> DomainResult<HashMap<EventId, NaiveDate>> {
        let instances = self.instances.lock().unwrap();
        Ok(instances
            .iter()
            .filter(|(id, _)| self.events.locale_of(**id) == Some(locale_id))
            .filter_map(|(id, dates)| {
                dates.iter().find(|d| range.contains(**d)).map(|first| (*id, *first))
            })
            .collect())
    }
}

/// In-memory mock for `TaxonomyRepository`.
#[derive(Default, Clone)]
pub struct MockTaxonomyRepository {
    areas: Arc<Vec<EventArea>>,
    labels: Arc<Vec<Label>>,
}

impl MockTaxonomyRepository {
    pub fn new(areas: Vec<EventArea>, labels: Vec<Label>) -> Self {
        Self { areas: Arc::new(areas), labels: Arc::new(labels) }
    }
}

impl TaxonomyRepository for MockTaxonomyRepository {
    fn areas_by_ids(&self, ids: &[AreaId]) -> DomainResult<Vec<EventArea>> {
        Ok(self.areas.iter().filter(|a| ids.contains(&a.id)).cloned().collect())
    }

    fn areas_by_translation_keys(
        &self,
        keys: &[Uuid],
        locale_id: LocaleId,
    ) -> DomainResult<Vec<EventArea>> {
        Ok(self
            .areas
            .iter()
            .filter(|a| a.locale_id == locale_id && keys.contains(&a.translation_key))
            .cloned()
            .collect())
    }

    fn areas_for_locale(&self, locale_id: LocaleId) -> DomainResult<Vec<EventArea>> {
        let mut areas: Vec<EventArea> =
            self.areas.iter().filter(|a| a.locale_id == locale_id).cloned().collect();
        areas.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(areas)
    }

    fn labels_for_locale(&self, locale_id: LocaleId) -> DomainResult<Vec<Label>> {
        Ok(self.labels.iter().filter(|l| l.locale_id == locale_id).cloned().collect())
    }
}

/// In-memory mock for `MapPolygonRepository`.
#[derive(Default, Clone)]
pub struct MockMapPolygonRepository {
    polygons: Arc<Vec<MapPolygon>>,
}

impl MockMapPolygonRepository {
    pub fn new(polygons: Vec<MapPolygon>) -> Self {
        Self { polygons: Arc::new(polygons) }
    }
}

impl MapPolygonRepository for MockMapPolygonRepository {
    fn polygons_by_translation_keys(
        &self,
        keys: &[Uuid],
        locale_id: LocaleId,
    ) -> DomainResult<Vec<MapPolygon>> {
        Ok(self
            .polygons
            .iter()
            .filter(|p| p.locale_id == locale_id && keys.contains(&p.translation_key))
            .cloned()
            .collect())
    }

    fn find_polygon(&self, id: PolygonId) -> DomainResult<Option<MapPolygon>> {
        Ok(self.polygons.iter().find(|p| p.id == id).cloned())
    }
}
