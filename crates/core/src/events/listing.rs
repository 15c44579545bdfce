//! Event listing driven by request query parameters
//!
//! Builds everything an events page renders: the filtered and paginated
//! events, map markers for the events on the page, the locale's areas and
//! labels, and the filter values echoed back.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;
use tracing::{debug, instrument, warn};
use wiss_domain::constants::DEFAULT_PAGE_SIZE;
use wiss_domain::{
    parse_wkt_point, AreaId, Event, EventArea, EventsCategory, Locale, MapMarker, Result,
    WissError,
};

use super::filter::{EventFilter, EventFilterEngine};
use super::ports::TaxonomyRepository;
use crate::pagination::{paginate, Page};

const DATETIME_FORMATS: &[&str] =
    &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"];

/// Decoded query string, keeping repeated keys in order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// Decode an `application/x-www-form-urlencoded` query string.
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let pairs = url::form_urlencoded::parse(query.as_bytes()).into_owned().collect();
        Self { pairs }
    }

    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self { pairs: pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect() }
    }

    /// Last value given for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs.iter().rev().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    /// Every value given for `key`, in order.
    pub fn get_all(&self, key: &str) -> Vec<&str> {
        self.pairs.iter().filter(|(k, _)| k == key).map(|(_, v)| v.as_str()).collect()
    }
}

/// Rendered state of an events listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventListing {
    pub events: Page<Event>,
    pub map_events: Vec<MapMarker>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub categories: Vec<EventsCategory>,
    /// Every area of the locale, ordered by name
    pub areas: Vec<EventArea>,
    /// The requested areas, as their copies in the current locale
    pub selected_areas: Vec<EventArea>,
    pub labels: BTreeMap<String, String>,
}

/// Event listing service
pub struct EventListingService {
    engine: EventFilterEngine,
    taxonomy: Arc<dyn TaxonomyRepository>,
    page_size: usize,
}

impl EventListingService {
    /// Create a new listing service with the default page size
    pub fn new(engine: EventFilterEngine, taxonomy: Arc<dyn TaxonomyRepository>) -> Self {
        Self { engine, taxonomy, page_size: DEFAULT_PAGE_SIZE }
    }

    /// Override the number of events per page
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Build the listing for one request.
    ///
    /// `request` carries the query parameters `start_date`, `end_date`,
    /// `areas` (repeatable) and `page`. Its absence is a caller error.
    #[instrument(skip(self, request, categories), fields(locale = %locale))]
    pub fn build(
        &self,
        request: Option<&QueryParams>,
        categories: &[EventsCategory],
        locale: &Locale,
    ) -> Result<EventListing> {
        let request = request.ok_or_else(|| {
            WissError::MissingRequestContext("events listing needs the request query".into())
        })?;

        let start_date = request.get("start_date").and_then(|v| query_date("start_date", v));
        let end_date = request.get("end_date").and_then(|v| query_date("end_date", v));
        let selected_areas = self.selected_areas(&area_ids(request), locale)?;

        let filter = EventFilter::new()
            .with_categories(categories.to_vec())
            .with_dates(start_date, end_date)
            .with_areas(selected_areas.clone());
        let events = self.engine.filter(&filter, locale)?;
        let events = paginate(events, request.get("page"), self.page_size);
        let map_events = events.iter().filter_map(map_marker).collect::<Vec<_>>();

        let labels = self
            .taxonomy
            .labels_for_locale(locale.id)?
            .into_iter()
            .map(|label| (label.key, label.value))
            .collect();

        debug!(page = events.number, markers = map_events.len(), "Built event listing");
        Ok(EventListing {
            events,
            map_events,
            start_date,
            end_date,
            categories: categories.to_vec(),
            areas: self.taxonomy.areas_for_locale(locale.id)?,
            selected_areas,
            labels,
        })
    }

    fn selected_areas(&self, ids: &[AreaId], locale: &Locale) -> Result<Vec<EventArea>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut keys: Vec<_> =
            self.taxonomy.areas_by_ids(ids)?.into_iter().map(|a| a.translation_key).collect();
        keys.sort_unstable();
        keys.dedup();
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        self.taxonomy.areas_by_translation_keys(&keys, locale.id)
    }
}

fn area_ids(request: &QueryParams) -> Vec<AreaId> {
    request
        .get_all("areas")
        .into_iter()
        .filter(|v| !v.is_empty() && v.bytes().all(|b| b.is_ascii_digit()))
        .filter_map(|v| v.parse().ok())
        .collect()
}

/// Parse a date query parameter; blank or unparsable values count as absent.
fn query_date(name: &str, value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    let parsed = parse_date(value);
    if parsed.is_none() {
        warn!(param = name, value, "Ignoring unparsable date parameter");
    }
    parsed
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }
    if let Some(dt) =
        DATETIME_FORMATS.iter().find_map(|f| NaiveDateTime::parse_from_str(value, f).ok())
    {
        return Some(dt.date());
    }
    NaiveDate::parse_from_str(value, "%m/%d/%Y").ok()
}

fn map_marker(event: &Event) -> Option<MapMarker> {
    let geolocation = event.geolocation.as_deref().filter(|g| !g.trim().is_empty())?;
    let Some(point) = parse_wkt_point(geolocation) else {
        warn!(event_id = event.id, geolocation, "Skipping map marker for malformed geolocation");
        return None;
    };

    Some(MapMarker {
        event_id: event.id,
        title: event.title.clone(),
        description: event.description.clone().unwrap_or_default(),
        url: event.url_link.clone().unwrap_or_default(),
        lat: point.lat,
        lng: point.lng,
    })
}
