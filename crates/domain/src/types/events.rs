//! Event, recurrence and materialised date types
//!
//! An [`Event`] exclusively owns its [`EventDate`] recurrence rows. The
//! [`EventDateInstance`] rows are a derived cache of the concrete dates those
//! rules produce; they are regenerated on every save and never edited by
//! hand.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::taxonomy::{EventArea, EventsCategory};
use super::{AreaId, CategoryId, EventDateId, EventId, LocaleId};
use crate::impl_choice_conversions;

/// Recurrence frequency ("every N units")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    Yearly,
    Monthly,
    Weekly,
    #[default]
    Daily,
}

// Codes follow the RFC 5545 FREQ ordering used by the stored rows.
impl_choice_conversions!(Frequency {
    Yearly => ("yearly", 0),
    Monthly => ("monthly", 1),
    Weekly => ("weekly", 2),
    Daily => ("daily", 3),
});

impl Frequency {
    /// Human-readable label for editor-facing text.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Yearly => "Yearly",
            Self::Monthly => "Monthly",
            Self::Weekly => "Weekly",
            Self::Daily => "Daily",
        }
    }
}

/// A stored recurrence rule belonging to one event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDate {
    pub id: EventDateId,
    pub event_id: EventId,
    pub start_date: NaiveDate,
    /// `None` means a single occurrence on `start_date`.
    pub end_date: Option<NaiveDate>,
    pub frequency: Frequency,
    /// Step between occurrences, in `frequency` units. Always >= 1.
    pub interval: u32,
}

impl fmt::Display for EventDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let end = self.end_date.map_or_else(|| "None".to_string(), |d| d.to_string());
        write!(f, "{} to {} (Freq: {})", self.start_date, end, self.frequency.label())
    }
}

/// Recurrence rule as submitted by an editor, before it has a row id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDateDraft {
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub frequency: Frequency,
    #[serde(default = "default_interval")]
    pub interval: u32,
}

impl EventDateDraft {
    /// A one-off occurrence on `date`.
    pub fn single(date: NaiveDate) -> Self {
        Self { start_date: date, end_date: None, frequency: Frequency::Daily, interval: 1 }
    }

    /// Every `interval` `frequency` units from `start` through `end`.
    pub fn recurring(start: NaiveDate, end: NaiveDate, frequency: Frequency, interval: u32) -> Self {
        Self { start_date: start, end_date: Some(end), frequency, interval }
    }
}

fn default_interval() -> u32 {
    1
}

/// One materialised occurrence: `(event, date)`, unique per pair
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventDateInstance {
    pub event_id: EventId,
    pub date: NaiveDate,
}

/// Snapshot of a linked CMS page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRef {
    pub id: i64,
    pub title: String,
    pub url: String,
}

/// A translatable event listing entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    /// Free-text location shown to visitors
    pub location: Option<String>,
    /// Well-known-text point, e.g. `SRID=4326;POINT(-4.05 53.18)`
    pub geolocation: Option<String>,
    pub address: Option<String>,
    pub zoom: Option<i16>,
    pub page_link: Option<PageRef>,
    /// Append the linked page's title to the link text
    pub use_page_title: bool,
    pub url_link: Option<String>,
    pub archived: bool,
    pub locale_id: LocaleId,
    pub translation_key: Uuid,
    pub categories: Vec<EventsCategory>,
    pub areas: Vec<EventArea>,
}

impl Event {
    /// Category names joined with `", "`.
    pub fn display_categories(&self) -> String {
        self.categories
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Areas sorted by name.
    pub fn ordered_areas(&self) -> Vec<&EventArea> {
        let mut areas: Vec<&EventArea> = self.areas.iter().collect();
        areas.sort_by(|a, b| a.name.cmp(&b.name));
        areas
    }

    /// Whether any of this event's categories has one of the given ids.
    pub fn has_any_category(&self, ids: &[CategoryId]) -> bool {
        self.categories.iter().any(|c| ids.contains(&c.id))
    }

    /// Whether any of this event's areas belongs to one of the given
    /// translation groups.
    pub fn has_any_area_group(&self, keys: &[Uuid]) -> bool {
        self.areas.iter().any(|a| keys.contains(&a.translation_key))
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}

/// Event fields plus recurrence rows and associations, as saved by an editor
///
/// `id: None` creates a new event; `Some` replaces the stored event's fields,
/// recurrence rows and category/area links.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EventDraft {
    pub id: Option<EventId>,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub geolocation: Option<String>,
    pub address: Option<String>,
    pub zoom: Option<i16>,
    pub page_link: Option<PageRef>,
    pub use_page_title: bool,
    pub url_link: Option<String>,
    pub archived: bool,
    pub locale_id: LocaleId,
    /// Generated when absent
    pub translation_key: Option<Uuid>,
    pub category_ids: Vec<CategoryId>,
    pub area_ids: Vec<AreaId>,
    pub dates: Vec<EventDateDraft>,
}

impl EventDraft {
    /// Minimal draft with a title in a locale.
    pub fn new(title: impl Into<String>, locale_id: LocaleId) -> Self {
        Self { title: title.into(), locale_id, ..Self::default() }
    }
}

/// Inclusive date range; either bound may be open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self { from, to }
    }

    /// Range with no bounds at all.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Whether neither bound is set (the range matches every date).
    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.map_or(true, |from| date >= from) && self.to.map_or(true, |to| date <= to)
    }
}

/// Map payload entry for one event with a usable geolocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapMarker {
    pub event_id: EventId,
    pub title: String,
    pub description: String,
    pub url: String,
    pub lat: f64,
    pub lng: f64,
}
