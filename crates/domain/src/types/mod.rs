//! Domain types and models

pub mod events;
pub mod maps;
pub mod taxonomy;

pub use events::{
    DateRange, Event, EventDate, EventDateDraft, EventDateInstance, EventDraft, Frequency,
    MapMarker, PageRef,
};
pub use maps::{DocumentRef, GeoJsonMapItem, MapPolygon, MapPolygonItem, PolygonMap};
pub use taxonomy::{EventArea, EventsCategory, Label, Locale};

/// Row id of an [`Event`].
pub type EventId = i64;
/// Row id of an [`EventDate`].
pub type EventDateId = i64;
/// Row id of an [`EventsCategory`].
pub type CategoryId = i64;
/// Row id of an [`EventArea`].
pub type AreaId = i64;
/// Row id of a [`Locale`].
pub type LocaleId = i64;
/// Row id of a [`MapPolygon`].
pub type PolygonId = i64;
