//! Polygon map types
//!
//! A [`MapPolygon`] groups ordered [`MapPolygonItem`]s, each pointing at a
//! GeoJSON document. The resolved [`PolygonMap`] is what a page renders.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::events::PageRef;
use super::{LocaleId, PolygonId};

/// Snapshot of an uploaded document (GeoJSON file)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRef {
    pub id: i64,
    pub title: Option<String>,
    pub url: String,
}

/// A translatable collection of GeoJSON overlays
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapPolygon {
    pub id: PolygonId,
    pub title: Option<String>,
    pub description: Option<String>,
    pub site_id: Option<i64>,
    pub locale_id: LocaleId,
    pub translation_key: Uuid,
    /// Ordered by `sort_order`
    pub items: Vec<MapPolygonItem>,
}

/// One overlay within a polygon
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapPolygonItem {
    pub id: i64,
    pub polygon_id: PolygonId,
    pub sort_order: i32,
    pub polygon_colour: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub link_url: Option<String>,
    pub linked_page: Option<PageRef>,
    pub geojson_document: Option<DocumentRef>,
}

/// A resolved overlay ready for rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoJsonMapItem {
    pub title: String,
    pub description: String,
    pub geojson_url: String,
    pub link: String,
    pub colour: Option<String>,
}

/// Resolved polygon map for one locale
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PolygonMap {
    pub items: Vec<GeoJsonMapItem>,
    pub view_more: String,
}
