//! Port interface for polygon map storage

use uuid::Uuid;
use wiss_domain::{LocaleId, MapPolygon, PolygonId, Result};

/// Trait for loading map polygons with their items
pub trait MapPolygonRepository: Send + Sync {
    /// Polygons of one locale belonging to any of the translation groups,
    /// each with its items ordered by `sort_order`
    fn polygons_by_translation_keys(
        &self,
        keys: &[Uuid],
        locale_id: LocaleId,
    ) -> Result<Vec<MapPolygon>>;

    /// Load one polygon with its items
    fn find_polygon(&self, id: PolygonId) -> Result<Option<MapPolygon>>;
}
