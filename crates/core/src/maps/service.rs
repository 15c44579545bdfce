//! Polygon map service - resolves selected polygons for a locale

use std::sync::Arc;

use tracing::{debug, instrument};
use wiss_domain::constants::{VIEW_MORE_DEFAULT, VIEW_MORE_WELSH, WELSH_LANGUAGE_CODE};
use wiss_domain::{GeoJsonMapItem, Locale, MapPolygon, MapPolygonItem, PolygonMap, Result};

use super::ports::MapPolygonRepository;

/// Polygon map service
pub struct PolygonMapService {
    repository: Arc<dyn MapPolygonRepository>,
}

impl PolygonMapService {
    /// Create a new polygon map service
    pub fn new(repository: Arc<dyn MapPolygonRepository>) -> Self {
        Self { repository }
    }

    /// Resolve the editor's selection into `locale` and flatten it into
    /// renderable overlays. Items without a GeoJSON document are left out.
    #[instrument(skip(self, selected), fields(locale = %locale, selected = selected.len()))]
    pub fn build(&self, selected: &[MapPolygon], locale: &Locale) -> Result<PolygonMap> {
        let keys: Vec<_> = selected.iter().map(|p| p.translation_key).collect();
        let polygons = if keys.is_empty() {
            Vec::new()
        } else {
            self.repository.polygons_by_translation_keys(&keys, locale.id)?
        };

        let items: Vec<GeoJsonMapItem> = polygons
            .iter()
            .flat_map(|polygon| polygon.items.iter().filter_map(move |item| map_item(polygon, item)))
            .collect();

        debug!(count = items.len(), "Resolved polygon map items");
        Ok(PolygonMap { items, view_more: view_more_caption(locale).to_string() })
    }
}

/// "View more" caption in the locale's language.
pub fn view_more_caption(locale: &Locale) -> &'static str {
    if locale.is_language(WELSH_LANGUAGE_CODE) {
        VIEW_MORE_WELSH
    } else {
        VIEW_MORE_DEFAULT
    }
}

fn map_item(polygon: &MapPolygon, item: &MapPolygonItem) -> Option<GeoJsonMapItem> {
    let document = item.geojson_document.as_ref()?;

    let title = item
        .linked_page
        .as_ref()
        .map(|page| page.title.clone())
        .or_else(|| non_blank(item.title.as_deref()))
        .or_else(|| non_blank(document.title.as_deref()))
        .or_else(|| polygon.title.clone())
        .unwrap_or_default();

    let description = non_blank(item.description.as_deref())
        .or_else(|| polygon.description.clone())
        .unwrap_or_default();

    let link = non_blank(item.link_url.as_deref())
        .or_else(|| item.linked_page.as_ref().map(|page| page.url.clone()))
        .unwrap_or_default();

    Some(GeoJsonMapItem {
        title,
        description,
        geojson_url: document.url.clone(),
        link,
        colour: item.polygon_colour.clone(),
    })
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;
    use wiss_domain::{DocumentRef, PageRef};

    use super::*;

    fn polygon() -> MapPolygon {
        MapPolygon {
            id: 1,
            title: Some("Walking routes".into()),
            description: Some("Routes around the bay".into()),
            site_id: None,
            locale_id: 1,
            translation_key: Uuid::new_v4(),
            items: Vec::new(),
        }
    }

    fn item() -> MapPolygonItem {
        MapPolygonItem {
            id: 10,
            polygon_id: 1,
            sort_order: 0,
            polygon_colour: Some("#ff0000".into()),
            title: None,
            description: None,
            link_url: None,
            linked_page: None,
            geojson_document: Some(DocumentRef {
                id: 5,
                title: Some("coast.geojson".into()),
                url: "/documents/5/coast.geojson".into(),
            }),
        }
    }

    #[test]
    fn falls_back_to_document_and_polygon_text() {
        let resolved = map_item(&polygon(), &item()).unwrap();

        assert_eq!(resolved.title, "coast.geojson");
        assert_eq!(resolved.description, "Routes around the bay");
        assert_eq!(resolved.link, "");
        assert_eq!(resolved.colour.as_deref(), Some("#ff0000"));
    }

    #[test]
    fn linked_page_wins_for_title_and_link() {
        let mut with_page = item();
        with_page.title = Some("Coast path".into());
        with_page.linked_page =
            Some(PageRef { id: 3, title: "Coastal walks".into(), url: "/walks/coast/".into() });

        let resolved = map_item(&polygon(), &with_page).unwrap();
        assert_eq!(resolved.title, "Coastal walks");
        assert_eq!(resolved.link, "/walks/coast/");

        with_page.link_url = Some("https://example.org/coast".into());
        let resolved = map_item(&polygon(), &with_page).unwrap();
        assert_eq!(resolved.link, "https://example.org/coast");
    }

    #[test]
    fn item_title_overrides_document_title() {
        let mut titled = item();
        titled.title = Some("Coast path".into());

        assert_eq!(map_item(&polygon(), &titled).unwrap().title, "Coast path");
    }

    #[test]
    fn items_without_document_are_skipped() {
        let mut bare = item();
        bare.geojson_document = None;

        assert!(map_item(&polygon(), &bare).is_none());
    }

    #[test]
    fn welsh_caption() {
        let cy = Locale { id: 2, language_code: "cy".into() };
        let en = Locale { id: 1, language_code: "en".into() };

        assert_eq!(view_more_caption(&cy), "Gweld mwy");
        assert_eq!(view_more_caption(&en), "View more");
    }
}
