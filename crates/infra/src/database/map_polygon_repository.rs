//! SQLite-backed implementation of the `MapPolygonRepository` port.

use std::collections::HashMap;
use std::sync::Arc;

use rusqlite::{params, Row, ToSql};
use tracing::{debug, instrument};
use uuid::Uuid;
use wiss_common::storage::{SqliteConnection, StorageResult};
use wiss_core::MapPolygonRepository;
use wiss_domain::{DocumentRef, LocaleId, MapPolygon, MapPolygonItem, PolygonId, Result};

use super::codec::{page_ref, parse_uuid};
use super::manager::DbManager;
use super::taxonomy_repository::placeholders;
use crate::errors::IntoDomainResult;

/// SQLite-backed repository for map polygons and their items.
pub struct SqliteMapPolygonRepository {
    db: Arc<DbManager>,
}

impl SqliteMapPolygonRepository {
    /// Create a repository backed by the shared pool.
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }

    /// Insert a polygon without items. `translation_key: None` starts a new
    /// translation group.
    #[instrument(skip(self, description))]
    pub fn create_polygon(
        &self,
        title: Option<&str>,
        description: Option<&str>,
        site_id: Option<i64>,
        translation_key: Option<Uuid>,
        locale_id: LocaleId,
    ) -> Result<MapPolygon> {
        let key = translation_key.unwrap_or_else(Uuid::new_v4);
        let key_text = key.to_string();
        let conn = self.db.get_connection()?;

        let params: [&dyn ToSql; 5] = [&title, &description, &site_id, &key_text, &locale_id];
        conn.execute(
            "INSERT INTO map_polygons (title, description, site_id, translation_key, locale_id)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params.as_slice(),
        )
        .into_domain()?;

        Ok(MapPolygon {
            id: conn.last_insert_rowid(),
            title: title.map(str::to_string),
            description: description.map(str::to_string),
            site_id,
            locale_id,
            translation_key: key,
            items: Vec::new(),
        })
    }

    /// Append an item to `item.polygon_id`, returning it with its new id.
    #[instrument(skip(self, item), fields(polygon_id = item.polygon_id))]
    pub fn add_item(&self, item: &MapPolygonItem) -> Result<MapPolygonItem> {
        let conn = self.db.get_connection()?;

        let page = item.linked_page.as_ref();
        let page_id = page.map(|p| p.id);
        let page_title = page.map(|p| p.title.as_str());
        let page_url = page.map(|p| p.url.as_str());

        let document = item.geojson_document.as_ref();
        let document_id = document.map(|d| d.id);
        let document_title = document.and_then(|d| d.title.as_deref());
        let document_url = document.map(|d| d.url.as_str());

        let params: [&dyn ToSql; 12] = [
            &item.polygon_id,
            &item.sort_order,
            &item.polygon_colour,
            &item.title,
            &item.description,
            &item.link_url,
            &page_id,
            &page_title,
            &page_url,
            &document_id,
            &document_title,
            &document_url,
        ];
        conn.execute(
            "INSERT INTO map_polygon_items (
                polygon_id, sort_order, polygon_colour, title, description, link_url,
                page_id, page_title, page_url, document_id, document_title, document_url
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params.as_slice(),
        )
        .into_domain()?;

        Ok(MapPolygonItem { id: conn.last_insert_rowid(), ..item.clone() })
    }
}

impl MapPolygonRepository for SqliteMapPolygonRepository {
    #[instrument(skip(self, keys), fields(keys = keys.len()))]
    fn polygons_by_translation_keys(
        &self,
        keys: &[Uuid],
        locale_id: LocaleId,
    ) -> Result<Vec<MapPolygon>> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let conn = self.db.get_connection()?;
        let sql = format!(
            "{POLYGON_SELECT} WHERE locale_id = ?1 AND translation_key IN ({}) ORDER BY id",
            placeholders(keys.len(), 2)
        );
        let key_texts: Vec<String> = keys.iter().map(Uuid::to_string).collect();
        let mut params: Vec<&dyn ToSql> = vec![&locale_id];
        params.extend(key_texts.iter().map(|k| k as &dyn ToSql));

        let mut stmt = conn.prepare(&sql).into_domain()?;
        let mut polygons = stmt.query_map(&params, map_polygon_row).into_domain()?;
        drop(stmt);

        attach_items(&conn, &mut polygons).into_domain()?;
        debug!(count = polygons.len(), "polygons loaded");
        Ok(polygons)
    }

    fn find_polygon(&self, id: PolygonId) -> Result<Option<MapPolygon>> {
        let conn = self.db.get_connection()?;
        let mut stmt = conn.prepare(&format!("{POLYGON_SELECT} WHERE id = ?1")).into_domain()?;
        let mut polygons = stmt.query_map(params![id], map_polygon_row).into_domain()?;
        drop(stmt);

        attach_items(&conn, &mut polygons).into_domain()?;
        Ok(polygons.pop())
    }
}

/// Load items for every polygon in one query and attach them in sort order.
fn attach_items(conn: &SqliteConnection, polygons: &mut [MapPolygon]) -> StorageResult<()> {
    if polygons.is_empty() {
        return Ok(());
    }

    let ids: Vec<PolygonId> = polygons.iter().map(|p| p.id).collect();
    let sql = format!(
        "{ITEM_SELECT} WHERE polygon_id IN ({}) ORDER BY polygon_id, sort_order, id",
        placeholders(ids.len(), 1)
    );
    let params: Vec<&dyn ToSql> = ids.iter().map(|id| id as &dyn ToSql).collect();

    let mut stmt = conn.prepare(&sql)?;
    let mut grouped: HashMap<PolygonId, Vec<MapPolygonItem>> = HashMap::new();
    for item in stmt.query_map(&params, map_item_row)? {
        grouped.entry(item.polygon_id).or_default().push(item);
    }

    for polygon in polygons {
        polygon.items = grouped.remove(&polygon.id).unwrap_or_default();
    }
    Ok(())
}

fn map_polygon_row(row: &Row<'_>) -> rusqlite::Result<MapPolygon> {
    let key: String = row.get(4)?;
    Ok(MapPolygon {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        site_id: row.get(3)?,
        translation_key: parse_uuid(4, &key)?,
        locale_id: row.get(5)?,
        items: Vec::new(),
    })
}

fn map_item_row(row: &Row<'_>) -> rusqlite::Result<MapPolygonItem> {
    let document_id: Option<i64> = row.get(10)?;
    let document_title: Option<String> = row.get(11)?;
    let document_url: Option<String> = row.get(12)?;

    Ok(MapPolygonItem {
        id: row.get(0)?,
        polygon_id: row.get(1)?,
        sort_order: row.get(2)?,
        polygon_colour: row.get(3)?,
        title: row.get(4)?,
        description: row.get(5)?,
        link_url: row.get(6)?,
        linked_page: page_ref(row.get(7)?, row.get(8)?, row.get(9)?),
        geojson_document: document_id.map(|id| DocumentRef {
            id,
            title: document_title,
            url: document_url.unwrap_or_default(),
        }),
    })
}

const POLYGON_SELECT: &str =
    "SELECT id, title, description, site_id, translation_key, locale_id FROM map_polygons";

const ITEM_SELECT: &str = "SELECT id, polygon_id, sort_order, polygon_colour, title, description,
        link_url, page_id, page_title, page_url, document_id, document_title, document_url
    FROM map_polygon_items";
