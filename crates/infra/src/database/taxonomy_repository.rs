//! SQLite-backed implementation of the `TaxonomyRepository` port.
//!
//! Also owns the write side of the lookup tables (locales, categories,
//! areas and labels), which editors manage outside the event lifecycle.

use std::sync::Arc;

use rusqlite::{params, Row, ToSql};
use tracing::{debug, info, instrument};
use uuid::Uuid;
use wiss_core::TaxonomyRepository;
use wiss_domain::{
    AreaId, EventArea, EventsCategory, Label, Locale, LocaleId, Result,
};

use super::codec::parse_uuid;
use super::manager::DbManager;
use crate::errors::IntoDomainResult;

/// SQLite-backed repository for locales, categories, areas and labels.
pub struct SqliteTaxonomyRepository {
    db: Arc<DbManager>,
}

impl SqliteTaxonomyRepository {
    /// Create a repository backed by the shared pool.
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }

    /// Insert a locale, or return the existing one with that language code.
    #[instrument(skip(self))]
    pub fn create_locale(&self, language_code: &str) -> Result<Locale> {
        let conn = self.db.get_connection()?;
        conn.execute(
            "INSERT OR IGNORE INTO locales (language_code) VALUES (?1)",
            params![language_code],
        )
        .into_domain()?;
        let id = conn
            .query_row(
                "SELECT id FROM locales WHERE language_code = ?1",
                params![language_code],
                |row| row.get(0),
            )
            .into_domain()?;

        Ok(Locale { id, language_code: language_code.to_string() })
    }

    /// Look up a locale by language code.
    pub fn find_locale(&self, language_code: &str) -> Result<Option<Locale>> {
        let conn = self.db.get_connection()?;
        let mut stmt =
            conn.prepare("SELECT id, language_code FROM locales WHERE language_code = ?1").into_domain()?;
        let mut rows = stmt
            .query_map(params![language_code], |row| {
                Ok(Locale { id: row.get(0)?, language_code: row.get(1)? })
            })
            .into_domain()?;
        Ok(rows.pop())
    }

    /// Insert a category. `translation_key: None` starts a new translation
    /// group; pass an existing key to add a translation.
    #[instrument(skip(self))]
    pub fn create_category(
        &self,
        name: Option<&str>,
        translation_key: Option<Uuid>,
        locale_id: LocaleId,
    ) -> Result<EventsCategory> {
        let key = translation_key.unwrap_or_else(Uuid::new_v4);
        let conn = self.db.get_connection()?;
        let key_text = key.to_string();
        let params: [&dyn ToSql; 3] = [&name, &key_text, &locale_id];
        conn.execute(
            "INSERT INTO events_categories (name, translation_key, locale_id) VALUES (?1, ?2, ?3)",
            params.as_slice(),
        )
        .into_domain()?;

        Ok(EventsCategory {
            id: conn.last_insert_rowid(),
            name: name.map(str::to_string),
            translation_key: key,
            locale_id,
        })
    }

    /// Insert an area. `translation_key: None` starts a new translation
    /// group; pass an existing key to add a translation.
    #[instrument(skip(self, description))]
    pub fn create_area(
        &self,
        name: &str,
        description: Option<&str>,
        translation_key: Option<Uuid>,
        locale_id: LocaleId,
    ) -> Result<EventArea> {
        let key = translation_key.unwrap_or_else(Uuid::new_v4);
        let conn = self.db.get_connection()?;
        let key_text = key.to_string();
        let params: [&dyn ToSql; 4] = [&name, &description, &key_text, &locale_id];
        conn.execute(
            "INSERT INTO event_areas (name, description, translation_key, locale_id)
             VALUES (?1, ?2, ?3, ?4)",
            params.as_slice(),
        )
        .into_domain()?;

        Ok(EventArea {
            id: conn.last_insert_rowid(),
            name: name.to_string(),
            description: description.map(str::to_string),
            translation_key: key,
            locale_id,
        })
    }

    /// Insert or overwrite the label for `(key, locale)`.
    #[instrument(skip(self, value))]
    pub fn upsert_label(&self, key: &str, value: &str, locale_id: LocaleId) -> Result<Label> {
        let conn = self.db.get_connection()?;
        conn.execute(
            "INSERT INTO labels (key, value, locale_id) VALUES (?1, ?2, ?3)
             ON CONFLICT (key, locale_id) DO UPDATE SET value = excluded.value",
            params![key, value, locale_id],
        )
        .into_domain()?;
        let id = conn
            .query_row(
                "SELECT id FROM labels WHERE key = ?1 AND locale_id = ?2",
                params![key, locale_id],
                |row| row.get(0),
            )
            .into_domain()?;

        info!(label = key, locale_id, "label saved");
        Ok(Label { id, key: key.to_string(), value: value.to_string(), locale_id })
    }
}

impl TaxonomyRepository for SqliteTaxonomyRepository {
    fn areas_by_ids(&self, ids: &[AreaId]) -> Result<Vec<EventArea>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let conn = self.db.get_connection()?;
        let sql = format!("{AREA_SELECT} WHERE id IN ({}) ORDER BY name", placeholders(ids.len(), 1));
        let params: Vec<&dyn ToSql> = ids.iter().map(|id| id as &dyn ToSql).collect();

        let mut stmt = conn.prepare(&sql).into_domain()?;
        stmt.query_map(&params, map_area_row).into_domain()
    }

    #[instrument(skip(self, keys), fields(keys = keys.len()))]
    fn areas_by_translation_keys(&self, keys: &[Uuid], locale_id: LocaleId) -> Result<Vec<EventArea>> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let conn = self.db.get_connection()?;
        let sql = format!(
            "{AREA_SELECT} WHERE locale_id = ?1 AND translation_key IN ({}) ORDER BY name",
            placeholders(keys.len(), 2)
        );
        let key_texts: Vec<String> = keys.iter().map(Uuid::to_string).collect();
        let mut params: Vec<&dyn ToSql> = vec![&locale_id];
        params.extend(key_texts.iter().map(|k| k as &dyn ToSql));

        let mut stmt = conn.prepare(&sql).into_domain()?;
        let areas = stmt.query_map(&params, map_area_row).into_domain()?;

        debug!(count = areas.len(), "areas resolved by translation key");
        Ok(areas)
    }

    fn areas_for_locale(&self, locale_id: LocaleId) -> Result<Vec<EventArea>> {
        let conn = self.db.get_connection()?;
        let mut stmt =
            conn.prepare(&format!("{AREA_SELECT} WHERE locale_id = ?1 ORDER BY name")).into_domain()?;
        stmt.query_map(params![locale_id], map_area_row).into_domain()
    }

    fn labels_for_locale(&self, locale_id: LocaleId) -> Result<Vec<Label>> {
        let conn = self.db.get_connection()?;
        let mut stmt = conn
            .prepare("SELECT id, key, value, locale_id FROM labels WHERE locale_id = ?1 ORDER BY key")
            .into_domain()?;
        stmt.query_map(params![locale_id], |row| {
            Ok(Label {
                id: row.get(0)?,
                key: row.get(1)?,
                value: row.get(2)?,
                locale_id: row.get(3)?,
            })
        })
        .into_domain()
    }
}

/// `?N, ?N+1, ...` for `count` positional parameters starting at `first`.
pub(crate) fn placeholders(count: usize, first: usize) -> String {
    (first..first + count).map(|n| format!("?{n}")).collect::<Vec<_>>().join(", ")
}

fn map_area_row(row: &Row<'_>) -> rusqlite::Result<EventArea> {
    let key: String = row.get(3)?;
    Ok(EventArea {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        translation_key: parse_uuid(3, &key)?,
        locale_id: row.get(4)?,
    })
}

const AREA_SELECT: &str =
    "SELECT id, name, description, translation_key, locale_id FROM event_areas";
