//! SQLite-backed implementation of the `EventRepository` port.
//!
//! An event, its recurrence rows and its category/area links are written in
//! a single `BEGIN IMMEDIATE` transaction; `save_event` only returns once that
//! transaction has committed, so callers can safely recompute instances
//! afterwards.

use std::collections::HashMap;
use std::sync::Arc;

use rusqlite::{params, Row, ToSql};
use tracing::{debug, info, instrument};
use uuid::Uuid;
use wiss_common::storage::{SqliteConnection, StorageResult, Transaction};
use wiss_core::EventRepository;
use wiss_domain::{
    Event, EventArea, EventDate, EventDraft, EventId, EventsCategory, LocaleId, Result, WissError,
};

use super::codec::{
    bool_to_int, frequency_from_code, int_to_bool, interval_from_sql, page_ref, parse_uuid,
};
use super::manager::DbManager;
use crate::errors::IntoDomainResult;

/// SQLite-backed repository for events and their recurrence rows.
pub struct SqliteEventRepository {
    db: Arc<DbManager>,
}

impl SqliteEventRepository {
    /// Create a repository backed by the shared pool.
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

impl EventRepository for SqliteEventRepository {
    #[instrument(skip(self, draft), fields(event_id = ?draft.id, locale_id = draft.locale_id))]
    fn save_event(&self, draft: &EventDraft) -> Result<EventId> {
        let mut conn = self.db.get_connection()?;
        let tx = conn.immediate_transaction().into_domain()?;

        let event_id = match draft.id {
            None => insert_event(&tx, draft).into_domain()?,
            Some(id) => {
                if update_event(&tx, id, draft).into_domain()? == 0 {
                    return Err(WissError::NotFound(format!("event {id}")));
                }
                id
            }
        };
        replace_children(&tx, event_id, draft).into_domain()?;

        tx.commit().into_domain()?;
        info!(event_id, dates = draft.dates.len(), "event committed");
        Ok(event_id)
    }

    #[instrument(skip(self))]
    fn find_event(&self, id: EventId) -> Result<Option<Event>> {
        let conn = self.db.get_connection()?;

        let mut stmt = conn.prepare(&format!("{EVENT_SELECT} WHERE e.id = ?1")).into_domain()?;
        let Some(mut event) = stmt.query_map(params![id], map_event_row).into_domain()?.pop()
        else {
            return Ok(None);
        };

        event.categories =
            load_categories(&conn, CATEGORIES_FOR_EVENT, params![id])?.remove(&id).unwrap_or_default();
        event.areas = load_areas(&conn, AREAS_FOR_EVENT, params![id])?.remove(&id).unwrap_or_default();
        Ok(Some(event))
    }

    fn event_dates(&self, event_id: EventId) -> Result<Vec<EventDate>> {
        let conn = self.db.get_connection()?;
        let mut stmt = conn.prepare(EVENT_DATES_QUERY).into_domain()?;
        stmt.query_map(params![event_id], map_event_date_row).into_domain()
    }

    #[instrument(skip(self))]
    fn delete_event(&self, id: EventId) -> Result<()> {
        let conn = self.db.get_connection()?;
        let deleted = conn.execute("DELETE FROM events WHERE id = ?1", params![id]).into_domain()?;
        if deleted == 0 {
            return Err(WissError::NotFound(format!("event {id}")));
        }

        info!(event_id = id, "event deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    fn list_published(&self, locale_id: LocaleId) -> Result<Vec<Event>> {
        let conn = self.db.get_connection()?;

        let mut stmt = conn
            .prepare(&format!("{EVENT_SELECT} WHERE e.locale_id = ?1 AND e.archived = 0 ORDER BY e.id"))
            .into_domain()?;
        let mut events = stmt.query_map(params![locale_id], map_event_row).into_domain()?;

        let mut categories = load_categories(&conn, CATEGORIES_FOR_LOCALE, params![locale_id])?;
        let mut areas = load_areas(&conn, AREAS_FOR_LOCALE, params![locale_id])?;
        for event in &mut events {
            event.categories = categories.remove(&event.id).unwrap_or_default();
            event.areas = areas.remove(&event.id).unwrap_or_default();
        }

        debug!(count = events.len(), "published events loaded");
        Ok(events)
    }
}

fn insert_event(tx: &Transaction<'_>, draft: &EventDraft) -> StorageResult<EventId> {
    let key = draft.translation_key.unwrap_or_else(Uuid::new_v4).to_string();
    let (page_id, page_title, page_url) = page_columns(draft);
    let use_page_title = bool_to_int(draft.use_page_title);
    let archived = bool_to_int(draft.archived);

    let params: [&dyn ToSql; 15] = [
        &draft.title,
        &draft.slug,
        &draft.description,
        &draft.location,
        &draft.geolocation,
        &draft.address,
        &draft.zoom,
        &page_id,
        &page_title,
        &page_url,
        &use_page_title,
        &draft.url_link,
        &archived,
        &key,
        &draft.locale_id,
    ];
    tx.execute(EVENT_INSERT_SQL, params.as_slice())?;
    tx.last_insert_rowid()
}

fn update_event(tx: &Transaction<'_>, id: EventId, draft: &EventDraft) -> StorageResult<usize> {
    let key = draft.translation_key.map(|k| k.to_string());
    let (page_id, page_title, page_url) = page_columns(draft);
    let use_page_title = bool_to_int(draft.use_page_title);
    let archived = bool_to_int(draft.archived);

    let params: [&dyn ToSql; 16] = [
        &draft.title,
        &draft.slug,
        &draft.description,
        &draft.location,
        &draft.geolocation,
        &draft.address,
        &draft.zoom,
        &page_id,
        &page_title,
        &page_url,
        &use_page_title,
        &draft.url_link,
        &archived,
        &key,
        &draft.locale_id,
        &id,
    ];
    tx.execute(EVENT_UPDATE_SQL, params.as_slice())
}

/// Replace the recurrence rows and links owned by the event.
fn replace_children(tx: &Transaction<'_>, event_id: EventId, draft: &EventDraft) -> StorageResult<()> {
    tx.execute("DELETE FROM event_dates WHERE event_id = ?1", params![event_id])?;
    tx.execute("DELETE FROM events_categories_link WHERE event_id = ?1", params![event_id])?;
    tx.execute("DELETE FROM events_areas_link WHERE event_id = ?1", params![event_id])?;

    {
        let mut stmt = tx.prepare(EVENT_DATE_INSERT_SQL)?;
        for rule in &draft.dates {
            let frequency = rule.frequency.code();
            let interval = i64::from(rule.interval);
            stmt.execute(params![event_id, rule.start_date, rule.end_date, frequency, interval])?;
        }
    }
    {
        let mut stmt = tx.prepare(
            "INSERT OR IGNORE INTO events_categories_link (event_id, category_id) VALUES (?1, ?2)",
        )?;
        for category_id in &draft.category_ids {
            stmt.execute(params![event_id, category_id])?;
        }
    }
    {
        let mut stmt = tx
            .prepare("INSERT OR IGNORE INTO events_areas_link (event_id, area_id) VALUES (?1, ?2)")?;
        for area_id in &draft.area_ids {
            stmt.execute(params![event_id, area_id])?;
        }
    }
    Ok(())
}

fn page_columns(draft: &EventDraft) -> (Option<i64>, Option<String>, Option<String>) {
    match &draft.page_link {
        Some(page) => (Some(page.id), Some(page.title.clone()), Some(page.url.clone())),
        None => (None, None, None),
    }
}

fn load_categories(
    conn: &SqliteConnection,
    sql: &str,
    params: &[&dyn ToSql],
) -> Result<HashMap<EventId, Vec<EventsCategory>>> {
    let mut stmt = conn.prepare(sql).into_domain()?;
    let rows = stmt
        .query_map(params, |row| {
            let key: String = row.get(3)?;
            Ok((
                row.get::<_, EventId>(0)?,
                EventsCategory {
                    id: row.get(1)?,
                    name: row.get(2)?,
                    translation_key: parse_uuid(3, &key)?,
                    locale_id: row.get(4)?,
                },
            ))
        })
        .into_domain()?;
    Ok(group_by_event(rows))
}

fn load_areas(
    conn: &SqliteConnection,
    sql: &str,
    params: &[&dyn ToSql],
) -> Result<HashMap<EventId, Vec<EventArea>>> {
    let mut stmt = conn.prepare(sql).into_domain()?;
    let rows = stmt
        .query_map(params, |row| {
            let key: String = row.get(4)?;
            Ok((
                row.get::<_, EventId>(0)?,
                EventArea {
                    id: row.get(1)?,
                    name: row.get(2)?,
                    description: row.get(3)?,
                    translation_key: parse_uuid(4, &key)?,
                    locale_id: row.get(5)?,
                },
            ))
        })
        .into_domain()?;
    Ok(group_by_event(rows))
}

fn group_by_event<T>(rows: Vec<(EventId, T)>) -> HashMap<EventId, Vec<T>> {
    let mut grouped: HashMap<EventId, Vec<T>> = HashMap::new();
    for (event_id, item) in rows {
        grouped.entry(event_id).or_default().push(item);
    }
    grouped
}

fn map_event_row(row: &Row<'_>) -> rusqlite::Result<Event> {
    let key: String = row.get(15)?;
    Ok(Event {
        id: row.get(0)?,
        title: row.get(1)?,
        slug: row.get(2)?,
        description: row.get(3)?,
        location: row.get(4)?,
        geolocation: row.get(5)?,
        address: row.get(6)?,
        zoom: row.get(7)?,
        page_link: page_ref(row.get(8)?, row.get(9)?, row.get(10)?),
        use_page_title: int_to_bool(row.get(11)?),
        url_link: row.get(12)?,
        archived: int_to_bool(row.get(13)?),
        locale_id: row.get(14)?,
        translation_key: parse_uuid(15, &key)?,
        categories: Vec::new(),
        areas: Vec::new(),
    })
}

pub(super) fn map_event_date_row(row: &Row<'_>) -> rusqlite::Result<EventDate> {
    Ok(EventDate {
        id: row.get(0)?,
        event_id: row.get(1)?,
        start_date: row.get(2)?,
        end_date: row.get(3)?,
        frequency: frequency_from_code(4, row.get(4)?)?,
        interval: interval_from_sql(5, row.get(5)?)?,
    })
}

const EVENT_SELECT: &str = "SELECT e.id, e.title, e.slug, e.description, e.location,
        e.geolocation, e.address, e.zoom, e.page_id, e.page_title, e.page_url,
        e.use_page_title, e.url_link, e.archived, e.locale_id, e.translation_key
    FROM events e";

const EVENT_INSERT_SQL: &str = "INSERT INTO events (
        title, slug, description, location, geolocation, address, zoom, page_id, page_title,
        page_url, use_page_title, url_link, archived, translation_key, locale_id
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)";

const EVENT_UPDATE_SQL: &str = "UPDATE events SET
        title = ?1, slug = ?2, description = ?3, location = ?4, geolocation = ?5,
        address = ?6, zoom = ?7, page_id = ?8, page_title = ?9, page_url = ?10,
        use_page_title = ?11, url_link = ?12, archived = ?13,
        translation_key = COALESCE(?14, translation_key), locale_id = ?15
    WHERE id = ?16";

const EVENT_DATE_INSERT_SQL: &str = "INSERT INTO event_dates
        (event_id, start_date, end_date, frequency, recurrence_interval)
    VALUES (?1, ?2, ?3, ?4, ?5)";

pub(super) const EVENT_DATES_QUERY: &str = "SELECT id, event_id, start_date, end_date, frequency,
        recurrence_interval
    FROM event_dates
    WHERE event_id = ?1
    ORDER BY id";

const CATEGORIES_FOR_EVENT: &str =
    "SELECT l.event_id, c.id, c.name, c.translation_key, c.locale_id
    FROM events_categories_link l
    JOIN events_categories c ON c.id = l.category_id
    WHERE l.event_id = ?1
    ORDER BY c.id";

const CATEGORIES_FOR_LOCALE: &str =
    "SELECT l.event_id, c.id, c.name, c.translation_key, c.locale_id
    FROM events_categories_link l
    JOIN events_categories c ON c.id = l.category_id
    JOIN events e ON e.id = l.event_id
    WHERE e.locale_id = ?1 AND e.archived = 0
    ORDER BY c.id";

const AREAS_FOR_EVENT: &str =
    "SELECT l.event_id, a.id, a.name, a.description, a.translation_key, a.locale_id
    FROM events_areas_link l
    JOIN event_areas a ON a.id = l.area_id
    WHERE l.event_id = ?1
    ORDER BY a.name";

const AREAS_FOR_LOCALE: &str =
    "SELECT l.event_id, a.id, a.name, a.description, a.translation_key, a.locale_id
    FROM events_areas_link l
    JOIN event_areas a ON a.id = l.area_id
    JOIN events e ON e.id = l.event_id
    WHERE e.locale_id = ?1 AND e.archived = 0
    ORDER BY a.name";
