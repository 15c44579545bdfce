//! SQLite-backed implementation of the `DateInstanceRepository` port.
//!
//! Replacement deletes and re-inserts inside one transaction. A failure at
//! any point drops the transaction, which rolls back and leaves the previous
//! instance set in place. Rebuilding from the recurrence rows reads them in
//! a `BEGIN IMMEDIATE` transaction, so no other save can commit between the
//! read and the replacement. Range queries compare ISO date text, which sorts
//! the same way as the dates themselves and keeps the `date` index usable.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use chrono::NaiveDate;
use rusqlite::{params, ToSql};
use tracing::{debug, instrument};
use wiss_core::DateInstanceRepository;
use wiss_common::storage::{StorageResult, Transaction};
use wiss_domain::{DateRange, EventDate, EventDateInstance, EventId, LocaleId, Result};

use super::event_repository::{map_event_date_row, EVENT_DATES_QUERY};
use super::manager::DbManager;
use crate::errors::IntoDomainResult;

/// SQLite-backed repository for materialised date instances.
pub struct SqliteDateInstanceRepository {
    db: Arc<DbManager>,
}

impl SqliteDateInstanceRepository {
    /// Create a repository backed by the shared pool.
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

impl DateInstanceRepository for SqliteDateInstanceRepository {
    #[instrument(skip(self, dates), fields(count = dates.len()))]
    fn replace_instances(&self, event_id: EventId, dates: &BTreeSet<NaiveDate>) -> Result<()> {
        let mut conn = self.db.get_connection()?;
        let tx = conn.transaction().into_domain()?;
        write_instances(&tx, event_id, dates).into_domain()?;
        tx.commit().into_domain()
    }

    #[instrument(skip(self, expand))]
    fn rebuild_from_rules(
        &self,
        event_id: EventId,
        expand: &dyn Fn(&[EventDate]) -> BTreeSet<NaiveDate>,
    ) -> Result<usize> {
        let mut conn = self.db.get_connection()?;
        let tx = conn.immediate_transaction().into_domain()?;

        let rules = tx
            .prepare(EVENT_DATES_QUERY)
            .into_domain()?
            .query_map(params![event_id], map_event_date_row)
            .into_domain()?;
        let dates = expand(&rules);
        write_instances(&tx, event_id, &dates).into_domain()?;

        tx.commit().into_domain()?;
        debug!(event_id, rules = rules.len(), count = dates.len(), "instances rebuilt");
        Ok(dates.len())
    }

    fn instances_for_event(&self, event_id: EventId) -> Result<Vec<EventDateInstance>> {
        let conn = self.db.get_connection()?;
        let mut stmt = conn
            .prepare("SELECT event_id, date FROM event_date_instances WHERE event_id = ?1 ORDER BY date")
            .into_domain()?;
        stmt.query_map(params![event_id], |row| {
            Ok(EventDateInstance { event_id: row.get(0)?, date: row.get(1)? })
        })
        .into_domain()
    }

    #[instrument(skip(self))]
    fn first_occurrences(
        &self,
        range: &DateRange,
        locale_id: LocaleId,
    ) -> Result<HashMap<EventId, NaiveDate>> {
        let conn = self.db.get_connection()?;

        let params: [&dyn ToSql; 3] = [&locale_id, &range.from, &range.to];
        let mut stmt = conn.prepare(FIRST_OCCURRENCES_QUERY).into_domain()?;
        let rows = stmt
            .query_map(params.as_slice(), |row| {
                Ok((row.get::<_, EventId>(0)?, row.get::<_, NaiveDate>(1)?))
            })
            .into_domain()?;

        debug!(count = rows.len(), "first occurrences in range");
        Ok(rows.into_iter().collect())
    }
}

fn write_instances(
    tx: &Transaction<'_>,
    event_id: EventId,
    dates: &BTreeSet<NaiveDate>,
) -> StorageResult<()> {
    tx.execute("DELETE FROM event_date_instances WHERE event_id = ?1", params![event_id])?;
    let mut stmt = tx.prepare("INSERT INTO event_date_instances (event_id, date) VALUES (?1, ?2)")?;
    for date in dates {
        stmt.execute(params![event_id, date])?;
    }
    Ok(())
}

const FIRST_OCCURRENCES_QUERY: &str = "SELECT i.event_id, MIN(i.date)
    FROM event_date_instances i
    JOIN events e ON e.id = i.event_id
    WHERE e.locale_id = ?1
      AND (?2 IS NULL OR i.date >= ?2)
      AND (?3 IS NULL OR i.date <= ?3)
    GROUP BY i.event_id";
