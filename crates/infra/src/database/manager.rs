//! Shared SQLite pool and schema migrations.
//!
//! The schema is applied from `schema.sql` and its revision is recorded in
//! SQLite's own `user_version` header field, so an up-to-date file is left
//! alone on startup.

use std::path::Path;

use rusqlite::params;
use tracing::{debug, info, instrument};
use wiss_common::storage::{HealthStatus, SqliteConnection, SqlitePool, SqlitePoolConfig};
use wiss_domain::{DatabaseConfig, Result};

use crate::errors::IntoDomainResult;

/// Revision written to `PRAGMA user_version` once `schema.sql` is applied.
const SCHEMA_REVISION: i64 = 1;
const SCHEMA_SQL: &str = include_str!("schema.sql");

/// Owns the connection pool every repository borrows from.
pub struct DbManager {
    pool: SqlitePool,
}

impl DbManager {
    /// Open (or create) the database file with a pool of `pool_size`.
    pub fn new<P: AsRef<Path>>(db_path: P, pool_size: u32) -> Result<Self> {
        let path = db_path.as_ref();
        let pool = SqlitePool::new(path, SqlitePoolConfig::with_max_size(pool_size)).into_domain()?;

        info!(db_path = %path.display(), pool_size = pool.max_size(), "database opened");
        Ok(Self { pool })
    }

    pub fn from_config(config: &DatabaseConfig) -> Result<Self> {
        Self::new(&config.path, config.pool_size)
    }

    pub fn get_connection(&self) -> Result<SqliteConnection> {
        self.pool.get_connection().into_domain()
    }

    /// Bring the schema up to [`SCHEMA_REVISION`]; a no-op when it already is.
    #[instrument(skip(self))]
    pub fn run_migrations(&self) -> Result<()> {
        let conn = self.get_connection()?;
        let current: i64 =
            conn.pragma_query_value(None, "user_version", |row| row.get(0)).into_domain()?;
        if current >= SCHEMA_REVISION {
            debug!(revision = current, "schema already current");
            return Ok(());
        }

        conn.execute_batch(SCHEMA_SQL).into_domain()?;
        conn.pragma_update(None, "user_version", SCHEMA_REVISION).into_domain()?;
        info!(from = current, to = SCHEMA_REVISION, "schema migrated");
        Ok(())
    }

    /// Round-trip a trivial query, then report pool occupancy.
    pub fn health_check(&self) -> Result<HealthStatus> {
        let conn = self.get_connection()?;
        conn.query_row("SELECT 1", params![], |row| row.get::<_, i64>(0)).into_domain()?;
        drop(conn);
        Ok(self.pool.health_check())
    }
}
