//! SQLite connection pool
//!
//! r2d2 pool whose connections get the standard pragmas applied on open.

use std::path::Path;
use std::time::Instant;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use tracing::{debug, info, instrument, warn};

use super::config::SqlitePoolConfig;
use super::connection::SqliteConnection;
use super::pragmas::apply_connection_pragmas;
use crate::storage::error::{StorageError, StorageResult};
use crate::storage::types::HealthStatus;

/// SQLite connection pool
#[derive(Debug)]
pub struct SqlitePool {
    pool: Pool<SqliteConnectionManager>,
    config: SqlitePoolConfig,
}

impl SqlitePool {
    /// Create a pool for the database file at `path`
    ///
    /// A test connection is checked out before returning so that an
    /// unreadable file fails here instead of on first use.
    #[instrument(fields(db_path = ?path, pool_size = config.max_size))]
    pub fn new(path: &Path, config: SqlitePoolConfig) -> StorageResult<Self> {
        info!("Creating SQLite connection pool");

        let pool_config = config.clone();
        let manager = SqliteConnectionManager::file(path).with_init(move |conn| {
            apply_connection_pragmas(conn, &pool_config)
                .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
        });

        let pool = Pool::builder()
            .max_size(config.max_size)
            .connection_timeout(config.connection_timeout)
            .build(manager)
            .map_err(|e| {
                warn!("Failed to create connection pool: {}", e);
                StorageError::Connection(format!("Failed to create pool: {e}"))
            })?;

        info!("SQLite pool created with {} connections", config.max_size);

        Ok(Self { pool, config })
    }

    /// Check a connection out of the pool
    #[instrument(skip(self), fields(pool_size = self.config.max_size))]
    pub fn get_connection(&self) -> StorageResult<SqliteConnection> {
        let start = Instant::now();

        match self.pool.get() {
            Ok(conn) => {
                debug!("Connection acquired in {}ms", start.elapsed().as_millis());
                Ok(SqliteConnection::new(conn))
            }
            Err(e) => {
                let err_str = e.to_string().to_lowercase();
                if err_str.contains("timed out") || err_str.contains("timeout") {
                    warn!("Connection timeout after {:?}", self.config.connection_timeout);
                    Err(StorageError::Timeout(self.config.connection_timeout.as_secs()))
                } else {
                    warn!("Connection error: {}", e);
                    Err(StorageError::Connection(format!("Failed to get connection: {e}")))
                }
            }
        }
    }

    /// Configured maximum pool size
    pub fn max_size(&self) -> u32 {
        self.config.max_size
    }

    /// Report pool state and whether a connection can be checked out
    pub fn health_check(&self) -> HealthStatus {
        let state = self.pool.state();

        match self.pool.get() {
            Ok(_conn) => HealthStatus::healthy(
                state.connections as usize,
                state.idle_connections as usize,
                self.config.max_size as usize,
            ),
            Err(e) => HealthStatus::unhealthy(format!("Pool unhealthy: {e}")),
        }
    }
}
