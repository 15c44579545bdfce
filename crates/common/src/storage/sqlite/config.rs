//! SQLite connection pool configuration

use std::time::Duration;

/// r2d2 pool and per-connection settings
#[derive(Debug, Clone)]
pub struct SqlitePoolConfig {
    /// Maximum number of connections in the pool
    pub max_size: u32,

    /// How long to wait for a free connection
    pub connection_timeout: Duration,

    /// Busy timeout for SQLite operations
    pub busy_timeout: Duration,

    /// Enable WAL journal mode
    pub enable_wal: bool,

    /// Enable foreign key constraints (required for cascading deletes)
    pub enable_foreign_keys: bool,
}

impl SqlitePoolConfig {
    /// Default configuration with a custom pool size (clamped to at least 1).
    pub fn with_max_size(max_size: u32) -> Self {
        Self { max_size: max_size.max(1), ..Self::default() }
    }
}

impl Default for SqlitePoolConfig {
    fn default() -> Self {
        Self {
            max_size: 10,
            connection_timeout: Duration::from_secs(5),
            busy_timeout: Duration::from_millis(5000),
            enable_wal: true,
            enable_foreign_keys: true,
        }
    }
}
