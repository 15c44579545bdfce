//! Per-connection pragma setup

use rusqlite::Connection;

use super::config::SqlitePoolConfig;
use crate::storage::error::{StorageError, StorageResult};

/// Apply connection-level pragmas
///
/// Run for every connection the pool opens: WAL journal (when enabled),
/// NORMAL synchronous mode, foreign keys and the busy timeout.
pub fn apply_connection_pragmas(conn: &Connection, config: &SqlitePoolConfig) -> StorageResult<()> {
    let mut pragma_sql = String::new();

    if config.enable_wal {
        pragma_sql.push_str("PRAGMA journal_mode=WAL;\n");
    }

    pragma_sql.push_str("PRAGMA synchronous=NORMAL;\n");

    // SQLite ships with foreign keys off; cascades depend on this.
    if config.enable_foreign_keys {
        pragma_sql.push_str("PRAGMA foreign_keys=ON;\n");
    }

    conn.execute_batch(&pragma_sql)
        .map_err(|e| StorageError::Query(format!("Failed to apply pragmas: {e}")))?;

    conn.busy_timeout(config.busy_timeout)
        .map_err(|e| StorageError::Query(format!("Failed to set busy timeout: {e}")))?;

    Ok(())
}
