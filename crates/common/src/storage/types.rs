//! Transaction guard and health reporting types

use rusqlite::{ToSql, Transaction as RusqliteTransaction};

use super::error::{StorageError, StorageResult};
use super::sqlite::SqliteStatement;

/// Transaction wrapper
///
/// Transactions automatically roll back on drop unless committed, so an
/// early `?` return leaves the database exactly as it was before `BEGIN`.
pub struct Transaction<'conn> {
    inner: Option<RusqliteTransaction<'conn>>,
}

impl<'conn> Transaction<'conn> {
    /// Create a new transaction wrapper
    pub fn new(transaction: RusqliteTransaction<'conn>) -> Self {
        Self { inner: Some(transaction) }
    }

    fn active(&self) -> StorageResult<&RusqliteTransaction<'conn>> {
        self.inner
            .as_ref()
            .ok_or_else(|| StorageError::Query("Transaction already consumed".to_string()))
    }

    /// Commit the transaction
    pub fn commit(mut self) -> StorageResult<()> {
        match self.inner.take() {
            Some(tx) => tx.commit().map_err(StorageError::from),
            None => Err(StorageError::Query("Transaction already consumed".to_string())),
        }
    }

    /// Roll the transaction back explicitly
    pub fn rollback(mut self) -> StorageResult<()> {
        match self.inner.take() {
            Some(tx) => tx.rollback().map_err(StorageError::from),
            None => Err(StorageError::Query("Transaction already consumed".to_string())),
        }
    }

    /// Execute a statement within the transaction
    pub fn execute(&self, sql: &str, params: &[&dyn ToSql]) -> StorageResult<usize> {
        self.active()?.execute(sql, params).map_err(StorageError::from)
    }

    /// Prepare a statement bound to the transaction's connection
    pub fn prepare(&self, sql: &str) -> StorageResult<SqliteStatement<'_>> {
        let stmt = self.active()?.prepare(sql).map_err(StorageError::from)?;
        Ok(SqliteStatement::new(stmt))
    }

    /// Row id of the most recent successful `INSERT` in this transaction
    pub fn last_insert_rowid(&self) -> StorageResult<i64> {
        Ok(self.active()?.last_insert_rowid())
    }
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        if let Some(tx) = self.inner.take() {
            let _ = tx.rollback();
        }
    }
}

/// Health status of the storage pool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthStatus {
    pub healthy: bool,
    pub connections: usize,
    pub idle_connections: usize,
    pub max_connections: usize,
    pub message: Option<String>,
}

impl HealthStatus {
    /// Create a healthy status
    pub fn healthy(connections: usize, idle: usize, max: usize) -> Self {
        Self {
            healthy: true,
            connections,
            idle_connections: idle,
            max_connections: max,
            message: None,
        }
    }

    /// Create an unhealthy status
    pub fn unhealthy(message: String) -> Self {
        Self {
            healthy: false,
            connections: 0,
            idle_connections: 0,
            max_connections: 0,
            message: Some(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unhealthy_status_carries_message() {
        let status = HealthStatus::unhealthy("pool exhausted".to_string());

        assert!(!status.healthy);
        assert_eq!(status.max_connections, 0);
        assert_eq!(status.message.as_deref(), Some("pool exhausted"));
    }

    #[test]
    fn healthy_status_reports_counts() {
        let status = HealthStatus::healthy(2, 1, 4);

        assert!(status.healthy);
        assert_eq!(status.connections, 2);
        assert_eq!(status.idle_connections, 1);
        assert_eq!(status.max_connections, 4);
        assert!(status.message.is_none());
    }
}
