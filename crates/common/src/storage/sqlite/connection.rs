//! Pooled SQLite connection wrapper

use std::ops::{Deref, DerefMut};

use r2d2::PooledConnection;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{
    Connection as RusqliteConnection, Row, Statement as RusqliteStatement, ToSql,
    TransactionBehavior,
};
use tracing::instrument;

use crate::storage::error::{StorageError, StorageResult};
use crate::storage::types::Transaction;

/// Pooled SQLite connection
///
/// The connection goes back to the pool when dropped.
pub struct SqliteConnection {
    inner: PooledConnection<SqliteConnectionManager>,
}

impl SqliteConnection {
    /// Wrap a pooled connection
    pub fn new(conn: PooledConnection<SqliteConnectionManager>) -> Self {
        Self { inner: conn }
    }

    /// Execute a statement that does not return rows
    #[instrument(skip(self, params), fields(sql = %sql))]
    pub fn execute(&self, sql: &str, params: &[&dyn ToSql]) -> StorageResult<usize> {
        self.inner.execute(sql, params).map_err(StorageError::from)
    }

    /// Execute a query that returns a single row
    #[instrument(skip(self, params, f), fields(sql = %sql))]
    pub fn query_row<T, F>(&self, sql: &str, params: &[&dyn ToSql], f: F) -> StorageResult<T>
    where
        F: FnOnce(&Row<'_>) -> Result<T, rusqlite::Error>,
    {
        self.inner.query_row(sql, params, f).map_err(StorageError::from)
    }

    /// Prepare a statement
    #[instrument(skip(self), fields(sql = %sql))]
    pub fn prepare(&self, sql: &str) -> StorageResult<SqliteStatement<'_>> {
        let stmt = self.inner.prepare(sql).map_err(StorageError::from)?;
        Ok(SqliteStatement::new(stmt))
    }

    /// Begin a transaction
    #[instrument(skip(self))]
    pub fn transaction(&mut self) -> StorageResult<Transaction<'_>> {
        let tx = self.inner.transaction().map_err(StorageError::from)?;
        Ok(Transaction::new(tx))
    }

    /// Begin a transaction that takes the database write lock up front
    ///
    /// Other writers wait (up to the busy timeout) until this transaction
    /// ends, so anything read inside it stays current until commit.
    #[instrument(skip(self))]
    pub fn immediate_transaction(&mut self) -> StorageResult<Transaction<'_>> {
        let tx = self
            .inner
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(StorageError::from)?;
        Ok(Transaction::new(tx))
    }
}

impl Deref for SqliteConnection {
    type Target = RusqliteConnection;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for SqliteConnection {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}

/// Prepared statement wrapper
pub struct SqliteStatement<'conn> {
    inner: RusqliteStatement<'conn>,
}

impl<'conn> SqliteStatement<'conn> {
    /// Wrap a prepared statement
    pub fn new(stmt: RusqliteStatement<'conn>) -> Self {
        Self { inner: stmt }
    }

    /// Execute the statement with parameters
    pub fn execute(&mut self, params: &[&dyn ToSql]) -> StorageResult<usize> {
        self.inner.execute(params).map_err(StorageError::from)
    }

    /// Query with the statement and collect the mapped rows
    pub fn query_map<T, F>(&mut self, params: &[&dyn ToSql], mut f: F) -> StorageResult<Vec<T>>
    where
        F: FnMut(&Row<'_>) -> Result<T, rusqlite::Error>,
    {
        let rows = self.inner.query_map(params, |row| f(row)).map_err(StorageError::from)?;

        rows.collect::<Result<Vec<_>, _>>().map_err(StorageError::from)
    }
}
