//! Storage error types

use thiserror::Error;

/// SQLite extended result code for `UNIQUE` constraint failures.
const SQLITE_CONSTRAINT_UNIQUE: i32 = 2067;

/// Storage error type
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Database query error: {0}")]
    Query(String),

    #[error("Database migration error: {0}")]
    Migration(String),

    #[error("Connection timeout after {0}s")]
    Timeout(u64),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Rusqlite(#[from] rusqlite::Error),

    #[error(transparent)]
    R2d2(#[from] r2d2::Error),
}

/// Storage result type
pub type StorageResult<T> = Result<T, StorageError>;

impl StorageError {
    /// Check if this error is retryable
    ///
    /// Connection timeouts and SQLite `BUSY`/`LOCKED` conditions are
    /// transient; everything else is not.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout(_) | Self::Connection(_) => true,
            Self::Rusqlite(err) => matches!(
                err.sqlite_error_code(),
                Some(rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked)
            ),
            _ => false,
        }
    }

    /// Whether the failure was a `UNIQUE` constraint violation.
    pub fn is_unique_violation(&self) -> bool {
        match self {
            Self::Rusqlite(rusqlite::Error::SqliteFailure(err, _)) => {
                err.extended_code == SQLITE_CONSTRAINT_UNIQUE
            }
            _ => false,
        }
    }
}
