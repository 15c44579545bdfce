//! Conversions from external infrastructure errors into domain errors.

use rusqlite::Error as SqlError;
use wiss_common::storage::StorageError;
use wiss_domain::WissError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub WissError);

impl From<InfraError> for WissError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<WissError> for InfraError {
    fn from(value: WissError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoWissError {
    fn into_wiss(self) -> WissError;
}

/* -------------------------------------------------------------------------- */
/* rusqlite::Error → WissError */
/* -------------------------------------------------------------------------- */

impl IntoWissError for SqlError {
    fn into_wiss(self) -> WissError {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as RE;

        match self {
            RE::SqliteFailure(err, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match (err.code, err.extended_code) {
                    (ErrorCode::DatabaseBusy, _) => WissError::Database("database is busy".into()),
                    (ErrorCode::DatabaseLocked, _) => {
                        WissError::Database("database is locked".into())
                    }
                    (ErrorCode::ConstraintViolation, 2067) => {
                        WissError::Database(format!("unique constraint violation: {message}"))
                    }
                    (ErrorCode::ConstraintViolation, 787) => {
                        WissError::Database("foreign key constraint violation".into())
                    }
                    (ErrorCode::ConstraintViolation, 275) => {
                        WissError::InvalidInput(format!("check constraint failed: {message}"))
                    }
                    _ => WissError::Database(format!(
                        "sqlite failure {:?} (code {}): {}",
                        err.code, err.extended_code, message
                    )),
                }
            }
            RE::QueryReturnedNoRows => WissError::NotFound("no rows returned by query".into()),
            RE::FromSqlConversionFailure(_, _, cause) => {
                WissError::Database(format!("failed to convert sqlite value: {cause}"))
            }
            RE::InvalidColumnType(_, _, ty) => {
                WissError::Database(format!("invalid column type: {ty}"))
            }
            RE::InvalidPath(path) => {
                WissError::Database(format!("invalid database path: {}", path.to_string_lossy()))
            }
            other => WissError::Database(other.to_string()),
        }
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        InfraError(value.into_wiss())
    }
}

/* -------------------------------------------------------------------------- */
/* StorageError → WissError */
/* -------------------------------------------------------------------------- */

impl IntoWissError for StorageError {
    fn into_wiss(self) -> WissError {
        match self {
            StorageError::Rusqlite(err) => err.into_wiss(),
            StorageError::InvalidConfig(message) => WissError::Config(message),
            StorageError::Timeout(secs) => {
                WissError::Database(format!("timed out waiting {secs}s for a connection"))
            }
            other => WissError::Database(other.to_string()),
        }
    }
}

impl From<StorageError> for InfraError {
    fn from(value: StorageError) -> Self {
        InfraError(value.into_wiss())
    }
}
