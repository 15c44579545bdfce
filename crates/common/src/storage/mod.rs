//! SQLite storage primitives
//!
//! Generic pooling and transaction infrastructure. Schema management belongs
//! to the application layer (`wiss-infra`), not here.

pub mod error;
pub mod sqlite;
pub mod types;

// Re-export commonly used types
pub use error::{StorageError, StorageResult};
pub use sqlite::{
    apply_connection_pragmas, SqliteConnection, SqlitePool, SqlitePoolConfig, SqliteStatement,
};
pub use types::{HealthStatus, Transaction};
