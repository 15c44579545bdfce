//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::EventId;

/// Main error type for Wiss
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum WissError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Filtering was asked for without the request it reads parameters from.
    #[error("Missing request context: {0}")]
    MissingRequestContext(String),

    /// Materialising date instances after a committed save failed. The
    /// previously stored instances are still in place.
    #[error("Recomputing date instances for event {event_id} failed: {reason}")]
    RecomputeFailed { event_id: EventId, reason: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for Wiss operations
pub type Result<T> = std::result::Result<T, WissError>;
