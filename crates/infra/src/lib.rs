//! # Wiss Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - SQLite repositories for events, date instances, taxonomy and polygons
//! - Schema management
//! - Configuration loading (environment, JSON, TOML)
//! - Tracing subscriber setup
//!
//! ## Architecture
//! - Implements traits defined in `wiss-core`
//! - Depends on `wiss-common` for pooling and transactions
//! - Contains all "impure" code (I/O)

pub mod config;
pub mod database;
pub mod errors;
pub mod observability;

// Re-export commonly used items
pub use database::*;
pub use errors::InfraError;
pub use observability::init_tracing;
