//! Infrastructure primitives shared across the Wiss crates.
//!
//! Currently this is the SQLite storage layer: an r2d2 connection pool,
//! a pooled connection wrapper, a rollback-on-drop transaction guard and the
//! storage error type. Repositories in `wiss-infra` are built on top of it.

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

pub mod storage;

pub use storage::{StorageError, StorageResult};
