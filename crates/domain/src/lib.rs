//! # Wiss Domain
//!
//! Domain types and models for the Wiss events site.
//!
//! This crate contains:
//! - Event, recurrence and taxonomy data types
//! - Polygon map types
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Pure helpers (well-known-text point parsing, distances)
//!
//! ## Architecture
//! - No dependencies on other Wiss crates
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
pub use utils::geolocation::{distance_between, parse_wkt_point, Distance, LatLng};
