//! Event recurrence, materialised instances, filtering and listing

pub mod filter;
pub mod instances;
pub mod lifecycle;
pub mod listing;
pub mod ports;
pub mod recurrence;
