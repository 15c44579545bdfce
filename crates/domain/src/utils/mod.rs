//! Pure utility functions for domain logic

pub mod geolocation;
