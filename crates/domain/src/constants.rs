//! Domain constants
//!
//! Centralized location for domain-level constants.

// Listing
pub const DEFAULT_PAGE_SIZE: usize = 10;

// Great-circle distance
pub const EARTH_RADIUS_MILES: f64 = 3956.0;
pub const EARTH_RADIUS_KM: f64 = 6371.0;

// Polygon map captions
pub const WELSH_LANGUAGE_CODE: &str = "cy";
pub const VIEW_MORE_WELSH: &str = "Gweld mwy";
pub const VIEW_MORE_DEFAULT: &str = "View more";

// Logging
pub const DEFAULT_LOG_LEVEL: &str = "info";
