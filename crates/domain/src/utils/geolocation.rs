//! Well-known-text point parsing and great-circle distances
//!
//! The map widget stores locations as `SRID=4326;POINT(lng lat)`; note the
//! longitude comes first.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::constants::{EARTH_RADIUS_KM, EARTH_RADIUS_MILES};

#[allow(clippy::expect_used)]
static WKT_POINT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^SRID=\d+;POINT\(\s*([-+\d.eE]+)\s+([-+\d.eE]+)\s*\)$")
        .expect("point pattern is valid")
});

/// A WGS84 coordinate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Extract the coordinate from a `SRID=<code>;POINT(lng lat)` string.
///
/// The whole input must be the point: a missing `SRID=` prefix, surrounding
/// text or a malformed number all yield `None`.
///
/// # Examples
///
/// ```
/// use wiss_domain::utils::geolocation::{parse_wkt_point, LatLng};
///
/// assert_eq!(
///     parse_wkt_point("SRID=4326;POINT(-4.05 53.18)"),
///     Some(LatLng::new(53.18, -4.05))
/// );
/// assert_eq!(parse_wkt_point("not a point"), None);
/// ```
#[must_use]
pub fn parse_wkt_point(wkt: &str) -> Option<LatLng> {
    let caps = WKT_POINT.captures(wkt)?;
    let lng = caps.get(1)?.as_str().parse::<f64>().ok()?;
    let lat = caps.get(2)?.as_str().parse::<f64>().ok()?;
    Some(LatLng { lat, lng })
}

/// Distance rounded up to whole units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Distance {
    pub miles: u32,
    pub km: u32,
}

/// Haversine distance between two points, each unit rounded up.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn distance_between(a: LatLng, b: LatLng) -> Distance {
    let (lat1, lng1) = (a.lat.to_radians(), a.lng.to_radians());
    let (lat2, lng2) = (b.lat.to_radians(), b.lng.to_radians());

    let dlat = lat2 - lat1;
    let dlng = lng2 - lng1;
    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().asin();

    Distance {
        miles: (c * EARTH_RADIUS_MILES).ceil() as u32,
        km: (c * EARTH_RADIUS_KM).ceil() as u32,
    }
}
