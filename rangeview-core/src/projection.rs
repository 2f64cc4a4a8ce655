use crate::geo::GeoBounds;
use serde::{Deserialize, Serialize};

/// A normalized screen position. Both axes are percentages of the map crop:
/// x grows eastward, y grows southward (screen convention, so y is inverted
/// relative to latitude).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenPos {
    pub x: f64,
    pub y: f64,
}

/// Maps a geographic coordinate to a normalized screen position for the map
/// crop described by `bounds`.
///
/// No clamping is performed: coordinates outside the bounds legitimately
/// produce values outside [0, 100]. Callers that need on-screen display must
/// clamp upstream.
pub fn project(lat: f64, lon: f64, bounds: &GeoBounds) -> ScreenPos {
    let lat_percent = (lat - bounds.min_lat()) / bounds.lat_range();
    let lon_percent = (lon - bounds.min_lon()) / bounds.lon_range();

    // Invert latitude: screen y goes down, latitude goes up.
    ScreenPos {
        x: lon_percent * 100.0,
        y: (1.0 - lat_percent) * 100.0,
    }
}

/// Inverse of [`project`]: recovers the geographic coordinate for a screen
/// position. Returns `(lat, lon)`.
pub fn unproject(pos: &ScreenPos, bounds: &GeoBounds) -> (f64, f64) {
    let lat = bounds.min_lat() + (1.0 - pos.y / 100.0) * bounds.lat_range();
    let lon = bounds.min_lon() + (pos.x / 100.0) * bounds.lon_range();
    (lat, lon)
}
