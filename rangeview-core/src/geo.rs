use thiserror::Error;

/// Errors raised when constructing a [`GeoBounds`] with non-positive extents.
///
/// These are construction-time failures: a degenerate bounding box would make
/// the projection divide by zero, so it is rejected up front instead of being
/// checked on every call.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BoundsError {
    #[error("latitude extent is not positive: min_lat {min} >= max_lat {max}")]
    LatitudeExtent { min: f64, max: f64 },
    #[error("longitude extent is not positive: min_lon {min} >= max_lon {max}")]
    LongitudeExtent { min: f64, max: f64 },
}

/// Rectangular lat/lon region constraining simulated traffic and projection.
///
/// Invariant (enforced at construction): `min_lat < max_lat` and
/// `min_lon < max_lon`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBounds {
    min_lat: f64,
    max_lat: f64,
    min_lon: f64,
    max_lon: f64,
}

impl GeoBounds {
    pub fn new(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> Result<Self, BoundsError> {
        if !(min_lat < max_lat) {
            return Err(BoundsError::LatitudeExtent { min: min_lat, max: max_lat });
        }
        if !(min_lon < max_lon) {
            return Err(BoundsError::LongitudeExtent { min: min_lon, max: max_lon });
        }
        Ok(Self { min_lat, max_lat, min_lon, max_lon })
    }

    pub fn min_lat(&self) -> f64 { self.min_lat }
    pub fn max_lat(&self) -> f64 { self.max_lat }
    pub fn min_lon(&self) -> f64 { self.min_lon }
    pub fn max_lon(&self) -> f64 { self.max_lon }

    /// Latitude extent in degrees. Always positive.
    pub fn lat_range(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    /// Longitude extent in degrees. Always positive.
    pub fn lon_range(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    pub fn clamp_lat(&self, lat: f64) -> f64 {
        lat.clamp(self.min_lat, self.max_lat)
    }

    pub fn clamp_lon(&self, lon: f64) -> f64 {
        lon.clamp(self.min_lon, self.max_lon)
    }

    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lat >= self.min_lat && lat <= self.max_lat && lon >= self.min_lon && lon <= self.max_lon
    }
}
