//! Live aircraft positions from an OpenSky-style state-vector API.
//!
//! The API returns a `states` array of heterogeneous JSON rows; the consumed
//! fields are icao24 (0), callsign (1), longitude (5), latitude (6) and
//! true track (10).

use crate::FeedError;
use rangeview_core::{project, GeoBounds, Marker, MarkerKind};
use serde_json::Value;
use std::time::Duration;

/// One positional state vector, reduced to the fields the dashboard needs.
#[derive(Debug, Clone, PartialEq)]
pub struct AircraftState {
    pub icao24: String,
    pub callsign: Option<String>,
    pub lon: f64,
    pub lat: f64,
    pub track: Option<f64>,
}

/// Source of live aircraft states. A trait so the tick loop can be exercised
/// against canned data in tests.
pub trait AircraftSource {
    fn fetch_states(&self, bounds: &GeoBounds) -> Result<Vec<AircraftState>, FeedError>;
}

/// Blocking HTTP client for the state-vector endpoint. The request timeout
/// keeps a slow network call from starving subsequent ticks.
pub struct OpenSkyClient {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl OpenSkyClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, FeedError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self { base_url: base_url.into(), client })
    }
}

impl AircraftSource for OpenSkyClient {
    fn fetch_states(&self, bounds: &GeoBounds) -> Result<Vec<AircraftState>, FeedError> {
        let url = format!(
            "{}?lamin={}&lomin={}&lamax={}&lomax={}",
            self.base_url,
            bounds.min_lat(),
            bounds.min_lon(),
            bounds.max_lat(),
            bounds.max_lon()
        );

        let response = self.client.get(&url).send()?;
        if !response.status().is_success() {
            return Err(FeedError::Status(response.status().as_u16()));
        }

        let body: Value = response.json()?;
        let states = parse_states(&body)?;
        log::debug!("fetched {} state vectors", states.len());
        Ok(states)
    }
}

/// Extracts aircraft states from a state-vector response body.
///
/// A missing or null `states` field means no traffic, not an error. Rows
/// without a usable identifier or position are skipped.
pub fn parse_states(body: &Value) -> Result<Vec<AircraftState>, FeedError> {
    if !body.is_object() {
        return Err(FeedError::Malformed("response body is not an object".to_string()));
    }

    let rows = match body.get("states").and_then(Value::as_array) {
        Some(rows) => rows,
        None => return Ok(Vec::new()),
    };

    let mut states = Vec::with_capacity(rows.len());
    for row in rows {
        let Some(fields) = row.as_array() else { continue };

        let Some(icao24) = fields.first().and_then(Value::as_str) else { continue };
        let callsign = fields
            .get(1)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        let (Some(lon), Some(lat)) = (
            fields.get(5).and_then(Value::as_f64),
            fields.get(6).and_then(Value::as_f64),
        ) else {
            continue;
        };
        let track = fields.get(10).and_then(Value::as_f64);

        states.push(AircraftState {
            icao24: icao24.to_string(),
            callsign,
            lon,
            lat,
            track,
        });
    }

    Ok(states)
}

/// Projects live states to aircraft markers.
pub fn aircraft_markers(states: &[AircraftState], bounds: &GeoBounds) -> Vec<Marker> {
    states
        .iter()
        .map(|state| {
            let pos = project(state.lat, state.lon, bounds);
            Marker {
                id: format!("adsb-{}", state.icao24),
                kind: MarkerKind::Aircraft,
                x: pos.x,
                y: pos.y,
                heading: state.track,
                label: Some(state.callsign.clone().unwrap_or_else(|| "Unknown".to_string())),
                active: true,
            }
        })
        .collect()
}
