//! Upcoming-launch metadata from a launch-library style API.
//!
//! Fetched once at startup; the mission records populate the detail card and
//! the rocket markers. Pad IDs map to screen coordinates through a configured
//! [`PadMap`] with a fallback for unmapped pads.

use crate::FeedError;
use rand::Rng;
use rangeview_core::{Marker, MarkerKind, ScreenPos};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;

/// Externally supplied mission metadata, read-only to the core.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissionRecord {
    pub id: String,
    pub title: String,
    pub location: String,
    pub launch_time_utc: String,
    pub status_label: String,
    pub rocket_name: String,
    pub payload_name: String,
    pub orbit_name: String,
    pub description: String,
    pub pad_id: Option<i64>,
}

impl MissionRecord {
    /// Marker id for this mission's rocket marker.
    pub fn marker_id(&self) -> String {
        format!("launch-{}", self.id)
    }
}

/// Pad-id to screen-coordinate lookup with a default for unmapped pads.
#[derive(Debug, Clone)]
pub struct PadMap {
    coords: HashMap<i64, ScreenPos>,
    fallback: ScreenPos,
}

impl PadMap {
    pub fn new(coords: HashMap<i64, ScreenPos>, fallback: ScreenPos) -> Self {
        Self { coords, fallback }
    }

    pub fn resolve(&self, pad_id: Option<i64>) -> ScreenPos {
        pad_id
            .and_then(|id| self.coords.get(&id).copied())
            .unwrap_or(self.fallback)
    }
}

/// Blocking client for the upcoming-launches endpoint.
pub struct LaunchClient {
    url: String,
    location_ids: Vec<u32>,
    limit: u32,
    client: reqwest::blocking::Client,
}

impl LaunchClient {
    pub fn new(
        url: impl Into<String>,
        location_ids: Vec<u32>,
        limit: u32,
        timeout: Duration,
    ) -> Result<Self, FeedError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self { url: url.into(), location_ids, limit, client })
    }

    pub fn fetch_upcoming(&self) -> Result<Vec<MissionRecord>, FeedError> {
        let ids = self
            .location_ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");
        let url = format!(
            "{}?limit={}&location__ids={}&mode=detailed",
            self.url, self.limit, ids
        );

        let response = self.client.get(&url).send()?;
        if !response.status().is_success() {
            return Err(FeedError::Status(response.status().as_u16()));
        }

        let body: Value = response.json()?;
        let missions = parse_launches(&body)?;
        log::debug!("fetched {} upcoming launches", missions.len());
        Ok(missions)
    }
}

/// Maps a launches response body to mission records. Missing metadata fields
/// degrade to placeholder strings rather than failing the whole feed.
pub fn parse_launches(body: &Value) -> Result<Vec<MissionRecord>, FeedError> {
    let results = body
        .get("results")
        .and_then(Value::as_array)
        .ok_or_else(|| FeedError::Malformed("missing results array".to_string()))?;

    let mut missions = Vec::with_capacity(results.len());
    for launch in results {
        let Some(id) = launch.get("id").and_then(Value::as_str) else { continue };

        missions.push(MissionRecord {
            id: id.to_string(),
            title: str_at(launch, &["name"]).unwrap_or_else(|| "Unknown Mission".to_string()),
            location: str_at(launch, &["pad", "name"]).unwrap_or_else(|| "Pad".to_string()),
            launch_time_utc: str_at(launch, &["net"]).unwrap_or_default(),
            status_label: str_at(launch, &["status", "abbrev"])
                .unwrap_or_else(|| "Scheduled".to_string()),
            rocket_name: str_at(launch, &["rocket", "configuration", "name"])
                .unwrap_or_else(|| "Unknown Rocket".to_string()),
            payload_name: str_at(launch, &["mission", "name"])
                .unwrap_or_else(|| "Payload".to_string()),
            orbit_name: str_at(launch, &["mission", "orbit", "name"])
                .unwrap_or_else(|| "Orbit".to_string()),
            description: str_at(launch, &["mission", "description"])
                .unwrap_or_else(|| "No description available.".to_string()),
            pad_id: launch.get("pad").and_then(|p| p.get("id")).and_then(Value::as_i64),
        });
    }

    Ok(missions)
}

fn str_at(value: &Value, path: &[&str]) -> Option<String> {
    let mut current = value;
    for key in path {
        current = current.get(key)?;
    }
    current.as_str().map(str::to_string)
}

/// Builds rocket markers for the fetched missions. Coordinates are jittered
/// slightly (up to +/-1%) so missions sharing a pad stay distinguishable.
pub fn rocket_markers<R: Rng>(
    missions: &[MissionRecord],
    pads: &PadMap,
    rng: &mut R,
) -> Vec<Marker> {
    missions
        .iter()
        .map(|mission| {
            let pos = pads.resolve(mission.pad_id);
            let jitter_x = (rng.gen::<f64>() - 0.5) * 2.0;
            let jitter_y = (rng.gen::<f64>() - 0.5) * 2.0;
            // Label with the pad name up to the first comma ("LC-39A" out of
            // "LC-39A, Kennedy Space Center").
            let label = mission
                .location
                .split(',')
                .next()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .unwrap_or("Pad")
                .to_string();

            Marker {
                id: mission.marker_id(),
                kind: MarkerKind::Rocket,
                x: pos.x + jitter_x,
                y: pos.y + jitter_y,
                heading: None,
                label: Some(label),
                active: true,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::json;

    fn sample_body() -> Value {
        json!({
            "count": 2,
            "results": [
                {
                    "id": "aaaa-1111",
                    "name": "Falcon 9 | Starlink 6-42",
                    "net": "2025-10-25T14:30:00Z",
                    "status": { "abbrev": "Go" },
                    "pad": { "id": 87, "name": "LC-39A, Kennedy Space Center" },
                    "rocket": { "configuration": { "name": "Falcon 9 B5" } },
                    "mission": {
                        "name": "Starlink v2",
                        "orbit": { "name": "LEO" },
                        "description": "Batch of Starlink v2 Mini satellites."
                    }
                },
                {
                    "id": "bbbb-2222",
                    "name": "Atlas V | USSF-51",
                    "net": "2025-11-15T20:00:00Z",
                    "pad": { "id": 999, "name": "SLC-41, Cape Canaveral SFS" }
                }
            ]
        })
    }

    fn pad_map() -> PadMap {
        let mut coords = HashMap::new();
        coords.insert(87, ScreenPos { x: 50.0, y: 35.0 });
        PadMap::new(coords, ScreenPos { x: 48.0, y: 32.0 })
    }

    #[test]
    fn parses_missions_with_placeholder_fallbacks() {
        let missions = parse_launches(&sample_body()).unwrap();
        assert_eq!(missions.len(), 2);

        assert_eq!(missions[0].title, "Falcon 9 | Starlink 6-42");
        assert_eq!(missions[0].status_label, "Go");
        assert_eq!(missions[0].rocket_name, "Falcon 9 B5");
        assert_eq!(missions[0].orbit_name, "LEO");
        assert_eq!(missions[0].pad_id, Some(87));

        // Second launch is missing most metadata; placeholders apply.
        assert_eq!(missions[1].status_label, "Scheduled");
        assert_eq!(missions[1].rocket_name, "Unknown Rocket");
        assert_eq!(missions[1].payload_name, "Payload");
        assert_eq!(missions[1].orbit_name, "Orbit");
        assert_eq!(missions[1].description, "No description available.");
    }

    #[test]
    fn missing_results_is_malformed() {
        let body = json!({ "detail": "throttled" });
        assert!(matches!(parse_launches(&body), Err(FeedError::Malformed(_))));
    }

    #[test]
    fn pad_map_falls_back_for_unmapped_pads() {
        let pads = pad_map();
        assert_eq!(pads.resolve(Some(87)), ScreenPos { x: 50.0, y: 35.0 });
        assert_eq!(pads.resolve(Some(999)), ScreenPos { x: 48.0, y: 32.0 });
        assert_eq!(pads.resolve(None), ScreenPos { x: 48.0, y: 32.0 });
    }

    #[test]
    fn rocket_markers_jitter_around_the_pad() {
        let missions = parse_launches(&sample_body()).unwrap();
        let pads = pad_map();
        let mut rng = StdRng::seed_from_u64(9);
        let markers = rocket_markers(&missions, &pads, &mut rng);

        assert_eq!(markers.len(), 2);
        assert_eq!(markers[0].id, "launch-aaaa-1111");
        assert_eq!(markers[0].kind, MarkerKind::Rocket);
        assert_eq!(markers[0].label.as_deref(), Some("LC-39A"));
        assert!((markers[0].x - 50.0).abs() <= 1.0);
        assert!((markers[0].y - 35.0).abs() <= 1.0);
        // Unmapped pad 999 lands on the fallback coordinate.
        assert!((markers[1].x - 48.0).abs() <= 1.0);
        assert!((markers[1].y - 32.0).abs() <= 1.0);
    }
}
