use serde::{Deserialize, Serialize};

/// What a marker represents on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerKind {
    Rocket,
    Aircraft,
    Vessel,
}

impl MarkerKind {
    /// Stable lowercase name, also used by the filter's text predicate.
    pub fn name(&self) -> &'static str {
        match self {
            MarkerKind::Rocket => "rocket",
            MarkerKind::Aircraft => "aircraft",
            MarkerKind::Vessel => "vessel",
        }
    }
}

/// A renderable, projected point. Derived from a traffic entity, a live feed
/// record, or an upcoming launch; recomputed every tick and never persisted.
///
/// `x`/`y` are screen percentages (see `projection`); `heading` is the marker
/// rotation in degrees when one applies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub id: String,
    pub kind: MarkerKind,
    pub x: f64,
    pub y: f64,
    pub heading: Option<f64>,
    pub label: Option<String>,
    pub active: bool,
}

/// The per-tick output record handed to the transport layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerFrame {
    pub tick: u64,
    /// Whether the aircraft markers in this frame came from the live feed
    /// rather than the simulator.
    pub live_aircraft: bool,
    pub markers: Vec<Marker>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_names_are_lowercase() {
        assert_eq!(MarkerKind::Rocket.name(), "rocket");
        assert_eq!(MarkerKind::Aircraft.name(), "aircraft");
        assert_eq!(MarkerKind::Vessel.name(), "vessel");
    }

    #[test]
    fn absent_optional_fields_serialize_as_null() {
        let marker = Marker {
            id: "sim-vessel-0".to_string(),
            kind: MarkerKind::Vessel,
            x: 50.0,
            y: 50.0,
            heading: None,
            label: None,
            active: true,
        };
        let json = serde_json::to_string(&marker).unwrap();
        assert!(json.contains(r#""heading":null"#));
        assert!(json.contains(r#""label":null"#));
        assert!(json.contains(r#""kind":"vessel""#));
    }
}
