use rand::Rng;
use rangeview_core::{project, GeoBounds, Marker, MarkerKind};
use serde::Serialize;

// --- Entities ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrafficKind {
    Aircraft,
    Vessel,
}

impl TrafficKind {
    pub fn marker_kind(&self) -> MarkerKind {
        match self {
            TrafficKind::Aircraft => MarkerKind::Aircraft,
            TrafficKind::Vessel => MarkerKind::Vessel,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            TrafficKind::Aircraft => "TRAFFIC",
            TrafficKind::Vessel => "VESSEL",
        }
    }
}

/// A synthetic traffic entity, owned exclusively by the simulator and mutated
/// in place every tick. `speed` is in degrees per tick; `heading` is degrees
/// in [0, 360) with 0 = north, increasing clockwise.
#[derive(Debug, Clone, Serialize)]
pub struct TrafficEntity {
    pub id: String,
    pub kind: TrafficKind,
    pub lat: f64,
    pub lon: f64,
    pub heading: f64,
    pub speed: f64,
}

/// Population parameters for the synthetic traffic.
#[derive(Debug, Clone, Copy)]
pub struct TrafficParams {
    pub aircraft_count: usize,
    pub vessel_count: usize,
    pub aircraft_speed: f64,
    pub vessel_speed: f64,
}

impl Default for TrafficParams {
    fn default() -> Self {
        // Aircraft move roughly 4x faster than vessels.
        Self {
            aircraft_count: 3,
            vessel_count: 5,
            aircraft_speed: 0.002,
            vessel_speed: 0.0005,
        }
    }
}

// --- Per-tick update ---

/// Advances one entity by one tick: dead-reckoning along its heading, then
/// reflecting off the bounding box.
///
/// The latitude and longitude reflections use different formulas
/// (`360 - heading` vs `180 - heading + 360`); both are applied
/// unconditionally and can combine in the same tick (corner reflection).
/// The asymmetry is intentional and must not be "corrected".
pub fn advance_entity(entity: &mut TrafficEntity, bounds: &GeoBounds) {
    // Heading 0 = north, clockwise; rotate into math convention first.
    let rad = (entity.heading - 90.0).to_radians();
    entity.lon += rad.cos() * entity.speed;
    entity.lat -= rad.sin() * entity.speed;

    if entity.lat < bounds.min_lat() || entity.lat > bounds.max_lat() {
        entity.heading = (360.0 - entity.heading).rem_euclid(360.0);
        entity.lat = bounds.clamp_lat(entity.lat);
    }
    if entity.lon < bounds.min_lon() || entity.lon > bounds.max_lon() {
        entity.heading = (180.0 - entity.heading + 360.0).rem_euclid(360.0);
        entity.lon = bounds.clamp_lon(entity.lon);
    }

    // Renormalize so headings stay in [0, 360).
    entity.heading = entity.heading.rem_euclid(360.0);
}

// --- Simulator ---

/// Owns a small fixed set of synthetic entities and advances their positions
/// deterministically per tick, bouncing off the configured bounds.
///
/// The RNG is injected so initialization (and therefore every trajectory) is
/// reproducible under a seeded source.
pub struct TrafficSimulator {
    bounds: GeoBounds,
    params: TrafficParams,
    entities: Vec<TrafficEntity>,
}

impl TrafficSimulator {
    pub fn new<R: Rng>(bounds: GeoBounds, params: TrafficParams, rng: &mut R) -> Self {
        let entities = spawn_entities(&bounds, &params, rng);
        Self { bounds, params, entities }
    }

    pub fn bounds(&self) -> &GeoBounds {
        &self.bounds
    }

    pub fn entities(&self) -> &[TrafficEntity] {
        &self.entities
    }

    /// Advances every entity by one tick, independently.
    pub fn tick(&mut self) {
        for entity in &mut self.entities {
            advance_entity(entity, &self.bounds);
        }
    }

    /// Discards the current population and spawns a fresh one.
    pub fn reset<R: Rng>(&mut self, rng: &mut R) {
        self.entities = spawn_entities(&self.bounds, &self.params, rng);
    }

    /// Projects every entity to a marker, carrying the (possibly reflected)
    /// heading as the marker rotation.
    pub fn markers(&self) -> Vec<Marker> {
        self.entities.iter().map(|e| self.to_marker(e)).collect()
    }

    pub fn aircraft_markers(&self) -> Vec<Marker> {
        self.kind_markers(TrafficKind::Aircraft)
    }

    pub fn vessel_markers(&self) -> Vec<Marker> {
        self.kind_markers(TrafficKind::Vessel)
    }

    fn kind_markers(&self, kind: TrafficKind) -> Vec<Marker> {
        self.entities
            .iter()
            .filter(|e| e.kind == kind)
            .map(|e| self.to_marker(e))
            .collect()
    }

    fn to_marker(&self, entity: &TrafficEntity) -> Marker {
        let pos = project(entity.lat, entity.lon, &self.bounds);
        Marker {
            id: entity.id.clone(),
            kind: entity.kind.marker_kind(),
            x: pos.x,
            y: pos.y,
            heading: Some(entity.heading),
            label: Some(entity.kind.label().to_string()),
            active: true,
        }
    }
}

fn spawn_entities<R: Rng>(
    bounds: &GeoBounds,
    params: &TrafficParams,
    rng: &mut R,
) -> Vec<TrafficEntity> {
    let mut entities = Vec::with_capacity(params.aircraft_count + params.vessel_count);

    for i in 0..params.aircraft_count {
        entities.push(TrafficEntity {
            id: format!("sim-aircraft-{i}"),
            kind: TrafficKind::Aircraft,
            lat: bounds.min_lat() + rng.gen::<f64>() * bounds.lat_range(),
            lon: bounds.min_lon() + rng.gen::<f64>() * bounds.lon_range(),
            heading: rng.gen::<f64>() * 360.0,
            speed: params.aircraft_speed,
        });
    }

    // Vessels spawn offshore: the southern half of the latitude range and
    // the eastern 10% of the longitude range.
    for i in 0..params.vessel_count {
        entities.push(TrafficEntity {
            id: format!("sim-vessel-{i}"),
            kind: TrafficKind::Vessel,
            lat: bounds.min_lat() + rng.gen::<f64>() * bounds.lat_range() * 0.5,
            lon: bounds.max_lon() - rng.gen::<f64>() * bounds.lon_range() * 0.1,
            heading: rng.gen::<f64>() * 360.0,
            speed: params.vessel_speed,
        });
    }

    entities
}
