use rangeview_core::{GeoBounds, ScreenPos};
use serde::Deserialize;
use std::path::Path;
use std::{fs, io};
use thiserror::Error;

// --- Error Type ---

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] io::Error),
    #[error("failed to parse JSON config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to parse TOML config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Validation(String),
}

// --- Enums for Choices ---

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SerializerType {
    Json,
    Binary,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SenderType {
    Stdio,
    WebSocket,
}

// --- Configuration Sections ---

/// Geographic bounds of the simulated/displayed region. Defaults are
/// calibrated for the Cape Canaveral map crop.
#[derive(Deserialize, Debug, Clone)]
pub struct BoundsSettings {
    #[serde(default = "default_min_lat")]
    pub min_lat: f64,
    #[serde(default = "default_max_lat")]
    pub max_lat: f64,
    #[serde(default = "default_min_lon")]
    pub min_lon: f64,
    #[serde(default = "default_max_lon")]
    pub max_lon: f64,
}

fn default_min_lat() -> f64 { 28.35 }
fn default_max_lat() -> f64 { 28.70 }
fn default_min_lon() -> f64 { -80.80 }
fn default_max_lon() -> f64 { -80.45 }

impl Default for BoundsSettings {
    fn default() -> Self {
        Self {
            min_lat: default_min_lat(),
            max_lat: default_max_lat(),
            min_lon: default_min_lon(),
            max_lon: default_max_lon(),
        }
    }
}

impl BoundsSettings {
    /// Builds the validated bounds. Degenerate extents are a fatal
    /// configuration error since the projection would divide by zero.
    pub fn geo_bounds(&self) -> Result<GeoBounds, ConfigError> {
        GeoBounds::new(self.min_lat, self.max_lat, self.min_lon, self.max_lon)
            .map_err(|e| ConfigError::Validation(e.to_string()))
    }
}

/// Synthetic traffic population. Speeds are in degrees per tick; aircraft
/// default to roughly 4x vessel speed.
#[derive(Deserialize, Debug, Clone)]
pub struct TrafficSettings {
    #[serde(default = "default_aircraft_count")]
    pub aircraft_count: usize,
    #[serde(default = "default_vessel_count")]
    pub vessel_count: usize,
    #[serde(default = "default_aircraft_speed")]
    pub aircraft_speed: f64,
    #[serde(default = "default_vessel_speed")]
    pub vessel_speed: f64,
    /// Optional RNG seed for reproducible trajectories.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_aircraft_count() -> usize { 3 }
fn default_vessel_count() -> usize { 5 }
fn default_aircraft_speed() -> f64 { 0.002 }
fn default_vessel_speed() -> f64 { 0.0005 }

impl Default for TrafficSettings {
    fn default() -> Self {
        Self {
            aircraft_count: default_aircraft_count(),
            vessel_count: default_vessel_count(),
            aircraft_speed: default_aircraft_speed(),
            vessel_speed: default_vessel_speed(),
            seed: None,
        }
    }
}

/// External feed endpoints and the defensive fetch timeout.
#[derive(Deserialize, Debug, Clone)]
pub struct FeedSettings {
    #[serde(default = "default_live_aircraft")]
    pub live_aircraft: bool,
    #[serde(default = "default_aircraft_url")]
    pub aircraft_url: String,
    #[serde(default = "default_launch_url")]
    pub launch_url: String,
    #[serde(default = "default_location_ids")]
    pub location_ids: Vec<u32>,
    #[serde(default = "default_launch_limit")]
    pub launch_limit: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_live_aircraft() -> bool { true }
fn default_aircraft_url() -> String {
    "https://opensky-network.org/api/states/all".to_string()
}
fn default_launch_url() -> String {
    "https://lldev.thespacedevs.com/2.2.0/launch/upcoming/".to_string()
}
// Location IDs 12 (KSC) and 27 (CCSFS)
fn default_location_ids() -> Vec<u32> { vec![12, 27] }
fn default_launch_limit() -> u32 { 5 }
fn default_timeout_secs() -> u64 { 5 }

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            live_aircraft: default_live_aircraft(),
            aircraft_url: default_aircraft_url(),
            launch_url: default_launch_url(),
            location_ids: default_location_ids(),
            launch_limit: default_launch_limit(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Screen coordinate for a known launch pad.
#[derive(Deserialize, Debug, Clone)]
pub struct PadCoordinate {
    pub pad_id: i64,
    pub x: f64,
    pub y: f64,
}

/// Visual mapping of pad IDs to screen percentages, with a fallback for
/// unmapped pads.
#[derive(Deserialize, Debug, Clone)]
pub struct PadSettings {
    #[serde(default = "default_pad_coordinates")]
    pub coordinates: Vec<PadCoordinate>,
    #[serde(default = "default_pad_fallback")]
    pub fallback_x: f64,
    #[serde(default = "default_pad_fallback_y")]
    pub fallback_y: f64,
}

fn default_pad_coordinates() -> Vec<PadCoordinate> {
    // KSC and CCSFS roughly map to the center-right cluster on the map crop.
    vec![
        PadCoordinate { pad_id: 87, x: 50.0, y: 35.0 }, // LC-39A
        PadCoordinate { pad_id: 16, x: 55.0, y: 40.0 }, // SLC-40 (CCSFS)
        PadCoordinate { pad_id: 29, x: 42.0, y: 28.0 }, // SLC-41 (ULA)
        PadCoordinate { pad_id: 14, x: 48.0, y: 45.0 }, // SLC-37B
    ]
}

fn default_pad_fallback() -> f64 { 48.0 }
fn default_pad_fallback_y() -> f64 { 32.0 }

impl Default for PadSettings {
    fn default() -> Self {
        Self {
            coordinates: default_pad_coordinates(),
            fallback_x: default_pad_fallback(),
            fallback_y: default_pad_fallback_y(),
        }
    }
}

impl PadSettings {
    pub fn fallback(&self) -> ScreenPos {
        ScreenPos { x: self.fallback_x, y: self.fallback_y }
    }
}

/// Initial display predicates applied by the runner each tick.
#[derive(Deserialize, Debug, Clone)]
pub struct DisplaySettings {
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub search: String,
}

fn default_category() -> String { "traffic".to_string() }

impl Default for DisplaySettings {
    fn default() -> Self {
        Self { category: default_category(), search: String::new() }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct WebSocketOptions {
    #[serde(default = "default_ws_host")]
    pub host: String,
    #[serde(default = "default_ws_port")]
    pub port: u16,
}

fn default_ws_host() -> String { "127.0.0.1".to_string() }
fn default_ws_port() -> u16 { 8080 }

impl Default for WebSocketOptions {
    fn default() -> Self {
        Self { host: default_ws_host(), port: default_ws_port() }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct TransportConfig {
    #[serde(default = "default_serializer")]
    pub serializer: SerializerType,
    #[serde(default = "default_sender")]
    pub sender: SenderType,
    #[serde(default)]
    pub websocket: WebSocketOptions,
}

fn default_serializer() -> SerializerType { SerializerType::Json }
fn default_sender() -> SenderType { SenderType::Stdio }

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            serializer: default_serializer(),
            sender: default_sender(),
            websocket: WebSocketOptions::default(),
        }
    }
}

// --- Top-Level Config Struct ---

#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    /// Traffic refresh interval in milliseconds.
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    #[serde(default)]
    pub bounds: BoundsSettings,
    #[serde(default)]
    pub traffic: TrafficSettings,
    #[serde(default)]
    pub feeds: FeedSettings,
    #[serde(default)]
    pub pads: PadSettings,
    #[serde(default)]
    pub display: DisplaySettings,
    #[serde(default)]
    pub transport: TransportConfig,
}

fn default_tick_ms() -> u64 { 2000 }

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
            bounds: BoundsSettings::default(),
            traffic: TrafficSettings::default(),
            feeds: FeedSettings::default(),
            pads: PadSettings::default(),
            display: DisplaySettings::default(),
            transport: TransportConfig::default(),
        }
    }
}

const CATEGORY_NAMES: [&str; 4] = ["space", "air", "sea", "traffic"];

// --- Loading Function ---

/// Loads and validates a configuration file. `.toml` files are parsed as
/// TOML, everything else as JSON.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: Config = match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => toml::from_str(&content)?,
        _ => serde_json::from_str(&content)?,
    };
    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.tick_ms == 0 {
        return Err(ConfigError::Validation("tick_ms cannot be zero".to_string()));
    }

    // Fails fast on degenerate bounds.
    config.bounds.geo_bounds()?;

    if config.traffic.aircraft_speed <= 0.0 || config.traffic.vessel_speed <= 0.0 {
        return Err(ConfigError::Validation(
            "traffic speeds must be positive".to_string(),
        ));
    }

    if config.feeds.timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "feed timeout_secs cannot be zero".to_string(),
        ));
    }

    let category = config.display.category.to_lowercase();
    if !CATEGORY_NAMES.contains(&category.as_str()) {
        return Err(ConfigError::Validation(format!(
            "unknown display category '{}', expected one of {:?}",
            config.display.category, CATEGORY_NAMES
        )));
    }

    Ok(())
}
