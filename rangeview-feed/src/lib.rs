pub mod launches;
pub mod opensky;
pub mod reconcile;

use thiserror::Error;

pub use launches::{rocket_markers, LaunchClient, MissionRecord, PadMap};
pub use opensky::{aircraft_markers, AircraftSource, AircraftState, OpenSkyClient};
pub use reconcile::reconcile;

/// Feed failures. These are never fatal: the tick loop degrades to the
/// simulated data and tries again on the next tick, with no state carried
/// between failures.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("feed request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("feed returned status {0}")]
    Status(u16),
    #[error("malformed feed response: {0}")]
    Malformed(String),
}
