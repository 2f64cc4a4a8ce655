pub mod geo;
pub mod marker;
pub mod projection;

pub use geo::{BoundsError, GeoBounds};
pub use marker::{Marker, MarkerFrame, MarkerKind};
pub use projection::{project, unproject, ScreenPos};
