pub mod filter;
pub mod traffic;

pub use filter::{filter_markers, Category};
pub use traffic::{advance_entity, TrafficEntity, TrafficKind, TrafficParams, TrafficSimulator};
