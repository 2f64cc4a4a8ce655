//! Live-feed reconciliation policy.
//!
//! Live aircraft replace the synthetic ones only for ticks where the feed
//! succeeded with at least one record; vessels are always synthetic (no live
//! vessel feed exists). A failed or empty fetch falls back to the simulator
//! for that tick only.

use rangeview_core::Marker;

/// Merges the per-tick traffic marker set.
///
/// `live_aircraft` is `Some` when the feed fetch succeeded (possibly with an
/// empty list) and `None` when it failed. Returns the merged markers
/// (vessels first, then aircraft) and whether the aircraft are live.
pub fn reconcile(
    live_aircraft: Option<Vec<Marker>>,
    sim_aircraft: Vec<Marker>,
    sim_vessels: Vec<Marker>,
) -> (Vec<Marker>, bool) {
    let mut markers = sim_vessels;
    match live_aircraft {
        Some(live) if !live.is_empty() => {
            markers.extend(live);
            (markers, true)
        }
        _ => {
            markers.extend(sim_aircraft);
            (markers, false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rangeview_core::MarkerKind;

    fn marker(id: &str, kind: MarkerKind) -> Marker {
        Marker {
            id: id.to_string(),
            kind,
            x: 10.0,
            y: 10.0,
            heading: None,
            label: None,
            active: true,
        }
    }

    fn sim_aircraft() -> Vec<Marker> {
        vec![
            marker("sim-aircraft-0", MarkerKind::Aircraft),
            marker("sim-aircraft-1", MarkerKind::Aircraft),
        ]
    }

    fn sim_vessels() -> Vec<Marker> {
        vec![marker("sim-vessel-0", MarkerKind::Vessel)]
    }

    #[test]
    fn live_aircraft_replace_synthetic_ones() {
        let live = vec![marker("adsb-abc123", MarkerKind::Aircraft)];
        let (markers, is_live) = reconcile(Some(live), sim_aircraft(), sim_vessels());

        assert!(is_live);
        let ids: Vec<&str> = markers.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["sim-vessel-0", "adsb-abc123"]);
    }

    #[test]
    fn empty_live_list_falls_back_to_synthetic() {
        let (markers, is_live) = reconcile(Some(Vec::new()), sim_aircraft(), sim_vessels());

        assert!(!is_live);
        let ids: Vec<&str> = markers.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["sim-vessel-0", "sim-aircraft-0", "sim-aircraft-1"]);
    }

    #[test]
    fn failed_fetch_falls_back_to_synthetic() {
        let (markers, is_live) = reconcile(None, sim_aircraft(), sim_vessels());
        assert!(!is_live);
        assert_eq!(markers.len(), 3);
    }

    #[test]
    fn vessels_are_always_synthetic() {
        let live = vec![marker("adsb-abc123", MarkerKind::Aircraft)];
        let (markers, _) = reconcile(Some(live), sim_aircraft(), sim_vessels());
        assert!(markers.iter().any(|m| m.id == "sim-vessel-0"));
    }
}
