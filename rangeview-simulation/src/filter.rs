use rangeview_core::{Marker, MarkerKind};
use std::str::FromStr;

/// Display category selected in the dashboard.
///
/// `Traffic` is an intentional "show everything" mode, not literally "only
/// traffic".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Space,
    Air,
    Sea,
    Traffic,
}

impl Category {
    fn matches(&self, kind: MarkerKind) -> bool {
        match self {
            Category::Traffic => true,
            Category::Space => kind == MarkerKind::Rocket,
            Category::Air => kind == MarkerKind::Aircraft,
            Category::Sea => kind == MarkerKind::Vessel,
        }
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "space" => Ok(Category::Space),
            "air" => Ok(Category::Air),
            "sea" => Ok(Category::Sea),
            "traffic" => Ok(Category::Traffic),
            other => Err(format!("unknown category '{other}'")),
        }
    }
}

/// Selects the markers eligible for display: a marker passes if it satisfies
/// both the category predicate and the free-text one.
///
/// The text predicate passes on an empty query, a case-folded label match, or
/// a match against the kind name. Pure and order-preserving.
pub fn filter_markers(markers: &[Marker], category: Category, query: &str) -> Vec<Marker> {
    let query = query.trim().to_lowercase();

    markers
        .iter()
        .filter(|m| category.matches(m.kind) && matches_query(m, &query))
        .cloned()
        .collect()
}

fn matches_query(marker: &Marker, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    if let Some(label) = &marker.label {
        if label.to_lowercase().contains(query) {
            return true;
        }
    }
    marker.kind.name().contains(query)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marker(id: &str, kind: MarkerKind, label: Option<&str>) -> Marker {
        Marker {
            id: id.to_string(),
            kind,
            x: 50.0,
            y: 50.0,
            heading: None,
            label: label.map(|s| s.to_string()),
            active: true,
        }
    }

    fn mixed_markers() -> Vec<Marker> {
        vec![
            marker("launch-1", MarkerKind::Rocket, Some("LC-39A")),
            marker("launch-2", MarkerKind::Rocket, Some("SLC-41")),
            marker("adsb-a1", MarkerKind::Aircraft, Some("DAL123")),
            marker("sim-aircraft-0", MarkerKind::Aircraft, Some("TRAFFIC")),
            marker("sim-vessel-0", MarkerKind::Vessel, Some("VESSEL")),
            marker("sim-vessel-1", MarkerKind::Vessel, None),
        ]
    }

    #[test]
    fn air_category_returns_exactly_the_aircraft() {
        let markers = mixed_markers();
        let result = filter_markers(&markers, Category::Air, "");
        let ids: Vec<&str> = result.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["adsb-a1", "sim-aircraft-0"]);
    }

    #[test]
    fn traffic_category_shows_everything() {
        let markers = mixed_markers();
        let result = filter_markers(&markers, Category::Traffic, "");
        assert_eq!(result.len(), markers.len());
    }

    #[test]
    fn query_matches_label_case_insensitively() {
        let markers = mixed_markers();
        let result = filter_markers(&markers, Category::Traffic, "dal");
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "adsb-a1");
    }

    #[test]
    fn query_matches_kind_name() {
        let markers = mixed_markers();
        // "rock" matches the kind name "rocket" even though no label does.
        let result = filter_markers(&markers, Category::Traffic, "rock");
        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|m| m.kind == MarkerKind::Rocket));
    }

    #[test]
    fn unlabeled_marker_only_matches_by_kind() {
        let markers = mixed_markers();
        let result = filter_markers(&markers, Category::Sea, "vessel");
        // Both vessels match: one by label, the unlabeled one by kind name.
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn filtering_is_idempotent() {
        let markers = mixed_markers();
        let once = filter_markers(&markers, Category::Air, "traffic");
        let twice = filter_markers(&once, Category::Air, "traffic");
        assert_eq!(once, twice);
    }

    #[test]
    fn category_parses_from_lowercase_names() {
        assert_eq!("space".parse::<Category>().unwrap(), Category::Space);
        assert_eq!("Air".parse::<Category>().unwrap(), Category::Air);
        assert!("ground".parse::<Category>().is_err());
    }
}
