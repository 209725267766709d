//! Route snapshot for an in-progress delivery

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::BoundingBox;

/// Which coordinate was used as the route origin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OriginKind {
    /// The driver's live location (delivery in transit)
    Driver,
    /// The shop's fixed coordinate (awaiting pickup)
    Shop,
}

/// The current best route/ETA estimate for one active delivery
///
/// Regenerated wholesale on every refresh and replaced atomically; a
/// snapshot is never partially mutated once published.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSnapshot {
    /// Origin used for this estimate
    pub origin_kind: OriginKind,
    /// Display string for the route distance, e.g. "4.2km"
    pub distance_text: String,
    /// Display string for the travel time, e.g. "18min"
    pub duration_text: String,
    /// Travel time in seconds under current traffic
    pub duration_secs: u64,
    /// Expected arrival, recomputed from now() on every refresh
    pub eta: DateTime<Utc>,
    /// Viewport covering route geometry, shop, customer and driver
    pub bounding_box: BoundingBox,
    /// When this snapshot was generated
    pub generated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::GeoPoint;

    #[test]
    fn origin_kind_serde_snake_case() {
        assert_eq!(
            serde_json::to_string(&OriginKind::Driver).expect("serialize"),
            "\"driver\""
        );
        assert_eq!(
            serde_json::to_string(&OriginKind::Shop).expect("serialize"),
            "\"shop\""
        );
    }

    #[test]
    fn snapshot_roundtrip() {
        let bbox = BoundingBox::from_points([
            GeoPoint::new_unchecked(52.50, 13.30),
            GeoPoint::new_unchecked(52.55, 13.45),
        ])
        .expect("non-empty");
        let snapshot = RouteSnapshot {
            origin_kind: OriginKind::Shop,
            distance_text: "4.2km".to_string(),
            duration_text: "18min".to_string(),
            duration_secs: 1080,
            eta: Utc::now(),
            bounding_box: bbox,
            generated_at: Utc::now(),
        };
        let json = serde_json::to_string(&snapshot).expect("serialize");
        let deserialized: RouteSnapshot = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(snapshot, deserialized);
    }
}
