//! Wire models for the OSRM route API

use serde::Deserialize;

/// Top-level OSRM route response
#[derive(Debug, Deserialize)]
pub(crate) struct OsrmResponse {
    /// "Ok" on success; an error code otherwise
    pub code: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub routes: Vec<OsrmRoute>,
}

/// A single route alternative
#[derive(Debug, Deserialize)]
pub(crate) struct OsrmRoute {
    /// Route length in meters
    pub distance: f64,
    /// Travel time in seconds
    pub duration: f64,
    pub geometry: OsrmGeometry,
}

/// GeoJSON LineString geometry ([lon, lat] pairs)
#[derive(Debug, Deserialize)]
pub(crate) struct OsrmGeometry {
    #[serde(default)]
    pub coordinates: Vec<[f64; 2]>,
}

/// Parsed route result handed to callers
#[derive(Debug, Clone, PartialEq)]
pub struct RouteSummary {
    /// Route length in meters
    pub distance_meters: f64,
    /// Travel time in seconds
    pub duration_secs: u64,
    /// Polyline as (latitude, longitude) pairs
    pub geometry: Vec<(f64, f64)>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_parsing() {
        let json = r#"{
            "code": "Ok",
            "routes": [{
                "distance": 4213.7,
                "duration": 612.4,
                "geometry": {
                    "type": "LineString",
                    "coordinates": [[13.405, 52.52], [13.41, 52.53]]
                }
            }]
        }"#;
        let parsed: OsrmResponse = serde_json::from_str(json).expect("parse");
        assert_eq!(parsed.code, "Ok");
        assert_eq!(parsed.routes.len(), 1);
        assert!((parsed.routes[0].distance - 4213.7).abs() < f64::EPSILON);
        assert_eq!(parsed.routes[0].geometry.coordinates[0], [13.405, 52.52]);
    }

    #[test]
    fn error_response_parsing() {
        let json = r#"{"code": "NoRoute", "message": "Impossible route between points"}"#;
        let parsed: OsrmResponse = serde_json::from_str(json).expect("parse");
        assert_eq!(parsed.code, "NoRoute");
        assert!(parsed.routes.is_empty());
        assert!(parsed.message.is_some());
    }
}
