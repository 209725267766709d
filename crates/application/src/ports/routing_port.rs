//! Routing provider port
//!
//! Defines the interface for driving-route requests between two coordinates.

use async_trait::async_trait;
use domain::value_objects::GeoPoint;
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::error::ApplicationError;

/// One driving route between an origin and a destination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteLeg {
    /// Display string for the route distance, e.g. "4.2km"
    pub distance_text: String,
    /// Display string for the travel time, e.g. "18min"
    pub duration_text: String,
    /// Travel time in seconds under current traffic
    pub duration_secs: u64,
    /// Route geometry as an ordered polyline
    pub geometry: Vec<GeoPoint>,
}

/// Port for routing provider operations (driving mode)
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RoutingPort: Send + Sync {
    /// Request a driving route from origin to destination
    async fn route(
        &self,
        origin: &GeoPoint,
        destination: &GeoPoint,
    ) -> Result<RouteLeg, ApplicationError>;
}
