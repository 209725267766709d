//! OSRM routing client

use std::time::Duration;

use async_trait::async_trait;
use domain::value_objects::GeoPoint;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::RoutingError;
use crate::models::{OsrmResponse, RouteSummary};

/// One week; no driving route runs longer, so anything above is corrupt data
const MAX_PLAUSIBLE_DURATION_SECS: f64 = 604_800.0;

/// Trait for routing clients
#[async_trait]
pub trait RoutingClient: Send + Sync {
    /// Request a driving route between two coordinates
    async fn route(
        &self,
        origin: &GeoPoint,
        destination: &GeoPoint,
    ) -> Result<RouteSummary, RoutingError>;
}

/// Configuration for the OSRM routing service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Base URL for the OSRM API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Connection timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://router.project-osrm.org".to_string()
}

const fn default_timeout_secs() -> u64 {
    10
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl RoutingConfig {
    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing(base_url: String) -> Self {
        Self {
            base_url,
            timeout_secs: 5,
        }
    }
}

/// HTTP client for an OSRM-compatible routing service
#[derive(Debug)]
pub struct OsrmClient {
    client: Client,
    config: RoutingConfig,
}

impl OsrmClient {
    /// Create a new OSRM client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: RoutingConfig) -> Result<Self, RoutingError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| RoutingError::ConnectionFailed(e.to_string()))?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl RoutingClient for OsrmClient {
    #[instrument(skip(self))]
    async fn route(
        &self,
        origin: &GeoPoint,
        destination: &GeoPoint,
    ) -> Result<RouteSummary, RoutingError> {
        // OSRM takes lon,lat order
        let url = format!(
            "{}/route/v1/driving/{},{};{},{}",
            self.config.base_url,
            origin.longitude(),
            origin.latitude(),
            destination.longitude(),
            destination.latitude()
        );
        let params = [("overview", "full"), ("geometries", "geojson")];

        debug!(%origin, %destination, "Requesting driving route");

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RoutingError::Timeout
                } else {
                    RoutingError::ConnectionFailed(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(RoutingError::RequestFailed(format!(
                "HTTP {}",
                response.status()
            )));
        }

        let body: OsrmResponse = response
            .json()
            .await
            .map_err(|e| RoutingError::ParseError(e.to_string()))?;

        if body.code != "Ok" {
            let detail = body.message.unwrap_or(body.code);
            return Err(RoutingError::NoRoute(detail));
        }

        let route = body
            .routes
            .into_iter()
            .next()
            .ok_or_else(|| RoutingError::NoRoute("empty routes array".to_string()))?;

        if !route.distance.is_finite()
            || route.distance < 0.0
            || !route.duration.is_finite()
            || route.duration < 0.0
            || route.duration > MAX_PLAUSIBLE_DURATION_SECS
        {
            return Err(RoutingError::ParseError(format!(
                "implausible route metrics: distance {}, duration {}",
                route.distance, route.duration
            )));
        }

        let geometry = route
            .geometry
            .coordinates
            .into_iter()
            .map(|[lon, lat]| (lat, lon))
            .collect();

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let duration_secs = route.duration.round() as u64;

        debug!(
            distance_meters = route.distance,
            duration_secs, "Route resolved"
        );

        Ok(RouteSummary {
            distance_meters: route.distance,
            duration_secs,
            geometry,
        })
    }
}
