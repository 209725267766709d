//! Routing port adapter
//!
//! The routing service reports raw meters and seconds; the display strings
//! shown in tracking views are rendered here.

use std::sync::Arc;

use application::error::ApplicationError;
use application::ports::{RouteLeg, RoutingPort};
use async_trait::async_trait;
use domain::value_objects::{DistanceKm, GeoPoint};
use integration_routing::{RouteSummary, RoutingClient};
use tracing::warn;

/// Adapts a [`RoutingClient`] to the application's routing port
pub struct RoutingAdapter {
    client: Arc<dyn RoutingClient>,
}

impl RoutingAdapter {
    /// Wrap a routing client
    #[must_use]
    pub fn new(client: Arc<dyn RoutingClient>) -> Self {
        Self { client }
    }
}

impl std::fmt::Debug for RoutingAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoutingAdapter").finish_non_exhaustive()
    }
}

/// Render a route length for display, e.g. "850m" or "4.2km"
fn format_distance(meters: f64) -> String {
    let km = meters / 1000.0;
    DistanceKm::new(km).map_or_else(|_| format!("{km:.1}km"), |d| d.format())
}

/// Render a travel time for display, e.g. "18min" or "1h 5min"
fn format_duration(secs: u64) -> String {
    let minutes = secs.saturating_add(30) / 60;
    if minutes >= 60 {
        let hours = minutes / 60;
        let rest = minutes % 60;
        if rest == 0 {
            format!("{hours}h")
        } else {
            format!("{hours}h {rest}min")
        }
    } else {
        format!("{}min", minutes.max(1))
    }
}

fn to_route_leg(summary: RouteSummary) -> RouteLeg {
    let point_count = summary.geometry.len();
    let geometry: Vec<GeoPoint> = summary
        .geometry
        .into_iter()
        .filter_map(|(lat, lon)| GeoPoint::new(lat, lon).ok())
        .collect();
    if geometry.len() < point_count {
        warn!(
            dropped = point_count - geometry.len(),
            "Discarded out-of-range geometry points from route"
        );
    }

    RouteLeg {
        distance_text: format_distance(summary.distance_meters),
        duration_text: format_duration(summary.duration_secs),
        duration_secs: summary.duration_secs,
        geometry,
    }
}

#[async_trait]
impl RoutingPort for RoutingAdapter {
    async fn route(
        &self,
        origin: &GeoPoint,
        destination: &GeoPoint,
    ) -> Result<RouteLeg, ApplicationError> {
        let summary = self
            .client
            .route(origin, destination)
            .await
            .map_err(|e| ApplicationError::ProviderUnavailable(format!("routing: {e}")))?;
        Ok(to_route_leg(summary))
    }
}
