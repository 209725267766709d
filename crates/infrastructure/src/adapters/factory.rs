//! Service assembly from configuration
//!
//! Builds the application services with their provider chains wired in the
//! fixed order: PositionStack first, Nominatim second, city-center default
//! last (the resolver's built-in terminal fallback).

use std::sync::Arc;

use application::ports::GeocodingProviderPort;
use application::services::{DeliveryChargeService, GeocodingResolver, RouteEstimator};
use integration_geocoding::{NominatimClient, PositionStackClient};
use integration_routing::OsrmClient;
use tracing::info;

use crate::adapters::{GeocodingAdapter, RoutingAdapter};
use crate::config::AppConfig;

/// Build the geocoding resolver with the configured provider chain
///
/// # Errors
///
/// Returns an error if an HTTP client cannot be initialized.
pub fn build_geocoding_resolver(config: &AppConfig) -> anyhow::Result<GeocodingResolver> {
    let positionstack = PositionStackClient::new(config.geocoding.positionstack.clone())?;
    let nominatim = NominatimClient::new(config.geocoding.nominatim.clone())?;

    let providers: Vec<Arc<dyn GeocodingProviderPort>> = vec![
        Arc::new(GeocodingAdapter::new(Arc::new(positionstack))),
        Arc::new(GeocodingAdapter::new(Arc::new(nominatim))),
    ];

    info!(
        providers = providers.len(),
        "Assembled geocoding provider chain"
    );

    Ok(GeocodingResolver::new(
        providers,
        config.geocoding.to_resolver_config(),
    ))
}

/// Build the batch delivery charge service
///
/// # Errors
///
/// Returns an error if the configured tier table is invalid.
pub fn build_charge_service(config: &AppConfig) -> anyhow::Result<DeliveryChargeService> {
    let charge_config = config.charges.to_charge_config()?;
    Ok(DeliveryChargeService::new(charge_config))
}

/// Build a live-tracking route estimator backed by the configured routing
/// service
///
/// The estimator starts idle; callers attach endpoints and call `start()`
/// when a delivery begins.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be initialized.
pub fn build_route_estimator(config: &AppConfig) -> anyhow::Result<RouteEstimator> {
    let client = OsrmClient::new(config.routing.clone())?;
    let adapter = RoutingAdapter::new(Arc::new(client));
    Ok(RouteEstimator::new(
        Arc::new(adapter),
        config.tracking.to_tracking_config(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use application::services::TrackingState;

    #[test]
    fn builds_all_services_from_defaults() {
        let config = AppConfig::default();
        build_geocoding_resolver(&config).expect("resolver builds");
        build_charge_service(&config).expect("charge service builds");
        let estimator = build_route_estimator(&config).expect("estimator builds");
        assert_eq!(estimator.state(), TrackingState::Idle);
    }

    #[test]
    fn invalid_tier_table_fails_assembly() {
        let mut config = AppConfig::default();
        config.charges.tiers.reverse();
        assert!(build_charge_service(&config).is_err());
    }
}
