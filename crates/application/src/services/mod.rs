//! Application services - Delivery estimation use cases

mod charge_service;
mod geocoding_resolver;
mod route_estimator;

pub use charge_service::{ChargeConfig, DeliveryChargeService, ShopLocation};
pub use geocoding_resolver::{GeocodeResult, GeocodeSource, GeocodingResolver, ResolverConfig};
pub use route_estimator::{RouteEstimator, TrackingConfig, TrackingState};
