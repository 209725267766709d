//! Adapters wiring provider clients into application ports

mod factory;
mod geocoding_adapter;
mod routing_adapter;

pub use factory::{build_charge_service, build_geocoding_resolver, build_route_estimator};
pub use geocoding_adapter::GeocodingAdapter;
pub use routing_adapter::RoutingAdapter;
