//! Port definitions for the application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external geocoding and routing providers. Adapters in the infrastructure
//! layer implement these ports.

mod geocoding_port;
mod routing_port;

#[cfg(test)]
pub use geocoding_port::MockGeocodingProviderPort;
pub use geocoding_port::GeocodingProviderPort;
#[cfg(test)]
pub use routing_port::MockRoutingPort;
pub use routing_port::{RouteLeg, RoutingPort};
