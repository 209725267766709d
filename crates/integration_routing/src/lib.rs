//! Routing provider integration
//!
//! HTTP client for an OSRM-compatible routing service. Produces driving
//! routes with distance, duration, and full polyline geometry for the
//! live-tracking estimator.

mod client;
mod error;
mod models;

pub use client::{OsrmClient, RoutingClient, RoutingConfig};
pub use error::RoutingError;
pub use models::RouteSummary;
