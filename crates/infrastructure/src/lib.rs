//! Infrastructure layer
//!
//! Configuration loading, telemetry setup, and the adapters that wire the
//! HTTP provider clients into the application-layer ports.

pub mod adapters;
pub mod config;
pub mod telemetry;

pub use config::{AppConfig, ChargeAppConfig, GeoPointConfig, GeocodingAppConfig, TrackingAppConfig};
pub use telemetry::init_tracing;
