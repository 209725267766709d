//! Application layer - Delivery estimation use cases
//!
//! Contains the port definitions for external geocoding/routing providers
//! and the services built on them: address resolution with ordered provider
//! fallback, batch delivery-charge aggregation, and the live route/ETA
//! estimator for an active delivery.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
