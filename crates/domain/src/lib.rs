//! Domain layer for the Kiezbote delivery estimation core
//!
//! Contains the geospatial value objects and pure arithmetic that price
//! deliveries and describe an in-progress delivery's route: coordinates,
//! great-circle distance, the charge tier table, bounding boxes and route
//! snapshots. This layer performs no I/O.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
