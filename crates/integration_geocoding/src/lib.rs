//! Geocoding provider integrations
//!
//! HTTP clients for the geocoding services behind the resolver's fallback
//! chain: PositionStack (key-based primary) and Nominatim/OpenStreetMap
//! (community provider). Each client makes one bounded-timeout request per
//! query; fallback ordering lives in the application layer.

mod client;
mod error;
mod nominatim;
mod positionstack;

pub use client::GeocodeClient;
pub use error::GeocodingError;
pub use nominatim::{NominatimClient, NominatimConfig};
pub use positionstack::{PositionStackClient, PositionStackConfig};
