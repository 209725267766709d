//! Value objects for the delivery estimation domain

mod bounding_box;
mod charge_schedule;
mod distance;
mod geo_point;
mod shop_id;

pub use bounding_box::BoundingBox;
pub use charge_schedule::{ChargeSchedule, ChargeTier};
pub use distance::{
    DistanceKm, MAX_PLAUSIBLE_DISTANCE_KM, distance_between, distance_km, haversine_km,
};
pub use geo_point::GeoPoint;
pub use shop_id::ShopId;
