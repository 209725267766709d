//! Domain entities: per-request estimates and per-delivery route snapshots

mod route_snapshot;
mod shop_charge_estimate;

pub use route_snapshot::{OriginKind, RouteSnapshot};
pub use shop_charge_estimate::ShopChargeEstimate;
