//! Per-shop delivery charge estimate

use serde::{Deserialize, Serialize};

use crate::value_objects::ShopId;

/// One shop's delivery estimate within a batch request
///
/// Produced fresh per call and owned by the caller; never cached across
/// batches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShopChargeEstimate {
    /// The shop this estimate belongs to
    pub shop_id: ShopId,
    /// Distance from the shop to the customer, rounded to one decimal place
    pub distance_km: f64,
    /// Delivery charge from the tier table (or the fixed fallback)
    pub charge: u32,
}
