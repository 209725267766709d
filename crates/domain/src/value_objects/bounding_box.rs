//! Geographic bounding box
//!
//! A rectangle in latitude/longitude space used by the presentation layer to
//! fit a map viewport around a delivery without its own geometry logic.

use serde::{Deserialize, Serialize};

use crate::value_objects::GeoPoint;

/// Axis-aligned box covering a set of coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    south_west: GeoPoint,
    north_east: GeoPoint,
}

impl BoundingBox {
    /// Build the smallest box containing every point in the iterator
    ///
    /// Returns `None` for an empty iterator.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = GeoPoint>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut result = Self {
            south_west: first,
            north_east: first,
        };
        for point in iter {
            result = result.extend(point);
        }
        Some(result)
    }

    /// Grow the box to include one more point
    #[must_use]
    pub fn extend(self, point: GeoPoint) -> Self {
        Self {
            south_west: GeoPoint::new_unchecked(
                self.south_west.latitude().min(point.latitude()),
                self.south_west.longitude().min(point.longitude()),
            ),
            north_east: GeoPoint::new_unchecked(
                self.north_east.latitude().max(point.latitude()),
                self.north_east.longitude().max(point.longitude()),
            ),
        }
    }

    /// Whether the box contains a point (inclusive of edges)
    #[must_use]
    pub fn contains(&self, point: &GeoPoint) -> bool {
        point.latitude() >= self.south_west.latitude()
            && point.latitude() <= self.north_east.latitude()
            && point.longitude() >= self.south_west.longitude()
            && point.longitude() <= self.north_east.longitude()
    }

    /// Geometric center of the box
    #[must_use]
    pub fn center(&self) -> GeoPoint {
        GeoPoint::new_unchecked(
            f64::midpoint(self.south_west.latitude(), self.north_east.latitude()),
            f64::midpoint(self.south_west.longitude(), self.north_east.longitude()),
        )
    }

    /// South-west corner
    #[must_use]
    pub const fn south_west(&self) -> GeoPoint {
        self.south_west
    }

    /// North-east corner
    #[must_use]
    pub const fn north_east(&self) -> GeoPoint {
        self.north_east
    }
}
