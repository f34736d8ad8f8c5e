//! Geographic coordinates.
//!
//! KML coordinates are WGS84 longitude/latitude pairs in degrees. The layer
//! only carries them through to the surface; it never projects them.

use serde::{Deserialize, Serialize};

/// A point on the globe, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    /// Latitude in degrees, positive north.
    pub latitude: f64,
    /// Longitude in degrees, positive east.
    pub longitude: f64,
}

impl LatLng {
    /// Create a new coordinate.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// An axis-aligned geographic box, as used by a ground overlay's `LatLonBox`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLngBounds {
    /// South-west corner.
    pub southwest: LatLng,
    /// North-east corner.
    pub northeast: LatLng,
}

impl LatLngBounds {
    /// Create bounds from the four `LatLonBox` edges.
    #[must_use]
    pub const fn from_edges(north: f64, south: f64, east: f64, west: f64) -> Self {
        Self {
            southwest: LatLng::new(south, west),
            northeast: LatLng::new(north, east),
        }
    }

    /// Geographic center of the box.
    ///
    /// Boxes crossing the antimeridian (`west > east`) are centered on the
    /// short way round.
    #[must_use]
    pub fn center(&self) -> LatLng {
        let latitude = f64::midpoint(self.southwest.latitude, self.northeast.latitude);
        let (west, east) = (self.southwest.longitude, self.northeast.longitude);
        let mut longitude = if west <= east {
            f64::midpoint(west, east)
        } else {
            f64::midpoint(west, east + 360.0)
        };
        if longitude > 180.0 {
            longitude -= 360.0;
        }
        LatLng::new(latitude, longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_edges() {
        let bounds = LatLngBounds::from_edges(10.0, -10.0, 20.0, -20.0);
        assert_eq!(bounds.southwest, LatLng::new(-10.0, -20.0));
        assert_eq!(bounds.northeast, LatLng::new(10.0, 20.0));
    }

    #[test]
    fn test_center_simple() {
        let bounds = LatLngBounds::from_edges(10.0, -10.0, 20.0, -20.0);
        assert_eq!(bounds.center(), LatLng::new(0.0, 0.0));
    }

    #[test]
    fn test_center_across_antimeridian() {
        let bounds = LatLngBounds::from_edges(1.0, -1.0, -170.0, 170.0);
        let center = bounds.center();
        assert!((center.longitude - 180.0).abs() < 1e-9);
    }
}
