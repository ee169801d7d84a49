//! Resolved user location

use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;

/// Where the user is, as resolved from their input.
///
/// Set once per session and overwritten wholesale when a new location is
/// submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserLocation {
    pub latitude: f64,
    pub longitude: f64,
    /// Display address: the geocoder's formatted address, or "lat, lng"
    /// when the input was already a coordinate pair.
    pub address: String,
}

impl UserLocation {
    pub fn new(point: GeoPoint, address: impl Into<String>) -> Self {
        Self {
            latitude: point.lat,
            longitude: point.lng,
            address: address.into(),
        }
    }

    /// Build directly from coordinates, with a "lat, lng" display address.
    pub fn from_point(point: GeoPoint) -> Self {
        Self::new(point, format!("{}, {}", point.lat, point.lng))
    }

    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_point_formats_address() {
        let loc = UserLocation::from_point(GeoPoint::new(40.7128, -74.006));
        assert_eq!(loc.address, "40.7128, -74.006");
        assert_eq!(loc.point(), GeoPoint::new(40.7128, -74.006));
    }
}
