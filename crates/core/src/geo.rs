//! Coordinates and great-circle distance

use serde::{Deserialize, Serialize};

/// Mean Earth radius in miles, for haversine
const EARTH_RADIUS_MILES: f64 = 3958.8;

/// Miles-to-kilometers conversion factor
pub const KM_PER_MILE: f64 = 1.60934;

/// Meters per mile, for converting search radii to provider units
pub const METERS_PER_MILE: f64 = 1609.34;

/// A WGS84 coordinate pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Great-circle distance to another point, in miles
    pub fn distance_miles(&self, other: &GeoPoint) -> f64 {
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();
        let dlat = (other.lat - self.lat).to_radians();
        let dlng = (other.lng - self.lng).to_radians();

        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().asin();
        EARTH_RADIUS_MILES * c
    }
}

/// Parse a `"lat,lng"` string into a coordinate pair.
///
/// Returns `None` unless the input is exactly two comma-separated floats
/// with latitude in -90..=90 and longitude in -180..=180. Anything else is
/// treated as free text and left to geocoding.
pub fn parse_latlng(input: &str) -> Option<GeoPoint> {
    let mut parts = input.split(',');
    let lat: f64 = parts.next()?.trim().parse().ok()?;
    let lng: f64 = parts.next()?.trim().parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
        return None;
    }
    Some(GeoPoint::new(lat, lng))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_coordinates() {
        let p = parse_latlng("40.7128,-74.0060").unwrap();
        assert_eq!(p.lat, 40.7128);
        assert_eq!(p.lng, -74.0060);
    }

    #[test]
    fn parses_with_whitespace() {
        let p = parse_latlng(" 51.5 , -0.12 ").unwrap();
        assert_eq!(p.lat, 51.5);
        assert_eq!(p.lng, -0.12);
    }

    #[test]
    fn rejects_free_text() {
        assert!(parse_latlng("New York, NY").is_none());
        assert!(parse_latlng("downtown").is_none());
        assert!(parse_latlng("").is_none());
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(parse_latlng("91.0,0.0").is_none());
        assert!(parse_latlng("0.0,181.0").is_none());
        assert!(parse_latlng("-90.5,10.0").is_none());
    }

    #[test]
    fn rejects_extra_components() {
        assert!(parse_latlng("1.0,2.0,3.0").is_none());
    }

    #[test]
    fn haversine_known_distance() {
        // New York City to Los Angeles, roughly 2445 miles
        let nyc = GeoPoint::new(40.7128, -74.0060);
        let la = GeoPoint::new(34.0522, -118.2437);
        let d = nyc.distance_miles(&la);
        assert!((d - 2445.0).abs() < 15.0, "got {d}");
    }

    #[test]
    fn haversine_zero_for_same_point() {
        let p = GeoPoint::new(40.0, -74.0);
        assert!(p.distance_miles(&p) < 1e-9);
    }
}
