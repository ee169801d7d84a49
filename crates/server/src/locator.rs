//! Location resolution and ranked hospital discovery

use erwait_core::{
    parse_latlng, FacilityClass, GeoPoint, Hospital, ServiceError, UserLocation, KM_PER_MILE,
    METERS_PER_MILE,
};

use crate::config::Config;
use crate::providers::{PlaceRecord, PlacesClient};

/// Average urban driving speed used for the drive-time estimate.
const DRIVE_SPEED_MPH: f64 = 25.0;

pub struct Locator {
    places: PlacesClient,
    radius_miles: f64,
    max_hospitals: usize,
}

impl Locator {
    pub fn new(config: &Config) -> Self {
        Self {
            places: PlacesClient::new(config),
            radius_miles: config.search_radius_miles,
            max_hospitals: config.max_hospitals,
        }
    }

    pub fn places_configured(&self) -> bool {
        self.places.is_configured()
    }

    /// Turn free-form user input into a located user.
    ///
    /// Raw coordinates are accepted directly without touching the
    /// geocoder; anything else goes through it.
    pub async fn resolve_location(&self, input: &str) -> Result<UserLocation, ServiceError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ServiceError::Validation("Location is required".to_string()));
        }

        if let Some(point) = parse_latlng(input) {
            return Ok(UserLocation::from_point(point));
        }

        let (point, address) = self.places.geocode(input).await?;
        Ok(UserLocation::new(point, address))
    }

    /// Find emergency-capable hospitals around the user, nearest first.
    pub async fn discover_hospitals(
        &self,
        location: &UserLocation,
    ) -> Result<Vec<Hospital>, ServiceError> {
        let center = location.point();
        let radius_m = (self.radius_miles * METERS_PER_MILE) as u32;
        let records = self.places.nearby_hospitals(center, radius_m).await?;
        Ok(rank_hospitals(center, records, self.max_hospitals))
    }
}

/// Convert raw place records into ranked hospitals: compute distances
/// and the drive estimate, then sort nearest first and cap the list.
fn rank_hospitals(center: GeoPoint, records: Vec<PlaceRecord>, cap: usize) -> Vec<Hospital> {
    let mut hospitals: Vec<Hospital> = records
        .into_iter()
        .map(|r| {
            let distance_miles = center.distance_miles(&r.point);
            let capacity = FacilityClass::from_name(&r.name).estimated_beds();
            Hospital {
                id: r.id,
                name: r.name,
                address: r.address,
                latitude: r.point.lat,
                longitude: r.point.lng,
                phone: r.phone,
                website: r.website,
                rating: r.rating,
                user_ratings_total: r.user_ratings_total,
                capacity,
                distance_miles: round1(distance_miles),
                distance_km: round1(distance_miles * KM_PER_MILE),
                drive_minutes: (distance_miles / DRIVE_SPEED_MPH * 60.0).round() as u32,
                source: r.source,
            }
        })
        .collect();

    hospitals.sort_by(|a, b| a.distance_miles.total_cmp(&b.distance_miles));
    hospitals.truncate(cap);
    hospitals
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, lat_offset: f64) -> PlaceRecord {
        PlaceRecord {
            id: id.to_string(),
            name: "Test Hospital".to_string(),
            address: "1 Test Way".to_string(),
            point: GeoPoint::new(40.0 + lat_offset, -74.0),
            phone: None,
            website: None,
            rating: 4.0,
            user_ratings_total: 10,
            source: "google_places".to_string(),
        }
    }

    #[test]
    fn hospitals_sort_nearest_first() {
        let center = GeoPoint::new(40.0, -74.0);
        // Offsets chosen so raw distances land near 5, 1, and 3 miles.
        let records = vec![
            record("five", 0.0725),
            record("one", 0.0145),
            record("three", 0.0435),
        ];

        let ranked = rank_hospitals(center, records, 10);
        let ids: Vec<&str> = ranked.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, vec!["one", "three", "five"]);
        assert_eq!(ranked[0].distance_miles, 1.0);
        assert_eq!(ranked[2].distance_miles, 5.0);
    }

    #[test]
    fn ranking_caps_the_list() {
        let center = GeoPoint::new(40.0, -74.0);
        let records = (0..8).map(|i| record(&format!("h{i}"), 0.01 * i as f64)).collect();
        let ranked = rank_hospitals(center, records, 3);
        assert_eq!(ranked.len(), 3);
    }

    #[test]
    fn drive_estimate_tracks_distance() {
        let center = GeoPoint::new(40.0, -74.0);
        let ranked = rank_hospitals(center, vec![record("h", 0.0725)], 10);
        // 5 miles at 25 mph is a 12 minute drive.
        assert_eq!(ranked[0].drive_minutes, 12);
    }

    #[tokio::test]
    async fn blank_input_is_rejected() {
        let locator = Locator::new(&Config::default());
        let err = locator.resolve_location("   ").await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn raw_coordinates_skip_the_geocoder() {
        let locator = Locator::new(&Config::default());
        let loc = locator.resolve_location("40.7128, -74.0060").await.unwrap();
        assert_eq!(loc.latitude, 40.7128);
        assert_eq!(loc.longitude, -74.0060);
    }

    #[tokio::test]
    async fn free_text_without_geocoder_key_fails() {
        let locator = Locator::new(&Config::default());
        let err = locator.resolve_location("Times Square").await.unwrap_err();
        assert!(matches!(err, ServiceError::LocationNotFound(_)));
    }
}
