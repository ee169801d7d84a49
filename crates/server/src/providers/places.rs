//! Places provider adapter: nearby-hospital search and geocoding

use std::collections::HashSet;

use erwait_core::{GeoPoint, ServiceError};
use serde::Deserialize;

use super::{get_with_retry, http_client};
use crate::config::Config;

/// A hospital as the places provider reports it, before distance
/// ranking turns it into a [`erwait_core::Hospital`].
#[derive(Debug, Clone)]
pub struct PlaceRecord {
    pub id: String,
    pub name: String,
    pub address: String,
    pub point: GeoPoint,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub rating: f64,
    pub user_ratings_total: u32,
    pub source: String,
}

#[derive(Clone)]
pub struct PlacesClient {
    http: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    geocode_url: String,
}

#[derive(Deserialize)]
struct NearbyResponse {
    status: String,
    #[serde(default)]
    results: Vec<NearbyPlace>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Deserialize)]
struct NearbyPlace {
    place_id: String,
    name: String,
    #[serde(default)]
    vicinity: Option<String>,
    geometry: Geometry,
    #[serde(default)]
    rating: Option<f64>,
    #[serde(default)]
    user_ratings_total: Option<u32>,
    #[serde(default)]
    types: Vec<String>,
}

#[derive(Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

#[derive(Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Deserialize)]
struct GeocodeResult {
    formatted_address: String,
    geometry: Geometry,
}

const EMERGENCY_KEYWORDS: [&str; 4] = ["emergency", "urgent", "trauma", "medical center"];
const EMERGENCY_TYPES: [&str; 3] = ["hospital", "health", "emergency"];

impl PlacesClient {
    pub fn new(config: &Config) -> Self {
        Self {
            http: http_client(config.http_timeout_secs),
            api_key: config.places_api_key.clone(),
            base_url: config.places_base_url.clone(),
            geocode_url: config.geocode_base_url.clone(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Nearby hospitals with an emergency-room bias. A keyword-less
    /// second search tops the list up when the first pass comes back
    /// thin. Without an API key this returns deterministic seed
    /// hospitals around the center.
    pub async fn nearby_hospitals(
        &self,
        center: GeoPoint,
        radius_m: u32,
    ) -> Result<Vec<PlaceRecord>, ServiceError> {
        let Some(key) = self.api_key.clone() else {
            tracing::warn!("No places API key configured, using seed hospitals");
            return Ok(seed_hospitals(center));
        };

        let mut places: Vec<NearbyPlace> = self
            .nearby(center, radius_m, &key, Some("emergency room"))
            .await?
            .into_iter()
            .filter(is_emergency_hospital)
            .collect();

        if places.len() < 3 {
            // Top up with general hospitals; a failure here is not
            // fatal since the first search already succeeded.
            match self.nearby(center, radius_m, &key, None).await {
                Ok(general) => places.extend(general.into_iter().take(5)),
                Err(err) => {
                    tracing::warn!(error = %err, "General hospital top-up search failed")
                }
            }
        }

        let mut seen = HashSet::new();
        places.retain(|p| seen.insert(p.place_id.clone()));
        places.truncate(10);
        Ok(places.into_iter().map(into_record).collect())
    }

    async fn nearby(
        &self,
        center: GeoPoint,
        radius_m: u32,
        key: &str,
        keyword: Option<&str>,
    ) -> Result<Vec<NearbyPlace>, ServiceError> {
        let url = format!("{}/nearbysearch/json", self.base_url);
        let mut query = vec![
            ("location", format!("{},{}", center.lat, center.lng)),
            ("radius", radius_m.to_string()),
            ("type", "hospital".to_string()),
            ("key", key.to_string()),
        ];
        if let Some(keyword) = keyword {
            query.push(("keyword", keyword.to_string()));
        }

        let response = get_with_retry(&self.http, &url, &query)
            .await
            .map_err(|e| ServiceError::ProviderUnavailable(format!("places search: {}", e)))?;
        let payload: NearbyResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::ProviderUnavailable(format!("places payload: {}", e)))?;

        match payload.status.as_str() {
            "OK" | "ZERO_RESULTS" => Ok(payload.results),
            other => Err(ServiceError::ProviderUnavailable(format!(
                "places search returned {}: {}",
                other,
                payload.error_message.unwrap_or_default()
            ))),
        }
    }

    /// Forward geocoding. Free text cannot be resolved without a key.
    pub async fn geocode(&self, text: &str) -> Result<(GeoPoint, String), ServiceError> {
        let Some(key) = self.api_key.clone() else {
            return Err(ServiceError::LocationNotFound(format!(
                "{} (geocoding requires a places API key)",
                text
            )));
        };

        let url = format!("{}/json", self.geocode_url);
        let query = [("address", text.to_string()), ("key", key)];

        let response = get_with_retry(&self.http, &url, &query)
            .await
            .map_err(|e| ServiceError::ProviderUnavailable(format!("geocoding: {}", e)))?;
        let payload: GeocodeResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::ProviderUnavailable(format!("geocoding payload: {}", e)))?;

        match payload.status.as_str() {
            "OK" => payload
                .results
                .into_iter()
                .next()
                .map(|r| {
                    (
                        GeoPoint {
                            lat: r.geometry.location.lat,
                            lng: r.geometry.location.lng,
                        },
                        r.formatted_address,
                    )
                })
                .ok_or_else(|| ServiceError::LocationNotFound(text.to_string())),
            "ZERO_RESULTS" => Err(ServiceError::LocationNotFound(text.to_string())),
            other => Err(ServiceError::ProviderUnavailable(format!(
                "geocoding returned {}",
                other
            ))),
        }
    }
}

fn is_emergency_hospital(place: &NearbyPlace) -> bool {
    let name = place.name.to_lowercase();
    place
        .types
        .iter()
        .any(|t| EMERGENCY_TYPES.contains(&t.as_str()))
        || EMERGENCY_KEYWORDS.iter().any(|k| name.contains(k))
}

fn into_record(place: NearbyPlace) -> PlaceRecord {
    PlaceRecord {
        id: place.place_id,
        name: place.name,
        address: place.vicinity.unwrap_or_default(),
        point: GeoPoint {
            lat: place.geometry.location.lat,
            lng: place.geometry.location.lng,
        },
        phone: None,
        website: None,
        rating: place.rating.unwrap_or(0.0),
        user_ratings_total: place.user_ratings_total.unwrap_or(0),
        source: "google_places".to_string(),
    }
}

/// Deterministic stand-in hospitals for keyless deployments. Ids
/// derive from the rounded center so relocating produces a fresh set.
fn seed_hospitals(center: GeoPoint) -> Vec<PlaceRecord> {
    const SEEDS: [(&str, f64, f64, f64, u32); 3] = [
        ("City General Hospital", 0.008, -0.005, 4.1, 120),
        ("Regional Medical Center", -0.012, 0.009, 4.4, 310),
        ("Community Health Center", 0.015, 0.013, 3.9, 85),
    ];

    SEEDS
        .iter()
        .enumerate()
        .map(|(i, (name, dlat, dlng, rating, ratings_total))| PlaceRecord {
            id: format!("seed-{:.3}-{:.3}-{}", center.lat, center.lng, i + 1),
            name: (*name).to_string(),
            address: format!("{} Main St", 100 * (i + 1)),
            point: GeoPoint {
                lat: center.lat + dlat,
                lng: center.lng + dlng,
            },
            phone: Some(format!("(555) 123-{}", 1000 + i)),
            website: Some(format!("https://hospital{}.com", i + 1)),
            rating: *rating,
            user_ratings_total: *ratings_total,
            source: "seed".to_string(),
        })
        .collect()
}
