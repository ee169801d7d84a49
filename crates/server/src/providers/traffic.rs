//! Traffic provider adapter: a short route probe with live traffic

use erwait_core::{CongestionLevel, GeoPoint, TrafficReport};
use serde::Deserialize;

use super::{get_with_retry, http_client};
use crate::config::Config;

/// Northward probe route length in degrees latitude, roughly 3.5 miles.
const PROBE_OFFSET_DEG: f64 = 0.05;

#[derive(Clone)]
pub struct TrafficClient {
    http: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

#[derive(Deserialize)]
struct DirectionsResponse {
    status: String,
    #[serde(default)]
    routes: Vec<DirectionsRoute>,
}

#[derive(Deserialize)]
struct DirectionsRoute {
    #[serde(default)]
    legs: Vec<DirectionsLeg>,
}

#[derive(Deserialize)]
struct DirectionsLeg {
    duration: Option<DurationValue>,
    duration_in_traffic: Option<DurationValue>,
}

#[derive(Deserialize)]
struct DurationValue {
    /// Seconds.
    value: f64,
}

impl TrafficClient {
    pub fn new(config: &Config) -> Self {
        Self {
            http: http_client(config.http_timeout_secs),
            api_key: config.traffic_api_key.clone(),
            base_url: config.directions_base_url.clone(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Congestion around a point, derived from one probe route driven
    /// "now" versus free-flow. Never fails: no key or any provider
    /// error yields the neutral fallback.
    pub async fn current(&self, point: GeoPoint) -> TrafficReport {
        let Some(key) = self.api_key.clone() else {
            return TrafficReport::fallback();
        };

        match self.probe(point, &key).await {
            Ok(report) => report,
            Err(err) => {
                tracing::warn!(error = %err, "Traffic probe failed, using fallback");
                TrafficReport::fallback()
            }
        }
    }

    async fn probe(&self, origin: GeoPoint, key: &str) -> Result<TrafficReport, String> {
        let destination = GeoPoint {
            lat: origin.lat + PROBE_OFFSET_DEG,
            lng: origin.lng,
        };
        let url = format!("{}/json", self.base_url);
        let query = [
            ("origin", format!("{},{}", origin.lat, origin.lng)),
            ("destination", format!("{},{}", destination.lat, destination.lng)),
            ("departure_time", "now".to_string()),
            ("traffic_model", "best_guess".to_string()),
            ("mode", "driving".to_string()),
            ("key", key.to_string()),
        ];

        let response = get_with_retry(&self.http, &url, &query)
            .await
            .map_err(|e| e.to_string())?;
        let payload: DirectionsResponse = response.json().await.map_err(|e| e.to_string())?;

        if payload.status != "OK" {
            return Err(format!("directions returned {}", payload.status));
        }

        let leg = payload
            .routes
            .first()
            .and_then(|r| r.legs.first())
            .ok_or("directions returned no route legs")?;
        let duration = leg.duration.as_ref().map(|d| d.value).unwrap_or(0.0);
        let in_traffic = leg
            .duration_in_traffic
            .as_ref()
            .map(|d| d.value)
            .unwrap_or(duration);

        if duration <= 0.0 {
            return Err("directions returned a zero-length route".to_string());
        }

        let delay_ratio = (in_traffic - duration) / duration;
        Ok(TrafficReport {
            level: CongestionLevel::from_delay_ratio(delay_ratio),
            delay_ratio,
            probe_minutes: Some(in_traffic / 60.0),
            source: "google_directions".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_key_means_neutral_traffic() {
        let client = TrafficClient::new(&Config::default());
        let report = client
            .current(GeoPoint {
                lat: 40.7128,
                lng: -74.0060,
            })
            .await;
        assert_eq!(report, TrafficReport::fallback());
    }

    #[tokio::test]
    async fn unreachable_provider_falls_back() {
        let config = Config {
            traffic_api_key: Some("test-key".to_string()),
            directions_base_url: "http://127.0.0.1:1".to_string(),
            ..Config::default()
        };
        let client = TrafficClient::new(&config);
        let report = client
            .current(GeoPoint {
                lat: 40.7128,
                lng: -74.0060,
            })
            .await;
        assert_eq!(report, TrafficReport::fallback());
    }
}
