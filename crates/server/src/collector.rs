//! Environmental context collection
//!
//! Gathers the weather and traffic snapshots that feed predictions.
//! Both providers degrade to static fallbacks internally, so a collect
//! always yields a usable context.

use chrono::{Datelike, Local, Timelike, Utc};
use erwait_core::{EnvironmentalContext, GeoPoint, TrafficReport, WeatherReport};

use crate::config::Config;
use crate::providers::{TrafficClient, WeatherClient};

/// Default probe center when no session location exists yet.
pub const DEFAULT_CENTER: GeoPoint = GeoPoint {
    lat: 40.7128,
    lng: -74.0060,
};

pub struct DataCollector {
    weather: WeatherClient,
    traffic: TrafficClient,
}

impl DataCollector {
    pub fn new(config: &Config) -> Self {
        Self {
            weather: WeatherClient::new(config),
            traffic: TrafficClient::new(config),
        }
    }

    /// Snapshot weather, traffic, and local clock state around a point.
    pub async fn collect_context(&self, center: GeoPoint) -> EnvironmentalContext {
        let (weather, traffic) =
            tokio::join!(self.weather.current(center), self.traffic.current(center));

        let now = Local::now();
        EnvironmentalContext {
            weather,
            traffic,
            hour: now.hour(),
            weekday: now.weekday().num_days_from_monday(),
            collected_at: Utc::now(),
        }
    }

    pub async fn weather(&self, center: GeoPoint) -> WeatherReport {
        self.weather.current(center).await
    }

    pub async fn traffic(&self, center: GeoPoint) -> TrafficReport {
        self.traffic.current(center).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn keyless_collect_yields_fallback_context() {
        let config = Config {
            open_meteo_base_url: "http://127.0.0.1:1".to_string(),
            ..Config::default()
        };
        let collector = DataCollector::new(&config);
        let ctx = collector.collect_context(DEFAULT_CENTER).await;

        assert_eq!(ctx.weather.source, "fallback");
        assert_eq!(ctx.traffic.source, "fallback");
        assert!(ctx.hour < 24);
        assert!(ctx.weekday < 7);
    }
}
