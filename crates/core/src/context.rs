//! Environmental context fed into predictions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current weather at the user's location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    /// Normalized condition ("clear", "rain", "snow", "thunderstorm", ...)
    pub condition: String,
    pub temperature_c: f64,
    pub wind_speed_ms: f64,
    pub precipitation_mm: f64,
    pub humidity: u32,
    pub source: String,
}

const ADVERSE_CONDITIONS: [&str; 7] = [
    "rain",
    "rain_showers",
    "freezing_rain",
    "freezing_drizzle",
    "snow",
    "snow_showers",
    "thunderstorm",
];

impl WeatherReport {
    /// Static neutral default used when every weather source fails.
    pub fn fallback() -> Self {
        Self {
            condition: "clear".to_string(),
            temperature_c: 20.0,
            wind_speed_ms: 0.0,
            precipitation_mm: 0.0,
            humidity: 50,
            source: "fallback".to_string(),
        }
    }

    /// Whether conditions are bad enough to push ER volume up.
    ///
    /// Precipitation, wind, and temperature cutoffs match the weather
    /// impact rules the wait-time analysis has always used.
    pub fn is_adverse(&self) -> bool {
        ADVERSE_CONDITIONS.contains(&self.condition.as_str())
            || self.precipitation_mm > 5.0
            || self.wind_speed_ms > 20.0
            || self.temperature_c < 0.0
            || self.temperature_c > 35.0
    }
}

/// Congestion bands derived from the probe route's delay ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CongestionLevel {
    Light,
    Moderate,
    Heavy,
    Severe,
}

impl CongestionLevel {
    /// Band for `(duration_in_traffic - duration) / duration`.
    pub fn from_delay_ratio(ratio: f64) -> Self {
        if ratio < 0.1 {
            CongestionLevel::Light
        } else if ratio < 0.3 {
            CongestionLevel::Moderate
        } else if ratio < 0.5 {
            CongestionLevel::Heavy
        } else {
            CongestionLevel::Severe
        }
    }
}

/// Current traffic around the user's location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficReport {
    pub level: CongestionLevel,
    pub delay_ratio: f64,
    /// Probe route travel time in minutes, when a routing call succeeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probe_minutes: Option<f64>,
    pub source: String,
}

impl TrafficReport {
    /// Static neutral default: normal traffic.
    pub fn fallback() -> Self {
        Self {
            level: CongestionLevel::Moderate,
            delay_ratio: 0.2,
            probe_minutes: None,
            source: "fallback".to_string(),
        }
    }

    pub fn is_heavy(&self) -> bool {
        self.level >= CongestionLevel::Heavy
    }
}

/// Aggregated snapshot fed into each prediction cycle. Recomputed per
/// cycle, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentalContext {
    pub weather: WeatherReport,
    pub traffic: TrafficReport,
    /// Local hour of day, 0-23.
    pub hour: u32,
    /// Local day of week, 0 = Monday .. 6 = Sunday.
    pub weekday: u32,
    pub collected_at: DateTime<Utc>,
}

impl EnvironmentalContext {
    /// Morning and evening ER peaks: 8-10 and 18-20 local time.
    pub fn is_peak_hour(&self) -> bool {
        (8..=10).contains(&self.hour) || (18..=20).contains(&self.hour)
    }

    pub fn is_weekend(&self) -> bool {
        self.weekday >= 5
    }

    /// A neutral context for a given local time, built entirely from
    /// fallback data.
    pub fn neutral(hour: u32, weekday: u32) -> Self {
        Self {
            weather: WeatherReport::fallback(),
            traffic: TrafficReport::fallback(),
            hour,
            weekday,
            collected_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_weather_is_not_adverse() {
        assert!(!WeatherReport::fallback().is_adverse());
    }

    #[test]
    fn storms_and_extremes_are_adverse() {
        let mut w = WeatherReport::fallback();
        w.condition = "thunderstorm".to_string();
        assert!(w.is_adverse());

        let mut w = WeatherReport::fallback();
        w.precipitation_mm = 6.5;
        assert!(w.is_adverse());

        let mut w = WeatherReport::fallback();
        w.temperature_c = -4.0;
        assert!(w.is_adverse());
    }

    #[test]
    fn congestion_bands() {
        assert_eq!(CongestionLevel::from_delay_ratio(0.05), CongestionLevel::Light);
        assert_eq!(CongestionLevel::from_delay_ratio(0.15), CongestionLevel::Moderate);
        assert_eq!(CongestionLevel::from_delay_ratio(0.35), CongestionLevel::Heavy);
        assert_eq!(CongestionLevel::from_delay_ratio(0.8), CongestionLevel::Severe);
    }

    #[test]
    fn fallback_traffic_is_not_heavy() {
        assert!(!TrafficReport::fallback().is_heavy());
    }

    #[test]
    fn peak_hours() {
        let mut ctx = EnvironmentalContext::neutral(9, 2);
        assert!(ctx.is_peak_hour());
        ctx.hour = 19;
        assert!(ctx.is_peak_hour());
        ctx.hour = 14;
        assert!(!ctx.is_peak_hour());
    }
}
