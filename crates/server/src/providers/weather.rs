//! Weather provider adapter

use erwait_core::{GeoPoint, WeatherReport};
use serde::Deserialize;

use super::{get_with_retry, http_client};
use crate::config::Config;

#[derive(Clone)]
pub struct WeatherClient {
    http: reqwest::Client,
    api_key: Option<String>,
    owm_url: String,
    open_meteo_url: String,
}

#[derive(Deserialize)]
struct OwmResponse {
    main: OwmMain,
    #[serde(default)]
    wind: Option<OwmWind>,
    #[serde(default)]
    weather: Vec<OwmWeather>,
    #[serde(default)]
    rain: Option<OwmRain>,
}

#[derive(Deserialize)]
struct OwmMain {
    temp: f64,
    humidity: u32,
}

#[derive(Deserialize)]
struct OwmWind {
    speed: f64,
}

#[derive(Deserialize)]
struct OwmWeather {
    main: String,
}

#[derive(Deserialize)]
struct OwmRain {
    #[serde(rename = "1h")]
    one_hour: Option<f64>,
}

#[derive(Deserialize)]
struct OpenMeteoResponse {
    current_weather: OpenMeteoCurrent,
}

#[derive(Deserialize)]
struct OpenMeteoCurrent {
    temperature: f64,
    /// km/h in the provider payload.
    windspeed: f64,
    #[serde(alias = "weather_code")]
    weathercode: u32,
}

impl WeatherClient {
    pub fn new(config: &Config) -> Self {
        Self {
            http: http_client(config.http_timeout_secs),
            api_key: config.weather_api_key.clone(),
            owm_url: config.weather_base_url.clone(),
            open_meteo_url: config.open_meteo_base_url.clone(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Current weather at a point. Never fails: OpenWeatherMap with a
    /// key, keyless Open-Meteo without one, the static neutral report
    /// when the provider is unreachable.
    pub async fn current(&self, point: GeoPoint) -> WeatherReport {
        let result = match self.api_key.clone() {
            Some(key) => self.openweathermap(point, &key).await,
            None => self.open_meteo(point).await,
        };

        match result {
            Ok(report) => report,
            Err(err) => {
                tracing::warn!(error = %err, "Weather lookup failed, using fallback");
                WeatherReport::fallback()
            }
        }
    }

    async fn openweathermap(&self, point: GeoPoint, key: &str) -> Result<WeatherReport, String> {
        let url = format!("{}/weather", self.owm_url);
        let query = [
            ("lat", point.lat.to_string()),
            ("lon", point.lng.to_string()),
            ("appid", key.to_string()),
            ("units", "metric".to_string()),
        ];

        let response = get_with_retry(&self.http, &url, &query)
            .await
            .map_err(|e| e.to_string())?
            .error_for_status()
            .map_err(|e| e.to_string())?;
        let payload: OwmResponse = response.json().await.map_err(|e| e.to_string())?;

        let condition = payload
            .weather
            .first()
            .map(|w| normalize_owm_condition(&w.main))
            .unwrap_or("unknown");

        Ok(WeatherReport {
            condition: condition.to_string(),
            temperature_c: payload.main.temp,
            wind_speed_ms: payload.wind.map(|w| w.speed).unwrap_or(0.0),
            precipitation_mm: payload.rain.and_then(|r| r.one_hour).unwrap_or(0.0),
            humidity: payload.main.humidity,
            source: "openweathermap".to_string(),
        })
    }

    async fn open_meteo(&self, point: GeoPoint) -> Result<WeatherReport, String> {
        let url = format!("{}/forecast", self.open_meteo_url);
        let query = [
            ("latitude", point.lat.to_string()),
            ("longitude", point.lng.to_string()),
            ("current_weather", "true".to_string()),
        ];

        let response = get_with_retry(&self.http, &url, &query)
            .await
            .map_err(|e| e.to_string())?
            .error_for_status()
            .map_err(|e| e.to_string())?;
        let payload: OpenMeteoResponse = response.json().await.map_err(|e| e.to_string())?;
        let current = payload.current_weather;

        Ok(WeatherReport {
            condition: condition_from_code(current.weathercode).to_string(),
            temperature_c: current.temperature,
            wind_speed_ms: current.windspeed / 3.6,
            precipitation_mm: 0.0,
            // Not exposed by the keyless endpoint.
            humidity: 50,
            source: "open_meteo".to_string(),
        })
    }
}

/// WMO weather code to normalized condition.
fn condition_from_code(code: u32) -> &'static str {
    match code {
        0 | 1 => "clear",
        2 => "partly_cloudy",
        3 => "overcast",
        45 | 48 => "fog",
        51 | 53 | 55 => "drizzle",
        56 | 57 => "freezing_drizzle",
        61 | 63 | 65 => "rain",
        66 | 67 => "freezing_rain",
        71 | 73 | 75 | 77 => "snow",
        80 | 81 | 82 => "rain_showers",
        85 | 86 => "snow_showers",
        95 | 96 | 99 => "thunderstorm",
        _ => "unknown",
    }
}

fn normalize_owm_condition(main: &str) -> &'static str {
    match main.to_lowercase().as_str() {
        "clear" => "clear",
        "clouds" => "partly_cloudy",
        "drizzle" => "drizzle",
        "rain" => "rain",
        "snow" => "snow",
        "thunderstorm" => "thunderstorm",
        "mist" | "fog" | "haze" => "fog",
        _ => "unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weather_codes_map_to_conditions() {
        assert_eq!(condition_from_code(0), "clear");
        assert_eq!(condition_from_code(63), "rain");
        assert_eq!(condition_from_code(75), "snow");
        assert_eq!(condition_from_code(95), "thunderstorm");
        assert_eq!(condition_from_code(42), "unknown");
    }

    #[tokio::test]
    async fn unreachable_provider_falls_back() {
        let config = Config {
            open_meteo_base_url: "http://127.0.0.1:1".to_string(),
            ..Config::default()
        };
        let client = WeatherClient::new(&config);
        let report = client
            .current(GeoPoint {
                lat: 40.7128,
                lng: -74.0060,
            })
            .await;
        assert_eq!(report, WeatherReport::fallback());
    }
}
