//! Server configuration

use std::str::FromStr;

/// Server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_address: String,
    pub cors_origins: Vec<String>,
    pub rate_limit_rps: u32,
    pub static_dir: String,

    /// Background refresh cadence in seconds.
    pub update_interval_secs: u64,
    /// Per-request timeout for every outbound provider call.
    pub http_timeout_secs: u64,
    pub search_radius_miles: f64,
    pub max_hospitals: usize,

    // Provider credentials. Every adapter works without its key by
    // falling back to deterministic data.
    pub anthropic_api_key: Option<String>,
    pub anthropic_model: String,
    pub places_api_key: Option<String>,
    pub weather_api_key: Option<String>,
    pub traffic_api_key: Option<String>,

    // Provider endpoints. Overridable so tests can point adapters at
    // an unroutable address.
    pub anthropic_base_url: String,
    pub places_base_url: String,
    pub geocode_base_url: String,
    pub directions_base_url: String,
    pub weather_base_url: String,
    pub open_meteo_base_url: String,

    // Tunable constants for the fallback heuristic and the incident
    // simulator. Arbitrary by nature, so they are parameters rather
    // than magic numbers.
    pub fallback_weather_add: u32,
    pub fallback_traffic_add: u32,
    pub fallback_peak_add: u32,
    pub fallback_confidence: u8,
    pub incident_base_wait: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            cors_origins: vec!["*".to_string()],
            rate_limit_rps: 50,
            static_dir: "static".to_string(),
            update_interval_secs: 300,
            http_timeout_secs: 10,
            search_radius_miles: 25.0,
            max_hospitals: 10,
            anthropic_api_key: None,
            anthropic_model: "claude-3-5-haiku-20241022".to_string(),
            places_api_key: None,
            weather_api_key: None,
            traffic_api_key: None,
            anthropic_base_url: "https://api.anthropic.com/v1".to_string(),
            places_base_url: "https://maps.googleapis.com/maps/api/place".to_string(),
            geocode_base_url: "https://maps.googleapis.com/maps/api/geocode".to_string(),
            directions_base_url: "https://maps.googleapis.com/maps/api/directions".to_string(),
            weather_base_url: "https://api.openweathermap.org/data/2.5".to_string(),
            open_meteo_base_url: "https://api.open-meteo.com/v1".to_string(),
            fallback_weather_add: 15,
            fallback_traffic_add: 10,
            fallback_peak_add: 20,
            fallback_confidence: 60,
            incident_base_wait: 30.0,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            bind_address: var("BIND_ADDRESS", defaults.bind_address),
            cors_origins: var("CORS_ORIGINS", "*".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            rate_limit_rps: parse_var("API_RATE_LIMIT", defaults.rate_limit_rps),
            static_dir: var("STATIC_DIR", defaults.static_dir),
            update_interval_secs: parse_var("UPDATE_INTERVAL", defaults.update_interval_secs),
            http_timeout_secs: parse_var("HTTP_TIMEOUT_SECS", defaults.http_timeout_secs),
            search_radius_miles: parse_var("SEARCH_RADIUS_MILES", defaults.search_radius_miles),
            max_hospitals: parse_var("MAX_HOSPITALS", defaults.max_hospitals),
            anthropic_api_key: opt_var("ANTHROPIC_API_KEY"),
            anthropic_model: var("ANTHROPIC_MODEL", defaults.anthropic_model),
            places_api_key: opt_var("GOOGLE_PLACES_API_KEY"),
            weather_api_key: opt_var("WEATHER_API_KEY"),
            traffic_api_key: opt_var("TRAFFIC_API_KEY"),
            anthropic_base_url: var("ANTHROPIC_BASE_URL", defaults.anthropic_base_url),
            places_base_url: var("PLACES_BASE_URL", defaults.places_base_url),
            geocode_base_url: var("GEOCODE_BASE_URL", defaults.geocode_base_url),
            directions_base_url: var("DIRECTIONS_BASE_URL", defaults.directions_base_url),
            weather_base_url: var("WEATHER_BASE_URL", defaults.weather_base_url),
            open_meteo_base_url: var("OPEN_METEO_BASE_URL", defaults.open_meteo_base_url),
            fallback_weather_add: parse_var("FALLBACK_WEATHER_ADD", defaults.fallback_weather_add),
            fallback_traffic_add: parse_var("FALLBACK_TRAFFIC_ADD", defaults.fallback_traffic_add),
            fallback_peak_add: parse_var("FALLBACK_PEAK_ADD", defaults.fallback_peak_add),
            fallback_confidence: parse_var("FALLBACK_CONFIDENCE", defaults.fallback_confidence),
            incident_base_wait: parse_var("INCIDENT_BASE_WAIT", defaults.incident_base_wait),
        }
    }
}

fn var(name: &str, default: String) -> String {
    std::env::var(name).unwrap_or(default)
}

/// Missing or empty values read as None.
fn opt_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T: FromStr + Copy>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
