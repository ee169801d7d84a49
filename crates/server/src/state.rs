//! Shared application state

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::collector::DataCollector;
use crate::config::Config;
use crate::engine::PredictionEngine;
use crate::locator::Locator;
use crate::session::SessionStore;

/// Which external providers have credentials. Everything still works
/// without them, just on fallbacks; this is surfaced in `/api/status`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ProviderFlags {
    pub places: bool,
    pub weather: bool,
    pub traffic: bool,
    pub ai: bool,
}

#[derive(Clone)]
pub struct AppState {
    pub locator: Arc<Locator>,
    pub collector: Arc<DataCollector>,
    pub engine: Arc<PredictionEngine>,
    pub sessions: Arc<SessionStore>,
    pub providers: ProviderFlags,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        let providers = ProviderFlags {
            places: config.places_api_key.is_some(),
            weather: config.weather_api_key.is_some(),
            traffic: config.traffic_api_key.is_some(),
            ai: config.anthropic_api_key.is_some(),
        };
        Self {
            locator: Arc::new(Locator::new(config)),
            collector: Arc::new(DataCollector::new(config)),
            engine: Arc::new(PredictionEngine::new(config)),
            sessions: Arc::new(SessionStore::new()),
            providers,
            started_at: Utc::now(),
        }
    }
}
