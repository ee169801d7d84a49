//! Raw weather and traffic endpoints
//!
//! These return the provider report as-is rather than the session
//! envelope. With no session they probe around a fixed default center
//! so the endpoints are usable before a location is set.

use axum::{extract::State, Json};
use erwait_core::{GeoPoint, TrafficReport, WeatherReport};

use crate::collector::DEFAULT_CENTER;
use crate::state::AppState;

async fn probe_center(state: &AppState) -> GeoPoint {
    match state.sessions.snapshot().await {
        Some(session) => session.location.point(),
        None => DEFAULT_CENTER,
    }
}

/// GET /api/weather
pub async fn weather(State(state): State<AppState>) -> Json<WeatherReport> {
    let center = probe_center(&state).await;
    Json(state.collector.weather(center).await)
}

/// GET /api/traffic
pub async fn traffic(State(state): State<AppState>) -> Json<TrafficReport> {
    let center = probe_center(&state).await;
    Json(state.collector.traffic(center).await)
}
