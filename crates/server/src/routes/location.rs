//! Location intake: resolve, discover, predict, publish

use std::collections::BTreeMap;

use axum::{extract::State, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use erwait_core::{
    Hospital, Prediction, ServiceError, TrafficReport, UserLocation, WeatherReport,
};

use crate::error::AppError;
use crate::session::Session;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LocationRequest {
    #[serde(default)]
    pub location: String,
}

#[derive(Serialize)]
pub struct LocationResponse {
    status: &'static str,
    user_location: UserLocation,
    hospitals: Vec<Hospital>,
    weather: WeatherReport,
    traffic: TrafficReport,
    predictions: BTreeMap<String, Prediction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warning: Option<String>,
    timestamp: String,
}

/// POST /api/location
///
/// The one write endpoint. Resolves the input, discovers hospitals,
/// collects context, predicts for every hospital, and replaces the
/// session wholesale. A provider outage after a successful resolve
/// degrades to an empty hospital list with a warning instead of
/// failing the request.
pub async fn set(
    State(state): State<AppState>,
    Json(req): Json<LocationRequest>,
) -> Result<Json<LocationResponse>, AppError> {
    let location = state.locator.resolve_location(&req.location).await?;

    let (hospitals, warning) = match state.locator.discover_hospitals(&location).await {
        Ok(hospitals) => (hospitals, None),
        Err(ServiceError::ProviderUnavailable(msg)) => {
            tracing::warn!(error = %msg, "Hospital discovery degraded");
            metrics::counter!("provider_failures_total", "provider" => "places").increment(1);
            (
                Vec::new(),
                Some("Hospital search is temporarily unavailable".to_string()),
            )
        }
        Err(err) => return Err(err.into()),
    };

    if hospitals.is_empty() && warning.is_none() {
        return Err(AppError::NotFound("No hospitals found nearby".to_string()));
    }

    let context = state.collector.collect_context(location.point()).await;

    let mut predictions = BTreeMap::new();
    for hospital in &hospitals {
        let prediction = state.engine.predict(hospital, &context).await;
        predictions.insert(hospital.id.clone(), prediction);
    }

    tracing::info!(
        latitude = location.latitude,
        longitude = location.longitude,
        hospitals = hospitals.len(),
        "Location set"
    );

    let response = LocationResponse {
        status: "success",
        user_location: location.clone(),
        hospitals: hospitals.clone(),
        weather: context.weather.clone(),
        traffic: context.traffic.clone(),
        predictions: predictions.clone(),
        warning,
        timestamp: Utc::now().to_rfc3339(),
    };

    state
        .sessions
        .replace(Session {
            location,
            hospitals,
            context,
            predictions,
            updated_at: Utc::now(),
        })
        .await;

    Ok(Json(response))
}

/// Shared guard for the read endpoints that need a location first.
pub(super) fn no_session() -> AppError {
    AppError::BadRequest("No location set. POST /api/location first".to_string())
}

pub(super) fn envelope(value: Value) -> Value {
    let mut body = json!({"status": "success", "timestamp": Utc::now().to_rfc3339()});
    if let (Some(base), Some(extra)) = (body.as_object_mut(), value.as_object()) {
        for (k, v) in extra {
            base.insert(k.clone(), v.clone());
        }
    }
    body
}
