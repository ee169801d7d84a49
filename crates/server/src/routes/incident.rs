//! What-if incident simulation

use std::collections::BTreeMap;

use axum::{extract::State, Json};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};

use erwait_core::{GeoPoint, Incident, IncidentImpact, IncidentKind, IncidentSeverity};

use crate::error::AppError;
use crate::routes::location::{envelope, no_session};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct IncidentRequest {
    #[serde(rename = "type")]
    pub kind: IncidentKind,
    pub severity: IncidentSeverity,
    /// `[latitude, longitude]`
    pub location: [f64; 2],
}

/// POST /api/simulate-incident
///
/// Computes the hypothetical added wait per hospital. Session state is
/// never mutated; the caller sees the deltas and discards them.
pub async fn simulate(
    State(state): State<AppState>,
    Json(req): Json<IncidentRequest>,
) -> Result<Json<Value>, AppError> {
    let [latitude, longitude] = req.location;
    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return Err(AppError::BadRequest(
            "Incident location is out of range".to_string(),
        ));
    }

    let session = state.sessions.snapshot().await.ok_or_else(no_session)?;

    let incident = Incident {
        kind: req.kind,
        severity: req.severity,
        location: GeoPoint::new(latitude, longitude),
        occurred_at: Utc::now(),
    };

    let impacts = state.engine.simulate_incident(&incident, &session.hospitals);
    let impact: BTreeMap<String, IncidentImpact> = impacts
        .into_iter()
        .map(|i| (i.hospital_id.clone(), i))
        .collect();

    tracing::info!(
        kind = incident.kind.label(),
        hospitals = impact.len(),
        "Simulated incident"
    );

    Ok(Json(envelope(json!({
        "incident": incident,
        "impact": impact,
    }))))
}
