//! Street-cam insight endpoint

use axum::{extract::State, Json};
use chrono::{Local, Timelike};
use serde_json::{json, Value};

use crate::error::AppError;
use crate::routes::location::no_session;
use crate::state::AppState;
use crate::street_cam;

/// GET /api/street-cam-insight
///
/// Synthesizes a camera view near the closest hospital in the current
/// session.
pub async fn insight(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let session = state.sessions.snapshot().await.ok_or_else(no_session)?;
    let hospital = session.hospitals.first().ok_or_else(|| {
        AppError::BadRequest("No hospitals in the current session".to_string())
    })?;

    let insight = street_cam::insight(hospital.point(), Local::now().hour());

    Ok(Json(json!({
        "status": "ok",
        "hospital_id": hospital.id,
        "insight": insight,
    })))
}
