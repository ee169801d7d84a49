//! Hospital list and detail endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

use crate::error::AppError;
use crate::routes::location::envelope;
use crate::state::AppState;

/// GET /api/hospitals - the current session's ranked hospital list,
/// empty before any location is set.
pub async fn list(State(state): State<AppState>) -> Json<Value> {
    let hospitals = match state.sessions.snapshot().await {
        Some(session) => session.hospitals,
        None => Vec::new(),
    };
    let count = hospitals.len();
    Json(envelope(json!({
        "hospitals": hospitals,
        "count": count,
    })))
}

/// GET /api/hospital/{id} - one hospital with its latest prediction.
/// An unknown id 404s, as does any id before a location is set.
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let session = state
        .sessions
        .snapshot()
        .await
        .ok_or_else(|| AppError::NotFound("Hospital not found".to_string()))?;
    let hospital = session
        .hospitals
        .iter()
        .find(|h| h.id == id)
        .ok_or_else(|| AppError::NotFound("Hospital not found".to_string()))?;

    Ok(Json(envelope(json!({
        "hospital": hospital,
        "prediction": session.predictions.get(&id),
    }))))
}
