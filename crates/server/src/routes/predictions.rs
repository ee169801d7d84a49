//! Prediction snapshot endpoint polled by the frontend

use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::routes::location::envelope;
use crate::state::AppState;

/// GET /api/predictions - the latest prediction per hospital, keyed by
/// hospital id, plus the context it was computed under. Empty before
/// any location is set.
pub async fn list(State(state): State<AppState>) -> Json<Value> {
    let body = match state.sessions.snapshot().await {
        Some(session) => json!({
            "predictions": session.predictions,
            "weather": session.context.weather,
            "traffic": session.context.traffic,
            "last_update": session.updated_at.to_rfc3339(),
        }),
        None => json!({ "predictions": {} }),
    };
    Json(envelope(body))
}
