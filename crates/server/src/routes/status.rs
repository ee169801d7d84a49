//! Service status endpoint

use axum::{extract::State, Json};
use chrono::Utc;
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /api/status - session summary and provider availability.
pub async fn get(State(state): State<AppState>) -> Json<Value> {
    let session = state.sessions.snapshot().await;
    let session_summary = match &session {
        Some(s) => json!({
            "location_set": true,
            "hospital_count": s.hospitals.len(),
            "last_update": s.updated_at.to_rfc3339(),
        }),
        None => json!({
            "location_set": false,
            "hospital_count": 0,
            "last_update": Value::Null,
        }),
    };

    Json(json!({
        "status": "ok",
        "session": session_summary,
        "providers": state.providers,
        "timestamp": Utc::now().to_rfc3339(),
    }))
}
