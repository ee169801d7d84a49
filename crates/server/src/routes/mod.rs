mod context;
mod hospitals;
mod incident;
mod location;
mod predictions;
mod status;
mod street_cam;

pub mod health;
pub mod metrics;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

/// Build the JSON API routes mounted under `/api`.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/location", post(location::set))
        .route("/hospitals", get(hospitals::list))
        .route("/hospital/{id}", get(hospitals::detail))
        .route("/predictions", get(predictions::list))
        .route("/weather", get(context::weather))
        .route("/traffic", get(context::traffic))
        .route("/simulate-incident", post(incident::simulate))
        .route("/street-cam-insight", get(street_cam::insight))
        .route("/status", get(status::get))
}
