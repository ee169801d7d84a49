//! erwait-core: Shared ER wait-time domain types
//!
//! This crate provides the common types used across the prediction
//! server, including Hospital, Prediction, and the environmental
//! context snapshot, plus the geo math that ranks facilities.

pub mod context;
pub mod error;
pub mod geo;
pub mod hospital;
pub mod incident;
pub mod location;
pub mod prediction;

// Re-export our types
pub use context::{CongestionLevel, EnvironmentalContext, TrafficReport, WeatherReport};
pub use error::ServiceError;
pub use geo::{parse_latlng, GeoPoint, KM_PER_MILE, METERS_PER_MILE};
pub use hospital::{FacilityClass, Hospital};
pub use incident::{Incident, IncidentImpact, IncidentKind, IncidentSeverity};
pub use location::UserLocation;
pub use prediction::{Prediction, PredictionMethod, Recommendation, WaitBucket};
