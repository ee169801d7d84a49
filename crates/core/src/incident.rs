//! Mass-casualty incident simulation types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;

/// What happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncidentKind {
    CarAccident,
    Fire,
    MedicalEmergency,
    NaturalDisaster,
}

impl IncidentKind {
    pub fn label(&self) -> &'static str {
        match self {
            IncidentKind::CarAccident => "Car Accident",
            IncidentKind::Fire => "Fire",
            IncidentKind::MedicalEmergency => "Medical Emergency",
            IncidentKind::NaturalDisaster => "Natural Disaster",
        }
    }

    /// Relative impact of this incident kind at a given severity,
    /// applied to the configured base additional wait.
    pub fn impact_multiplier(&self, severity: IncidentSeverity) -> f64 {
        use IncidentSeverity::*;
        match self {
            IncidentKind::CarAccident => match severity {
                Low => 1.2,
                Medium => 1.5,
                High => 2.0,
            },
            IncidentKind::Fire => match severity {
                Low => 1.3,
                Medium => 1.8,
                High => 2.5,
            },
            IncidentKind::MedicalEmergency => match severity {
                Low => 1.1,
                Medium => 1.4,
                High => 1.8,
            },
            IncidentKind::NaturalDisaster => match severity {
                Low => 1.5,
                Medium => 2.0,
                High => 3.0,
            },
        }
    }
}

/// How bad it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncidentSeverity {
    Low,
    Medium,
    High,
}

/// A simulated incident placed on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Incident {
    /// Wire name "type", to match the simulate request body.
    #[serde(rename = "type")]
    pub kind: IncidentKind,
    pub severity: IncidentSeverity,
    pub location: GeoPoint,
    pub occurred_at: DateTime<Utc>,
}

/// Projected effect of an incident on one hospital.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncidentImpact {
    pub hospital_id: String,
    pub hospital_name: String,
    /// Extra wait the incident adds on top of the current prediction.
    pub added_wait_minutes: u32,
    /// Distance from the incident to this hospital.
    pub distance_miles: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_serialize_snake_case() {
        let json = serde_json::to_string(&IncidentKind::CarAccident).unwrap();
        assert_eq!(json, "\"car_accident\"");
        let back: IncidentKind = serde_json::from_str("\"natural_disaster\"").unwrap();
        assert_eq!(back, IncidentKind::NaturalDisaster);
    }

    #[test]
    fn multiplier_grows_with_severity() {
        for kind in [
            IncidentKind::CarAccident,
            IncidentKind::Fire,
            IncidentKind::MedicalEmergency,
            IncidentKind::NaturalDisaster,
        ] {
            let low = kind.impact_multiplier(IncidentSeverity::Low);
            let medium = kind.impact_multiplier(IncidentSeverity::Medium);
            let high = kind.impact_multiplier(IncidentSeverity::High);
            assert!(low < medium && medium < high);
        }
    }
}
