//! Hospital records and facility classification

use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;

/// A hospital discovered near the user's location.
///
/// Built once per location session from a places-provider record; only the
/// distance fields are recomputed when the user moves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hospital {
    pub id: String,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    pub rating: f64,
    pub user_ratings_total: u32,
    /// Estimated bed count, derived from the facility class.
    pub capacity: u32,
    pub distance_miles: f64,
    pub distance_km: f64,
    /// Distance-based driving ETA at a 25 mph city average.
    pub drive_minutes: u32,
    /// Which provider produced this record ("google_places" or "seed").
    pub source: String,
}

impl Hospital {
    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }

    /// Classify the facility from its name.
    pub fn classify(&self) -> FacilityClass {
        FacilityClass::from_name(&self.name)
    }
}

/// Facility size class inferred from the hospital name.
///
/// Drives the capacity estimate, the fallback base wait, and the baseline
/// utilization fed to the prediction prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacilityClass {
    MedicalCenter,
    Community,
    Clinic,
    General,
}

const MEDICAL_CENTER_KEYWORDS: [&str; 4] = ["medical center", "university", "regional", "trauma"];
const COMMUNITY_KEYWORDS: [&str; 4] = ["general", "memorial", "community", "county"];
const CLINIC_KEYWORDS: [&str; 3] = ["clinic", "urgent care", "outpatient"];

impl FacilityClass {
    pub fn from_name(name: &str) -> Self {
        let lower = name.to_lowercase();
        if MEDICAL_CENTER_KEYWORDS.iter().any(|k| lower.contains(k)) {
            FacilityClass::MedicalCenter
        } else if COMMUNITY_KEYWORDS.iter().any(|k| lower.contains(k)) {
            FacilityClass::Community
        } else if CLINIC_KEYWORDS.iter().any(|k| lower.contains(k)) {
            FacilityClass::Clinic
        } else {
            FacilityClass::General
        }
    }

    /// Human-readable label used in the prediction prompt.
    pub fn label(&self) -> &'static str {
        match self {
            FacilityClass::MedicalCenter => "Medical Center",
            FacilityClass::Community => "Community Hospital",
            FacilityClass::Clinic => "Clinic/Urgent Care",
            FacilityClass::General => "General Hospital",
        }
    }

    /// Estimated bed count for the class.
    pub fn estimated_beds(&self) -> u32 {
        match self {
            FacilityClass::MedicalCenter => 100,
            FacilityClass::Community => 75,
            FacilityClass::Clinic => 25,
            FacilityClass::General => 50,
        }
    }

    /// Base ER wait in minutes for the fallback heuristic.
    pub fn base_wait_minutes(&self) -> u32 {
        match self {
            FacilityClass::MedicalCenter => 45,
            FacilityClass::Community => 35,
            FacilityClass::Clinic => 25,
            FacilityClass::General => 30,
        }
    }

    /// Baseline capacity utilization before time-of-day adjustment.
    pub fn base_utilization(&self) -> f64 {
        match self {
            FacilityClass::MedicalCenter => 0.75,
            FacilityClass::Community => 0.65,
            FacilityClass::Clinic | FacilityClass::General => 0.55,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_by_name_keywords() {
        assert_eq!(
            FacilityClass::from_name("Bellevue University Medical Center"),
            FacilityClass::MedicalCenter
        );
        assert_eq!(
            FacilityClass::from_name("St. Mary Memorial Hospital"),
            FacilityClass::Community
        );
        assert_eq!(
            FacilityClass::from_name("Midtown Urgent Care"),
            FacilityClass::Clinic
        );
        assert_eq!(
            FacilityClass::from_name("Lakeside Hospital"),
            FacilityClass::General
        );
    }

    #[test]
    fn larger_facilities_get_longer_base_waits() {
        assert!(
            FacilityClass::MedicalCenter.base_wait_minutes()
                > FacilityClass::Clinic.base_wait_minutes()
        );
        assert_eq!(FacilityClass::General.base_wait_minutes(), 30);
    }

    #[test]
    fn capacity_tracks_class() {
        assert_eq!(FacilityClass::MedicalCenter.estimated_beds(), 100);
        assert_eq!(FacilityClass::Clinic.estimated_beds(), 25);
    }
}
