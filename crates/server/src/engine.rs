//! Prediction engine: model estimates with a deterministic fallback
//!
//! `predict` never fails. The model call is allowed to error or
//! return unparseable text at any time; every such case lands on the
//! rule-based heuristic, and the recommendation is always derived
//! from the final wait number so labels and marker colors cannot
//! disagree.

use erwait_core::{
    EnvironmentalContext, FacilityClass, Hospital, Incident, IncidentImpact, Prediction,
    PredictionMethod,
};

use crate::ai::{estimator, AiReply, ClaudeClient};
use crate::config::Config;

pub struct PredictionEngine {
    ai: Option<ClaudeClient>,
    weather_add: u32,
    traffic_add: u32,
    peak_add: u32,
    fallback_confidence: u8,
    incident_base_wait: f64,
}

impl PredictionEngine {
    pub fn new(config: &Config) -> Self {
        let ai = config.anthropic_api_key.as_ref().map(|key| {
            ClaudeClient::new(
                key.clone(),
                config.anthropic_model.clone(),
                config.anthropic_base_url.clone(),
                config.http_timeout_secs,
            )
        });
        Self {
            ai,
            weather_add: config.fallback_weather_add,
            traffic_add: config.fallback_traffic_add,
            peak_add: config.fallback_peak_add,
            fallback_confidence: config.fallback_confidence,
            incident_base_wait: config.incident_base_wait,
        }
    }

    pub fn ai_enabled(&self) -> bool {
        self.ai.is_some()
    }

    /// Predict the current ER wait for one hospital.
    pub async fn predict(&self, hospital: &Hospital, ctx: &EnvironmentalContext) -> Prediction {
        if let Some(client) = &self.ai {
            let utilization = estimate_utilization(hospital.classify(), ctx);
            let prompt = estimator::build_prompt(hospital, utilization, ctx);
            match client.message(None, &prompt).await {
                Ok(text) => match estimator::parse_reply(&text) {
                    AiReply::Parsed(est) => {
                        tracing::debug!(
                            hospital = %hospital.name,
                            wait = est.wait_minutes,
                            confidence = est.confidence,
                            reasoning = est.reasoning.as_deref().unwrap_or(""),
                            "Model estimate accepted"
                        );
                        return Prediction::from_wait(
                            hospital.id.clone(),
                            est.wait_minutes,
                            est.confidence,
                            est.factors,
                            PredictionMethod::Ai,
                        );
                    }
                    AiReply::Unparseable => {
                        tracing::warn!(hospital = %hospital.name, "Unparseable model reply, using heuristic");
                    }
                },
                Err(err) => {
                    tracing::warn!(hospital = %hospital.name, error = %err, "Model call failed, using heuristic");
                }
            }
        }

        self.heuristic(hospital, ctx)
    }

    /// Rule-based estimate: facility base wait plus additive bumps for
    /// adverse weather, heavy traffic, and peak hours.
    fn heuristic(&self, hospital: &Hospital, ctx: &EnvironmentalContext) -> Prediction {
        let mut wait = hospital.classify().base_wait_minutes();
        let mut factors = Vec::new();

        if ctx.weather.is_adverse() {
            wait += self.weather_add;
            factors.push("Adverse weather".to_string());
        }
        if ctx.traffic.is_heavy() {
            wait += self.traffic_add;
            factors.push("Heavy traffic".to_string());
        }
        if ctx.is_peak_hour() {
            wait += self.peak_add;
            factors.push("Peak hours".to_string());
        }
        if factors.is_empty() {
            factors.push("Typical conditions".to_string());
        }

        Prediction::from_wait(
            hospital.id.clone(),
            wait,
            self.fallback_confidence,
            factors,
            PredictionMethod::Fallback,
        )
    }

    /// One-shot incident impact per hospital: a fixed delta scaled by
    /// the kind/severity multiplier and inversely by distance, so
    /// nearer hospitals always absorb the larger hit.
    pub fn simulate_incident(
        &self,
        incident: &Incident,
        hospitals: &[Hospital],
    ) -> Vec<IncidentImpact> {
        let multiplier = incident.kind.impact_multiplier(incident.severity);
        hospitals
            .iter()
            .map(|hospital| {
                let distance = incident.location.distance_miles(&hospital.point());
                let added = self.incident_base_wait * multiplier / distance.max(1.0);
                IncidentImpact {
                    hospital_id: hospital.id.clone(),
                    hospital_name: hospital.name.clone(),
                    added_wait_minutes: added.round() as u32,
                    distance_miles: (distance * 10.0).round() / 10.0,
                }
            })
            .collect()
    }
}

/// Deterministic capacity utilization estimate fed to the prompt:
/// class baseline shifted by time of day and the weekend lull.
pub fn estimate_utilization(class: FacilityClass, ctx: &EnvironmentalContext) -> f64 {
    let base = class.base_utilization();
    let mut multiplier = if ctx.is_peak_hour() {
        1.2
    } else if ctx.hour >= 22 || ctx.hour <= 6 {
        0.6
    } else {
        1.0
    };
    if ctx.is_weekend() {
        multiplier *= 0.9;
    }
    (base * multiplier).clamp(0.1, 0.95)
}

#[cfg(test)]
mod tests {
    use super::*;
    use erwait_core::{
        GeoPoint, IncidentKind, IncidentSeverity, Recommendation, TrafficReport, WeatherReport,
    };

    fn engine() -> PredictionEngine {
        PredictionEngine::new(&Config::default())
    }

    fn hospital(id: &str, name: &str, lat: f64, lng: f64) -> Hospital {
        Hospital {
            id: id.to_string(),
            name: name.to_string(),
            address: "1 Test Way".to_string(),
            latitude: lat,
            longitude: lng,
            phone: None,
            website: None,
            rating: 4.0,
            user_ratings_total: 50,
            capacity: 75,
            distance_miles: 1.0,
            distance_km: 1.6,
            drive_minutes: 2,
            source: "seed".to_string(),
        }
    }

    #[tokio::test]
    async fn predict_without_model_uses_heuristic() {
        let engine = engine();
        let ctx = EnvironmentalContext::neutral(14, 2);
        let p = engine
            .predict(&hospital("h1", "Lakeside Hospital", 40.7, -74.0), &ctx)
            .await;

        assert_eq!(p.method, PredictionMethod::Fallback);
        assert_eq!(p.wait_minutes, 30);
        assert_eq!(p.recommendation, Recommendation::Wait);
        assert_eq!(p.factors, vec!["Typical conditions"]);
    }

    #[tokio::test]
    async fn heuristic_adds_are_cumulative() {
        let engine = engine();
        let mut ctx = EnvironmentalContext::neutral(9, 1);
        ctx.weather = WeatherReport {
            condition: "thunderstorm".to_string(),
            ..WeatherReport::fallback()
        };
        ctx.traffic = TrafficReport {
            level: erwait_core::CongestionLevel::Severe,
            delay_ratio: 0.7,
            probe_minutes: Some(12.0),
            source: "google_directions".to_string(),
        };

        let p = engine
            .predict(
                &hospital("h1", "Bay Regional Medical Center", 40.7, -74.0),
                &ctx,
            )
            .await;

        // 45 base + 15 weather + 10 traffic + 20 peak
        assert_eq!(p.wait_minutes, 90);
        assert_eq!(p.recommendation, Recommendation::ConsiderAlternatives);
        assert_eq!(p.factors.len(), 3);
    }

    #[test]
    fn nearer_hospital_takes_larger_incident_hit() {
        let engine = engine();
        let incident = Incident {
            kind: IncidentKind::CarAccident,
            severity: IncidentSeverity::High,
            location: GeoPoint::new(40.7128, -74.0060),
            occurred_at: chrono::Utc::now(),
        };
        // Roughly 1 mile and 10 miles north of the incident.
        let near = hospital("near", "Near Hospital", 40.7273, -74.0060);
        let far = hospital("far", "Far Hospital", 40.8577, -74.0060);

        let impacts = engine.simulate_incident(&incident, &[near, far]);
        assert_eq!(impacts.len(), 2);
        assert!(impacts[0].added_wait_minutes > impacts[1].added_wait_minutes);
        assert!(impacts[0].distance_miles < impacts[1].distance_miles);
    }

    #[test]
    fn incident_delta_is_never_amplified_inside_a_mile() {
        let engine = engine();
        let incident = Incident {
            kind: IncidentKind::Fire,
            severity: IncidentSeverity::Medium,
            location: GeoPoint::new(40.7128, -74.0060),
            occurred_at: chrono::Utc::now(),
        };
        // A hospital across the street from the incident.
        let adjacent = hospital("h1", "Close Hospital", 40.7129, -74.0060);
        let impacts = engine.simulate_incident(&incident, &[adjacent]);

        // base 30 x fire/medium 1.8, distance floored at 1 mile
        assert_eq!(impacts[0].added_wait_minutes, 54);
    }

    #[test]
    fn utilization_respects_bounds_and_time() {
        let peak = EnvironmentalContext::neutral(9, 1);
        let night = EnvironmentalContext::neutral(3, 1);
        let weekend = EnvironmentalContext::neutral(14, 6);

        let peak_u = estimate_utilization(FacilityClass::MedicalCenter, &peak);
        let night_u = estimate_utilization(FacilityClass::MedicalCenter, &night);
        assert!(peak_u > night_u);

        let weekend_u = estimate_utilization(FacilityClass::Community, &weekend);
        assert!((weekend_u - 0.65 * 0.9).abs() < 1e-9);

        for class in [
            FacilityClass::MedicalCenter,
            FacilityClass::Community,
            FacilityClass::Clinic,
            FacilityClass::General,
        ] {
            for hour in 0..24 {
                let u = estimate_utilization(class, &EnvironmentalContext::neutral(hour, 5));
                assert!((0.1..=0.95).contains(&u));
            }
        }
    }
}
