//! Periodic prediction refresh
//!
//! A single background task re-collects context and re-predicts for
//! the current session on a fixed interval. Publishing is guarded by
//! the session version captured at the start of the cycle, so a
//! relocation that lands mid-cycle wins and the stale batch is
//! dropped.

use std::collections::BTreeMap;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::config::Config;
use crate::state::AppState;

pub fn spawn(state: AppState, config: &Config) -> JoinHandle<()> {
    let interval = Duration::from_secs(config.update_interval_secs.max(1));
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(interval).await;
            refresh_once(&state).await;
        }
    })
}

/// Run one refresh cycle. A no-op when no location has been set.
pub async fn refresh_once(state: &AppState) {
    let Some((version, location, hospitals)) = state.sessions.begin_refresh().await else {
        return;
    };

    let context = state.collector.collect_context(location.point()).await;

    let mut predictions = BTreeMap::new();
    for hospital in &hospitals {
        let prediction = state.engine.predict(hospital, &context).await;
        predictions.insert(hospital.id.clone(), prediction);
    }

    if state.sessions.publish_refresh(version, context, predictions).await {
        metrics::counter!("refresh_cycles_total").increment(1);
        tracing::info!(hospitals = hospitals.len(), "Refreshed predictions");
    } else {
        tracing::info!("Discarded stale refresh after relocation");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Session;
    use chrono::Utc;
    use erwait_core::{EnvironmentalContext, GeoPoint, Hospital, UserLocation};

    fn seeded_session() -> Session {
        let hospital = Hospital {
            id: "h1".to_string(),
            name: "Test Hospital".to_string(),
            address: "1 Test Way".to_string(),
            latitude: 40.7,
            longitude: -74.0,
            phone: None,
            website: None,
            rating: 4.0,
            user_ratings_total: 10,
            capacity: 50,
            distance_miles: 1.0,
            distance_km: 1.6,
            drive_minutes: 2,
            source: "seed".to_string(),
        };
        Session {
            location: UserLocation::from_point(GeoPoint::new(40.7, -74.0)),
            hospitals: vec![hospital],
            context: EnvironmentalContext::neutral(12, 2),
            predictions: BTreeMap::new(),
            updated_at: Utc::now(),
        }
    }

    fn offline_config() -> Config {
        Config {
            open_meteo_base_url: "http://127.0.0.1:1".to_string(),
            ..Config::default()
        }
    }

    #[tokio::test]
    async fn refresh_fills_predictions_for_current_session() {
        let state = AppState::new(&offline_config());
        state.sessions.replace(seeded_session()).await;

        refresh_once(&state).await;

        let session = state.sessions.snapshot().await.unwrap();
        assert_eq!(session.predictions.len(), 1);
        assert!(session.predictions.contains_key("h1"));
    }

    #[tokio::test]
    async fn refresh_without_session_is_a_no_op() {
        let state = AppState::new(&offline_config());
        refresh_once(&state).await;
        assert!(state.sessions.snapshot().await.is_none());
    }
}
