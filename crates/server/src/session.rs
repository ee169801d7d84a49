//! In-memory session state for the active location

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use erwait_core::{EnvironmentalContext, Hospital, Prediction, UserLocation};
use tokio::sync::RwLock;

/// Everything derived from the active location. Hospitals and
/// predictions always travel together; relocation replaces the whole
/// value, so a stale hospital id can never survive a location change.
#[derive(Debug, Clone)]
pub struct Session {
    pub location: UserLocation,
    pub hospitals: Vec<Hospital>,
    pub context: EnvironmentalContext,
    pub predictions: BTreeMap<String, Prediction>,
    pub updated_at: DateTime<Utc>,
}

/// Shared store for the current session.
///
/// Readers clone a snapshot; writers publish a full replacement value
/// under the lock, never a field-by-field mutation visible to readers.
/// The version counter lets a background refresh detect that the
/// location changed while it was collecting and discard its result.
pub struct SessionStore {
    version: AtomicU64,
    current: RwLock<Option<Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            version: AtomicU64::new(0),
            current: RwLock::new(None),
        }
    }

    pub async fn snapshot(&self) -> Option<Session> {
        self.current.read().await.clone()
    }

    pub fn version(&self) -> u64 {
        self.version.load(Ordering::SeqCst)
    }

    /// Install a brand new session after a location change. Bumps the
    /// version so in-flight refreshes against the old session discard
    /// themselves on publish.
    pub async fn replace(&self, session: Session) -> u64 {
        let mut guard = self.current.write().await;
        let version = self.version.fetch_add(1, Ordering::SeqCst) + 1;
        *guard = Some(session);
        version
    }

    /// Inputs for one refresh cycle, or None when no location is set.
    pub async fn begin_refresh(&self) -> Option<(u64, UserLocation, Vec<Hospital>)> {
        let guard = self.current.read().await;
        guard
            .as_ref()
            .map(|s| (self.version(), s.location.clone(), s.hospitals.clone()))
    }

    /// Publish a refreshed context and prediction set, unless the
    /// session was replaced underneath the refresh. Returns whether
    /// the result was applied.
    pub async fn publish_refresh(
        &self,
        expected_version: u64,
        context: EnvironmentalContext,
        predictions: BTreeMap<String, Prediction>,
    ) -> bool {
        let mut guard = self.current.write().await;
        if self.version() != expected_version {
            return false;
        }
        let Some(session) = guard.as_ref() else {
            return false;
        };
        let mut next = session.clone();
        next.context = context;
        next.predictions = predictions;
        next.updated_at = Utc::now();
        *guard = Some(next);
        true
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use erwait_core::{GeoPoint, Prediction, PredictionMethod};

    fn session_at(lat: f64, lng: f64) -> Session {
        Session {
            location: UserLocation::from_point(GeoPoint { lat, lng }),
            hospitals: vec![],
            context: EnvironmentalContext::neutral(12, 2),
            predictions: BTreeMap::new(),
            updated_at: Utc::now(),
        }
    }

    fn one_prediction(id: &str, wait: u32) -> BTreeMap<String, Prediction> {
        let mut map = BTreeMap::new();
        map.insert(
            id.to_string(),
            Prediction::from_wait(id, wait, 60, vec![], PredictionMethod::Fallback),
        );
        map
    }

    #[tokio::test]
    async fn stale_refresh_is_discarded() {
        let store = SessionStore::new();
        let v1 = store.replace(session_at(40.7, -74.0)).await;

        // Relocation bumps the version before the refresh publishes.
        let v2 = store.replace(session_at(34.0, -118.2)).await;
        assert!(v2 > v1);

        let applied = store
            .publish_refresh(
                v1,
                EnvironmentalContext::neutral(12, 2),
                one_prediction("old-hospital", 42),
            )
            .await;
        assert!(!applied);

        let snapshot = store.snapshot().await.unwrap();
        assert!(snapshot.predictions.is_empty());
    }

    #[tokio::test]
    async fn current_refresh_is_applied() {
        let store = SessionStore::new();
        let version = store.replace(session_at(40.7, -74.0)).await;

        let applied = store
            .publish_refresh(
                version,
                EnvironmentalContext::neutral(9, 0),
                one_prediction("h1", 25),
            )
            .await;
        assert!(applied);

        let snapshot = store.snapshot().await.unwrap();
        assert_eq!(snapshot.predictions.len(), 1);
        assert!(snapshot.predictions.contains_key("h1"));
    }

    #[tokio::test]
    async fn no_session_means_no_refresh_inputs() {
        let store = SessionStore::new();
        assert!(store.begin_refresh().await.is_none());
    }
}
