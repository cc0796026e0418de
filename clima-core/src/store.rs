//! The weather state core: single source of truth for the current snapshot,
//! fetch status, and display preferences.
//!
//! State is published through a [`tokio::sync::watch`] channel so every
//! reader observes transitions in commit order: `loading=true` first, then
//! either the new snapshot or an error, each with `loading=false`.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::warn;

use crate::{
    config::Config,
    model::{UnitSystem, WeatherSnapshot},
    provider::{LocationQuery, ProviderId, WeatherProvider},
};

/// Message published for every fetch failure. Transport, status and shape
/// failures all collapse into this; detail goes to the log only.
const FETCH_ERROR: &str = "Failed to fetch weather data";

/// State visible to the display layer at all times.
#[derive(Debug, Clone, Default)]
pub struct WeatherState {
    pub weather: Option<WeatherSnapshot>,
    pub loading: bool,
    pub error: Option<String>,
    pub units: UnitSystem,
    pub provider: ProviderId,
}

/// Owns the weather data lifecycle. Fetches run to completion without
/// cancellation: when two fetches overlap, the last response to resolve
/// wins and overwrites the published state.
#[derive(Debug)]
pub struct WeatherStore {
    state: watch::Sender<WeatherState>,
    provider: Arc<dyn WeatherProvider>,
    config_path: Option<PathBuf>,
}

impl WeatherStore {
    /// Build a store around a provider, seeding preferences from `config`.
    /// `config_path` is where preference mutations are re-persisted; `None`
    /// disables persistence (tests).
    pub fn new(
        provider: Arc<dyn WeatherProvider>,
        config: &Config,
        config_path: Option<PathBuf>,
    ) -> Self {
        let initial = WeatherState {
            units: config.preferences.units,
            provider: config.preferences.provider_id(),
            ..WeatherState::default()
        };
        let (state, _) = watch::channel(initial);

        Self { state, provider, config_path }
    }

    /// Subscribe to state transitions. The receiver immediately holds the
    /// current state.
    pub fn subscribe(&self) -> watch::Receiver<WeatherState> {
        self.state.subscribe()
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> WeatherState {
        self.state.borrow().clone()
    }

    /// Fetch weather for a place name. An empty name (after trimming) is a
    /// no-op: no state change, no request.
    pub async fn fetch_by_name(&self, name: &str) {
        let name = name.trim();
        if name.is_empty() {
            return;
        }
        self.fetch(LocationQuery::Name(name.to_string())).await;
    }

    /// Fetch weather for a coordinate pair.
    pub async fn fetch_by_coordinates(&self, lat: f64, lon: f64) {
        self.fetch(LocationQuery::Coordinates { lat, lon }).await;
    }

    async fn fetch(&self, query: LocationQuery) {
        self.state.send_modify(|state| {
            state.loading = true;
            state.error = None;
        });

        match self.provider.forecast(&query).await {
            Ok(snapshot) => {
                self.state.send_modify(|state| {
                    state.weather = Some(snapshot);
                    state.loading = false;
                });
            }
            Err(e) => {
                warn!(%query, error = %e, "weather fetch failed");
                self.state.send_modify(|state| {
                    state.error = Some(FETCH_ERROR.to_string());
                    state.loading = false;
                });
            }
        }
    }

    /// Switch display units. Persists immediately; never refetches, since
    /// snapshots carry both unit variants.
    pub fn set_units(&self, units: UnitSystem) {
        self.state.send_modify(|state| state.units = units);
        self.persist_preferences();
    }

    /// Switch the preferred provider. Persists immediately. With a single
    /// provider wired this only affects the stored preference.
    pub fn set_provider(&self, provider: ProviderId) {
        self.state.send_modify(|state| state.provider = provider);
        self.persist_preferences();
    }

    fn persist_preferences(&self) {
        let Some(path) = &self.config_path else {
            return;
        };

        let state = self.state.borrow().clone();
        let mut config = Config::load_from(path);
        config.preferences.units = state.units;
        config.preferences.provider = state.provider.as_str().to_string();

        if let Err(e) = config.save_to(path) {
            warn!(path = %path.display(), error = %e, "failed to persist preferences");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CurrentConditions, DailyEntry, Location};
    use crate::provider::ProviderError;
    use async_trait::async_trait;
    use chrono::{Days, NaiveDate};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;

    fn snapshot_for(name: &str) -> WeatherSnapshot {
        let start = NaiveDate::from_ymd_opt(2026, 8, 10).unwrap();
        let daily = (0..7)
            .map(|i| DailyEntry {
                date: start.checked_add_days(Days::new(i)).unwrap(),
                maxtemp_c: 24.0,
                maxtemp_f: 75.2,
                mintemp_c: 18.0,
                mintemp_f: 64.4,
                condition: "Sunny".to_string(),
                condition_code: "1000".to_string(),
                chance_of_rain: 0.0,
            })
            .collect();

        WeatherSnapshot {
            location: Location {
                name: name.to_string(),
                country: "Testland".to_string(),
                lat: 0.0,
                lon: 0.0,
            },
            current: CurrentConditions {
                temp_c: 18.0,
                temp_f: 64.4,
                condition: "Sunny".to_string(),
                condition_code: "1000".to_string(),
                humidity: 65,
                wind_kph: 15.0,
                wind_dir: "NE".to_string(),
                feelslike_c: 17.0,
                feelslike_f: 62.6,
                uv: 4.0,
                pressure_mb: 1012.0,
                precip_mm: 0.0,
                last_updated: start.and_hms_opt(12, 0, 0).unwrap(),
                is_day: true,
            },
            daily,
            hourly: Vec::new(),
        }
    }

    /// Test double: answers with a canned snapshot for the queried name,
    /// optionally after a per-name delay. Failure mode can be toggled
    /// between calls; every call is counted.
    #[derive(Debug, Default)]
    struct StubProvider {
        fail: AtomicBool,
        delay_ms_per_name: Vec<(&'static str, u64)>,
        calls: AtomicUsize,
    }

    impl StubProvider {
        fn with_delays(delays: Vec<(&'static str, u64)>) -> Self {
            Self { delay_ms_per_name: delays, ..Self::default() }
        }
    }

    #[async_trait]
    impl WeatherProvider for StubProvider {
        async fn forecast(&self, query: &LocationQuery) -> Result<WeatherSnapshot, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);

            if self.fail.load(Ordering::SeqCst) {
                return Err(ProviderError::Status { status: 500, body: "boom".to_string() });
            }

            let name = query.as_query();
            if let Some((_, ms)) =
                self.delay_ms_per_name.iter().find(|(n, _)| *n == name.as_str())
            {
                tokio::time::sleep(Duration::from_millis(*ms)).await;
            }

            Ok(snapshot_for(&name))
        }
    }

    fn store_and_stub() -> (WeatherStore, Arc<StubProvider>) {
        let stub = Arc::new(StubProvider::default());
        let store = WeatherStore::new(stub.clone(), &Config::default(), None);
        (store, stub)
    }

    #[tokio::test]
    async fn successful_fetch_publishes_snapshot() {
        let (store, _) = store_and_stub();

        store.fetch_by_name("Tokyo").await;

        let state = store.state();
        assert!(!state.loading);
        assert!(state.error.is_none());
        let weather = state.weather.expect("snapshot should be published");
        assert_eq!(weather.location.name, "Tokyo");
        assert!((weather.current.temp_c - 18.0).abs() < f64::EPSILON);
        assert_eq!(weather.daily.len(), 7);
    }

    #[tokio::test]
    async fn failed_fetch_sets_error_without_snapshot() {
        let (store, stub) = store_and_stub();
        stub.fail.store(true, Ordering::SeqCst);

        store.fetch_by_name("Nowhere").await;

        let state = store.state();
        assert!(state.weather.is_none());
        assert!(!state.loading);
        let error = state.error.expect("error should be set");
        assert!(!error.is_empty());
    }

    #[tokio::test]
    async fn failure_after_success_preserves_old_weather() {
        let (store, stub) = store_and_stub();
        store.fetch_by_name("Tokyo").await;

        stub.fail.store(true, Ordering::SeqCst);
        store.fetch_by_name("Nowhere").await;

        let state = store.state();
        assert_eq!(
            state.weather.expect("prior snapshot must survive").location.name,
            "Tokyo"
        );
        assert_eq!(state.error.as_deref(), Some("Failed to fetch weather data"));
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn empty_name_is_a_noop_and_never_calls_provider() {
        let (store, stub) = store_and_stub();

        store.fetch_by_name("").await;
        store.fetch_by_name("   ").await;

        assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
        let state = store.state();
        assert!(state.weather.is_none());
        assert!(state.error.is_none());
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn fetch_clears_previous_error() {
        let (store, stub) = store_and_stub();
        stub.fail.store(true, Ordering::SeqCst);
        store.fetch_by_name("Nowhere").await;
        assert!(store.state().error.is_some());

        stub.fail.store(false, Ordering::SeqCst);
        store.fetch_by_name("Tokyo").await;

        let state = store.state();
        assert!(state.error.is_none());
        assert_eq!(state.weather.unwrap().location.name, "Tokyo");
    }

    #[tokio::test]
    async fn coordinates_fetch_publishes_snapshot() {
        let (store, _) = store_and_stub();

        store.fetch_by_coordinates(35.69, 139.69).await;

        let state = store.state();
        assert_eq!(state.weather.unwrap().location.name, "35.69,139.69");
    }

    /// There is no cancellation: the response that resolves last wins, even
    /// if it belongs to the earlier request.
    #[tokio::test]
    async fn overlapping_fetches_last_response_wins() {
        let provider = StubProvider::with_delays(vec![("A", 80), ("B", 10)]);
        let store = Arc::new(WeatherStore::new(
            Arc::new(provider),
            &Config::default(),
            None,
        ));

        let slow = {
            let store = store.clone();
            tokio::spawn(async move { store.fetch_by_name("A").await })
        };
        let fast = {
            let store = store.clone();
            tokio::spawn(async move { store.fetch_by_name("B").await })
        };

        fast.await.unwrap();
        slow.await.unwrap();

        // B resolved first, A overwrote it afterwards.
        assert_eq!(store.state().weather.unwrap().location.name, "A");
    }

    #[tokio::test]
    async fn subscribers_observe_loading_then_result() {
        let provider = StubProvider::with_delays(vec![("Tokyo", 50)]);
        let store = Arc::new(WeatherStore::new(
            Arc::new(provider),
            &Config::default(),
            None,
        ));
        let mut rx = store.subscribe();

        let fetch = {
            let store = store.clone();
            tokio::spawn(async move { store.fetch_by_name("Tokyo").await })
        };

        // First commit: loading set and error cleared, no snapshot yet. The
        // provider delay keeps this state observable until the result lands.
        rx.changed().await.unwrap();
        {
            let state = rx.borrow_and_update();
            assert!(state.loading);
            assert!(state.error.is_none());
            assert!(state.weather.is_none());
        }

        // Second commit: the snapshot, with loading cleared.
        fetch.await.unwrap();
        let state = rx.borrow().clone();
        assert!(!state.loading);
        assert!(state.weather.is_some());
    }

    #[tokio::test]
    async fn set_units_updates_state_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let store = WeatherStore::new(
            Arc::new(StubProvider::default()),
            &Config::default(),
            Some(path.clone()),
        );

        store.set_units(UnitSystem::Imperial);

        assert_eq!(store.state().units, UnitSystem::Imperial);
        let reloaded = Config::load_from(&path);
        assert_eq!(reloaded.preferences.units, UnitSystem::Imperial);
    }

    #[tokio::test]
    async fn set_provider_persists_preference() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let store = WeatherStore::new(
            Arc::new(StubProvider::default()),
            &Config::default(),
            Some(path.clone()),
        );

        store.set_provider(ProviderId::WeatherApi);

        let reloaded = Config::load_from(&path);
        assert_eq!(reloaded.preferences.provider, "weatherapi");
    }

    #[tokio::test]
    async fn preferences_seed_from_config() {
        let mut config = Config::default();
        config.preferences.units = UnitSystem::Imperial;

        let store = WeatherStore::new(Arc::new(StubProvider::default()), &config, None);

        assert_eq!(store.state().units, UnitSystem::Imperial);
    }
}
