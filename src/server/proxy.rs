// Weather proxy.
// Serves provider payloads from a timed cache keyed by city id and by "name,country".

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use parking_lot::Mutex;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::cache::TimedCache;
use crate::error::{Result, WeatherError};
use crate::provider::{CityId, WeatherSource, name_key, unwrap_payload};
use crate::state::CityRegistry;

/// Cache key: a payload is stored under both forms.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WeatherKey {
    Id(CityId),
    /// Lower-cased `"name,country"`.
    Name(String),
}

/// Caching front for a [`WeatherSource`].
///
/// Every successful fetch is written under two keys with the same timestamp.
/// The keys are refreshed independently afterwards, so one can expire while
/// the other is still fresh; lookups only ever consult their own key.
pub struct WeatherProxy<S> {
    source: S,
    registry: Arc<CityRegistry>,
    cache: Mutex<TimedCache<WeatherKey, Value>>,
    ttl: Duration,
}

impl<S: WeatherSource> WeatherProxy<S> {
    pub fn new(source: S, registry: Arc<CityRegistry>, ttl: Duration) -> Self {
        Self {
            source,
            registry,
            cache: Mutex::new(TimedCache::new()),
            ttl,
        }
    }

    pub fn registry(&self) -> &CityRegistry {
        &self.registry
    }

    /// Weather for a city id. A fresh entry is served even for ids outside the
    /// registry (written by a name lookup); a miss fetches registered ids only.
    pub async fn get_by_city_id(&self, id: CityId) -> Result<Value> {
        let key = WeatherKey::Id(id);
        if let Some(weather) = self.cached(&key) {
            debug!(city_id = id, "proxy cache hit");
            return Ok(weather);
        }

        let city = self.registry.get(id).ok_or(WeatherError::UnknownCity(id))?;

        info!(city_id = id, "fetching weather from provider");
        let weather = self.source.fetch_by_id(id).await?;

        let now = Utc::now();
        let mut cache = self.cache.lock();
        cache.put_at(key, weather.clone(), now);
        cache.put_at(WeatherKey::Name(city.name_key()), weather.clone(), now);
        Ok(weather)
    }

    /// Weather for any `name`/`country` pair the provider knows.
    pub async fn get_by_city_name(&self, name: &str, country: &str) -> Result<Value> {
        let query = name_key(name, country);
        let key = WeatherKey::Name(query.clone());
        if let Some(weather) = self.cached(&key) {
            debug!(query = %query, "proxy cache hit");
            return Ok(weather);
        }

        info!(query = %query, "fetching weather from provider");
        let response = self.source.fetch_by_query(&query).await?;
        let (weather, city_id) = unwrap_payload(response)?;

        let now = Utc::now();
        let mut cache = self.cache.lock();
        cache.put_at(key, weather.clone(), now);
        match city_id {
            Some(id) => cache.put_at(WeatherKey::Id(id), weather.clone(), now),
            None => warn!(query = %query, "provider payload has no city id, cached by name only"),
        }
        Ok(weather)
    }

    fn cached(&self, key: &WeatherKey) -> Option<Value> {
        self.cache.lock().get_fresh(key, self.ttl).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{City, Coord};
    use chrono::DateTime;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// In-memory provider that counts outbound requests.
    #[derive(Default)]
    struct FakeSource {
        by_id: AtomicUsize,
        by_query: AtomicUsize,
        fail: bool,
        wrap_in_list: bool,
    }

    impl FakeSource {
        fn payload(id: CityId) -> Value {
            json!({"id": id, "name": "Paris", "weather": [{"description": "clear sky"}]})
        }

        fn calls(&self) -> (usize, usize) {
            (
                self.by_id.load(Ordering::SeqCst),
                self.by_query.load(Ordering::SeqCst),
            )
        }
    }

    impl WeatherSource for FakeSource {
        async fn fetch_by_id(&self, id: CityId) -> Result<Value> {
            self.by_id.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(WeatherError::Other("provider down".to_string()));
            }
            Ok(Self::payload(id))
        }

        async fn fetch_by_query(&self, query: &str) -> Result<Value> {
            self.by_query.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(WeatherError::Other("provider down".to_string()));
            }
            if query == "oslo,no" {
                return Ok(json!({"id": OSLO, "name": "Oslo"}));
            }
            if self.wrap_in_list {
                Ok(json!({"cnt": 1, "list": [Self::payload(42)]}))
            } else {
                Ok(Self::payload(42))
            }
        }
    }

    /// Known to the provider, absent from the registry.
    const OSLO: CityId = 3143244;

    fn registry() -> Arc<CityRegistry> {
        Arc::new(CityRegistry::from_cities(vec![City {
            id: 42,
            name: "Paris".to_string(),
            country: "FR".to_string(),
            coord: Coord {
                lat: 48.85,
                lon: 2.35,
            },
        }]))
    }

    fn proxy(source: FakeSource) -> WeatherProxy<FakeSource> {
        WeatherProxy::new(source, registry(), Duration::from_secs(3600))
    }

    #[tokio::test]
    async fn test_id_fetch_serves_both_keys() {
        let proxy = proxy(FakeSource::default());

        let first = proxy.get_by_city_id(42).await.unwrap();
        let by_id = proxy.get_by_city_id(42).await.unwrap();
        let by_name = proxy.get_by_city_name("Paris", "FR").await.unwrap();

        assert_eq!(first, by_id);
        assert_eq!(first, by_name);
        assert_eq!(proxy.source.calls(), (1, 0));
    }

    #[tokio::test]
    async fn test_name_lookup_is_case_insensitive() {
        let proxy = proxy(FakeSource::default());
        proxy.get_by_city_name("PARIS", "fr").await.unwrap();
        proxy.get_by_city_name("paris", "FR").await.unwrap();
        assert_eq!(proxy.source.calls(), (0, 1));
    }

    #[tokio::test]
    async fn test_name_fetch_unwraps_list_and_caches_embedded_id() {
        let proxy = proxy(FakeSource {
            wrap_in_list: true,
            ..FakeSource::default()
        });

        let weather = proxy.get_by_city_name("Paris", "FR").await.unwrap();
        assert_eq!(weather["id"], 42);
        assert!(weather.get("list").is_none());

        let by_id = proxy.get_by_city_id(42).await.unwrap();
        assert_eq!(weather, by_id);
        assert_eq!(proxy.source.calls(), (0, 1));
    }

    #[tokio::test]
    async fn test_unknown_id_is_rejected_without_fetch() {
        let proxy = proxy(FakeSource::default());
        let err = proxy.get_by_city_id(7).await.unwrap_err();
        assert!(matches!(err, WeatherError::UnknownCity(7)));
        assert_eq!(proxy.source.calls(), (0, 0));
    }

    #[tokio::test]
    async fn test_unregistered_id_is_served_from_name_fetch() {
        let proxy = proxy(FakeSource::default());

        let by_name = proxy.get_by_city_name("Oslo", "NO").await.unwrap();
        let by_id = proxy.get_by_city_id(OSLO).await.unwrap();

        assert_eq!(by_name, by_id);
        assert_eq!(by_id["name"], "Oslo");
        assert_eq!(proxy.source.calls(), (0, 1));
    }

    #[tokio::test]
    async fn test_failure_is_not_cached() {
        let proxy = proxy(FakeSource {
            fail: true,
            ..FakeSource::default()
        });

        assert!(proxy.get_by_city_id(42).await.is_err());
        assert!(proxy.get_by_city_id(42).await.is_err());
        assert_eq!(proxy.source.calls(), (2, 0));
        assert!(proxy.cache.lock().is_empty());
    }

    #[tokio::test]
    async fn test_expired_entry_is_refetched() {
        let proxy = proxy(FakeSource::default());
        proxy.get_by_city_id(42).await.unwrap();

        // Age only the id key; the name key stays fresh.
        let long_ago = DateTime::from_timestamp(0, 0).unwrap();
        proxy
            .cache
            .lock()
            .put_at(WeatherKey::Id(42), json!({"stale": true}), long_ago);

        proxy.get_by_city_name("Paris", "FR").await.unwrap();
        assert_eq!(proxy.source.calls(), (1, 0));

        let refreshed = proxy.get_by_city_id(42).await.unwrap();
        assert_eq!(refreshed["id"], 42);
        assert_eq!(proxy.source.calls(), (2, 0));
    }
}
