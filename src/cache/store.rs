// Timed cache store.
// Keeps values with their capture time and hands them out only while fresh.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default expiration window for weather payloads: 60 minutes.
pub const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60);

/// Wrapper for cached data with its capture timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedData<T> {
    /// The cached data.
    pub data: T,
    /// When the data was cached.
    pub cached_at: DateTime<Utc>,
}

impl<T> CachedData<T> {
    /// Create a cached data entry stamped with the given time.
    pub fn at(data: T, cached_at: DateTime<Utc>) -> Self {
        Self { data, cached_at }
    }

    /// Age of the entry at `now`. Entries stamped in the future have age zero.
    pub fn age_at(&self, now: DateTime<Utc>) -> Duration {
        now.signed_duration_since(self.cached_at)
            .to_std()
            .unwrap_or(Duration::ZERO)
    }

    /// Fresh iff `now - cached_at <= max_age`; the boundary itself is fresh.
    pub fn is_fresh_at(&self, max_age: Duration, now: DateTime<Utc>) -> bool {
        self.age_at(now) <= max_age
    }
}

/// Key/value store where every value remembers when it was written.
///
/// Stale entries are never removed, only ignored until overwritten.
/// Growth is unbounded.
#[derive(Debug, Clone)]
pub struct TimedCache<K, V> {
    entries: HashMap<K, CachedData<V>>,
}

impl<K, V> Default for TimedCache<K, V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash, V> TimedCache<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value stamped with the current time, superseding any previous entry.
    pub fn put(&mut self, key: K, value: V) {
        self.put_at(key, value, Utc::now());
    }

    /// Store a value stamped with the given time.
    pub fn put_at(&mut self, key: K, value: V, at: DateTime<Utc>) {
        self.entries.insert(key, CachedData::at(value, at));
    }

    /// Get the value for `key` if it is no older than `max_age`.
    pub fn get_fresh(&self, key: &K, max_age: Duration) -> Option<&V> {
        self.get_fresh_at(key, max_age, Utc::now())
    }

    /// Get the value for `key` if it is no older than `max_age` at `now`.
    pub fn get_fresh_at(&self, key: &K, max_age: Duration, now: DateTime<Utc>) -> Option<&V> {
        self.entries
            .get(key)
            .filter(|cached| cached.is_fresh_at(max_age, now))
            .map(|cached| &cached.data)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
