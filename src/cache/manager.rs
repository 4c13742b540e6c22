//! Cache manager holding API responses in memory
//!
//! Provides a `CacheManager` that stores values under structural keys with
//! expiry timestamps taken from an injected clock.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard};

use super::Clock;

/// A stored value with its freshness window
#[derive(Debug, Clone)]
struct CacheEntry<V> {
    /// The cached data
    data: V,
    /// When the data was cached
    cached_at: DateTime<Utc>,
    /// When the cache entry expires
    expires_at: DateTime<Utc>,
}

/// Result of reading from cache, including metadata about cache freshness
#[derive(Debug, Clone)]
pub struct CachedData<V> {
    /// The cached data
    pub data: V,
    /// When the data was originally cached
    pub cached_at: DateTime<Utc>,
    /// Whether the cache entry has expired
    pub is_expired: bool,
}

/// Manages reading and writing cached values in memory
///
/// Entries are replaced whole on write, so a reader observes either a complete
/// entry or none at all. Expired entries are still returned (with
/// `is_expired = true`) until they are overwritten or purged.
#[derive(Debug)]
pub struct CacheManager<K, V> {
    entries: Mutex<HashMap<K, CacheEntry<V>>>,
    clock: Arc<dyn Clock>,
}

impl<K, V> CacheManager<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    /// Creates an empty cache driven by a custom clock
    ///
    /// Useful for testing expiry without waiting on wall time.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            clock,
        }
    }

    /// Locks the entry map, recovering the data if a previous holder panicked
    fn lock(&self) -> MutexGuard<'_, HashMap<K, CacheEntry<V>>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Writes a value to the cache with a TTL in seconds
    ///
    /// Any existing entry for `key` is replaced.
    pub fn write(&self, key: K, data: V, ttl_seconds: u64) {
        let now = self.clock.now();
        let entry = CacheEntry {
            data,
            cached_at: now,
            expires_at: expiry_after(now, ttl_seconds),
        };

        self.lock().insert(key, entry);
    }

    /// Reads a value from the cache
    ///
    /// Returns `None` if no entry exists for `key`. An entry is expired once the
    /// current time passes its `expires_at`.
    pub fn read(&self, key: &K) -> Option<CachedData<V>> {
        let now = self.clock.now();
        let entries = self.lock();
        let entry = entries.get(key)?;

        Some(CachedData {
            data: entry.data.clone(),
            cached_at: entry.cached_at,
            is_expired: now > entry.expires_at,
        })
    }

    /// Reads a value only if it is still fresh
    pub fn read_fresh(&self, key: &K) -> Option<V> {
        self.read(key)
            .filter(|cached| !cached.is_expired)
            .map(|cached| cached.data)
    }

    /// Drops every expired entry, returning how many were removed
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|_, entry| now <= entry.expires_at);
        before - entries.len()
    }

    /// Removes all entries
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Number of stored entries, fresh or expired
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

/// Computes `now + ttl_seconds`, saturating at the latest representable time
fn expiry_after(now: DateTime<Utc>, ttl_seconds: u64) -> DateTime<Utc> {
    i64::try_from(ttl_seconds)
        .ok()
        .and_then(Duration::try_seconds)
        .and_then(|ttl| now.checked_add_signed(ttl))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
