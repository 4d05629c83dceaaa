//! Time-based cache with TTL (Time To Live) support.
//!
//! Each entry stores an absolute expiration instant computed from the TTL in
//! effect when it was written. Changing the TTL later only affects new writes.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

/// A cache entry with its absolute deadline.
///
/// `None` means the TTL pushed the deadline past what `Instant` can represent,
/// so the entry never expires.
#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    expires_at: Option<Instant>,
}

impl<V> CacheEntry<V> {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|deadline| now > deadline)
    }
}

struct Inner<K, V> {
    entries: HashMap<K, CacheEntry<V>>,
    ttl: Duration,
}

/// Result of a non-evicting cache read.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<V> {
    /// Present and within its deadline
    Fresh(V),
    /// Present but past its deadline
    Stale(V),
    /// Never written, deleted, or already evicted
    Missing,
}

impl<V> Lookup<V> {
    /// The value regardless of freshness.
    pub fn into_value(self) -> Option<V> {
        match self {
            Lookup::Fresh(v) | Lookup::Stale(v) => Some(v),
            Lookup::Missing => None,
        }
    }

    pub fn is_fresh(&self) -> bool {
        matches!(self, Lookup::Fresh(_))
    }
}

/// A thread-safe cache with time-based expiration.
///
/// Readers share the lock; writers (including lazy eviction from `get`) take it
/// exclusively. The cache can be cloned cheaply and every clone shares the same
/// entries and TTL setting.
///
/// For large values, wrap them in `Arc` so reads only bump a refcount.
#[derive(Clone)]
pub struct TtlCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    inner: Arc<RwLock<Inner<K, V>>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Create a new cache whose entries live for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner {
                entries: HashMap::new(),
                ttl,
            })),
        }
    }

    /// Store a value, replacing any existing entry for the key.
    ///
    /// The deadline is `now + ttl` using the TTL in effect at this call.
    pub fn set(&self, key: K, value: V) {
        if let Ok(mut inner) = self.inner.write() {
            let expires_at = Instant::now().checked_add(inner.ttl);
            inner.entries.insert(key, CacheEntry { value, expires_at });
        }
    }

    /// Get a value if it exists and hasn't expired.
    ///
    /// An expired entry is removed before returning `None`.
    pub fn get(&self, key: &K) -> Option<V> {
        let now = Instant::now();

        {
            let inner = self.inner.read().ok()?;
            match inner.entries.get(key) {
                None => return None,
                Some(entry) if !entry.is_expired(now) => return Some(entry.value.clone()),
                Some(_) => {}
            }
        }

        // Another writer may have refreshed the key between the two locks.
        if let Ok(mut inner) = self.inner.write() {
            let now = Instant::now();
            match inner.entries.get(key) {
                Some(entry) if !entry.is_expired(now) => return Some(entry.value.clone()),
                Some(_) => {
                    inner.entries.remove(key);
                }
                None => {}
            }
        }

        None
    }

    /// Read an entry without evicting it, reporting whether it is still fresh.
    pub fn lookup(&self, key: &K) -> Lookup<V> {
        let now = Instant::now();

        let Ok(inner) = self.inner.read() else {
            return Lookup::Missing;
        };

        match inner.entries.get(key) {
            Some(entry) if entry.is_expired(now) => Lookup::Stale(entry.value.clone()),
            Some(entry) => Lookup::Fresh(entry.value.clone()),
            None => Lookup::Missing,
        }
    }

    /// Remove a specific key from the cache. No-op if absent.
    pub fn delete(&self, key: &K) {
        if let Ok(mut inner) = self.inner.write() {
            inner.entries.remove(key);
        }
    }

    /// Replace the TTL used by subsequent `set` calls.
    ///
    /// Deadlines of entries already stored are left untouched.
    pub fn set_ttl(&self, ttl: Duration) {
        if let Ok(mut inner) = self.inner.write() {
            inner.ttl = ttl;
        }
    }

    /// Get the TTL currently applied to new entries.
    pub fn ttl(&self) -> Duration {
        self.inner
            .read()
            .map(|inner| inner.ttl)
            .unwrap_or_default()
    }

    /// Clear all entries from the cache.
    pub fn clear(&self) {
        if let Ok(mut inner) = self.inner.write() {
            inner.entries.clear();
        }
    }

    /// Remove all expired entries, returning how many were dropped.
    ///
    /// Not required for correctness: `get` never returns an expired value.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();

        if let Ok(mut inner) = self.inner.write() {
            let before = inner.entries.len();
            inner.entries.retain(|_, entry| !entry.is_expired(now));
            before - inner.entries.len()
        } else {
            0
        }
    }

    /// Get the number of entries in the cache (including expired ones).
    pub fn len(&self) -> usize {
        self.inner
            .read()
            .map(|inner| inner.entries.len())
            .unwrap_or(0)
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K, V> std::fmt::Debug for TtlCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtlCache")
            .field("ttl", &self.ttl())
            .field("entries", &self.len())
            .finish()
    }
}
