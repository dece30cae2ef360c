//! The read-through cache implementation.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::{Duration, Instant};

use tracing::trace;

/// Default time-to-live for cached entries: one hour.
pub const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60);

struct Entry<V> {
    value: V,
    stored_at: Instant,
}

impl<V> Entry<V> {
    fn is_expired(&self, ttl: Duration) -> bool {
        self.stored_at.elapsed() >= ttl
    }
}

/// Read-through cache keyed by string, holding cloneable values.
///
/// Thread-safe via RwLock. The lock is never held across a loader await:
/// a miss drops the lock, runs the loader, then reacquires it to publish
/// the result.
pub struct ReadThroughCache<V> {
    entries: RwLock<HashMap<String, Entry<V>>>,
    ttl: Duration,
}

impl<V: Clone> ReadThroughCache<V> {
    /// Create a cache with the given entry TTL.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Create a cache with [`DEFAULT_TTL`].
    pub fn with_default_ttl() -> Self {
        Self::new(DEFAULT_TTL)
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Entry<V>>> {
        // A panicking reader cannot leave the map inconsistent; recover
        // rather than poisoning every later call.
        match self.entries.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Entry<V>>> {
        match self.entries.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Get a fresh cached value, if one exists.
    pub fn get(&self, key: &str) -> Option<V> {
        let entries = self.read();
        match entries.get(key) {
            Some(entry) if !entry.is_expired(self.ttl) => Some(entry.value.clone()),
            _ => None,
        }
    }

    /// Get the cached value for `key`, or run `loader` and cache its result.
    ///
    /// A loader failure propagates unchanged and caches nothing. Concurrent
    /// callers may each run their own loader; the last to finish wins.
    pub async fn get_or_load<F, Fut, E>(&self, key: &str, loader: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(key) {
            trace!(key, "cache hit");
            return Ok(value);
        }

        trace!(key, "cache miss, loading");
        let value = loader().await?;

        let mut entries = self.write();
        entries.insert(
            key.to_string(),
            Entry {
                value: value.clone(),
                stored_at: Instant::now(),
            },
        );

        Ok(value)
    }

    /// Drop the entry for `key`, if any.
    ///
    /// Mutation paths call this before their repopulating read, so no
    /// reader can be served the pre-mutation value after the writer has
    /// published a fresh one.
    pub fn invalidate(&self, key: &str) {
        let mut entries = self.write();
        if entries.remove(key).is_some() {
            trace!(key, "cache entry invalidated");
        }
    }

    /// Number of entries, including not-yet-collected expired ones.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }
}
