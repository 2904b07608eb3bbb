//! DashMap Location Cache
//!
//! Implements LocationCache using DashMap for lock-free concurrent access.

use crate::domain::entities::{CacheEntry, ResolvedLocation};
use crate::domain::ports::LocationCache;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::Instant;

/// Default lifetime of a cached location: 24 hours from insertion.
pub const DEFAULT_LOCATION_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// DashMap-backed location cache.
///
/// Expiry is checked lazily on every read, so an entry is never served past
/// its TTL even if no sweeper is running. `start_sweeper` only bounds memory.
pub struct DashMapLocationCache {
    entries: DashMap<String, CacheEntry>,
    ttl: Duration,
}

impl DashMapLocationCache {
    /// Create a cache whose entries live for `ttl` after insertion.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    /// Start the background sweeper.
    ///
    /// Removes expired entries every `interval` until a value is received on
    /// (or the sender of) `shutdown` goes away.
    pub fn start_sweeper(
        self: &Arc<Self>,
        interval: Duration,
        mut shutdown: broadcast::Receiver<()>,
    ) -> tokio::task::JoinHandle<()> {
        let cache = Arc::clone(self);

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // First tick completes immediately
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let removed = cache.purge_expired();
                        if removed > 0 {
                            tracing::debug!("location cache sweep removed {} entries", removed);
                        }
                    }
                    _ = shutdown.recv() => {
                        tracing::debug!("location cache sweeper stopped");
                        break;
                    }
                }
            }
        })
    }

    /// Remove `key` only if it still holds the entry stamped `stale_at`.
    ///
    /// A write that lands after the expiry check carries a newer stamp and
    /// survives.
    fn evict_stale(&self, key: &str, stale_at: Instant) -> bool {
        self.entries
            .remove_if(key, |_, entry| entry.inserted_at == stale_at)
            .is_some()
    }
}

impl Default for DashMapLocationCache {
    fn default() -> Self {
        Self::new(DEFAULT_LOCATION_TTL)
    }
}

impl LocationCache for DashMapLocationCache {
    fn get(&self, key: &str) -> Option<ResolvedLocation> {
        let now = Instant::now();
        let stale_at = {
            let entry = self.entries.get(key)?;
            if !entry.is_expired_at(now, self.ttl) {
                return Some(entry.value.clone());
            }
            entry.inserted_at
        };

        if self.evict_stale(key, stale_at) {
            tracing::debug!("location cache entry expired for {}", key);
        }
        None
    }

    fn insert(&self, key: String, value: ResolvedLocation) {
        self.entries.insert(key, CacheEntry::new(value));
    }

    fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut removed = 0;
        self.entries.retain(|_, entry| {
            let keep = !entry.is_expired_at(now, self.ttl);
            if !keep {
                removed += 1;
            }
            keep
        });
        removed
    }

    fn clear(&self) {
        self.entries.clear();
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}
