//! Location Cache Port
//!
//! Defines the interface for memoizing resolved locations per client address.

use crate::domain::entities::ResolvedLocation;

/// Short-lived cache of resolved locations keyed by the raw address string.
///
/// Entries expire a fixed TTL after insertion, regardless of how often they
/// are read. An implementation must never return an expired entry.
pub trait LocationCache: Send + Sync {
    /// Get a live entry, if one exists.
    fn get(&self, key: &str) -> Option<ResolvedLocation>;

    /// Store or replace the entry for `key`, restarting its TTL.
    fn insert(&self, key: String, value: ResolvedLocation);

    /// Remove every expired entry, returning how many were dropped.
    fn purge_expired(&self) -> usize;

    /// Drop all entries.
    fn clear(&self);

    /// Number of stored entries (expired entries not yet purged included).
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
