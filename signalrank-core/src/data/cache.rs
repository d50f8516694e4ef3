//! Snapshot cache — read-through, write-once-per-key.
//!
//! Shared by all scoring workers for the duration of a batch run so
//! predictions on the same (asset, timestamp, lookback) reuse one fetch.
//! Fetch failures are cached too: every prediction sharing a key degrades
//! identically instead of re-hitting a failing source.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::provider::{DataError, Lookback, MarketDataProvider};
use super::resolver::AssetInfo;
use crate::domain::MarketSnapshot;

/// Cache key: one snapshot per (canonical asset, as-of timestamp, lookback).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SnapshotKey {
    pub canonical: String,
    pub as_of: DateTime<Utc>,
    pub lookback: Lookback,
}

impl SnapshotKey {
    pub fn new(asset: &AssetInfo, as_of: DateTime<Utc>, lookback: Lookback) -> Self {
        Self {
            canonical: asset.canonical.clone(),
            as_of,
            lookback,
        }
    }
}

type CachedFetch = Arc<Result<MarketSnapshot, DataError>>;

/// Read-through snapshot cache.
///
/// Entries are written once per key; a concurrent duplicate fetch loses the
/// race and its result is discarded, which keeps reads consistent without
/// holding the lock across provider calls.
#[derive(Debug, Default)]
pub struct SnapshotCache {
    inner: Mutex<HashMap<SnapshotKey, CachedFetch>>,
}

impl SnapshotCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a key without fetching.
    pub fn get(&self, key: &SnapshotKey) -> Option<CachedFetch> {
        self.inner.lock().expect("snapshot cache poisoned").get(key).cloned()
    }

    /// Fetch through the provider unless the key is already present.
    pub fn get_or_fetch(
        &self,
        provider: &dyn MarketDataProvider,
        asset: &AssetInfo,
        as_of: DateTime<Utc>,
        lookback: Lookback,
    ) -> CachedFetch {
        let key = SnapshotKey::new(asset, as_of, lookback);

        if let Some(hit) = self.get(&key) {
            return hit;
        }

        // Provider call happens outside the lock.
        let fetched = Arc::new(provider.fetch(asset, as_of, lookback));

        let mut map = self.inner.lock().expect("snapshot cache poisoned");
        map.entry(key).or_insert(fetched).clone()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().expect("snapshot cache poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
