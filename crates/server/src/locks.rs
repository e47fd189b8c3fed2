//! Keyed mutation serialization.
//!
//! Concurrent mutations against the same parent are serialized through a
//! keyed async mutex so position assignment and quota checks read a stable
//! count. Mutations against different parents proceed in parallel. The same
//! table shape, keyed by object key, serializes blob release against
//! concurrent inserts of identical content.

use dashmap::DashMap;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

/// Keyed async locks, one per key with in-flight work.
pub struct KeyedLocks<K> {
    locks: Arc<DashMap<K, Arc<Mutex<()>>>>,
}

/// Per-parent mutation locks.
pub type ParentLocks = KeyedLocks<Uuid>;

/// Per-object-key blob locks, held across put/register and release.
pub type BlobLocks = KeyedLocks<String>;

impl<K> Clone for KeyedLocks<K> {
    fn clone(&self) -> Self {
        Self {
            locks: self.locks.clone(),
        }
    }
}

impl<K: Eq + Hash> Default for KeyedLocks<K> {
    fn default() -> Self {
        Self {
            locks: Arc::new(DashMap::new()),
        }
    }
}

impl<K: Eq + Hash + Clone + Send + Sync + 'static> KeyedLocks<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock for a key, waiting behind any in-flight holder.
    ///
    /// The guard is owned so it can be held across await points for the
    /// whole critical section.
    pub async fn acquire(&self, key: K) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .entry(key)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        lock.lock_owned().await
    }

    /// Drop lock entries no task currently holds or waits on.
    ///
    /// An entry is uncontended when the map holds the only Arc reference;
    /// a later acquire simply recreates it.
    pub fn sweep(&self) {
        self.locks.retain(|_, lock| Arc::strong_count(lock) > 1);
    }

    /// Number of tracked locks (for tests and diagnostics).
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

/// Spawn a background task that periodically sweeps idle lock entries.
pub fn spawn_sweep_task<K: Eq + Hash + Clone + Send + Sync + 'static>(
    locks: KeyedLocks<K>,
    interval: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // First tick fires immediately; skip it so a fresh server does no work
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let before = locks.len();
            locks.sweep();
            let after = locks.len();
            if before != after {
                tracing::debug!(removed = before - after, "swept idle locks");
            }
        }
    })
}
