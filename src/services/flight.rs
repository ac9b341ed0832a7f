// src/services/flight.rs
//
// Per-key fetch coalescing.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex};

use tokio::sync::Mutex as AsyncMutex;

/// Hands out one async lock per key so concurrent cache misses on the
/// same key collapse into a single remote fetch.
///
/// Protocol: take the key's lock, re-check the store, and only fetch
/// when the re-check still comes up empty. Whoever loses the race
/// finds the store populated and returns without touching the network.
pub struct FlightGroup<K> {
    locks: Mutex<HashMap<K, Arc<AsyncMutex<()>>>>,
}

impl<K> FlightGroup<K>
where
    K: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self {
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// The lock guarding fetches for `key`.
    pub fn lock_for(&self, key: &K) -> Arc<AsyncMutex<()>> {
        let mut locks = self.locks.lock().unwrap();
        locks
            .entry(key.clone())
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone()
    }

    /// Forget the lock for `key` if nobody else holds it. Callers drop
    /// their handle first, then prune; a key with waiters stays put.
    pub fn prune(&self, key: &K) {
        let mut locks = self.locks.lock().unwrap();
        if let Some(lock) = locks.get(key) {
            if Arc::strong_count(lock) == 1 {
                locks.remove(key);
            }
        }
    }
}

impl<K> Default for FlightGroup<K>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}
