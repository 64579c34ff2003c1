//! Bounded FIFO response cache with per-entry TTL.
//!
//! [`ResponseCache`] stores fully-buffered refactor responses keyed on a
//! digest of `(provider, model, prompt)`. Streamed completions are
//! intentionally excluded — a stream cannot be captured and replayed
//! without fully buffering it first.
//!
//! # Eviction
//!
//! Two mechanisms, both structural and free of I/O:
//!
//! - **Capacity**: inserting a new key when the store is full evicts the
//!   single oldest-inserted surviving entry first (strict FIFO, not
//!   recency-based). Re-inserting an existing key refreshes its payload and
//!   age but keeps its original insertion-order slot (first-write order).
//! - **TTL**: expiry is checked lazily on access; [`ResponseCache::get`]
//!   removes an entry older than the TTL and reports a miss.
//!
//! # Enabled toggle
//!
//! Disabling the cache makes reads always miss and writes silent no-ops
//! without clearing existing entries. Re-enabling can therefore surface old
//! content, which is safe: `get` always checks age, so anything stale is
//! still evicted on first touch.
//!
//! All operations go through a single mutex. The store is small and every
//! critical section is a few map/queue operations, so contention is not a
//! concern at this scale.

use std::collections::hash_map::DefaultHasher;
use std::collections::{HashMap, VecDeque};
use std::hash::{Hash, Hasher};
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use serde_json::Value;

use crate::telemetry;

/// Compute a cache key from provider, model, and assembled prompt text.
///
/// Uses `DefaultHasher` (SipHash). The digest is deterministic within a
/// process lifetime, which is sufficient for an in-memory cache; a shared
/// backend would need a stable cross-process hash instead.
pub fn cache_key(provider: &str, model: &str, prompt: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    provider.hash(&mut hasher);
    model.hash(&mut hasher);
    prompt.hash(&mut hasher);
    hasher.finish()
}

/// Snapshot of cache state for `/cache/stats` and `/config`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub enabled: bool,
    pub size: usize,
    pub capacity: usize,
    pub ttl_secs: u64,
}

struct CacheEntry {
    payload: Value,
    created_at: Instant,
}

struct CacheState {
    entries: HashMap<u64, CacheEntry>,
    /// Insertion order, oldest at the front. Kept in lockstep with `entries`.
    order: VecDeque<u64>,
    enabled: bool,
}

/// In-memory store for buffered responses.
///
/// Capacity and TTL are fixed at construction; the enabled flag is the only
/// runtime-mutable setting. Entries are never mutated in place — they are
/// created on insert and destroyed by eviction or [`clear`](Self::clear).
pub struct ResponseCache {
    state: Mutex<CacheState>,
    capacity: usize,
    ttl: Duration,
}

impl ResponseCache {
    /// Create a cache with the given capacity, TTL, and initial enablement.
    pub fn new(capacity: usize, ttl: Duration, enabled: bool) -> Self {
        Self {
            state: Mutex::new(CacheState {
                entries: HashMap::new(),
                order: VecDeque::new(),
                enabled,
            }),
            capacity,
            ttl,
        }
    }

    /// Look up a payload. Misses when disabled, absent, or expired; detecting
    /// expiry removes the entry as a side effect.
    pub fn get(&self, key: u64) -> Option<Value> {
        let mut state = self.lock();
        if !state.enabled {
            return None;
        }

        let expired = match state.entries.get(&key) {
            None => {
                metrics::counter!(telemetry::CACHE_MISSES_TOTAL).increment(1);
                return None;
            }
            Some(entry) => entry.created_at.elapsed() >= self.ttl,
        };

        if expired {
            state.entries.remove(&key);
            state.order.retain(|k| *k != key);
            metrics::counter!(telemetry::CACHE_MISSES_TOTAL).increment(1);
            return None;
        }

        metrics::counter!(telemetry::CACHE_HITS_TOTAL).increment(1);
        state.entries.get(&key).map(|entry| entry.payload.clone())
    }

    /// Insert a payload. No-op when disabled. Inserting a new key at capacity
    /// evicts the oldest-inserted entry first; re-inserting an existing key
    /// refreshes it in place without changing its eviction slot.
    pub fn put(&self, key: u64, payload: Value) {
        let mut state = self.lock();
        if !state.enabled || self.capacity == 0 {
            return;
        }

        if let Some(entry) = state.entries.get_mut(&key) {
            entry.payload = payload;
            entry.created_at = Instant::now();
            return;
        }

        while state.entries.len() >= self.capacity {
            match state.order.pop_front() {
                Some(oldest) => {
                    state.entries.remove(&oldest);
                }
                None => break,
            }
        }

        state.entries.insert(
            key,
            CacheEntry {
                payload,
                created_at: Instant::now(),
            },
        );
        state.order.push_back(key);
    }

    /// Remove every entry, returning how many were removed.
    pub fn clear(&self) -> usize {
        let mut state = self.lock();
        let removed = state.entries.len();
        state.entries.clear();
        state.order.clear();
        removed
    }

    /// Current state snapshot.
    pub fn stats(&self) -> CacheStats {
        let state = self.lock();
        CacheStats {
            enabled: state.enabled,
            size: state.entries.len(),
            capacity: self.capacity,
            ttl_secs: self.ttl.as_secs(),
        }
    }

    /// Toggle read/write behaviour without touching stored entries.
    pub fn set_enabled(&self, enabled: bool) {
        self.lock().enabled = enabled;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, CacheState> {
        // A poisoned mutex only means another request panicked mid-operation;
        // the structural state is still coherent enough to serve from.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
