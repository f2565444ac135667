//! Memo table for solved state values.
//!
//! Values are keyed by `(score_mover, score_other, pending)`. The mover is
//! left out of the key: both players play the same game from their own
//! seat, so the value of a position does not depend on who holds it.
//!
//! Every key owns a once-cell. The map lock is only held while finding or
//! inserting the cell, never while computing, so recursive evaluation can
//! re-enter the cache freely and concurrent callers asking for the same
//! key block on the cell until the first one finishes.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::game::{GameState, Goal};

/// Canonical cache key: a state without its mover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StateKey {
    /// Banked score of the mover.
    pub score_mover: u32,
    /// Banked score of the opponent.
    pub score_other: u32,
    /// Points pending this turn.
    pub pending: u32,
}

impl From<&GameState> for StateKey {
    fn from(state: &GameState) -> Self {
        Self {
            score_mover: state.score_mover,
            score_other: state.score_other,
            pending: state.pending,
        }
    }
}

/// Counters describing cache use.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Number of keys stored.
    pub entries: usize,
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups that had to compute.
    pub misses: u64,
}

/// Thread-safe, goal-bound memo of state values.
#[derive(Debug)]
pub struct ValueCache {
    goal: Goal,
    entries: RwLock<FxHashMap<StateKey, Arc<OnceLock<f64>>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ValueCache {
    /// Create an empty cache for `goal`.
    pub fn new(goal: Goal) -> Self {
        Self {
            goal,
            entries: RwLock::new(FxHashMap::default()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// The goal this cache was built for.
    pub fn goal(&self) -> Goal {
        self.goal
    }

    /// Look up a finished value.
    pub fn get(&self, key: &StateKey) -> Option<f64> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.get(key).and_then(|cell| cell.get().copied())
    }

    /// Look up a finished value, counting a hit when found.
    pub fn lookup(&self, key: &StateKey) -> Option<f64> {
        let value = self.get(key);
        if value.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
        }
        value
    }

    /// Return the cached value for `key`, running `compute` at most once
    /// per key across all threads.
    pub fn get_or_compute<F>(&self, key: StateKey, compute: F) -> f64
    where
        F: FnOnce() -> f64,
    {
        let cell = self.cell(key);

        if let Some(&value) = cell.get() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return value;
        }

        *cell.get_or_init(|| {
            self.misses.fetch_add(1, Ordering::Relaxed);
            compute()
        })
    }

    fn cell(&self, key: StateKey) -> Arc<OnceLock<f64>> {
        {
            let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(cell) = entries.get(&key) {
                return Arc::clone(cell);
            }
        }

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(entries.entry(key).or_default())
    }

    /// Number of keys stored.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether nothing has been stored yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check if a finished value exists for `key`.
    pub fn contains(&self, key: &StateKey) -> bool {
        self.get(key).is_some()
    }

    /// Current counters.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    /// Make room for at least `additional` more keys.
    pub fn reserve(&self, additional: usize) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .reserve(additional);
    }

    /// Get total memory usage estimate in bytes.
    pub fn memory_usage(&self) -> usize {
        let per_entry = std::mem::size_of::<StateKey>()
            + std::mem::size_of::<Arc<OnceLock<f64>>>()
            + std::mem::size_of::<OnceLock<f64>>()
            + 2 * std::mem::size_of::<usize>();
        self.len() * per_entry
    }
}
