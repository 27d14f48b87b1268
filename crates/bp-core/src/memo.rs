//! Per-instance memoization of a pure `&str -> T` function.
//!
//! Each distinct input gets its own once-cell inside a concurrent map, so
//! the wrapped function runs at most once per key even when two threads hit
//! the same key for the first time. Lookups of different keys only contend
//! on the map shard, never on each other's evaluation.

use std::fmt;
use std::sync::{Arc, OnceLock};

use dashmap::DashMap;

/// Memoized evaluator. No eviction: the cache lives as long as the value.
pub struct Memo<T> {
    func: Box<dyn Fn(&str) -> T + Send + Sync>,
    cache: DashMap<String, Arc<OnceLock<T>>>,
}

impl<T: Clone> Memo<T> {
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&str) -> T + Send + Sync + 'static,
    {
        Self {
            func: Box::new(func),
            cache: DashMap::new(),
        }
    }

    /// Evaluate `input`, running the wrapped function only on first sight.
    pub fn call(&self, input: &str) -> T {
        // Clone the cell out so the shard lock is released before evaluation.
        let cell = match self.cache.get(input) {
            Some(cell) => Arc::clone(&cell),
            None => Arc::clone(&self.cache.entry(input.to_owned()).or_default()),
        };
        cell.get_or_init(|| (self.func)(input)).clone()
    }

    /// Number of distinct inputs seen so far.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

impl<T> fmt::Debug for Memo<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memo")
            .field("cache_entries", &self.cache.len())
            .finish_non_exhaustive()
    }
}
