//! Route resolution caching
//!
//! Each published table snapshot owns its own cache, so registering or
//! unregistering a route starts over with an empty cache and stale results
//! can never be served.

use crate::{trace_log, RouteMatch};
use lru::LruCache;
use std::num::NonZeroUsize;

/// Cache performance statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// LRU cache of resolved paths, including paths that matched nothing
#[derive(Debug)]
pub struct ResolveCache {
    entries: LruCache<String, Option<RouteMatch>>,
    stats: CacheStats,
}

impl ResolveCache {
    /// Returns `None` for a zero capacity, which disables caching
    pub fn with_capacity(capacity: usize) -> Option<Self> {
        let cap = NonZeroUsize::new(capacity)?;
        Some(Self {
            entries: LruCache::new(cap),
            stats: CacheStats::default(),
        })
    }

    /// Outer `None` is a miss; `Some(None)` is a cached no-match
    pub fn get(&mut self, path: &str) -> Option<Option<RouteMatch>> {
        if let Some(entry) = self.entries.get(path) {
            self.stats.hits += 1;
            trace_log!("Resolve cache hit for path: '{}'", path);
            Some(entry.clone())
        } else {
            self.stats.misses += 1;
            trace_log!("Resolve cache miss for path: '{}'", path);
            None
        }
    }

    pub fn insert(&mut self, path: String, resolved: Option<RouteMatch>) {
        self.entries.push(path, resolved);
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.entries.cap().get()
    }
}
