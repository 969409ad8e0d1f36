//! Route table: registration, ranking and resolution
//!
//! The table keeps registered patterns in registration order and publishes an
//! immutable, ranked [`Snapshot`] after every change. Readers clone the
//! current snapshot's `Arc` and match without holding any lock, so a resolve
//! running during a hot reload sees either the whole old table or the whole
//! new one. The optional resolve cache is only ever `try_lock`ed; a reader
//! that finds it busy matches without it instead of waiting.

use crate::error::ParseError;
use crate::matcher::{first_fuzzy_match, first_match};
use crate::options::MatchOptions;
use crate::params::RouteParams;
use crate::path::InputPath;
use crate::pattern::Pattern;
use crate::rank::{self, RankEntry};
use crate::{debug_log, trace_log, warn_log, RouteMatch};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

#[cfg(feature = "cache")]
use crate::cache::{CacheStats, ResolveCache};
#[cfg(feature = "cache")]
use std::sync::{MutexGuard, TryLockError};

/// An immutable, ranked view of a route table
#[derive(Debug)]
pub struct Snapshot {
    patterns: Vec<Arc<Pattern>>,
    options: Arc<MatchOptions>,
    generation: u64,
    #[cfg(feature = "cache")]
    cache: Option<Mutex<ResolveCache>>,
}

impl Snapshot {
    /// Rank `patterns`, given in registration order
    fn build(mut patterns: Vec<Arc<Pattern>>, options: Arc<MatchOptions>, generation: u64) -> Self {
        rank::sort(&mut patterns);
        Self {
            #[cfg(feature = "cache")]
            cache: ResolveCache::with_capacity(options.get_cache_capacity()).map(Mutex::new),
            patterns,
            options,
            generation,
        }
    }

    /// Patterns in rank order
    pub fn patterns(&self) -> &[Arc<Pattern>] {
        &self.patterns
    }

    /// Number of table changes before this snapshot was published
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Arc<Pattern>> {
        self.patterns.iter().find(|p| p.id() == id)
    }

    /// Resolve a path to the first matching pattern in rank order
    pub fn resolve(&self, path: &str) -> Option<RouteMatch> {
        if let Some(cached) = self.cache_lookup(path) {
            return cached;
        }

        let resolved = self.resolve_with(path, first_match);
        self.cache_store(path, &resolved);
        resolved
    }

    /// Resolve a path, letting patterns match a leading part of it
    ///
    /// The unmatched tail is returned in [`RouteMatch::remainder`]. Fuzzy
    /// results are not cached.
    pub fn resolve_fuzzy(&self, path: &str) -> Option<RouteMatch> {
        self.resolve_with(path, first_fuzzy_match)
    }

    fn resolve_with(
        &self,
        path: &str,
        find: fn(&[Arc<Pattern>], &InputPath<'_>, &MatchOptions) -> Option<RouteMatch>,
    ) -> Option<RouteMatch> {
        trace_log!("Resolving path: '{}'", path);
        let Some(input) = InputPath::parse(path, &self.options) else {
            trace_log!("Path '{}' is outside the base path", path);
            return None;
        };
        let resolved = find(&self.patterns, &input, &self.options);
        if resolved.is_none() {
            trace_log!("No route matches path: '{}'", path);
        }
        resolved
    }

    /// Take the cache lock without waiting; a busy cache is skipped
    #[cfg(feature = "cache")]
    fn try_cache(&self) -> Option<MutexGuard<'_, ResolveCache>> {
        match self.cache.as_ref()?.try_lock() {
            Ok(guard) => Some(guard),
            Err(TryLockError::Poisoned(poisoned)) => Some(poisoned.into_inner()),
            Err(TryLockError::WouldBlock) => {
                trace_log!("Resolve cache busy, matching without it");
                None
            }
        }
    }

    #[cfg(feature = "cache")]
    fn cache_lookup(&self, path: &str) -> Option<Option<RouteMatch>> {
        self.try_cache()?.get(path)
    }

    #[cfg(not(feature = "cache"))]
    fn cache_lookup(&self, _path: &str) -> Option<Option<RouteMatch>> {
        None
    }

    #[cfg(feature = "cache")]
    fn cache_store(&self, path: &str, resolved: &Option<RouteMatch>) {
        if let Some(mut cache) = self.try_cache() {
            cache.insert(path.to_string(), resolved.clone());
        }
    }

    #[cfg(not(feature = "cache"))]
    fn cache_store(&self, _path: &str, _resolved: &Option<RouteMatch>) {}

    /// Hit/miss counters of this snapshot's resolve cache
    #[cfg(feature = "cache")]
    pub fn cache_stats(&self) -> Option<CacheStats> {
        let cache = self.cache.as_ref()?;
        Some(cache.lock().unwrap_or_else(PoisonError::into_inner).stats())
    }

    /// Rank order with each pattern's specificity key
    pub fn explain_rank(&self) -> Vec<RankEntry> {
        rank::explain(&self.patterns)
    }
}

#[derive(Debug, Default)]
struct Registry {
    /// Registration order; replacing an id keeps its position
    patterns: Vec<Arc<Pattern>>,
    generation: u64,
}

/// A thread-safe, ranked route table
///
/// # Example
///
/// ```
/// use route_pattern::RouteTable;
///
/// let table = RouteTable::new();
/// table.register("/posts/$postId", "post").unwrap();
/// table.register("/posts/new", "new-post").unwrap();
/// table.register("/files/$", "files").unwrap();
///
/// let post = table.resolve("/posts/42").unwrap();
/// assert_eq!(post.pattern_id, "post");
/// assert_eq!(post.params.get("postId"), Some(&"42".to_string()));
///
/// assert_eq!(table.resolve("/posts/new").unwrap().pattern_id, "new-post");
/// assert_eq!(table.resolve("/files/a/b").unwrap().splat.as_deref(), Some("a/b"));
/// assert!(table.resolve("/nowhere").is_none());
/// ```
#[derive(Debug)]
pub struct RouteTable {
    options: Arc<MatchOptions>,
    registry: Mutex<Registry>,
    published: RwLock<Arc<Snapshot>>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::with_options(MatchOptions::default())
    }

    pub fn with_options(options: MatchOptions) -> Self {
        let options = Arc::new(options);
        let empty = Snapshot::build(Vec::new(), Arc::clone(&options), 0);
        Self {
            options,
            registry: Mutex::new(Registry::default()),
            published: RwLock::new(Arc::new(empty)),
        }
    }

    pub fn options(&self) -> &MatchOptions {
        &self.options
    }

    /// Parse `pattern` and register it under `id`
    ///
    /// Re-registering an existing id replaces its pattern. A pattern that
    /// fails to parse leaves the table unchanged.
    pub fn register(&self, pattern: &str, id: impl Into<String>) -> Result<(), ParseError> {
        let pattern = Pattern::parse(pattern, id).map_err(|err| {
            warn_log!("Rejected route pattern: {}", err);
            err
        })?;
        self.register_pattern(pattern);
        Ok(())
    }

    /// Register an already compiled pattern
    pub fn register_pattern(&self, pattern: Pattern) {
        let mut registry = self.lock_registry();

        let normalized = pattern.normalized();
        if let Some(twin) = registry.patterns.iter().find(|p| {
            p.id() != pattern.id()
                && p.is_search_aware() == pattern.is_search_aware()
                && p.normalized() == normalized
        }) {
            warn_log!(
                "Route '{}' has the same pattern as '{}' ({}); '{}' was registered first and wins",
                pattern.id(),
                twin.id(),
                normalized,
                twin.id()
            );
        }

        let pattern = Arc::new(pattern);
        match registry.patterns.iter_mut().find(|p| p.id() == pattern.id()) {
            Some(existing) => {
                debug_log!(
                    "Replacing route '{}': {} -> {}",
                    pattern.id(),
                    existing.source(),
                    pattern.source()
                );
                *existing = pattern;
            }
            None => {
                debug_log!("Registered route '{}' as {}", pattern.id(), pattern.source());
                registry.patterns.push(pattern);
            }
        }

        self.publish(&mut registry);
    }

    /// Remove the route registered under `id`
    ///
    /// Returns `false` if no such route exists.
    pub fn unregister(&self, id: &str) -> bool {
        let mut registry = self.lock_registry();
        let before = registry.patterns.len();
        registry.patterns.retain(|p| p.id() != id);
        if registry.patterns.len() == before {
            return false;
        }

        debug_log!("Unregistered route '{}'", id);
        self.publish(&mut registry);
        true
    }

    /// Resolve a path against the current snapshot
    pub fn resolve(&self, path: &str) -> Option<RouteMatch> {
        self.snapshot().resolve(path)
    }

    /// Fuzzy resolve against the current snapshot, see [`Snapshot::resolve_fuzzy`]
    pub fn resolve_fuzzy(&self, path: &str) -> Option<RouteMatch> {
        self.snapshot().resolve_fuzzy(path)
    }

    /// Current rank order, for diagnostics
    pub fn explain_rank(&self) -> Vec<RankEntry> {
        self.snapshot().explain_rank()
    }

    /// Build a concrete path for the route registered under `id`
    ///
    /// Returns `None` for an unknown id or a missing required param.
    pub fn build_path(&self, id: &str, params: &RouteParams, splat: Option<&str>) -> Option<String> {
        self.snapshot().get(id)?.interpolate(params, splat)
    }

    /// The currently published snapshot
    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.published.read().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.lock_registry().patterns.iter().any(|p| p.id() == id)
    }

    pub fn len(&self) -> usize {
        self.lock_registry().patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock_registry().patterns.is_empty()
    }

    fn lock_registry(&self) -> std::sync::MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Rank the registry off to the side, then swap it in
    fn publish(&self, registry: &mut Registry) {
        registry.generation += 1;
        let snapshot = Snapshot::build(
            registry.patterns.clone(),
            Arc::clone(&self.options),
            registry.generation,
        );
        debug_log!(
            "Publishing route table generation {} with {} routes",
            snapshot.generation(),
            snapshot.len()
        );
        *self.published.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(snapshot);
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_resolve() {
        let table = RouteTable::new();
        table.register("/users", "users").unwrap();
        table.register("/users/$id", "user").unwrap();

        assert_eq!(table.resolve("/users").unwrap().pattern_id, "users");
        let m = table.resolve("/users/7").unwrap();
        assert_eq!(m.pattern_id, "user");
        assert_eq!(m.params.get_as::<u32>("id"), Some(7));
    }

    #[test]
    fn test_parse_error_leaves_table_unchanged() {
        let table = RouteTable::new();
        table.register("/a", "a").unwrap();
        let generation = table.snapshot().generation();

        assert!(matches!(
            table.register("/b/$/c", "b"),
            Err(ParseError::WildcardNotLast { .. })
        ));
        assert_eq!(table.len(), 1);
        assert!(!table.contains("b"));
        assert_eq!(table.snapshot().generation(), generation);
    }

    #[test]
    fn test_replace_keeps_registration_slot() {
        let table = RouteTable::new();
        table.register("/a/$x", "first").unwrap();
        table.register("/a/$y", "second").unwrap();
        assert_eq!(table.resolve("/a/1").unwrap().pattern_id, "first");

        // hot reload of "first" keeps it ahead of "second"
        table.register("/a/$z", "first").unwrap();
        let m = table.resolve("/a/1").unwrap();
        assert_eq!(m.pattern_id, "first");
        assert_eq!(m.params.get("z"), Some(&"1".to_string()));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_unregister() {
        let table = RouteTable::new();
        table.register("/a/b", "static").unwrap();
        table.register("/a/$id", "param").unwrap();
        assert_eq!(table.resolve("/a/b").unwrap().pattern_id, "static");

        assert!(table.unregister("static"));
        assert!(!table.unregister("static"));
        assert_eq!(table.resolve("/a/b").unwrap().pattern_id, "param");
    }

    #[test]
    fn test_old_snapshot_is_unaffected_by_mutation() {
        let table = RouteTable::new();
        table.register("/a", "a").unwrap();
        let before = table.snapshot();

        table.register("/b", "b").unwrap();
        assert!(before.resolve("/b").is_none());
        assert_eq!(before.len(), 1);
        assert!(table.resolve("/b").is_some());
        assert!(table.snapshot().generation() > before.generation());
    }

    #[test]
    fn test_base_path() {
        let table = RouteTable::with_options(MatchOptions::new().base_path("/app"));
        table.register("/", "home").unwrap();
        table.register("/settings", "settings").unwrap();

        assert_eq!(table.resolve("/app").unwrap().pattern_id, "home");
        assert_eq!(table.resolve("/app/settings").unwrap().pattern_id, "settings");
        assert!(table.resolve("/settings").is_none());
    }

    #[test]
    fn test_build_path() {
        let table = RouteTable::new();
        table.register("/posts/$postId", "post").unwrap();
        let params = RouteParams::new().with("postId", "hello world");
        assert_eq!(
            table.build_path("post", &params, None).as_deref(),
            Some("/posts/hello%20world")
        );
        assert_eq!(table.build_path("missing", &params, None), None);
    }

    #[test]
    fn test_explain_rank() {
        let table = RouteTable::new();
        table.register("/$", "splat").unwrap();
        table.register("/about", "about").unwrap();
        let ids: Vec<String> = table.explain_rank().into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["about", "splat"]);
    }

    #[cfg(feature = "cache")]
    #[test]
    fn test_cache_is_per_snapshot() {
        let table = RouteTable::new();
        table.register("/a/$id", "a").unwrap();
        table.resolve("/a/1");
        table.resolve("/a/1");
        let stats = table.snapshot().cache_stats().unwrap();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);

        table.register("/a/1", "exact").unwrap();
        assert_eq!(table.resolve("/a/1").unwrap().pattern_id, "exact");
        assert_eq!(table.snapshot().cache_stats().unwrap().hits, 0);
    }

    #[cfg(feature = "cache")]
    #[test]
    fn test_zero_capacity_has_no_cache() {
        let table = RouteTable::with_options(MatchOptions::new().cache_capacity(0));
        table.register("/a", "a").unwrap();
        assert!(table.resolve("/a").is_some());
        assert!(table.snapshot().cache_stats().is_none());
    }

    #[cfg(feature = "cache")]
    #[test]
    fn test_resolve_does_not_wait_for_busy_cache() {
        let table = RouteTable::new();
        table.register("/a/$id", "a").unwrap();
        let snapshot = table.snapshot();

        let held = snapshot.cache.as_ref().unwrap().lock().unwrap();
        std::thread::scope(|scope| {
            let reader = scope.spawn(|| snapshot.resolve("/a/1"));
            let resolved = reader.join().unwrap();
            assert_eq!(resolved.unwrap().params.get("id"), Some(&"1".to_string()));
        });
        assert_eq!(held.stats().hits + held.stats().misses, 0);
        assert!(held.is_empty());
        drop(held);

        snapshot.resolve("/a/1");
        assert_eq!(snapshot.cache_stats().unwrap().misses, 1);
    }

    #[test]
    fn test_resolve_fuzzy() {
        let table = RouteTable::new();
        table.register("/", "root").unwrap();
        table.register("/posts", "posts").unwrap();
        table.register("/posts/$postId", "post").unwrap();

        let m = table.resolve_fuzzy("/posts/7/comments/3").unwrap();
        assert_eq!(m.pattern_id, "post");
        assert_eq!(m.params.get("postId"), Some(&"7".to_string()));
        assert_eq!(m.remainder.as_deref(), Some("comments/3"));

        let exact = table.resolve_fuzzy("/posts").unwrap();
        assert_eq!(exact.pattern_id, "posts");
        assert_eq!(exact.remainder, None);

        // the root pattern only matches the root
        assert!(table.resolve_fuzzy("/other").is_none());
        assert!(table.resolve("/posts/7/comments/3").is_none());
    }

    #[test]
    fn test_table_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RouteTable>();
        assert_send_sync::<Arc<Snapshot>>();
    }
}
