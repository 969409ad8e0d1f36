//! Matching configuration

/// Options shared by every resolution against a route table
///
/// # Example
///
/// ```
/// use route_pattern::MatchOptions;
///
/// let options = MatchOptions::new()
///     .case_sensitive(true)
///     .base_path("/app/")
///     .cache_capacity(256);
///
/// assert!(options.is_case_sensitive());
/// assert_eq!(options.base_path_segments().collect::<Vec<_>>(), vec!["app"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchOptions {
    case_sensitive: bool,
    base_path: Option<String>,
    cache_capacity: usize,
}

impl MatchOptions {
    /// Default number of resolved paths kept per table snapshot
    pub const DEFAULT_CACHE_CAPACITY: usize = 1000;

    pub fn new() -> Self {
        Self {
            case_sensitive: false,
            base_path: None,
            cache_capacity: Self::DEFAULT_CACHE_CAPACITY,
        }
    }

    /// Compare static text and affixes exactly instead of case-folded
    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    /// Prefix stripped from every input path before matching
    ///
    /// Paths outside the base path never match. `""` and `"/"` clear it.
    pub fn base_path(mut self, base_path: impl Into<String>) -> Self {
        let base_path = base_path.into();
        let trimmed = base_path.trim_matches('/');
        self.base_path = (!trimmed.is_empty()).then(|| format!("/{}", trimmed));
        self
    }

    /// Resolution cache size; `0` disables caching
    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    pub fn get_base_path(&self) -> Option<&str> {
        self.base_path.as_deref()
    }

    pub fn get_cache_capacity(&self) -> usize {
        self.cache_capacity
    }

    /// Non-empty segments of the base path
    pub fn base_path_segments(&self) -> impl Iterator<Item = &str> {
        self.base_path
            .as_deref()
            .unwrap_or("")
            .split('/')
            .filter(|s| !s.is_empty())
    }
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = MatchOptions::default();
        assert!(!options.is_case_sensitive());
        assert_eq!(options.get_base_path(), None);
        assert_eq!(
            options.get_cache_capacity(),
            MatchOptions::DEFAULT_CACHE_CAPACITY
        );
    }

    #[test]
    fn test_base_path_normalization() {
        assert_eq!(
            MatchOptions::new().base_path("app/v1/").get_base_path(),
            Some("/app/v1")
        );
        assert_eq!(MatchOptions::new().base_path("/").get_base_path(), None);
        assert_eq!(MatchOptions::new().base_path("").get_base_path(), None);
    }
}
