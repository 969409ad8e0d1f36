//! # route-pattern
//!
//! Route path patterns for file-based and code-based routers:
//!
//! - **Pattern Parsing** - Static text, `$params`, optional `{-$params}`,
//!   wildcards (`$`) and captures with literal prefixes and suffixes
//!   (`user-{$id}.json`, `{$}.txt`)
//! - **Specificity Ranking** - A deterministic total order so the most
//!   specific route always wins, independent of registration order
//! - **Matching** - First-match-wins resolution with percent-decoding,
//!   configurable case policy and base path stripping, plus fuzzy
//!   matching that reports the unmatched remainder
//! - **Hot Reload** - Register and unregister routes while other threads
//!   resolve against a consistent snapshot
//! - **Path Building** - Turn a route id and params back into a path
//!
//! # Quick Start
//!
//! ```
//! use route_pattern::{RouteParams, RouteTable};
//!
//! let table = RouteTable::new();
//! table.register("/", "home").unwrap();
//! table.register("/posts/$postId", "post").unwrap();
//! table.register("/blog/{-$page}", "blog").unwrap();
//! table.register("/a/user-{$id}", "user").unwrap();
//! table.register("/$", "not-found").unwrap();
//!
//! let m = table.resolve("/posts/hello-world").unwrap();
//! assert_eq!(m.pattern_id, "post");
//! assert_eq!(m.params.get("postId"), Some(&"hello-world".to_string()));
//!
//! assert_eq!(table.resolve("/blog").unwrap().pattern_id, "blog");
//! assert_eq!(table.resolve("/blog/2").unwrap().params.get("page"), Some(&"2".to_string()));
//! assert_eq!(table.resolve("/a/user-7").unwrap().pattern_id, "user");
//! assert_eq!(table.resolve("/anything/else").unwrap().pattern_id, "not-found");
//!
//! let path = table.build_path("post", &RouteParams::new().with("postId", "42"), None);
//! assert_eq!(path.as_deref(), Some("/posts/42"));
//! ```
//!
//! # Diagnostics
//!
//! ```
//! use route_pattern::RouteTable;
//!
//! let table = RouteTable::new();
//! table.register("/files/$", "files").unwrap();
//! table.register("/files/list", "list").unwrap();
//!
//! for entry in table.explain_rank() {
//!     println!("{}", entry);
//! }
//! ```
//!
//! # Feature Flags
//!
//! - `log` (default) - Uses the standard `log` crate for logging
//! - `tracing` - Uses the `tracing` crate for structured logging (mutually exclusive with `log`)
//! - `cache` (default) - LRU cache of resolved paths per table snapshot

#![doc(html_root_url = "https://docs.rs/route-pattern/0.1.0")]
#![cfg_attr(docsrs, feature(doc_cfg))]
// Lints are configured in Cargo.toml [lints] section

// Logging abstraction
pub mod logging;

// Cache (optional)
#[cfg(feature = "cache")]
pub mod cache;

// Pattern compilation
pub mod error;
pub mod pattern;
pub mod rank;
pub mod segment;

// Matching and resolution
pub mod matcher;
pub mod options;
pub mod params;
pub mod path;
pub mod table;

// Build tooling support
pub mod codec;

// Re-export main types for convenient access
#[cfg(feature = "cache")]
pub use cache::{CacheStats, ResolveCache};
pub use error::{MalformedReason, ParseError};
pub use matcher::{first_fuzzy_match, first_match, match_pattern, match_pattern_fuzzy};
pub use options::MatchOptions;
pub use params::RouteParams;
pub use path::{InputPath, InputSegment};
pub use pattern::{compile, Pattern};
pub use rank::{RankEntry, SegmentRank, SpecificityKey};
pub use segment::{parse, Affix, Segment, SegmentKind};
pub use table::{RouteTable, Snapshot};

/// Result of resolving a path against a route table
///
/// Contains the id of the matched pattern along with the extracted params
/// and the wildcard remainder, if the pattern has one.
///
/// # Example
///
/// ```
/// use route_pattern::RouteMatch;
///
/// let route_match = RouteMatch::new("user")
///     .with_param("id", "123");
///
/// assert_eq!(route_match.params.get("id"), Some(&"123".to_string()));
/// assert_eq!(route_match.splat, None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    /// Id the matched pattern was registered under
    pub pattern_id: String,
    /// Named captures; absent optional params are not present
    pub params: RouteParams,
    /// Text captured by a wildcard, `/`-joined and percent-decoded
    pub splat: Option<String>,
    /// Input left over by a fuzzy match, `/`-joined and percent-decoded
    pub remainder: Option<String>,
}

impl RouteMatch {
    /// Create a match for the given pattern id, with no captures
    #[must_use]
    pub fn new(pattern_id: impl Into<String>) -> Self {
        Self {
            pattern_id: pattern_id.into(),
            params: RouteParams::new(),
            splat: None,
            remainder: None,
        }
    }

    /// Add a route parameter to the match.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Set the wildcard capture.
    #[must_use]
    pub fn with_splat(mut self, splat: impl Into<String>) -> Self {
        self.splat = Some(splat.into());
        self
    }
}
