//! Specificity ranking
//!
//! Route tables are tried in rank order and the first full match wins, so the
//! order decides which route a path resolves to. Ranking compares two
//! patterns segment by segment:
//!
//! 1. Search-aware patterns come first.
//! 2. At the first position where the segment ranks differ, the more specific
//!    segment wins: static > index > optional param > param >
//!    affixed wildcard > wildcard. Within one kind, captures with literal
//!    affixes beat bare ones (prefix and suffix > prefix > suffix), and longer
//!    affixes beat shorter ones.
//! 3. Where a pattern ends, it is compared as if it ended in an index
//!    segment: `/files` beats `/files/$` and `/files/{-$page}`, while
//!    `/files/list` beats `/files`.
//! 4. Equal keys keep registration order.
//!
//! Keys are computed once per pattern, so a comparison never re-parses.

use crate::pattern::Pattern;
use crate::segment::{Affix, Segment, SegmentKind};
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

impl SegmentKind {
    /// Higher is more specific
    fn specificity(self) -> u8 {
        match self {
            SegmentKind::Static => 6,
            SegmentKind::Index => 5,
            SegmentKind::OptionalParam => 4,
            SegmentKind::Param => 3,
            SegmentKind::AffixedWildcard => 2,
            SegmentKind::Wildcard => 1,
        }
    }

    fn label(self) -> &'static str {
        match self {
            SegmentKind::Static => "static",
            SegmentKind::Index => "index",
            SegmentKind::OptionalParam => "optional",
            SegmentKind::Param => "param",
            SegmentKind::AffixedWildcard => "affixed-wildcard",
            SegmentKind::Wildcard => "wildcard",
        }
    }
}

/// Weight of the literal text around a capture, compared field by field
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct AffixWeight {
    /// 3 = prefix and suffix, 2 = prefix, 1 = suffix, 0 = none
    presence: u8,
    prefix_len: usize,
    suffix_len: usize,
}

impl AffixWeight {
    fn of(affix: &Affix) -> Self {
        let presence = match (&affix.prefix, &affix.suffix) {
            (Some(_), Some(_)) => 3,
            (Some(_), None) => 2,
            (None, Some(_)) => 1,
            (None, None) => 0,
        };
        Self {
            presence,
            prefix_len: affix.prefix().chars().count(),
            suffix_len: affix.suffix().chars().count(),
        }
    }
}

/// Rank of one pattern segment
///
/// `Ord` follows match precedence: a rank that compares `Greater` is more
/// specific.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SegmentRank {
    kind: SegmentKind,
    affix: AffixWeight,
}

impl SegmentRank {
    /// Implicit rank of the end of a pattern
    const TERMINAL: Self = Self {
        kind: SegmentKind::Index,
        affix: AffixWeight {
            presence: 0,
            prefix_len: 0,
            suffix_len: 0,
        },
    };

    pub fn of(segment: &Segment) -> Self {
        Self {
            kind: segment.kind(),
            affix: segment.affix().map(AffixWeight::of).unwrap_or_default(),
        }
    }

    pub fn kind(&self) -> SegmentKind {
        self.kind
    }
}

impl Ord for SegmentRank {
    fn cmp(&self, other: &Self) -> Ordering {
        self.kind
            .specificity()
            .cmp(&other.kind.specificity())
            .then_with(|| self.affix.cmp(&other.affix))
    }
}

impl PartialOrd for SegmentRank {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for SegmentRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind.label())?;
        let AffixWeight {
            presence,
            prefix_len,
            suffix_len,
        } = self.affix;
        match presence {
            3 => write!(f, "(prefix {}, suffix {})", prefix_len, suffix_len),
            2 => write!(f, "(prefix {})", prefix_len),
            1 => write!(f, "(suffix {})", suffix_len),
            _ => Ok(()),
        }
    }
}

/// Precomputed ranking key of a compiled pattern
///
/// `Ord` follows table order: the key that compares `Less` is tried first.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SpecificityKey {
    search_aware: bool,
    ranks: Vec<SegmentRank>,
}

impl SpecificityKey {
    pub fn new(segments: &[Segment], search_aware: bool) -> Self {
        Self {
            search_aware,
            ranks: segments.iter().map(SegmentRank::of).collect(),
        }
    }

    pub fn is_search_aware(&self) -> bool {
        self.search_aware
    }

    pub fn ranks(&self) -> &[SegmentRank] {
        &self.ranks
    }
}

impl Ord for SpecificityKey {
    fn cmp(&self, other: &Self) -> Ordering {
        // search-aware first, then more specific segments first
        other
            .search_aware
            .cmp(&self.search_aware)
            .then_with(|| {
                let len = self.ranks.len().max(other.ranks.len());
                (0..len)
                    .map(|i| {
                        let ours = self.ranks.get(i).unwrap_or(&SegmentRank::TERMINAL);
                        let theirs = other.ranks.get(i).unwrap_or(&SegmentRank::TERMINAL);
                        theirs.cmp(ours)
                    })
                    .find(|ord| ord.is_ne())
                    .unwrap_or(Ordering::Equal)
            })
            .then_with(|| other.ranks.len().cmp(&self.ranks.len()))
    }
}

impl PartialOrd for SpecificityKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for SpecificityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        if self.search_aware {
            f.write_str("search; ")?;
        }
        for (i, rank) in self.ranks.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", rank)?;
        }
        f.write_str("]")
    }
}

/// Compare two patterns by table order
pub fn compare(a: &Pattern, b: &Pattern) -> Ordering {
    let ord = a.key().cmp(b.key());
    debug_assert_eq!(
        b.key().cmp(a.key()),
        ord.reverse(),
        "ranking is not antisymmetric for '{}' and '{}'",
        a.source(),
        b.source()
    );
    ord
}

/// Sort patterns into table order
///
/// The sort is stable: patterns with equal keys keep their relative order,
/// so passing patterns in registration order makes registration the final
/// tie-break. Sorting an already sorted slice leaves it unchanged.
pub fn sort(patterns: &mut [Arc<Pattern>]) {
    patterns.sort_by(|a, b| compare(a, b));
    debug_assert!(
        patterns.windows(2).all(|w| compare(&w[0], &w[1]).is_le()),
        "route table is not sorted after ranking"
    );
}

/// One row of [`explain`] output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankEntry {
    /// Zero-based position in the table
    pub rank: usize,
    pub id: String,
    pub source: String,
    pub key: SpecificityKey,
}

impl fmt::Display for RankEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {} ({}) {}", self.rank, self.id, self.source, self.key)
    }
}

/// Describe a ranked table, in order, for diagnostics
pub fn explain(patterns: &[Arc<Pattern>]) -> Vec<RankEntry> {
    patterns
        .iter()
        .enumerate()
        .map(|(rank, pattern)| RankEntry {
            rank,
            id: pattern.id().to_string(),
            source: pattern.source().to_string(),
            key: pattern.key().clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(source: &str) -> Arc<Pattern> {
        Arc::new(Pattern::parse(source, source).unwrap())
    }

    fn ranked(sources: &[&str]) -> Vec<String> {
        let mut patterns: Vec<_> = sources.iter().map(|s| pattern(s)).collect();
        sort(&mut patterns);
        patterns.iter().map(|p| p.id().to_string()).collect()
    }

    #[test]
    fn test_kind_precedence() {
        assert_eq!(
            ranked(&["/a/$", "/a/{$}.txt", "/a/$id", "/a/{-$opt}", "/a/b"]),
            vec!["/a/b", "/a/{-$opt}", "/a/$id", "/a/{$}.txt", "/a/$"]
        );
    }

    #[test]
    fn test_affixed_param_beats_bare_param() {
        assert_eq!(
            ranked(&["/a/$id", "/a/user-{$id}"]),
            vec!["/a/user-{$id}", "/a/$id"]
        );
        assert_eq!(
            ranked(&["/a/{$id}.json", "/a/user-{$id}", "/a/u-{$id}.json"]),
            vec!["/a/u-{$id}.json", "/a/user-{$id}", "/a/{$id}.json"]
        );
    }

    #[test]
    fn test_first_difference_decides() {
        // `$id` beats `$` at position 1; later segments are irrelevant
        assert_eq!(
            ranked(&["/a/$", "/a/$id/more"]),
            vec!["/a/$id/more", "/a/$"]
        );
        assert_eq!(
            ranked(&["/$x/static", "/static/$y"]),
            vec!["/static/$y", "/$x/static"]
        );
    }

    #[test]
    fn test_pattern_end_ranks_as_index() {
        assert_eq!(ranked(&["/files/$", "/files"]), vec!["/files", "/files/$"]);
        assert_eq!(
            ranked(&["/files/{-$page}", "/files"]),
            vec!["/files", "/files/{-$page}"]
        );
        assert_eq!(
            ranked(&["/files", "/files/list"]),
            vec!["/files/list", "/files"]
        );
        assert_eq!(ranked(&["/$", "/"]), vec!["/", "/$"]);
    }

    #[test]
    fn test_search_aware_first() {
        let plain = pattern("/a/b");
        let search = Arc::new(Pattern::parse("/$", "search").unwrap().with_search_matching(true));
        let mut patterns = vec![plain, search];
        sort(&mut patterns);
        assert_eq!(patterns[0].id(), "search");
    }

    #[test]
    fn test_equal_keys_keep_registration_order() {
        let mut patterns = vec![
            Arc::new(Pattern::parse("/a/$x", "first").unwrap()),
            Arc::new(Pattern::parse("/a/$y", "second").unwrap()),
        ];
        sort(&mut patterns);
        assert_eq!(patterns[0].id(), "first");
        assert_eq!(patterns[0].key(), patterns[1].key());
    }

    #[test]
    fn test_key_display() {
        let p = pattern("/a/user-{$id}/{$}.txt");
        assert_eq!(
            p.key().to_string(),
            "[static, param(prefix 5), affixed-wildcard(suffix 4)]"
        );
    }

    #[test]
    fn test_explain() {
        let mut patterns = vec![pattern("/$"), pattern("/about")];
        sort(&mut patterns);
        let rows = explain(&patterns);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].rank, 0);
        assert_eq!(rows[0].id, "/about");
        assert_eq!(rows[1].to_string(), "#1 /$ (/$) [wildcard]");
    }
}
