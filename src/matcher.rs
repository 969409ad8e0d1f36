//! Route matching against a ranked pattern list
//!
//! Matching walks the pattern and input segments together:
//!
//! - static segments compare against the decoded input segment
//! - params capture one segment, minus any literal prefix/suffix
//! - optional params capture a segment when the rest of the pattern still
//!   matches, otherwise they are skipped
//! - wildcards capture everything that is left
//!
//! The first pattern in rank order that consumes the whole input wins.
//! Fuzzy matching also accepts a pattern that consumes only a leading part
//! of the input and reports the rest as the remainder.

use crate::options::MatchOptions;
use crate::path::{strip_prefix_with, strip_suffix_with, text_eq, InputPath, InputSegment};
use crate::pattern::Pattern;
use crate::segment::{Affix, Segment};
use crate::{trace_log, RouteMatch, RouteParams};
use std::sync::Arc;

#[derive(Debug, Clone, Copy)]
struct Walk {
    case_sensitive: bool,
    fuzzy: bool,
}

#[derive(Debug, Default)]
struct Captures {
    params: Vec<(String, String)>,
    splat: Option<String>,
    /// Input segments left over by a fuzzy match
    rest: usize,
    remainder: Option<String>,
}

/// Match a single pattern against a normalized input path
pub fn match_pattern(
    pattern: &Pattern,
    input: &InputPath<'_>,
    options: &MatchOptions,
) -> Option<RouteMatch> {
    run(pattern, input, options, false).map(|(matched, _)| matched)
}

/// Match a pattern against the start of an input path
///
/// Input left over after the pattern's last segment is returned in
/// [`RouteMatch::remainder`], `/`-joined and decoded. The root pattern only
/// matches the root path.
pub fn match_pattern_fuzzy(
    pattern: &Pattern,
    input: &InputPath<'_>,
    options: &MatchOptions,
) -> Option<RouteMatch> {
    run(pattern, input, options, true).map(|(matched, _)| matched)
}

fn run(
    pattern: &Pattern,
    input: &InputPath<'_>,
    options: &MatchOptions,
    fuzzy: bool,
) -> Option<(RouteMatch, usize)> {
    let walk = Walk {
        case_sensitive: pattern
            .case_override()
            .unwrap_or_else(|| options.is_case_sensitive()),
        fuzzy,
    };
    let mut captures = Captures::default();
    if !walk.step(pattern.segments(), input.segments(), &mut captures) {
        return None;
    }

    let matched = RouteMatch {
        pattern_id: pattern.id().to_string(),
        params: captures.params.into_iter().collect::<RouteParams>(),
        splat: captures.splat,
        remainder: captures.remainder,
    };
    Some((matched, captures.rest))
}

/// Return the first match in table order
pub fn first_match(
    patterns: &[Arc<Pattern>],
    input: &InputPath<'_>,
    options: &MatchOptions,
) -> Option<RouteMatch> {
    patterns.iter().find_map(|pattern| {
        let matched = match_pattern(pattern, input, options);
        if matched.is_some() {
            trace_log!("Matched pattern '{}' ({})", pattern.source(), pattern.id());
        }
        matched
    })
}

/// Return the best fuzzy match in table order
///
/// A full match wins outright. Otherwise the pattern that leaves the fewest
/// segments unmatched wins, ties going to the higher ranked pattern.
pub fn first_fuzzy_match(
    patterns: &[Arc<Pattern>],
    input: &InputPath<'_>,
    options: &MatchOptions,
) -> Option<RouteMatch> {
    if let Some(exact) = first_match(patterns, input, options) {
        return Some(exact);
    }

    let mut best: Option<(RouteMatch, usize)> = None;
    for pattern in patterns {
        if let Some((matched, rest)) = run(pattern, input, options, true) {
            if best.as_ref().map_or(true, |(_, fewest)| rest < *fewest) {
                best = Some((matched, rest));
            }
        }
    }
    best.map(|(matched, _)| {
        trace_log!(
            "Fuzzy matched '{}' with remainder {:?}",
            matched.pattern_id,
            matched.remainder
        );
        matched
    })
}

impl Walk {
    fn step(
        self,
        segments: &[Segment],
        input: &[InputSegment<'_>],
        captures: &mut Captures,
    ) -> bool {
        let Some((segment, rest)) = segments.split_first() else {
            if input.is_empty() {
                return true;
            }
            if self.fuzzy {
                captures.rest = input.len();
                captures.remainder = Some(join(input.iter().map(InputSegment::value)));
                return true;
            }
            return false;
        };

        match segment {
            Segment::Index => input.is_empty() && self.step(rest, input, captures),
            Segment::Static(text) => match input.split_first() {
                Some((first, remaining))
                    if first
                        .decoded()
                        .is_some_and(|value| text_eq(value, text, self.case_sensitive)) =>
                {
                    self.step(rest, remaining, captures)
                }
                _ => false,
            },
            Segment::Param { name, affix } => {
                let Some((first, remaining)) = input.split_first() else {
                    return false;
                };
                let Some(value) = capture_one(first, affix, self.case_sensitive) else {
                    return false;
                };
                self.with_param(name, value, rest, remaining, captures)
            }
            Segment::OptionalParam { name, affix } => {
                if let Some((first, remaining)) = input.split_first() {
                    if let Some(value) = capture_one(first, affix, self.case_sensitive) {
                        if self.with_param(name, value, rest, remaining, captures) {
                            return true;
                        }
                    }
                    // `v` for `v{-$version}`: the affixes without a value
                    if !affix.is_empty()
                        && is_bare_affix(first, affix, self.case_sensitive)
                        && self.step(rest, remaining, captures)
                    {
                        return true;
                    }
                }
                self.step(rest, input, captures)
            }
            Segment::Wildcard { affix } => {
                debug_assert!(rest.is_empty(), "wildcard must be the last segment");
                match capture_rest(input, affix, self.case_sensitive) {
                    Some(splat) => {
                        captures.splat = Some(splat);
                        true
                    }
                    None => false,
                }
            }
        }
    }

    /// Record a capture and continue, undoing it if the rest fails
    fn with_param(
        self,
        name: &str,
        value: String,
        rest: &[Segment],
        remaining: &[InputSegment<'_>],
        captures: &mut Captures,
    ) -> bool {
        let mark = captures.params.len();
        captures.params.push((name.to_string(), value));
        if self.step(rest, remaining, captures) {
            true
        } else {
            captures.params.truncate(mark);
            false
        }
    }
}

/// Whether a segment is exactly the affix text with nothing between
fn is_bare_affix(segment: &InputSegment<'_>, affix: &Affix, case_sensitive: bool) -> bool {
    segment
        .decoded()
        .and_then(|text| strip_prefix_with(text, affix.prefix(), case_sensitive))
        .and_then(|text| strip_suffix_with(text, affix.suffix(), case_sensitive))
        .is_some_and(str::is_empty)
}

/// Capture the non-empty text of one segment between its affixes
fn capture_one(segment: &InputSegment<'_>, affix: &Affix, case_sensitive: bool) -> Option<String> {
    if affix.is_empty() {
        return Some(segment.value().to_string());
    }

    let text = segment.decoded()?;
    let text = strip_prefix_with(text, affix.prefix(), case_sensitive)?;
    let text = strip_suffix_with(text, affix.suffix(), case_sensitive)?;
    (!text.is_empty()).then(|| text.to_string())
}

/// Capture the remaining segments for a wildcard
///
/// A bare wildcard accepts no segments at all. An affixed one needs its
/// prefix at the start of the first remaining segment and its suffix at the
/// end of the last one.
fn capture_rest(input: &[InputSegment<'_>], affix: &Affix, case_sensitive: bool) -> Option<String> {
    if affix.is_empty() {
        return Some(join(input.iter().map(InputSegment::value)));
    }

    match input {
        [] => None,
        [only] => {
            let text = only.decoded()?;
            let text = strip_prefix_with(text, affix.prefix(), case_sensitive)?;
            strip_suffix_with(text, affix.suffix(), case_sensitive).map(str::to_string)
        }
        [first, middle @ .., last] => {
            let head = strip_prefix_with(first.decoded()?, affix.prefix(), case_sensitive)?;
            let tail = strip_suffix_with(last.decoded()?, affix.suffix(), case_sensitive)?;
            Some(join(
                std::iter::once(head)
                    .chain(middle.iter().map(InputSegment::value))
                    .chain(std::iter::once(tail)),
            ))
        }
    }
}

fn join<'s>(parts: impl Iterator<Item = &'s str>) -> String {
    parts.collect::<Vec<_>>().join("/")
}
