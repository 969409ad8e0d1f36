//! Route pattern segments and the pattern parser
//!
//! A pattern such as `/posts/$postId/{-$tab}/files/$` is split on `/` and
//! each piece is classified into a [`Segment`]:
//!
//! - `posts` -> [`Segment::Static`]
//! - `$postId` or `prefix{$postId}suffix` -> [`Segment::Param`]
//! - `{-$tab}` or `prefix{-$tab}suffix` -> [`Segment::OptionalParam`]
//! - `$` or `prefix{$}suffix` -> [`Segment::Wildcard`]
//! - the root pattern `/` -> [`Segment::Index`]
//!
//! Parsing is a single pass over the characters of each segment. Static text
//! is kept exactly as written, so Unicode literals like `/대한민국` work as-is.

use crate::error::{MalformedReason, ParseError};
use std::collections::HashSet;
use std::fmt;

/// Literal text surrounding an embedded capture, as in `user-{$id}.json`
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Affix {
    pub prefix: Option<String>,
    pub suffix: Option<String>,
}

impl Affix {
    /// An affix with neither prefix nor suffix
    pub fn none() -> Self {
        Self::default()
    }

    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        let suffix = suffix.into();
        Self {
            prefix: (!prefix.is_empty()).then_some(prefix),
            suffix: (!suffix.is_empty()).then_some(suffix),
        }
    }

    pub fn prefix(&self) -> &str {
        self.prefix.as_deref().unwrap_or("")
    }

    pub fn suffix(&self) -> &str {
        self.suffix.as_deref().unwrap_or("")
    }

    pub fn is_empty(&self) -> bool {
        self.prefix.is_none() && self.suffix.is_none()
    }
}

/// A single segment in a route pattern
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Literal text that must match the input segment
    Static(String),
    /// Required capture of exactly one non-empty segment
    Param { name: String, affix: Affix },
    /// Capture of zero or one segment
    OptionalParam { name: String, affix: Affix },
    /// Catch-all over the rest of the path, always last
    Wildcard { affix: Affix },
    /// Terminal segment of the root pattern
    Index,
}

/// Ranking category of a [`Segment`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentKind {
    Static,
    Index,
    OptionalParam,
    Param,
    /// Wildcard with a literal prefix and/or suffix
    AffixedWildcard,
    Wildcard,
}

impl Segment {
    pub fn kind(&self) -> SegmentKind {
        match self {
            Segment::Static(_) => SegmentKind::Static,
            Segment::Index => SegmentKind::Index,
            Segment::OptionalParam { .. } => SegmentKind::OptionalParam,
            Segment::Param { .. } => SegmentKind::Param,
            Segment::Wildcard { affix } if !affix.is_empty() => SegmentKind::AffixedWildcard,
            Segment::Wildcard { .. } => SegmentKind::Wildcard,
        }
    }

    /// Name of the capture, if this segment captures into a named param
    pub fn param_name(&self) -> Option<&str> {
        match self {
            Segment::Param { name, .. } | Segment::OptionalParam { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn affix(&self) -> Option<&Affix> {
        match self {
            Segment::Param { affix, .. }
            | Segment::OptionalParam { affix, .. }
            | Segment::Wildcard { affix } => Some(affix),
            Segment::Static(_) | Segment::Index => None,
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, Segment::Wildcard { .. })
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Static(text) => f.write_str(text),
            Segment::Index => Ok(()),
            Segment::Param { name, affix } if affix.is_empty() => write!(f, "${}", name),
            Segment::Param { name, affix } => {
                write!(f, "{}{{${}}}{}", affix.prefix(), name, affix.suffix())
            }
            Segment::OptionalParam { name, affix } => {
                write!(f, "{}{{-${}}}{}", affix.prefix(), name, affix.suffix())
            }
            Segment::Wildcard { affix } if affix.is_empty() => f.write_str("$"),
            Segment::Wildcard { affix } => {
                write!(f, "{}{{$}}{}", affix.prefix(), affix.suffix())
            }
        }
    }
}

/// Parse a route pattern into its segments
///
/// Leading, trailing and repeated slashes are ignored. The root pattern
/// (`/` or the empty string) parses to a single [`Segment::Index`].
///
/// # Example
///
/// ```
/// use route_pattern::{parse, Affix, Segment};
///
/// let segments = parse("/images/thumb_{$}").unwrap();
/// assert_eq!(segments[0], Segment::Static("images".to_string()));
/// assert_eq!(
///     segments[1],
///     Segment::Wildcard { affix: Affix::new("thumb_", "") }
/// );
/// ```
pub fn parse(pattern: &str) -> Result<Vec<Segment>, ParseError> {
    let mut segments = Vec::new();
    let mut names = HashSet::new();

    for text in pattern.split('/').filter(|s| !s.is_empty()) {
        if segments.last().is_some_and(Segment::is_wildcard) {
            return Err(ParseError::WildcardNotLast {
                pattern: pattern.to_string(),
            });
        }

        let segment = parse_segment(text).map_err(|reason| ParseError::MalformedParam {
            pattern: pattern.to_string(),
            segment: text.to_string(),
            reason,
        })?;

        if let Some(name) = segment.param_name() {
            if !names.insert(name.to_string()) {
                return Err(ParseError::DuplicateParam {
                    pattern: pattern.to_string(),
                    name: name.to_string(),
                });
            }
        }

        segments.push(segment);
    }

    if segments.is_empty() {
        segments.push(Segment::Index);
    }

    Ok(segments)
}

fn parse_segment(text: &str) -> Result<Segment, MalformedReason> {
    if text == "$" {
        return Ok(Segment::Wildcard {
            affix: Affix::none(),
        });
    }

    if let Some(name) = text.strip_prefix('$') {
        validate_name(name)?;
        return Ok(Segment::Param {
            name: name.to_string(),
            affix: Affix::none(),
        });
    }

    let Some(open) = text.find('{') else {
        check_literal(text)?;
        return Ok(Segment::Static(text.to_string()));
    };

    let prefix = &text[..open];
    check_literal(prefix)?;

    let rest = &text[open + 1..];
    let close = rest.find('}').ok_or(MalformedReason::Unterminated)?;
    let inner = &rest[..close];
    let suffix = &rest[close + 1..];

    if suffix.contains('{') {
        return Err(MalformedReason::MultipleCaptures);
    }
    check_literal(suffix)?;

    let affix = Affix::new(prefix, suffix);

    if let Some(name) = inner.strip_prefix("-$") {
        if name.is_empty() {
            return Err(MalformedReason::OptionalWildcard);
        }
        validate_name(name)?;
        return Ok(Segment::OptionalParam {
            name: name.to_string(),
            affix,
        });
    }

    let name = inner.strip_prefix('$').ok_or(MalformedReason::NotACapture)?;
    if name.is_empty() {
        return Ok(Segment::Wildcard { affix });
    }
    validate_name(name)?;
    Ok(Segment::Param {
        name: name.to_string(),
        affix,
    })
}

/// Literal text may not contain capture syntax
fn check_literal(text: &str) -> Result<(), MalformedReason> {
    for c in text.chars() {
        match c {
            '}' => return Err(MalformedReason::UnexpectedClose),
            '$' => return Err(MalformedReason::MisplacedDollar),
            '{' => return Err(MalformedReason::Unterminated),
            _ => {}
        }
    }
    Ok(())
}

fn validate_name(name: &str) -> Result<(), MalformedReason> {
    let mut chars = name.chars();
    match chars.next() {
        None => Err(MalformedReason::InvalidName),
        Some(first) if !(first.is_alphabetic() || first == '_') => {
            Err(MalformedReason::InvalidName)
        }
        Some(_) if chars.all(|c| c.is_alphanumeric() || c == '_') => Ok(()),
        Some(_) => Err(MalformedReason::InvalidName),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yare::parameterized;

    fn param(name: &str) -> Segment {
        Segment::Param {
            name: name.to_string(),
            affix: Affix::none(),
        }
    }

    #[test]
    fn test_static_segments() {
        assert_eq!(
            parse("/users/list").unwrap(),
            vec![
                Segment::Static("users".to_string()),
                Segment::Static("list".to_string())
            ]
        );
    }

    #[test]
    fn test_root_is_index() {
        assert_eq!(parse("/").unwrap(), vec![Segment::Index]);
        assert_eq!(parse("").unwrap(), vec![Segment::Index]);
        assert_eq!(parse("//").unwrap(), vec![Segment::Index]);
    }

    #[test]
    fn test_slashes_are_ignored() {
        assert_eq!(parse("users/").unwrap(), parse("/users").unwrap());
        assert_eq!(parse("//users//$id/").unwrap(), parse("/users/$id").unwrap());
    }

    #[test]
    fn test_param_forms() {
        assert_eq!(parse("/$id").unwrap(), vec![param("id")]);
        assert_eq!(parse("/{$id}").unwrap(), vec![param("id")]);
        assert_eq!(
            parse("/user-{$id}.json").unwrap(),
            vec![Segment::Param {
                name: "id".to_string(),
                affix: Affix::new("user-", ".json"),
            }]
        );
    }

    #[test]
    fn test_optional_param() {
        assert_eq!(
            parse("/foo/{-$bar}/qux").unwrap()[1],
            Segment::OptionalParam {
                name: "bar".to_string(),
                affix: Affix::none(),
            }
        );
        assert_eq!(
            parse("/v{-$version}").unwrap()[0],
            Segment::OptionalParam {
                name: "version".to_string(),
                affix: Affix::new("v", ""),
            }
        );
    }

    #[test]
    fn test_wildcard_forms() {
        assert_eq!(
            parse("/files/$").unwrap()[1],
            Segment::Wildcard {
                affix: Affix::none()
            }
        );
        assert_eq!(
            parse("/logs/{$}.txt").unwrap()[1],
            Segment::Wildcard {
                affix: Affix::new("", ".txt")
            }
        );
        assert_eq!(parse("/logs/{$}.txt").unwrap()[1].kind(), SegmentKind::AffixedWildcard);
        assert_eq!(parse("/files/$").unwrap()[1].kind(), SegmentKind::Wildcard);
    }

    #[test]
    fn test_unicode_static() {
        assert_eq!(
            parse("/대한민국/🚀/$id").unwrap(),
            vec![
                Segment::Static("대한민국".to_string()),
                Segment::Static("🚀".to_string()),
                param("id"),
            ]
        );
    }

    #[test]
    fn test_unicode_param_name() {
        assert_eq!(parse("/$名前").unwrap(), vec![param("名前")]);
    }

    #[parameterized(
        unterminated = { "/a/{$id", MalformedReason::Unterminated },
        stray_close = { "/a/id}", MalformedReason::UnexpectedClose },
        not_a_capture = { "/a/{id}", MalformedReason::NotACapture },
        two_captures = { "/a/{$x}-{$y}", MalformedReason::MultipleCaptures },
        dollar_inside_text = { "/a/pre$id", MalformedReason::MisplacedDollar },
        name_with_dash = { "/a/$user-id", MalformedReason::InvalidName },
        name_with_digit_first = { "/a/$1st", MalformedReason::InvalidName },
        name_with_brace = { "/a/$id}", MalformedReason::InvalidName },
        optional_wildcard = { "/a/{-$}", MalformedReason::OptionalWildcard },
    )]
    fn malformed_patterns(pattern: &str, expected: MalformedReason) {
        match parse(pattern) {
            Err(ParseError::MalformedParam { reason, .. }) => assert_eq!(reason, expected),
            other => panic!("expected MalformedParam for {:?}, got {:?}", pattern, other),
        }
    }

    #[test]
    fn test_wildcard_not_last() {
        assert_eq!(
            parse("/files/$/edit"),
            Err(ParseError::WildcardNotLast {
                pattern: "/files/$/edit".to_string()
            })
        );
        assert!(matches!(
            parse("/a/{$}.txt/b"),
            Err(ParseError::WildcardNotLast { .. })
        ));
    }

    #[test]
    fn test_duplicate_param() {
        assert_eq!(
            parse("/$id/x/{-$id}"),
            Err(ParseError::DuplicateParam {
                pattern: "/$id/x/{-$id}".to_string(),
                name: "id".to_string(),
            })
        );
    }

    #[test]
    fn test_display_round_trips_canonical_form() {
        for pattern in ["posts", "$id", "user-{$id}", "{-$tab}", "$", "thumb_{$}", "{$}.txt"] {
            let segments = parse(pattern).unwrap();
            assert_eq!(segments[0].to_string(), pattern);
        }
        assert_eq!(parse("{$id}").unwrap()[0].to_string(), "$id");
    }
}
