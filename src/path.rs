//! Input path normalization and percent-encoding helpers
//!
//! Incoming paths are split into segments *before* percent-decoding, so an
//! encoded slash (`%2F`) stays inside the segment it was written in and can
//! reach a param value intact.

use crate::options::MatchOptions;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::borrow::Cow;

/// Characters left unescaped in param values, same as `encodeURIComponent`
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// One `/`-delimited piece of an input path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputSegment<'a> {
    raw: &'a str,
    decoded: Option<Cow<'a, str>>,
}

impl<'a> InputSegment<'a> {
    pub fn new(raw: &'a str) -> Self {
        Self {
            raw,
            decoded: decode_segment(raw),
        }
    }

    /// The segment exactly as it appeared in the path
    pub fn raw(&self) -> &'a str {
        self.raw
    }

    /// Percent-decoded text, `None` when the escapes are malformed
    pub fn decoded(&self) -> Option<&str> {
        self.decoded.as_deref()
    }

    /// Decoded text, falling back to the raw text
    pub fn value(&self) -> &str {
        self.decoded().unwrap_or(self.raw)
    }
}

/// A normalized input path ready for matching
///
/// # Example
///
/// ```
/// use route_pattern::{InputPath, MatchOptions};
///
/// let options = MatchOptions::new().base_path("/app");
/// let input = InputPath::parse("/app//files/a%20b.txt?download=1", &options).unwrap();
///
/// let values: Vec<&str> = input.segments().iter().map(|s| s.value()).collect();
/// assert_eq!(values, vec!["files", "a b.txt"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputPath<'a> {
    segments: Vec<InputSegment<'a>>,
}

impl<'a> InputPath<'a> {
    /// Normalize a path: drop query and fragment, collapse slashes, strip the
    /// base path
    ///
    /// Returns `None` when the path lies outside the configured base path.
    pub fn parse(path: &'a str, options: &MatchOptions) -> Option<Self> {
        let path = strip_query_and_fragment(path);
        let mut raw = path.split('/').filter(|s| !s.is_empty());

        for base in options.base_path_segments() {
            if raw.next() != Some(base) {
                return None;
            }
        }

        Some(Self {
            segments: raw.map(InputSegment::new).collect(),
        })
    }

    pub fn segments(&self) -> &[InputSegment<'a>] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }
}

fn strip_query_and_fragment(path: &str) -> &str {
    match path.find(['?', '#']) {
        Some(end) => &path[..end],
        None => path,
    }
}

/// Percent-decode one path segment
///
/// A `%` not followed by two hex digits, or escapes that decode to invalid
/// UTF-8, make the segment undecodable.
pub fn decode_segment(raw: &str) -> Option<Cow<'_, str>> {
    let bytes = raw.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let well_formed = bytes
                .get(i + 1..i + 3)
                .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit));
            if !well_formed {
                return None;
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    percent_decode_str(raw).decode_utf8().ok()
}

/// Encode a param value for use inside one path segment
pub fn encode_param(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT).to_string()
}

/// Encode a splat value, keeping its `/` separators
pub fn encode_splat(value: &str) -> String {
    value
        .split('/')
        .map(encode_param)
        .collect::<Vec<_>>()
        .join("/")
}

/// Compare two strings, case-folding unless `case_sensitive`
pub(crate) fn text_eq(a: &str, b: &str, case_sensitive: bool) -> bool {
    if case_sensitive {
        a == b
    } else {
        a.chars()
            .flat_map(char::to_lowercase)
            .eq(b.chars().flat_map(char::to_lowercase))
    }
}

/// `str::strip_prefix` honoring the case policy
pub(crate) fn strip_prefix_with<'t>(
    text: &'t str,
    prefix: &str,
    case_sensitive: bool,
) -> Option<&'t str> {
    if case_sensitive {
        return text.strip_prefix(prefix);
    }

    let mut want = prefix.chars().flat_map(char::to_lowercase).peekable();
    for (idx, c) in text.char_indices() {
        if want.peek().is_none() {
            return Some(&text[idx..]);
        }
        for lower in c.to_lowercase() {
            if want.next() != Some(lower) {
                return None;
            }
        }
    }
    want.peek().is_none().then_some("")
}

/// `str::strip_suffix` honoring the case policy
pub(crate) fn strip_suffix_with<'t>(
    text: &'t str,
    suffix: &str,
    case_sensitive: bool,
) -> Option<&'t str> {
    if case_sensitive {
        return text.strip_suffix(suffix);
    }

    let mut want = suffix
        .chars()
        .rev()
        .flat_map(|c| c.to_lowercase().rev())
        .peekable();
    for (idx, c) in text.char_indices().rev() {
        if want.peek().is_none() {
            return Some(&text[..idx + c.len_utf8()]);
        }
        for lower in c.to_lowercase().rev() {
            if want.next() != Some(lower) {
                return None;
            }
        }
    }
    want.peek().is_none().then_some("")
}
