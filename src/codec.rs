//! Reversible encoding of composite route identifiers
//!
//! Build tooling names generated modules after the set of route ids they
//! serve. The encoded form contains no path, query or whitespace characters,
//! so it can be used as a file name or URL segment as-is.
//!
//! Each part is escaped on its own with `~` as the escape character: `~`
//! itself, `-` and every unsafe character become a two-character `~x` code.
//! Escaped parts never contain `-`, so joining them with [`DELIMITER`] is
//! unambiguous and any list of strings round-trips.
//!
//! ```
//! use route_pattern::codec;
//!
//! let encoded = codec::encode(&["/posts/$postId", "/about-us"]);
//! assert_eq!(encoded, "~sabout~dus---~sposts~s$postId");
//! assert_eq!(codec::decode(&encoded), vec!["/about-us", "/posts/$postId"]);
//! ```

/// Separator between encoded parts
pub const DELIMITER: &str = "---";

const ESCAPE: char = '~';

/// Code for a part that is the empty string
const EMPTY_PART: &str = "~0";

/// Escaped characters and their codes, in encode order
const CODES: [(char, char); 14] = [
    ('~', '~'),
    ('-', 'd'),
    ('/', 's'),
    ('\\', 'b'),
    ('?', 'q'),
    ('%', 'p'),
    ('#', 'h'),
    ('+', 'l'),
    ('=', 'e'),
    ('&', 'a'),
    (' ', '_'),
    ('\t', 't'),
    ('\n', 'n'),
    ('\r', 'r'),
];

fn code_for(c: char) -> Option<char> {
    CODES.iter().find(|(raw, _)| *raw == c).map(|&(_, code)| code)
}

fn char_for(code: char) -> Option<char> {
    CODES.iter().find(|(_, c)| *c == code).map(|&(raw, _)| raw)
}

/// Encode a set of identifiers into one string
///
/// Parts are sorted first, so the result does not depend on input order.
/// An empty list encodes to `""`.
pub fn encode<S: AsRef<str>>(parts: &[S]) -> String {
    let mut sorted: Vec<&str> = parts.iter().map(AsRef::as_ref).collect();
    sorted.sort_unstable();

    sorted
        .into_iter()
        .map(encode_part)
        .collect::<Vec<_>>()
        .join(DELIMITER)
}

fn encode_part(part: &str) -> String {
    if part.is_empty() {
        return EMPTY_PART.to_string();
    }

    let mut out = String::with_capacity(part.len());
    for c in part.chars() {
        match code_for(c) {
            Some(code) => {
                out.push(ESCAPE);
                out.push(code);
            }
            None => out.push(c),
        }
    }
    out
}

/// Decode a string produced by [`encode`] back into its sorted parts
///
/// Never fails: unknown escape codes and a dangling `~` are kept as written.
pub fn decode(encoded: &str) -> Vec<String> {
    if encoded.is_empty() {
        return Vec::new();
    }
    encoded.split(DELIMITER).map(decode_part).collect()
}

fn decode_part(part: &str) -> String {
    if part == EMPTY_PART {
        return String::new();
    }

    let mut out = String::with_capacity(part.len());
    let mut chars = part.chars();
    while let Some(c) = chars.next() {
        if c != ESCAPE {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some(code) => match char_for(code) {
                Some(raw) => out.push(raw),
                None => {
                    out.push(ESCAPE);
                    out.push(code);
                }
            },
            None => out.push(ESCAPE),
        }
    }
    out
}
