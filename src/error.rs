//! Error types for pattern compilation
//!
//! Only pattern syntax can fail. Resolving a path that matches nothing is an
//! ordinary `None`, and malformed percent escapes in an input path simply fail
//! to match literal segments.

use thiserror::Error;

/// Errors raised while parsing a route pattern
///
/// A pattern that fails to parse never enters a route table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A capture is unterminated, empty, badly named or otherwise malformed
    #[error("malformed parameter in segment '{segment}' of pattern '{pattern}': {reason}")]
    MalformedParam {
        pattern: String,
        segment: String,
        reason: MalformedReason,
    },

    /// A wildcard is followed by further segments
    #[error("wildcard must be the last segment of pattern '{pattern}'")]
    WildcardNotLast { pattern: String },

    /// Two captures share a name
    #[error("duplicate parameter '{name}' in pattern '{pattern}'")]
    DuplicateParam { pattern: String, name: String },
}

impl ParseError {
    /// The pattern text that failed to parse
    pub fn pattern(&self) -> &str {
        match self {
            ParseError::MalformedParam { pattern, .. }
            | ParseError::WildcardNotLast { pattern }
            | ParseError::DuplicateParam { pattern, .. } => pattern,
        }
    }
}

/// Why a segment was rejected as [`ParseError::MalformedParam`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MalformedReason {
    #[error("unterminated '{{'")]
    Unterminated,
    #[error("unexpected '}}'")]
    UnexpectedClose,
    #[error("brace group must start with '$' or '-$'")]
    NotACapture,
    #[error("invalid parameter name")]
    InvalidName,
    #[error("more than one capture in a single segment")]
    MultipleCaptures,
    #[error("'$' must start the segment or appear inside braces")]
    MisplacedDollar,
    #[error("optional wildcard is not supported")]
    OptionalWildcard,
}
