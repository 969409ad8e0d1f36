//! Compiled route patterns

use crate::error::ParseError;
use crate::params::RouteParams;
use crate::path::{encode_param, encode_splat};
use crate::rank::SpecificityKey;
use crate::segment::{self, Segment};

/// A compiled route pattern
///
/// Immutable once built and cheap to share behind an `Arc`. The ranking key
/// is computed at construction so sorting never revisits the segments.
///
/// # Example
///
/// ```
/// use route_pattern::Pattern;
///
/// let pattern = Pattern::parse("/posts/$postId/{-$tab}", "post").unwrap();
/// assert_eq!(pattern.id(), "post");
/// assert_eq!(pattern.param_names().collect::<Vec<_>>(), vec!["postId", "tab"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    id: String,
    source: String,
    segments: Vec<Segment>,
    key: SpecificityKey,
    case_sensitive: Option<bool>,
}

/// Build a [`Pattern`] from already-validated segments
///
/// The source text is rendered from the segments.
pub fn compile(segments: Vec<Segment>, id: impl Into<String>) -> Pattern {
    let source = render(&segments);
    let key = SpecificityKey::new(&segments, false);
    Pattern {
        id: id.into(),
        source,
        segments,
        key,
        case_sensitive: None,
    }
}

fn render(segments: &[Segment]) -> String {
    let body = segments
        .iter()
        .map(ToString::to_string)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/");
    format!("/{}", body)
}

impl Pattern {
    /// Parse and compile a pattern string
    pub fn parse(source: &str, id: impl Into<String>) -> Result<Self, ParseError> {
        let segments = segment::parse(source)?;
        Ok(Self {
            source: source.to_string(),
            ..compile(segments, id)
        })
    }

    /// Mark the pattern as search-aware, ranking it ahead of path-only
    /// patterns
    pub fn with_search_matching(mut self, search_aware: bool) -> Self {
        self.key = SpecificityKey::new(&self.segments, search_aware);
        self
    }

    /// Override the table's case policy for this pattern alone
    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = Some(case_sensitive);
        self
    }

    /// The per-pattern case policy, if one was set
    pub fn case_override(&self) -> Option<bool> {
        self.case_sensitive
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// The pattern text as registered
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn key(&self) -> &SpecificityKey {
        &self.key
    }

    pub fn is_search_aware(&self) -> bool {
        self.key.is_search_aware()
    }

    /// Capture names in pattern order
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(Segment::param_name)
    }

    pub fn has_wildcard(&self) -> bool {
        self.segments.last().is_some_and(Segment::is_wildcard)
    }

    /// Canonical pattern text, identical for patterns that differ only in
    /// slashes or brace style
    pub fn normalized(&self) -> String {
        render(&self.segments)
    }

    /// Build a concrete path from this pattern
    ///
    /// Param values are percent-encoded; the splat keeps its `/` separators.
    /// Absent optional params drop their segment, or leave only its literal
    /// prefix and suffix when it has any. Returns `None` if a required param
    /// is missing or empty.
    ///
    /// # Example
    ///
    /// ```
    /// use route_pattern::{Pattern, RouteParams};
    ///
    /// let pattern = Pattern::parse("/users/$id/{-$tab}/files/$", "files").unwrap();
    /// let params = RouteParams::new().with("id", "a b");
    ///
    /// assert_eq!(
    ///     pattern.interpolate(&params, Some("docs/x.pdf")).as_deref(),
    ///     Some("/users/a%20b/files/docs/x.pdf")
    /// );
    /// ```
    pub fn interpolate(&self, params: &RouteParams, splat: Option<&str>) -> Option<String> {
        let mut parts: Vec<String> = Vec::with_capacity(self.segments.len());

        for segment in &self.segments {
            match segment {
                Segment::Index => {}
                Segment::Static(text) => parts.push(text.clone()),
                Segment::Param { name, affix } => {
                    let value = params.get(name).filter(|v| !v.is_empty())?;
                    parts.push(format!(
                        "{}{}{}",
                        affix.prefix(),
                        encode_param(value),
                        affix.suffix()
                    ));
                }
                Segment::OptionalParam { name, affix } => {
                    let value = params.get(name).map(|v| encode_param(v)).unwrap_or_default();
                    let part = format!("{}{}{}", affix.prefix(), value, affix.suffix());
                    if !part.is_empty() {
                        parts.push(part);
                    }
                }
                Segment::Wildcard { affix } => {
                    let value = splat.map(encode_splat).unwrap_or_default();
                    let part = format!("{}{}{}", affix.prefix(), value, affix.suffix());
                    if !part.is_empty() {
                        parts.push(part);
                    }
                }
            }
        }

        Some(format!("/{}", parts.join("/")))
    }
}
