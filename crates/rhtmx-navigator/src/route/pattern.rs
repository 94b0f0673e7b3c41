//! Pattern parsing, prefix matching and URL generation for route paths
//!
//! Pure functional parsing of route patterns into typed segments.
//! All functions are **pure**: same input → same output, no side effects.
//!
//! # Syntax
//!
//! - `about` → static segment
//! - `:id` → required parameter
//! - `:id?` → optional parameter
//! - `*slug` → catch-all (one or more segments, last position only)

use std::collections::BTreeMap;

use crate::error::NavError;
use crate::path::{segment_len, trim_trailing_slash};

/// Represents different types of route pattern segments
///
/// # Examples
///
/// ```
/// use rhtmx_navigator::route::pattern::{classify_segment, PatternSegmentType};
///
/// assert_eq!(classify_segment("about"), PatternSegmentType::Static("about".to_string()));
/// assert_eq!(classify_segment(":id"), PatternSegmentType::Required("id".to_string()));
/// assert_eq!(classify_segment(":id?"), PatternSegmentType::Optional("id".to_string()));
/// assert_eq!(classify_segment("*slug"), PatternSegmentType::CatchAll("slug".to_string()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternSegmentType {
    /// Catch-all segment: *slug
    CatchAll(String),
    /// Optional parameter: :id?
    Optional(String),
    /// Required parameter: :id
    Required(String),
    /// Static text segment
    Static(String),
}

impl PatternSegmentType {
    fn param_name(&self) -> Option<&str> {
        match self {
            PatternSegmentType::CatchAll(name)
            | PatternSegmentType::Optional(name)
            | PatternSegmentType::Required(name) => Some(name),
            PatternSegmentType::Static(_) => None,
        }
    }
}

/// Classifies a segment into a pattern type (pure function)
///
/// # Parsing Rules (evaluated in order)
///
/// 1. **Catch-all**: `*name`
/// 2. **Optional param**: `:name?`
/// 3. **Required param**: `:name`
/// 4. **Static**: Any other text
pub fn classify_segment(segment: &str) -> PatternSegmentType {
    if let Some(name) = segment.strip_prefix('*') {
        return PatternSegmentType::CatchAll(name.to_string());
    }

    match segment.strip_prefix(':') {
        Some(inner) => match inner.strip_suffix('?') {
            Some(name) => PatternSegmentType::Optional(name.to_string()),
            None => PatternSegmentType::Required(inner.to_string()),
        },
        None => PatternSegmentType::Static(segment.to_string()),
    }
}

/// Result of matching a pattern against the start of a path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixMatch<'p, 'r> {
    /// Number of bytes of the input consumed
    pub len: usize,
    /// Raw (still percent-encoded) parameter values in pattern order
    pub params: Vec<(&'p str, &'r str)>,
}

/// A compiled route pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    source: String,
    segments: Vec<PatternSegmentType>,
    trailing_slash: bool,
}

impl Pattern {
    /// Compiles a pattern, rejecting ones the matcher cannot honour
    ///
    /// # Errors
    ///
    /// [`NavError::InvalidPattern`] for a parameter without a name, a
    /// catch-all that is not the last segment, or a repeated parameter name.
    ///
    /// # Examples
    ///
    /// ```
    /// use rhtmx_navigator::route::pattern::Pattern;
    ///
    /// assert!(Pattern::parse("/hello/:name").is_ok());
    /// assert!(Pattern::parse("/hello/:").is_err());
    /// assert!(Pattern::parse("/docs/*rest/edit").is_err());
    /// ```
    pub fn parse(source: &str) -> Result<Self, NavError> {
        let trimmed = trim_trailing_slash(source);
        let body = trimmed.strip_prefix('/').unwrap_or(trimmed);

        let segments: Vec<PatternSegmentType> = if body.is_empty() {
            Vec::new()
        } else {
            body.split('/').map(classify_segment).collect()
        };

        let invalid = |reason: &str| NavError::InvalidPattern {
            pattern: source.to_string(),
            reason: reason.to_string(),
        };

        let mut seen: Vec<&str> = Vec::new();
        for (idx, segment) in segments.iter().enumerate() {
            if let Some(name) = segment.param_name() {
                if name.is_empty() {
                    return Err(invalid("parameter without a name"));
                }
                if seen.contains(&name) {
                    return Err(invalid("repeated parameter name"));
                }
                seen.push(name);
            }
            if matches!(segment, PatternSegmentType::CatchAll(_)) && idx + 1 != segments.len() {
                return Err(invalid("catch-all must be the last segment"));
            }
        }

        Ok(Self {
            source: source.to_string(),
            segments,
            trailing_slash: source.ends_with('/'),
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn segments(&self) -> &[PatternSegmentType] {
        &self.segments
    }

    /// Names of all parameters, in pattern order
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(PatternSegmentType::param_name)
    }

    /// Matches this pattern against the start of `rest`
    ///
    /// Matching is segment-bounded: the consumed prefix always ends at a `/`
    /// or at the end of `rest`. An empty pattern matches with length 0.
    ///
    /// # Examples
    ///
    /// ```
    /// use rhtmx_navigator::route::pattern::Pattern;
    ///
    /// let pattern = Pattern::parse("/hello/:name").unwrap();
    /// let m = pattern.match_prefix("/hello/John/extra").unwrap();
    /// assert_eq!(m.len, "/hello/John".len());
    /// assert_eq!(m.params, vec![("name", "John")]);
    ///
    /// assert!(pattern.match_prefix("/hellox/John").is_none());
    /// ```
    pub fn match_prefix<'r>(&self, rest: &'r str) -> Option<PrefixMatch<'_, 'r>> {
        let mut pos = 0;
        let mut params = Vec::new();

        for (idx, segment) in self.segments.iter().enumerate() {
            let next = rest[pos..].strip_prefix('/');

            match segment {
                PatternSegmentType::CatchAll(name) => {
                    let tail = next.filter(|tail| !tail.is_empty())?;
                    params.push((name.as_str(), tail));
                    pos = rest.len();
                }
                PatternSegmentType::Optional(name) => {
                    if let Some(tail) = next {
                        let value = &tail[..segment_len(tail)];
                        if !value.is_empty() && !self.static_follows(idx, value) {
                            params.push((name.as_str(), value));
                            pos += 1 + value.len();
                        }
                    }
                }
                PatternSegmentType::Required(name) => {
                    let tail = next?;
                    let value = &tail[..segment_len(tail)];
                    if value.is_empty() {
                        return None;
                    }
                    params.push((name.as_str(), value));
                    pos += 1 + value.len();
                }
                PatternSegmentType::Static(literal) => {
                    let tail = next?;
                    let value = &tail[..segment_len(tail)];
                    if value != literal {
                        return None;
                    }
                    pos += 1 + value.len();
                }
            }
        }

        Some(PrefixMatch { len: pos, params })
    }

    /// An optional parameter yields its path segment to an equal static
    /// segment right after it
    fn static_follows(&self, idx: usize, value: &str) -> bool {
        matches!(
            self.segments.get(idx + 1),
            Some(PatternSegmentType::Static(literal)) if literal == value
        )
    }

    /// Generates a path from parameter values
    ///
    /// Returns the generated path and the names of the parameters it used, or
    /// the name of the first missing required parameter.
    pub fn generate<'a>(
        &'a self,
        params: &BTreeMap<String, String>,
        encode: bool,
    ) -> Result<(String, Vec<&'a str>), &'a str> {
        let escape = |value: &str| -> String {
            if encode {
                urlencoding::encode(value).into_owned()
            } else {
                value.to_string()
            }
        };

        let mut out = String::new();
        let mut used = Vec::new();

        for segment in &self.segments {
            match segment {
                PatternSegmentType::Static(literal) => {
                    out.push('/');
                    out.push_str(literal);
                }
                PatternSegmentType::Required(name) => {
                    let value = params.get(name).ok_or(name.as_str())?;
                    out.push('/');
                    out.push_str(&escape(value));
                    used.push(name.as_str());
                }
                PatternSegmentType::Optional(name) => {
                    if let Some(value) = params.get(name).filter(|v| !v.is_empty()) {
                        out.push('/');
                        out.push_str(&escape(value));
                        used.push(name.as_str());
                    }
                }
                PatternSegmentType::CatchAll(name) => {
                    let value = params.get(name).ok_or(name.as_str())?;
                    let joined: Vec<String> = value.split('/').map(|part| escape(part)).collect();
                    out.push('/');
                    out.push_str(&joined.join("/"));
                    used.push(name.as_str());
                }
            }
        }

        if self.trailing_slash {
            out.push('/');
        }

        Ok((out, used))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_classify_static() {
        assert_eq!(
            classify_segment("about"),
            PatternSegmentType::Static("about".to_string())
        );
    }

    #[test]
    fn test_classify_params() {
        assert_eq!(
            classify_segment(":id"),
            PatternSegmentType::Required("id".to_string())
        );
        assert_eq!(
            classify_segment(":id?"),
            PatternSegmentType::Optional("id".to_string())
        );
        assert_eq!(
            classify_segment("*slug"),
            PatternSegmentType::CatchAll("slug".to_string())
        );
    }

    #[test]
    fn test_parse_root_patterns() {
        assert!(Pattern::parse("").unwrap().segments().is_empty());
        assert!(Pattern::parse("/").unwrap().segments().is_empty());
    }

    #[test]
    fn test_parse_rejects_invalid() {
        assert!(Pattern::parse("/a/:").is_err());
        assert!(Pattern::parse("/a/:?").is_err());
        assert!(Pattern::parse("/a/*").is_err());
        assert!(Pattern::parse("/a/*rest/b").is_err());
        assert!(Pattern::parse("/:id/:id").is_err());
    }

    #[test]
    fn test_empty_pattern_matches_anything_with_zero_length() {
        let pattern = Pattern::parse("").unwrap();
        assert_eq!(pattern.match_prefix("").unwrap().len, 0);
        assert_eq!(pattern.match_prefix("/not-found").unwrap().len, 0);
    }

    #[test]
    fn test_static_prefix_is_segment_bounded() {
        let pattern = Pattern::parse("/fruits").unwrap();
        assert_eq!(pattern.match_prefix("/fruits").unwrap().len, 7);
        assert_eq!(pattern.match_prefix("/fruits/apple").unwrap().len, 7);
        assert_eq!(pattern.match_prefix("/fruits/").unwrap().len, 7);
        assert!(pattern.match_prefix("/fruitsalad").is_none());
        assert!(pattern.match_prefix("").is_none());
    }

    #[test]
    fn test_required_param_needs_value() {
        let pattern = Pattern::parse("/hello/:name").unwrap();
        assert!(pattern.match_prefix("/hello").is_none());
        assert!(pattern.match_prefix("/hello/").is_none());
        assert_eq!(
            pattern.match_prefix("/hello/John").unwrap().params,
            vec![("name", "John")]
        );
    }

    #[test]
    fn test_optional_param() {
        let pattern = Pattern::parse("/posts/:page?").unwrap();
        let m = pattern.match_prefix("/posts").unwrap();
        assert_eq!(m.len, 6);
        assert!(m.params.is_empty());

        let m = pattern.match_prefix("/posts/2").unwrap();
        assert_eq!(m.len, 8);
        assert_eq!(m.params, vec![("page", "2")]);
    }

    #[test]
    fn test_optional_param_yields_to_static() {
        let pattern = Pattern::parse("/posts/:lang?/archive").unwrap();
        let m = pattern.match_prefix("/posts/archive").unwrap();
        assert!(m.params.is_empty());

        let m = pattern.match_prefix("/posts/en/archive").unwrap();
        assert_eq!(m.params, vec![("lang", "en")]);
    }

    #[test]
    fn test_catch_all_consumes_rest() {
        let pattern = Pattern::parse("/docs/*slug").unwrap();
        let m = pattern.match_prefix("/docs/guide/intro").unwrap();
        assert_eq!(m.len, "/docs/guide/intro".len());
        assert_eq!(m.params, vec![("slug", "guide/intro")]);
        assert!(pattern.match_prefix("/docs").is_none());
        assert!(pattern.match_prefix("/docs/").is_none());
    }

    #[test]
    fn test_generate() {
        let pattern = Pattern::parse("/hello/:name").unwrap();
        let (path, used) = pattern.generate(&params(&[("name", "John")]), true).unwrap();
        assert_eq!(path, "/hello/John");
        assert_eq!(used, vec!["name"]);
    }

    #[test]
    fn test_generate_missing_param() {
        let pattern = Pattern::parse("/hello/:name").unwrap();
        assert_eq!(pattern.generate(&params(&[]), true), Err("name"));
    }

    #[test]
    fn test_generate_keeps_root_spelling() {
        let (path, _) = Pattern::parse("/").unwrap().generate(&params(&[]), true).unwrap();
        assert_eq!(path, "/");
        let (path, _) = Pattern::parse("").unwrap().generate(&params(&[]), true).unwrap();
        assert_eq!(path, "");
    }

    #[test]
    fn test_generate_encodes_values() {
        let pattern = Pattern::parse("/docs/*slug").unwrap();
        let values = params(&[("slug", "a b/c")]);

        let (path, _) = pattern.generate(&values, true).unwrap();
        assert_eq!(path, "/docs/a%20b/c");

        let (path, _) = pattern.generate(&values, false).unwrap();
        assert_eq!(path, "/docs/a b/c");
    }

    #[test]
    fn test_generate_skips_absent_optional() {
        let pattern = Pattern::parse("/posts/:page?").unwrap();
        let (path, used) = pattern.generate(&params(&[]), true).unwrap();
        assert_eq!(path, "/posts");
        assert!(used.is_empty());
    }
}
