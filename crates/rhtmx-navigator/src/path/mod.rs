//! Path utilities for splitting URLs and comparing pathnames
//!
//! All functions are **pure**: given same input, always produce same output with no side effects.
//! Nothing here allocates unless it has to build a new string.

/// Splits a URL into its pathname and query string
///
/// The fragment (`#...`) is dropped. An empty query (`/path?`) yields `None`
/// so that callers never see an empty-string query.
///
/// # Examples
///
/// ```
/// use rhtmx_navigator::path::split_url;
///
/// assert_eq!(split_url("/hello/John?a=b&c=d"), ("/hello/John", Some("a=b&c=d")));
/// assert_eq!(split_url("/hello/John"), ("/hello/John", None));
/// assert_eq!(split_url("/hello?"), ("/hello", None));
/// assert_eq!(split_url("/docs#intro"), ("/docs", None));
/// ```
pub fn split_url(url: &str) -> (&str, Option<&str>) {
    let without_fragment = url.split_once('#').map(|(head, _)| head).unwrap_or(url);

    match without_fragment.split_once('?') {
        Some((pathname, query)) if !query.is_empty() => (pathname, Some(query)),
        Some((pathname, _)) => (pathname, None),
        None => (without_fragment, None),
    }
}

/// Resolves `url` against the `current` entry, the way a browser resolves a
/// `pushState` URL against the document location
///
/// - absolute paths (`/...`) are kept as given
/// - a query (`?...`) or fragment (`#...`) keeps the current pathname
/// - a relative path replaces the last segment of the current pathname, with
///   `.` and `..` segments collapsed
/// - an empty URL stays on the current entry
///
/// # Examples
///
/// ```
/// use rhtmx_navigator::path::resolve_url;
///
/// assert_eq!(resolve_url("/hello/John", "?page=2"), "/hello/John?page=2");
/// assert_eq!(resolve_url("/hello/John?a=b", "#top"), "/hello/John?a=b#top");
/// assert_eq!(resolve_url("/hello/John", "Jane"), "/hello/Jane");
/// assert_eq!(resolve_url("/fruits/apple/red", "../banana"), "/fruits/banana");
/// assert_eq!(resolve_url("/hello/John", "/fruits"), "/fruits");
/// ```
pub fn resolve_url(current: &str, url: &str) -> String {
    if url.starts_with('/') {
        return url.to_string();
    }

    let without_fragment = current.split_once('#').map(|(head, _)| head).unwrap_or(current);
    if url.is_empty() {
        return current.to_string();
    }
    if url.starts_with('#') {
        return join_path(without_fragment, url);
    }

    let (pathname, _) = split_url(current);
    if url.starts_with('?') {
        return join_path(pathname, url);
    }

    let split = url.find(['?', '#']).unwrap_or(url.len());
    let (relative, suffix) = url.split_at(split);
    let directory = pathname.rfind('/').map(|end| &pathname[..end]).unwrap_or("");

    let mut segments: Vec<&str> = directory.split('/').filter(|s| !s.is_empty()).collect();
    let mut parts = relative.split('/').peekable();
    while let Some(part) = parts.next() {
        let last = parts.peek().is_none();
        match part {
            "." => {}
            ".." => {
                segments.pop();
            }
            _ => segments.push(part),
        }
        // "a/.." and "a/." address a directory
        if last && (part == "." || part == "..") {
            segments.push("");
        }
    }

    let mut resolved = String::with_capacity(pathname.len() + url.len());
    for segment in segments {
        resolved.push('/');
        resolved.push_str(segment);
    }
    if resolved.is_empty() {
        resolved.push('/');
    }
    resolved.push_str(suffix);
    resolved
}

/// Strips a single trailing `/` (zero-copy)
///
/// `"/"` becomes `""`, which is how the root is spelled in route tables.
///
/// # Examples
///
/// ```
/// use rhtmx_navigator::path::trim_trailing_slash;
///
/// assert_eq!(trim_trailing_slash("/fruits/"), "/fruits");
/// assert_eq!(trim_trailing_slash("/fruits"), "/fruits");
/// assert_eq!(trim_trailing_slash("/"), "");
/// assert_eq!(trim_trailing_slash("/a//"), "/a/");
/// ```
pub fn trim_trailing_slash(path: &str) -> &str {
    path.strip_suffix('/').unwrap_or(path)
}

/// Compares two pathnames after trimming one trailing slash from each
///
/// Percent-encoded characters are compared as-is: `/a%20b` and `/a b` differ.
pub fn paths_equal(a: &str, b: &str) -> bool {
    trim_trailing_slash(a) == trim_trailing_slash(b)
}

/// Concatenates a base URL and a matched path segment
pub fn join_path(base: &str, segment: &str) -> String {
    let mut joined = String::with_capacity(base.len() + segment.len());
    joined.push_str(base);
    joined.push_str(segment);
    joined
}

/// Returns the length of the next path segment in `rest`
///
/// `rest` is expected to start right after a `/`. The segment ends at the next
/// `/` or at the end of the input.
pub(crate) fn segment_len(rest: &str) -> usize {
    rest.find('/').unwrap_or(rest.len())
}
