//! Specificity ordering for sibling route paths
//!
//! Siblings are tried in order, and every node matches a *prefix* of the
//! remaining path, so a shallow pattern declared first would shadow a deeper
//! one. Sorting by depth puts the most specific patterns first.

use std::cmp::Ordering;

use crate::path::trim_trailing_slash;

/// Number of `/`-separated segments after stripping one trailing slash
///
/// The root (`""` or `"/"`) has depth 1.
///
/// # Examples
///
/// ```
/// use rhtmx_navigator::route::depth::path_depth;
///
/// assert_eq!(path_depth(""), 1);
/// assert_eq!(path_depth("/"), 1);
/// assert_eq!(path_depth("/fruits"), 2);
/// assert_eq!(path_depth("/hello/:name"), 3);
/// assert_eq!(path_depth("/hello/:name/"), 3);
/// ```
pub fn path_depth(path: &str) -> usize {
    trim_trailing_slash(path).split('/').count()
}

/// Sort comparator: deeper paths sort first
///
/// Equal depths compare `Equal`, so a stable sort keeps declaration order.
///
/// # Examples
///
/// ```
/// use rhtmx_navigator::route::depth::compare_depth;
///
/// let mut paths = vec!["", "/b", "/a/:id", "/c"];
/// paths.sort_by(|a, b| compare_depth(a, b));
/// assert_eq!(paths, vec!["/a/:id", "/b", "/c", ""]);
/// ```
pub fn compare_depth(a: &str, b: &str) -> Ordering {
    path_depth(b).cmp(&path_depth(a))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_depth() {
        assert_eq!(path_depth(""), 1);
        assert_eq!(path_depth("/"), 1);
    }

    #[test]
    fn test_deeper_sorts_first() {
        assert_eq!(compare_depth("/a/b", "/a"), Ordering::Less);
        assert_eq!(compare_depth("/a", "/a/b"), Ordering::Greater);
        assert_eq!(compare_depth("", "/hello/:name"), Ordering::Greater);
    }

    #[test]
    fn test_equal_depth_is_equal() {
        assert_eq!(compare_depth("/banana", "/apple"), Ordering::Equal);
        assert_eq!(compare_depth("", "/"), Ordering::Equal);
    }

    #[test]
    fn test_stable_order_among_equal_depths() {
        let mut paths = vec!["/banana", "", "/apple", "/x/y", "/cherry"];
        paths.sort_by(|a, b| compare_depth(a, b));
        assert_eq!(paths, vec!["/x/y", "/banana", "/apple", "/cherry", ""]);
    }

    #[test]
    fn test_trailing_slash_does_not_add_depth() {
        assert_eq!(compare_depth("/fruits/", "/fruits"), Ordering::Equal);
    }
}
