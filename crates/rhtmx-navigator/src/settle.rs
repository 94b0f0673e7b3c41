//! Settlement gate
//!
//! A nested location is resolved by visiting every matching ancestor before
//! the node that fully accounts for the path. Only that last node is the
//! user-visible page; the gate tells the two apart using nothing but the
//! context of the current invocation.

use crate::path::{join_path, paths_equal};
use crate::request::ResolveContext;

/// Outcome of the gate for one matched node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    /// The node accounts for the whole pathname
    Settled,
    /// The node is an ancestor of a deeper match
    Intermediate,
}

impl Settlement {
    pub fn is_settled(self) -> bool {
        self == Settlement::Settled
    }
}

/// Decides whether the node described by `context` is the terminal match
///
/// - An empty matched segment always settles.
/// - Otherwise the node settles iff `base_url + matched_path` equals the
///   request pathname, ignoring one trailing slash on either side.
///
/// # Examples
///
/// ```
/// use rhtmx_navigator::settle::{evaluate, Settlement};
/// use rhtmx_navigator::ResolveContext;
///
/// let ancestor = ResolveContext {
///     pathname: "/fruits/apple".to_string(),
///     matched_path: "/fruits".to_string(),
///     ..ResolveContext::default()
/// };
/// assert_eq!(evaluate(&ancestor), Settlement::Intermediate);
///
/// let leaf = ResolveContext {
///     pathname: "/fruits/apple".to_string(),
///     base_url: "/fruits".to_string(),
///     matched_path: "/apple".to_string(),
///     ..ResolveContext::default()
/// };
/// assert_eq!(evaluate(&leaf), Settlement::Settled);
/// ```
pub fn evaluate(context: &ResolveContext) -> Settlement {
    if context.matched_path.is_empty() {
        return Settlement::Settled;
    }

    let full = join_path(&context.base_url, &context.matched_path);
    if paths_equal(&full, &context.pathname) {
        Settlement::Settled
    } else {
        Settlement::Intermediate
    }
}
