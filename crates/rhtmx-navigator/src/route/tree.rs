//! Route tree builder
//!
//! Turns a (possibly nested) [`RouteMap`] into an ordered list of immutable
//! [`RouteNode`]s. Siblings are sorted with [`compare_depth`] so the most
//! specific pattern is tried first at every level.

use std::sync::Arc;

use crate::error::NavError;
use crate::path::{join_path, trim_trailing_slash};
use crate::request::{Params, Request, ResolveContext, RouteMatch};
use crate::route::def::{RouteData, RouteMap};
use crate::route::depth::compare_depth;

/// A built route: path pattern, frozen data and ordered children
///
/// Pattern syntax is not validated here; the resolver compiles and rejects.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteNode {
    pub path: String,
    pub name: String,
    pub data: Arc<RouteData>,
    pub children: Vec<RouteNode>,
}

impl RouteNode {
    /// Produces the raw match for this node
    ///
    /// Uses the data captured at build time, never the caller's route table.
    pub fn action(&self, context: &ResolveContext, path_params: Params) -> Request {
        Request::matched(
            context.clone(),
            RouteMatch {
                data: Arc::clone(&self.data),
                path_params,
            },
        )
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Flattens this node and its descendants (depth-first), each paired
    /// with its full path pattern
    ///
    /// A trailing slash on an ancestor is dropped before its children are
    /// appended, the same way the resolver consumes it.
    pub fn walk(&self, base: &str) -> Vec<(String, &RouteNode)> {
        let full = join_path(trim_trailing_slash(base), &self.path);
        let mut out = vec![(full.clone(), self)];
        for child in &self.children {
            out.extend(child.walk(&full));
        }
        out
    }
}

/// Builds the ordered route tree
///
/// # Errors
///
/// Returns [`NavError::EmptyRouteName`] when a definition has no name.
///
/// # Examples
///
/// ```
/// use rhtmx_navigator::{build, RouteMap};
///
/// let nodes = build(&RouteMap::new().route("", "homepage").route("/hello/:name", "hello")).unwrap();
/// let names: Vec<&str> = nodes.iter().map(|node| node.name.as_str()).collect();
/// assert_eq!(names, vec!["hello", "homepage"]);
/// ```
pub fn build(routes: &RouteMap) -> Result<Vec<RouteNode>, NavError> {
    let mut entries: Vec<_> = routes.iter().collect();
    entries.sort_by(|(a, _), (b, _)| compare_depth(a, b));

    entries
        .into_iter()
        .map(|(path, def)| {
            let data = def.to_data();
            if data.name.is_empty() {
                return Err(NavError::EmptyRouteName {
                    path: path.to_string(),
                });
            }

            let children = match def.children() {
                Some(children) => build(children)?,
                None => Vec::new(),
            };

            Ok(RouteNode {
                path: path.to_string(),
                name: data.name.clone(),
                data: Arc::new(data),
                children,
            })
        })
        .collect()
}
