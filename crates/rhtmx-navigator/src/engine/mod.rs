//! Resolution engine
//!
//! Walks the built route tree against a location. Every node matches a
//! *prefix* of what its ancestors left over, so a nested location visits each
//! matching ancestor, root to leaf, before reaching the node that consumes the
//! rest. The caller's hook decides at each node whether the walk is done.
//!
//! # Matching Rules
//!
//! - Siblings are tried in tree order (deepest pattern first, see `route::depth`)
//! - Parameters of ancestors are inherited by descendants
//! - Parameter values are percent-decoded; a malformed encoding aborts the
//!   pass with status 400
//! - A pass in which no hook call settles ends with status 404

pub mod generate;

pub use generate::UrlGenerator;

use crate::error::{NavError, ResolveError};
use crate::path::join_path;
use crate::request::{Location, Params, ResolveContext};
use crate::route::pattern::Pattern;
use crate::route::tree::RouteNode;

/// Compiled patterns, shaped like the route tree they belong to
#[derive(Debug, Clone)]
struct CompiledNode {
    pattern: Pattern,
    children: Vec<CompiledNode>,
}

fn compile(nodes: &[RouteNode]) -> Result<Vec<CompiledNode>, NavError> {
    nodes
        .iter()
        .map(|node| {
            Ok(CompiledNode {
                pattern: Pattern::parse(&node.path)?,
                children: compile(&node.children)?,
            })
        })
        .collect()
}

/// Matches locations against a route tree
///
/// # Examples
///
/// ```
/// use rhtmx_navigator::{build, Location, Resolver, RouteMap};
///
/// let nodes = build(&RouteMap::new().route("", "homepage").route("/hello/:name", "hello")).unwrap();
/// let resolver = Resolver::new(nodes, "").unwrap();
///
/// let name = resolver
///     .resolve(&Location::parse("/hello/John"), |_, node, params| {
///         Some(format!("{} {}", node.name, params["name"]))
///     })
///     .unwrap();
/// assert_eq!(name, "hello John");
/// ```
#[derive(Debug, Clone)]
pub struct Resolver {
    nodes: Vec<RouteNode>,
    compiled: Vec<CompiledNode>,
    base_url: String,
}

impl Resolver {
    /// Compiles every pattern of the tree
    ///
    /// `base_url` is a mount prefix every location must start with.
    ///
    /// # Errors
    ///
    /// [`NavError::InvalidPattern`] for the first pattern that fails to compile.
    pub fn new(nodes: Vec<RouteNode>, base_url: &str) -> Result<Self, NavError> {
        let compiled = compile(&nodes)?;
        Ok(Self {
            nodes,
            compiled,
            base_url: base_url.to_string(),
        })
    }

    pub fn nodes(&self) -> &[RouteNode] {
        &self.nodes
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Runs one resolution pass
    ///
    /// `hook` is invoked once per matched node, root to leaf, with the node's
    /// context and its (inherited + own) parameters. The first `Some` ends the
    /// pass and is returned.
    pub fn resolve<T, F>(&self, location: &Location, mut hook: F) -> Result<T, ResolveError>
    where
        F: FnMut(&ResolveContext, &RouteNode, Params) -> Option<T>,
    {
        let rest = location
            .pathname
            .strip_prefix(self.base_url.as_str())
            .filter(|rest| rest.is_empty() || rest.starts_with('/'))
            .ok_or_else(|| ResolveError::not_found(&location.pathname))?;

        let mut walk = Walk {
            location,
            hook: &mut hook,
        };
        walk.level(&self.nodes, &self.compiled, &self.base_url, rest, &Params::new())?
            .ok_or_else(|| ResolveError::not_found(&location.pathname))
    }
}

/// State shared by every level of one resolution pass
struct Walk<'a, F> {
    location: &'a Location,
    hook: &'a mut F,
}

impl<F> Walk<'_, F> {
    /// Tries the siblings of one level in order, descending into each match
    fn level<T>(
        &mut self,
        nodes: &[RouteNode],
        compiled: &[CompiledNode],
        base_url: &str,
        rest: &str,
        inherited: &Params,
    ) -> Result<Option<T>, ResolveError>
    where
        F: FnMut(&ResolveContext, &RouteNode, Params) -> Option<T>,
    {
        for (node, compiled) in nodes.iter().zip(compiled) {
            let Some(found) = compiled.pattern.match_prefix(rest) else {
                continue;
            };

            let mut params = inherited.clone();
            for (name, raw) in &found.params {
                params.insert(name.to_string(), decode_param(name, raw)?);
            }

            let matched = &rest[..found.len];
            let context = ResolveContext {
                pathname: self.location.pathname.clone(),
                query_string: self.location.query_string.clone(),
                base_url: base_url.to_string(),
                matched_path: matched.to_string(),
                route_name: Some(node.name.clone()),
            };

            tracing::trace!(
                route = %node.name,
                base_url = %base_url,
                matched = %matched,
                "route matched"
            );

            if let Some(result) = (self.hook)(&context, node, params.clone()) {
                return Ok(Some(result));
            }

            let child_base = join_path(base_url, matched);
            let nested = self.level(
                &node.children,
                &compiled.children,
                &child_base,
                &rest[found.len..],
                &params,
            )?;
            if nested.is_some() {
                return Ok(nested);
            }
        }

        Ok(None)
    }
}

fn decode_param(name: &str, raw: &str) -> Result<String, ResolveError> {
    urlencoding::decode(raw)
        .map(|value| value.into_owned())
        .map_err(|_| {
            ResolveError::bad_request(format!(
                "parameter \"{}\" is not valid percent-encoded UTF-8: \"{}\"",
                name, raw
            ))
        })
}
