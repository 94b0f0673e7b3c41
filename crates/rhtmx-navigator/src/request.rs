//! Locations, resolution contexts and the request handed to applications

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::path::{join_path, split_url};
use crate::route::def::RouteData;
use crate::store::StoreHandle;

/// Path parameters extracted by a match, keyed by parameter name
pub type Params = BTreeMap<String, String>;

// ============================================================================
// Location
// ============================================================================

/// A URL split into pathname and query string
///
/// # Examples
///
/// ```
/// use rhtmx_navigator::Location;
///
/// let location = Location::parse("/hello/John?a=b&c=d");
/// assert_eq!(location.pathname, "/hello/John");
/// assert_eq!(location.query_string.as_deref(), Some("a=b&c=d"));
///
/// assert_eq!(Location::parse("hello").pathname, "/hello");
/// assert_eq!(Location::parse("").pathname, "");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    pub pathname: String,
    pub query_string: Option<String>,
}

impl Location {
    /// Parses a URL; a relative pathname gets a leading `/`
    pub fn parse(url: &str) -> Self {
        let (pathname, query) = split_url(url);

        let pathname = if pathname.is_empty() || pathname.starts_with('/') {
            pathname.to_string()
        } else {
            format!("/{}", pathname)
        };

        Self {
            pathname,
            query_string: query.map(str::to_string),
        }
    }

    /// Reassembles the URL (`pathname[?query]`)
    pub fn to_url(&self) -> String {
        match &self.query_string {
            Some(query) => format!("{}?{}", self.pathname, query),
            None => self.pathname.clone(),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_url())
    }
}

// ============================================================================
// Resolve Context
// ============================================================================

/// What the resolver knows when it reaches one node of the tree
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveContext {
    /// Full request pathname
    pub pathname: String,
    /// Query string of the request, never empty
    pub query_string: Option<String>,
    /// Path already consumed by ancestors (plus the router's mount prefix)
    pub base_url: String,
    /// Path consumed by this node's own pattern
    pub matched_path: String,
    /// Name of the node being resolved; `None` outside of a match
    pub route_name: Option<String>,
}

impl ResolveContext {
    /// Context for a location before (or without) any match
    pub fn root(location: &Location, base_url: &str) -> Self {
        Self {
            pathname: location.pathname.clone(),
            query_string: location.query_string.clone(),
            base_url: base_url.to_string(),
            matched_path: String::new(),
            route_name: None,
        }
    }

    /// `base_url` followed by `matched_path`
    pub fn full_path(&self) -> String {
        join_path(&self.base_url, &self.matched_path)
    }
}

// ============================================================================
// Route Match & Request
// ============================================================================

/// The matched route: its frozen data and the decoded path parameters
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteMatch {
    pub data: Arc<RouteData>,
    #[serde(rename = "pathParams")]
    pub path_params: Params,
}

/// Request produced for every resolution and passed to the application
///
/// Serializes as `{"match"?: {...}, "queryString"?: "..."}`. The context and
/// the store handle never serialize, and an absent facet never shows up as an
/// empty value. The store handle is only reachable through [`Request::store`].
#[derive(Clone, Serialize)]
pub struct Request {
    #[serde(skip)]
    pub context: ResolveContext,
    #[serde(rename = "match", skip_serializing_if = "Option::is_none")]
    pub matched: Option<RouteMatch>,
    #[serde(rename = "queryString", skip_serializing_if = "Option::is_none")]
    pub query_string: Option<String>,
    #[serde(skip)]
    store: Option<StoreHandle>,
}

impl Request {
    /// Raw match for a resolved node
    pub fn matched(context: ResolveContext, matched: RouteMatch) -> Self {
        Self {
            context,
            matched: Some(matched),
            query_string: None,
            store: None,
        }
    }

    /// Request without a match (handed to the not-found handler)
    pub fn empty(context: ResolveContext) -> Self {
        Self {
            context,
            matched: None,
            query_string: None,
            store: None,
        }
    }

    pub fn with_query_string(self, query_string: impl Into<String>) -> Self {
        Self {
            query_string: Some(query_string.into()),
            ..self
        }
    }

    pub fn with_store(self, store: StoreHandle) -> Self {
        Self {
            store: Some(store),
            ..self
        }
    }

    /// State container attached by the store enricher, if any
    pub fn store(&self) -> Option<&StoreHandle> {
        self.store.as_ref()
    }

    pub fn route_name(&self) -> Option<&str> {
        self.matched.as_ref().map(|m| m.data.name.as_str())
    }

    pub fn data(&self) -> Option<&RouteData> {
        self.matched.as_ref().map(|m| m.data.as_ref())
    }

    pub fn path_params(&self) -> Option<&Params> {
        self.matched.as_ref().map(|m| &m.path_params)
    }
}

impl PartialEq for Request {
    fn eq(&self, other: &Self) -> bool {
        self.context == other.context
            && self.matched == other.matched
            && self.query_string == other.query_string
    }
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("context", &self.context)
            .field("matched", &self.matched)
            .field("query_string", &self.query_string)
            .field("store", &self.store.as_ref().map(|_| ".."))
            .finish()
    }
}
