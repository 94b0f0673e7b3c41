//! Route definitions as supplied by the application
//!
//! A route table maps path patterns to either a bare route name or a record
//! carrying a name, arbitrary payload and optional children. Definitions are
//! normalized exactly once, when the tree is built, into [`RouteData`].

use std::fmt;
use std::sync::Arc;

use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::request::Request;

// ============================================================================
// Handler
// ============================================================================

/// Callback embedded in route data
///
/// Invoked by the default change handler when its route is matched.
#[derive(Clone)]
pub struct Handler(Arc<dyn Fn(Request) + Send + Sync>);

impl Handler {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Request) + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn call(&self, request: Request) {
        (self.0)(request)
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Handler(..)")
    }
}

impl PartialEq for Handler {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

// ============================================================================
// Route Data (normalized)
// ============================================================================

/// Canonical, normalized route data carried by a matched request
///
/// Serializes as `{"name": ..., ...payload}`. The handler never serializes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteData {
    pub name: String,
    #[serde(flatten)]
    pub payload: Map<String, Value>,
    #[serde(skip)]
    pub handler: Option<Handler>,
}

impl RouteData {
    /// Looks up a payload value by key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.payload.get(key)
    }
}

// ============================================================================
// Route Definitions (user input)
// ============================================================================

/// Full route record: name, payload, handler and nested routes
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct RouteRecord {
    pub name: String,
    #[serde(default)]
    pub children: Option<RouteMap>,
    #[serde(skip)]
    pub handler: Option<Handler>,
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

/// A route definition: a bare name or a full record
///
/// # Examples
///
/// ```
/// use rhtmx_navigator::RouteDef;
/// use serde_json::json;
///
/// let bare: RouteDef = "homepage".into();
/// assert_eq!(bare.name(), "homepage");
///
/// let record = RouteDef::named("extra-data").with("addition", "val");
/// assert_eq!(record.name(), "extra-data");
///
/// let parsed: RouteDef = serde_json::from_value(json!({"name": "hello", "title": "Hi"})).unwrap();
/// assert_eq!(parsed.name(), "hello");
/// ```
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(untagged)]
pub enum RouteDef {
    Name(String),
    Record(RouteRecord),
}

impl RouteDef {
    /// Starts a full record with the given name
    pub fn named(name: impl Into<String>) -> Self {
        RouteDef::Record(RouteRecord {
            name: name.into(),
            ..RouteRecord::default()
        })
    }

    pub fn name(&self) -> &str {
        match self {
            RouteDef::Name(name) => name,
            RouteDef::Record(record) => &record.name,
        }
    }

    pub fn children(&self) -> Option<&RouteMap> {
        match self {
            RouteDef::Name(_) => None,
            RouteDef::Record(record) => record.children.as_ref(),
        }
    }

    fn into_record(self) -> RouteRecord {
        match self {
            RouteDef::Name(name) => RouteRecord {
                name,
                ..RouteRecord::default()
            },
            RouteDef::Record(record) => record,
        }
    }

    /// Adds an arbitrary payload entry
    pub fn with(self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut record = self.into_record();
        record.payload.insert(key.into(), value.into());
        RouteDef::Record(record)
    }

    /// Attaches a handler called by the default change handler
    pub fn with_handler<F>(self, handler: F) -> Self
    where
        F: Fn(Request) + Send + Sync + 'static,
    {
        let mut record = self.into_record();
        record.handler = Some(Handler::new(handler));
        RouteDef::Record(record)
    }

    /// Nests a route table under this route
    pub fn with_children(self, children: RouteMap) -> Self {
        let mut record = self.into_record();
        record.children = Some(children);
        RouteDef::Record(record)
    }

    /// Normalizes into the canonical record shape (children excluded)
    pub(crate) fn to_data(&self) -> RouteData {
        match self {
            RouteDef::Name(name) => RouteData {
                name: name.clone(),
                payload: Map::new(),
                handler: None,
            },
            RouteDef::Record(record) => RouteData {
                name: record.name.clone(),
                payload: record.payload.clone(),
                handler: record.handler.clone(),
            },
        }
    }
}

impl From<&str> for RouteDef {
    fn from(name: &str) -> Self {
        RouteDef::Name(name.to_string())
    }
}

impl From<String> for RouteDef {
    fn from(name: String) -> Self {
        RouteDef::Name(name)
    }
}

// ============================================================================
// Route Map
// ============================================================================

/// Ordered table of path patterns to route definitions
///
/// Declaration order is kept, including when deserialized, because sibling
/// paths of equal depth are tried in that order.
///
/// # Examples
///
/// ```
/// use rhtmx_navigator::{RouteDef, RouteMap};
///
/// let routes = RouteMap::new()
///     .route("", "homepage")
///     .route("/hello/:name", "hello")
///     .route(
///         "/fruits",
///         RouteDef::named("fruits").with_children(
///             RouteMap::new()
///                 .route("", "fruits:homepage")
///                 .route("/apple", "fruits:apple"),
///         ),
///     );
///
/// let paths: Vec<&str> = routes.iter().map(|(path, _)| path).collect();
/// assert_eq!(paths, vec!["", "/hello/:name", "/fruits"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RouteMap {
    entries: Vec<(String, RouteDef)>,
}

impl RouteMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a route (builder form of [`RouteMap::insert`])
    pub fn route(mut self, path: impl Into<String>, def: impl Into<RouteDef>) -> Self {
        self.insert(path, def);
        self
    }

    /// Adds a route, replacing an existing definition for the same path in place
    pub fn insert(&mut self, path: impl Into<String>, def: impl Into<RouteDef>) {
        let path = path.into();
        let def = def.into();

        match self.entries.iter_mut().find(|(existing, _)| *existing == path) {
            Some(entry) => entry.1 = def,
            None => self.entries.push((path, def)),
        }
    }

    pub fn get(&self, path: &str) -> Option<&RouteDef> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == path)
            .map(|(_, def)| def)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RouteDef)> {
        self.entries.iter().map(|(path, def)| (path.as_str(), def))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<P, D> FromIterator<(P, D)> for RouteMap
where
    P: Into<String>,
    D: Into<RouteDef>,
{
    fn from_iter<I: IntoIterator<Item = (P, D)>>(iter: I) -> Self {
        let mut map = RouteMap::new();
        for (path, def) in iter {
            map.insert(path, def);
        }
        map
    }
}

impl<'de> Deserialize<'de> for RouteMap {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct RouteMapVisitor;

        impl<'de> Visitor<'de> for RouteMapVisitor {
            type Value = RouteMap;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a table of route paths to route definitions")
            }

            fn visit_map<A>(self, mut access: A) -> Result<RouteMap, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut map = RouteMap::new();
                while let Some((path, def)) = access.next_entry::<String, RouteDef>()? {
                    map.insert(path, def);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(RouteMapVisitor)
    }
}
