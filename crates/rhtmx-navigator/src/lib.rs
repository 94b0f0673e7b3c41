//! # RHTMX Navigator
//!
//! A client-side navigation engine with support for:
//! - Nested route tables (`/fruits` → `/fruits/apple`)
//! - Dynamic parameters (`/hello/:name`)
//! - Optional parameters (`/posts/:id?`)
//! - Catch-all routes (`/docs/*path`)
//! - Reverse routing (`path_for("hello", {name})` → `/hello/John`)
//! - History-synchronized navigation (`nav`, `redirect`, back/forward)
//!
//! ## Pipeline
//!
//! Every navigation runs the same synchronous pass:
//! - **Route tree** built once from a [`RouteMap`], siblings ordered deepest first
//! - **Resolver** walks the tree root to leaf, matching path prefixes
//! - **Enricher chain** decorates each raw match (query string, store handle, ...)
//! - **Settlement gate** tells the terminal match from its ancestors
//! - **Facade** dispatches `CHANGE_PAGE` for the settled page and calls back
//!   into the application
//!
//! ## Nested Routes
//!
//! A parent route matches a *prefix* of the location. Resolving
//! `/fruits/apple` visits `fruits` first, then `fruits:apple`; only the latter
//! settles, so a configured store sees exactly one page change.
//!
//! An empty path (`""`) matches anything its parent left over, which makes a
//! root-level `""` route the catch-all for unknown locations.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use rhtmx_navigator::store::PageStore;
//! use rhtmx_navigator::{create, RouteDef, RouteMap, RouterOptions};
//!
//! let routes = RouteMap::new()
//!     .route("", "homepage")
//!     .route("/hello/:name", "hello")
//!     .route(
//!         "/fruits",
//!         RouteDef::named("fruits").with_children(RouteMap::new().route("/apple", "fruits:apple")),
//!     );
//!
//! let store = Arc::new(PageStore::new());
//! let router = create(RouterOptions::new(routes).store(store.clone()).current_url("/")).unwrap();
//!
//! router.nav("/fruits/apple");
//! assert_eq!(store.page().unwrap().name, "fruits:apple");
//! assert_eq!(router.path_for("fruits:apple").unwrap(), "/fruits/apple");
//! ```

// ============================================================================
// Module Declarations
// ============================================================================

pub mod config;
pub mod engine;
pub mod enrich;
pub mod error;
pub mod history;
pub mod path;
pub mod request;
pub mod route;
pub mod router;
pub mod settle;
pub mod store;

// Re-export public types
pub use config::{GenerateUrlsOptions, NavigatorConfig};
pub use engine::{Resolver, UrlGenerator};
pub use enrich::{Enricher, EnricherChain, QueryStringEnricher, StoreEnricher};
pub use error::{NavError, ResolveError};
pub use history::{History, MemoryHistory};
pub use request::{Location, Params, Request, ResolveContext, RouteMatch};
pub use route::{build, compare_depth, path_depth, Handler, RouteData, RouteDef, RouteMap, RouteNode};
pub use router::{create, RouterHandle, RouterOptions};
pub use settle::Settlement;
pub use store::{Action, Page, PageParams, PageStore, Store, StoreHandle};
