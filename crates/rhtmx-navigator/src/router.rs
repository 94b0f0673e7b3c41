//! Navigation facade
//!
//! [`create`] wires the tree, resolver, URL generator, enrichment chain and
//! history surface together and hands back a [`RouterHandle`]. Every resolution
//! runs synchronously inside the call that triggered it: construction, a
//! navigation method, or a history traversal.
//!
//! ```
//! use std::sync::{Arc, Mutex};
//! use rhtmx_navigator::{create, Request, RouteMap, RouterOptions};
//!
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&seen);
//!
//! let router = create(
//!     RouterOptions::new(RouteMap::new().route("", "homepage").route("/hello/:name", "hello"))
//!         .current_url("/")
//!         .on_change(move |request: Request| {
//!             sink.lock().unwrap().push(request.route_name().unwrap_or_default().to_string());
//!         }),
//! )
//! .unwrap();
//!
//! router.nav("/hello/John");
//! assert_eq!(*seen.lock().unwrap(), vec!["homepage", "hello"]);
//! router.destroy();
//! ```

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};

use crate::config::{GenerateUrlsOptions, NavigatorConfig};
use crate::engine::{Resolver, UrlGenerator};
use crate::enrich::{Enricher, EnricherChain, QueryStringEnricher, StoreEnricher};
use crate::error::NavError;
use crate::history::{History, ListenerId, MemoryHistory};
use crate::path::trim_trailing_slash;
use crate::request::{Location, Params, Request, ResolveContext};
use crate::route::def::RouteMap;
use crate::route::tree::build;
use crate::settle::evaluate;
use crate::store::{Action, Page, StoreHandle};

/// Application callback invoked for every matched node
pub type ChangeHandler = Arc<dyn Fn(Request) + Send + Sync>;

/// Callback invoked with an unmatched request
pub type NotFoundHandler = Arc<dyn Fn(Request) + Send + Sync>;

/// Replaces history mutation for `nav` and `redirect`
pub type NavHandler = Arc<dyn Fn(&str) + Send + Sync>;

// ============================================================================
// Options
// ============================================================================

/// Construction options for [`create`]
pub struct RouterOptions {
    routes: RouteMap,
    on_change: Option<ChangeHandler>,
    not_found_handler: Option<NotFoundHandler>,
    nav_handler: Option<NavHandler>,
    current_url: Option<String>,
    store: Option<StoreHandle>,
    generate_urls_options: GenerateUrlsOptions,
    history: Option<Arc<dyn History>>,
    base_url: String,
    enrichers: Vec<Box<dyn Enricher>>,
}

impl RouterOptions {
    pub fn new(routes: RouteMap) -> Self {
        Self {
            routes,
            on_change: None,
            not_found_handler: None,
            nav_handler: None,
            current_url: None,
            store: None,
            generate_urls_options: GenerateUrlsOptions::default(),
            history: None,
            base_url: String::new(),
            enrichers: Vec::new(),
        }
    }

    /// Route table, mount prefix and URL options from a loaded config
    pub fn from_config(config: NavigatorConfig) -> Self {
        let options = Self::new(config.routes).generate_urls_options(config.generate_urls);
        match config.base_url {
            Some(base_url) => options.base_url(base_url),
            None => options,
        }
    }

    /// Replaces the default change handler (which calls the route's own handler)
    pub fn on_change<F>(mut self, on_change: F) -> Self
    where
        F: Fn(Request) + Send + Sync + 'static,
    {
        self.on_change = Some(Arc::new(on_change));
        self
    }

    pub fn not_found_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(Request) + Send + Sync + 'static,
    {
        self.not_found_handler = Some(Arc::new(handler));
        self
    }

    /// Hands `nav`/`redirect` URLs to `handler` instead of the history
    pub fn nav_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.nav_handler = Some(Arc::new(handler));
        self
    }

    /// URL resolved at construction instead of the history's location
    pub fn current_url(mut self, url: impl Into<String>) -> Self {
        self.current_url = Some(url.into());
        self
    }

    pub fn store(mut self, store: StoreHandle) -> Self {
        self.store = Some(store);
        self
    }

    pub fn generate_urls_options(mut self, options: GenerateUrlsOptions) -> Self {
        self.generate_urls_options = options;
        self
    }

    pub fn history(mut self, history: Arc<dyn History>) -> Self {
        self.history = Some(history);
        self
    }

    /// Mounts every route under `base_url` (e.g., "/app")
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = trim_trailing_slash(&base_url.into()).to_string();
        self
    }

    /// Appends an enrichment step after the built-in ones
    pub fn enricher(mut self, enricher: impl Enricher + 'static) -> Self {
        self.enrichers.push(Box::new(enricher));
        self
    }
}

impl fmt::Debug for RouterOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouterOptions")
            .field("routes", &self.routes.len())
            .field("current_url", &self.current_url)
            .field("base_url", &self.base_url)
            .field("generate_urls_options", &self.generate_urls_options)
            .field("on_change", &self.on_change.is_some())
            .field("not_found_handler", &self.not_found_handler.is_some())
            .field("nav_handler", &self.nav_handler.is_some())
            .field("store", &self.store.is_some())
            .field("history", &self.history.is_some())
            .field("enrichers", &self.enrichers.len())
            .finish()
    }
}

// ============================================================================
// Router
// ============================================================================

struct Inner {
    resolver: Resolver,
    urls: UrlGenerator,
    chain: EnricherChain,
    history: Arc<dyn History>,
    on_change: Option<ChangeHandler>,
    not_found_handler: Option<NotFoundHandler>,
    nav_handler: Option<NavHandler>,
    destroyed: AtomicBool,
    listener: Mutex<Option<ListenerId>>,
}

impl Inner {
    fn is_destroyed(&self) -> bool {
        self.destroyed.load(Ordering::SeqCst)
    }

    /// One resolution pass over `url`
    fn resolve(&self, url: &str) {
        let location = Location::parse(url);
        tracing::debug!("Resolving {}", location);

        let result = self.resolver.resolve(&location, |context, node, params| {
            let request = self.chain.apply(node.action(context, params), context);
            let settled = evaluate(context).is_settled();

            tracing::debug!(
                route = %node.name,
                matched = %context.full_path(),
                settled,
                "route action"
            );

            if settled {
                if let Some(store) = request.store() {
                    store.dispatch(Action::ChangePage(Page::from_request(&request)));
                }
            }

            self.change(request);
            settled.then_some(())
        });

        if let Err(err) = result {
            if err.is_not_found() {
                self.not_found(&location);
            } else {
                tracing::error!("Failed to resolve {}: {}", location, err);
            }
        }
    }

    fn change(&self, request: Request) {
        match &self.on_change {
            Some(on_change) => on_change(request),
            None => {
                let handler = request.data().and_then(|data| data.handler.clone());
                if let Some(handler) = handler {
                    handler.call(request);
                }
            }
        }
    }

    fn not_found(&self, location: &Location) {
        match &self.not_found_handler {
            Some(handler) => {
                let context = ResolveContext::root(location, self.resolver.base_url());
                handler(self.chain.apply(Request::empty(context.clone()), &context));
            }
            None => tracing::warn!("No route matches {}", location),
        }
    }

    fn unsubscribe(&self) {
        let id = self
            .listener
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(id) = id {
            self.history.unsubscribe(id);
        }
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

/// Handle to a live router
///
/// Cheap to clone; clones share the same router. Once [`RouterHandle::destroy`]
/// has been called, navigation methods do nothing.
#[derive(Clone)]
pub struct RouterHandle {
    inner: Arc<Inner>,
}

/// Builds a router and resolves its initial location
///
/// # Errors
///
/// - [`NavError::EmptyRouteName`] / [`NavError::DuplicateRouteName`] for a
///   bad route table
/// - [`NavError::InvalidPattern`] for a pattern the resolver cannot compile
pub fn create(options: RouterOptions) -> Result<RouterHandle, NavError> {
    let RouterOptions {
        routes,
        on_change,
        not_found_handler,
        nav_handler,
        current_url,
        store,
        mut generate_urls_options,
        history,
        base_url,
        enrichers,
    } = options;

    let nodes = build(&routes)?;

    if generate_urls_options.base_url.is_none() && !base_url.is_empty() {
        generate_urls_options.base_url = Some(base_url.clone());
    }
    let urls = UrlGenerator::new(&nodes, &generate_urls_options)?;
    let resolver = Resolver::new(nodes, &base_url)?;

    let chain = enrichers.into_iter().fold(
        EnricherChain::builder()
            .step(QueryStringEnricher)
            .step_opt(store.map(StoreEnricher::new)),
        |chain, step| chain.boxed(step),
    );

    let history: Arc<dyn History> = match history {
        Some(history) => history,
        None => {
            let initial = current_url.clone().unwrap_or_else(|| "/".to_string());
            Arc::new(MemoryHistory::new(initial))
        }
    };

    let inner = Arc::new(Inner {
        resolver,
        urls,
        chain: chain.build(),
        history,
        on_change,
        not_found_handler,
        nav_handler,
        destroyed: AtomicBool::new(false),
        listener: Mutex::new(None),
    });

    let weak: Weak<Inner> = Arc::downgrade(&inner);
    let id = inner.history.subscribe(Arc::new(move |location: &str| {
        if let Some(inner) = weak.upgrade() {
            if !inner.is_destroyed() {
                inner.resolve(location);
            }
        }
    }));
    *inner.listener.lock().unwrap_or_else(PoisonError::into_inner) = Some(id);

    tracing::info!(
        "Navigator created with {} routes (base url {:?})",
        inner.urls.len(),
        inner.resolver.base_url()
    );

    let initial = current_url.unwrap_or_else(|| inner.history.location());
    inner.resolve(&initial);

    Ok(RouterHandle { inner })
}

impl RouterHandle {
    /// Pushes `url` onto the history and resolves it
    pub fn nav(&self, url: &str) {
        if self.inner.is_destroyed() {
            return;
        }
        if let Some(handler) = &self.inner.nav_handler {
            handler(url);
            return;
        }
        self.inner.history.push(url);
        self.inner.resolve(&self.inner.history.location());
    }

    /// Replaces the current history entry with `url` and resolves it
    pub fn redirect(&self, url: &str) {
        if self.inner.is_destroyed() {
            return;
        }
        if let Some(handler) = &self.inner.nav_handler {
            handler(url);
            return;
        }
        self.inner.history.replace(url);
        self.inner.resolve(&self.inner.history.location());
    }

    /// Resolves the history's current location again
    pub fn refresh(&self) {
        if self.inner.is_destroyed() {
            return;
        }
        let location = self.inner.history.location();
        self.inner.resolve(&location);
    }

    /// URL of route `name` (no parameters)
    pub fn path_for(&self, name: &str) -> Result<String, NavError> {
        self.path_for_params(name, &Params::new())
    }

    pub fn path_for_params(&self, name: &str, params: &Params) -> Result<String, NavError> {
        self.inner.urls.generate(name, params)
    }

    /// Removes the history listener; later navigation calls do nothing
    ///
    /// Safe to call any number of times.
    pub fn destroy(&self) {
        if self.inner.destroyed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.inner.unsubscribe();
        tracing::info!("Navigator destroyed");
    }

    pub fn is_destroyed(&self) -> bool {
        self.inner.is_destroyed()
    }

    /// The history surface this router navigates
    pub fn history(&self) -> Arc<dyn History> {
        Arc::clone(&self.inner.history)
    }
}

impl fmt::Debug for RouterHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouterHandle")
            .field("base_url", &self.inner.resolver.base_url())
            .field("routes", &self.inner.urls.len())
            .field("destroyed", &self.is_destroyed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::def::RouteDef;
    use crate::store::PageStore;

    type Log = Arc<Mutex<Vec<String>>>;

    fn recording(routes: RouteMap) -> (RouterOptions, Log) {
        let log: Log = Arc::default();
        let sink = Arc::clone(&log);
        let options = RouterOptions::new(routes).on_change(move |request: Request| {
            sink.lock()
                .unwrap()
                .push(request.route_name().unwrap_or("-").to_string());
        });
        (options, log)
    }

    fn routes() -> RouteMap {
        RouteMap::new()
            .route("", "homepage")
            .route("/hello/:name", "hello")
    }

    #[test]
    fn test_initial_resolution_uses_current_url() {
        let (options, log) = recording(routes());
        let _router = create(options.current_url("/hello/John")).unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["hello"]);
    }

    #[test]
    fn test_initial_resolution_uses_history_location() {
        let history = Arc::new(MemoryHistory::new("/hello/Jane"));
        let (options, log) = recording(routes());
        let _router = create(options.history(history)).unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["hello"]);
    }

    #[test]
    fn test_single_listener_per_router() {
        let history = Arc::new(MemoryHistory::new("/"));
        let router = create(RouterOptions::new(routes()).history(history.clone())).unwrap();
        assert_eq!(history.listener_count(), 1);

        router.destroy();
        router.destroy();
        assert_eq!(history.listener_count(), 0);
        assert!(router.is_destroyed());
    }

    #[test]
    fn test_dropping_router_unsubscribes() {
        let history = Arc::new(MemoryHistory::new("/"));
        let router = create(RouterOptions::new(routes()).history(history.clone())).unwrap();
        drop(router);
        assert_eq!(history.listener_count(), 0);
    }

    #[test]
    fn test_store_dispatch_only_when_settled() {
        let store = Arc::new(PageStore::new());
        let routes = RouteMap::new().route(
            "/fruits",
            RouteDef::named("fruits").with_children(RouteMap::new().route("/apple", "fruits:apple")),
        );
        let (options, log) = recording(routes);
        let _router = create(options.store(store.clone()).current_url("/fruits/apple")).unwrap();

        assert_eq!(*log.lock().unwrap(), vec!["fruits", "fruits:apple"]);
        assert_eq!(store.dispatch_count(), 1);
        assert_eq!(store.page().map(|page| page.name), Some("fruits:apple".to_string()));
    }

    #[test]
    fn test_nav_handler_bypasses_history() {
        let urls: Log = Arc::default();
        let sink = Arc::clone(&urls);
        let history = Arc::new(MemoryHistory::new("/"));
        let router = create(
            RouterOptions::new(routes())
                .history(history.clone())
                .nav_handler(move |url| sink.lock().unwrap().push(url.to_string())),
        )
        .unwrap();

        router.nav("/hello/John");
        router.redirect("/hello/Jane");

        assert_eq!(*urls.lock().unwrap(), vec!["/hello/John", "/hello/Jane"]);
        assert_eq!(history.len(), 1);
        assert_eq!(history.location(), "/");
    }

    #[test]
    fn test_base_url_feeds_url_generation() {
        let router = create(RouterOptions::new(routes()).base_url("/app/").current_url("/app")).unwrap();
        let params: Params = [("name".to_string(), "John".to_string())].into();
        assert_eq!(router.path_for_params("hello", &params).unwrap(), "/app/hello/John");
    }

    #[test]
    fn test_create_rejects_bad_tables() {
        let duplicate = RouteMap::new().route("/a", "same").route("/b", "same");
        assert!(matches!(
            create(RouterOptions::new(duplicate)),
            Err(NavError::DuplicateRouteName { .. })
        ));

        let invalid = RouteMap::new().route("/:", "broken");
        assert!(matches!(
            create(RouterOptions::new(invalid)),
            Err(NavError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_handle_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RouterHandle>();
    }
}
