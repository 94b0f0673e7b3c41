//! Reverse routing: route name + parameters to URL

use std::collections::HashMap;

use crate::config::GenerateUrlsOptions;
use crate::error::NavError;
use crate::path::trim_trailing_slash;
use crate::request::Params;
use crate::route::pattern::Pattern;
use crate::route::tree::RouteNode;

/// Generates URLs for named routes
///
/// Full patterns (ancestor paths joined with the node's own) are compiled
/// once, up front.
///
/// # Examples
///
/// ```
/// use rhtmx_navigator::{build, GenerateUrlsOptions, Params, RouteMap, UrlGenerator};
///
/// let nodes = build(&RouteMap::new().route("/hello/:name", "hello")).unwrap();
/// let urls = UrlGenerator::new(&nodes, &GenerateUrlsOptions::default()).unwrap();
///
/// let params: Params = [("name".to_string(), "John".to_string())].into();
/// assert_eq!(urls.generate("hello", &params).unwrap(), "/hello/John");
/// ```
#[derive(Debug, Clone)]
pub struct UrlGenerator {
    routes: HashMap<String, Pattern>,
    base_url: String,
    encode: bool,
    stringify_query_params: bool,
}

impl UrlGenerator {
    /// Indexes every node of the tree by name
    ///
    /// # Errors
    ///
    /// - [`NavError::DuplicateRouteName`] when two nodes share a name
    /// - [`NavError::InvalidPattern`] when a full pattern fails to compile
    pub fn new(nodes: &[RouteNode], options: &GenerateUrlsOptions) -> Result<Self, NavError> {
        let mut routes = HashMap::new();

        for root in nodes {
            for (full, node) in root.walk("") {
                if routes.contains_key(&node.name) {
                    return Err(NavError::DuplicateRouteName {
                        name: node.name.clone(),
                        path: full,
                    });
                }
                let pattern = Pattern::parse(&full)?;
                routes.insert(node.name.clone(), pattern);
            }
        }

        Ok(Self {
            routes,
            base_url: trim_trailing_slash(options.base_url.as_deref().unwrap_or("")).to_string(),
            encode: options.encode,
            stringify_query_params: options.stringify_query_params,
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.routes.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Generates the URL of route `name`
    ///
    /// # Errors
    ///
    /// - [`NavError::UnknownRoute`] when no route is called `name`
    /// - [`NavError::MissingParam`] when a required parameter is absent
    pub fn generate(&self, name: &str, params: &Params) -> Result<String, NavError> {
        let pattern = self
            .routes
            .get(name)
            .ok_or_else(|| NavError::UnknownRoute(name.to_string()))?;

        let (path, used) =
            pattern
                .generate(params, self.encode)
                .map_err(|param| NavError::MissingParam {
                    route: name.to_string(),
                    param: param.to_string(),
                })?;

        let mut url = format!("{}{}", self.base_url, path);
        if url.is_empty() {
            url.push('/');
        }

        if self.stringify_query_params {
            let query: Vec<String> = params
                .iter()
                .filter(|(key, _)| !used.iter().any(|name| *name == key.as_str()))
                .map(|(key, value)| {
                    if self.encode {
                        format!("{}={}", urlencoding::encode(key), urlencoding::encode(value))
                    } else {
                        format!("{}={}", key, value)
                    }
                })
                .collect();

            if !query.is_empty() {
                url.push('?');
                url.push_str(&query.join("&"));
            }
        }

        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::def::{RouteDef, RouteMap};
    use crate::route::tree::build;

    fn params(pairs: &[(&str, &str)]) -> Params {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn generator(routes: &RouteMap, options: GenerateUrlsOptions) -> UrlGenerator {
        UrlGenerator::new(&build(routes).unwrap(), &options).unwrap()
    }

    fn routes() -> RouteMap {
        RouteMap::new()
            .route("", "homepage")
            .route("/hello/:name", "hello")
            .route("/docs/*path", "docs")
            .route("/posts/:id?", "posts")
            .route(
                "/fruits",
                RouteDef::named("fruits").with_children(
                    RouteMap::new()
                        .route("", "fruits:homepage")
                        .route("/apple", "fruits:apple"),
                ),
            )
    }

    #[test]
    fn test_static_and_root() {
        let urls = generator(&routes(), GenerateUrlsOptions::default());
        assert_eq!(urls.generate("homepage", &Params::new()).unwrap(), "/");
        assert_eq!(urls.generate("fruits", &Params::new()).unwrap(), "/fruits");
    }

    #[test]
    fn test_nested_routes() {
        let urls = generator(&routes(), GenerateUrlsOptions::default());
        assert_eq!(urls.generate("fruits:apple", &Params::new()).unwrap(), "/fruits/apple");
        assert_eq!(urls.generate("fruits:homepage", &Params::new()).unwrap(), "/fruits");
    }

    #[test]
    fn test_params_and_encoding() {
        let urls = generator(&routes(), GenerateUrlsOptions::default());
        assert_eq!(
            urls.generate("hello", &params(&[("name", "John Doe")])).unwrap(),
            "/hello/John%20Doe"
        );
        assert_eq!(
            urls.generate("docs", &params(&[("path", "guide/intro")])).unwrap(),
            "/docs/guide/intro"
        );
        assert_eq!(urls.generate("posts", &Params::new()).unwrap(), "/posts");
        assert_eq!(urls.generate("posts", &params(&[("id", "7")])).unwrap(), "/posts/7");
    }

    #[test]
    fn test_encoding_disabled() {
        let options = GenerateUrlsOptions {
            encode: false,
            ..GenerateUrlsOptions::default()
        };
        let urls = generator(&routes(), options);
        assert_eq!(
            urls.generate("hello", &params(&[("name", "John Doe")])).unwrap(),
            "/hello/John Doe"
        );
    }

    #[test]
    fn test_unknown_route() {
        let urls = generator(&routes(), GenerateUrlsOptions::default());
        assert!(matches!(
            urls.generate("unknown-name", &Params::new()),
            Err(NavError::UnknownRoute(name)) if name == "unknown-name"
        ));
    }

    #[test]
    fn test_missing_param() {
        let urls = generator(&routes(), GenerateUrlsOptions::default());
        assert!(matches!(
            urls.generate("hello", &Params::new()),
            Err(NavError::MissingParam { route, param }) if route == "hello" && param == "name"
        ));
    }

    #[test]
    fn test_stringify_query_params() {
        let options = GenerateUrlsOptions {
            stringify_query_params: true,
            ..GenerateUrlsOptions::default()
        };
        let urls = generator(&routes(), options);

        assert_eq!(
            urls.generate("hello", &params(&[("name", "John"), ("page", "2"), ("q", "a b")]))
                .unwrap(),
            "/hello/John?page=2&q=a%20b"
        );
        assert_eq!(urls.generate("hello", &params(&[("name", "John")])).unwrap(), "/hello/John");
    }

    #[test]
    fn test_leftovers_dropped_by_default() {
        let urls = generator(&routes(), GenerateUrlsOptions::default());
        assert_eq!(
            urls.generate("hello", &params(&[("name", "John"), ("page", "2")])).unwrap(),
            "/hello/John"
        );
    }

    #[test]
    fn test_base_url_prefix() {
        let options = GenerateUrlsOptions {
            base_url: Some("/app/".to_string()),
            ..GenerateUrlsOptions::default()
        };
        let urls = generator(&routes(), options);
        assert_eq!(urls.generate("homepage", &Params::new()).unwrap(), "/app");
        assert_eq!(
            urls.generate("hello", &params(&[("name", "John")])).unwrap(),
            "/app/hello/John"
        );
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let routes = RouteMap::new()
            .route("/a", "same")
            .route("/b", RouteDef::named("b").with_children(RouteMap::new().route("/c", "same")));
        assert!(matches!(
            UrlGenerator::new(&build(&routes).unwrap(), &GenerateUrlsOptions::default()),
            Err(NavError::DuplicateRouteName { name, .. }) if name == "same"
        ));
    }
}
