// File: src/config.rs
// Purpose: Route tables and URL generation options from navigator.toml

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::NavError;
use crate::route::def::RouteMap;

/// Options for reverse routing (`path_for`)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GenerateUrlsOptions {
    /// Prefix prepended to every generated URL (default: router's `base_url`)
    #[serde(default)]
    pub base_url: Option<String>,

    /// Percent-encode parameter values (default: true)
    #[serde(default = "default_true")]
    pub encode: bool,

    /// Append parameters the pattern does not use as a query string
    #[serde(default = "default_false")]
    pub stringify_query_params: bool,
}

/// Navigator configuration
///
/// ```toml
/// base_url = "/app"
///
/// [generate_urls]
/// stringify_query_params = true
///
/// [routes]
/// "" = "homepage"
/// "/hello/:name" = "hello"
///
/// [routes."/fruits"]
/// name = "fruits"
///
/// [routes."/fruits".children]
/// "/apple" = "fruits:apple"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NavigatorConfig {
    /// Mount prefix for every route (e.g., "/app")
    #[serde(default)]
    pub base_url: Option<String>,

    #[serde(default)]
    pub generate_urls: GenerateUrlsOptions,

    /// Route table, in declaration order
    #[serde(default)]
    pub routes: RouteMap,
}

fn default_true() -> bool {
    true
}

fn default_false() -> bool {
    false
}

impl Default for GenerateUrlsOptions {
    fn default() -> Self {
        Self {
            base_url: None,
            encode: true,
            stringify_query_params: false,
        }
    }
}

impl NavigatorConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, NavError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from a TOML file
    ///
    /// A missing or empty file yields the default (empty) configuration.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, NavError> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::debug!(path = %path.display(), "navigator config not found, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        Self::from_toml_str(&content)
    }

    /// Load configuration from default path (./navigator.toml)
    pub fn load_default() -> Result<Self, NavError> {
        Self::load("navigator.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = NavigatorConfig::default();
        assert!(config.routes.is_empty());
        assert_eq!(config.base_url, None);
        assert!(config.generate_urls.encode);
        assert!(!config.generate_urls.stringify_query_params);
    }

    #[test]
    fn test_empty_config() {
        let config = NavigatorConfig::from_toml_str("").unwrap();
        assert!(config.routes.is_empty());
        assert_eq!(config.generate_urls, GenerateUrlsOptions::default());
    }

    #[test]
    fn test_routes_keep_declaration_order() {
        let toml = r#"
            [routes]
            "" = "homepage"
            "/hello/:name" = "hello"
            "/about" = "about"

            [routes."/fruits"]
            name = "fruits"
            title = "Fruits"

            [routes."/fruits".children]
            "/banana" = "fruits:banana"
            "/apple" = "fruits:apple"
        "#;
        let config = NavigatorConfig::from_toml_str(toml).unwrap();

        let paths: Vec<&str> = config.routes.iter().map(|(path, _)| path).collect();
        assert_eq!(paths, vec!["", "/hello/:name", "/about", "/fruits"]);

        let fruits = config.routes.get("/fruits").unwrap();
        assert_eq!(fruits.name(), "fruits");
        let children: Vec<&str> = fruits
            .children()
            .unwrap()
            .iter()
            .map(|(_, def)| def.name())
            .collect();
        assert_eq!(children, vec!["fruits:banana", "fruits:apple"]);
    }

    #[test]
    fn test_generate_urls_section() {
        let toml = r#"
            base_url = "/app"

            [generate_urls]
            encode = false
            stringify_query_params = true
        "#;
        let config = NavigatorConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.base_url.as_deref(), Some("/app"));
        assert!(!config.generate_urls.encode);
        assert!(config.generate_urls.stringify_query_params);
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            NavigatorConfig::from_toml_str("routes = 3"),
            Err(NavError::Config(_))
        ));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = NavigatorConfig::load("does/not/exist/navigator.toml").unwrap();
        assert!(config.routes.is_empty());
    }
}
