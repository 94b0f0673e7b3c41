//! Error types for route building, URL generation and resolution

use thiserror::Error;

/// Status used by the resolver when no route settles a location
pub const STATUS_NOT_FOUND: u16 = 404;

/// Status used by the resolver when a location cannot be decoded
pub const STATUS_BAD_REQUEST: u16 = 400;

/// Errors surfaced to the caller of the navigator API
#[derive(Debug, Error)]
pub enum NavError {
    /// `path_for` was asked for a route name that was never built
    #[error("route \"{0}\" not found")]
    UnknownRoute(String),

    /// A required pattern parameter was not supplied to `path_for`
    #[error("missing parameter \"{param}\" for route \"{route}\"")]
    MissingParam { route: String, param: String },

    /// A route definition normalized to an empty name
    #[error("route at path \"{path}\" has an empty name")]
    EmptyRouteName { path: String },

    /// Two routes in the same table share a name
    #[error("route \"{name}\" already exists (path \"{path}\")")]
    DuplicateRouteName { name: String, path: String },

    /// The resolver rejected a route pattern
    #[error("invalid route pattern \"{pattern}\": {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// A route table could not be parsed
    #[error("invalid navigator config: {0}")]
    Config(#[from] toml::de::Error),

    /// A route table could not be read from disk
    #[error("failed to read navigator config: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure reported by a resolution pass
///
/// Carries an HTTP-like status so the facade can tell a plain miss (404)
/// from a location it could not process at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{status}: {message}")]
pub struct ResolveError {
    pub status: u16,
    pub message: String,
}

impl ResolveError {
    pub fn not_found(pathname: &str) -> Self {
        Self {
            status: STATUS_NOT_FOUND,
            message: format!("no route matches \"{}\"", pathname),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: STATUS_BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status == STATUS_NOT_FOUND
    }
}
