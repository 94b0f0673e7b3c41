//! Route module: definitions, ordering, patterns and the built tree
//!
//! Contains pure functional components for turning a route table into an
//! ordered, immutable tree:
//! - `def` - user-facing route definitions and the ordered route table
//! - `depth` - specificity ordering for sibling paths
//! - `pattern` - segment parsing, prefix matching and URL generation
//! - `tree` - the tree builder

pub mod def;
pub mod depth;
pub mod pattern;
pub mod tree;

// Re-export commonly used types
pub use def::{Handler, RouteData, RouteDef, RouteMap, RouteRecord};
pub use depth::{compare_depth, path_depth};
pub use pattern::{classify_segment, Pattern, PatternSegmentType};
pub use tree::{build, RouteNode};
