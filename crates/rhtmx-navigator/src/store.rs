//! Current-page state container integration
//!
//! The navigator mirrors the settled page into an external state container
//! by dispatching `CHANGE_PAGE` actions. This module defines the action and
//! page shapes, the reducer applied to them, and a small in-process store.
//!
//! ```
//! use rhtmx_navigator::store::{change_page, reducer, Page};
//!
//! let state = reducer(None, &change_page("homepage", None));
//! assert_eq!(state, Some(Page { name: "homepage".to_string(), params: None }));
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::request::{Params, Request};

/// Action type for page changes
pub const CHANGE_PAGE: &str = "CHANGE_PAGE";

/// Parameters of the current page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageParams {
    #[serde(default)]
    pub path: Params,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

/// The page mirrored into the state container
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<PageParams>,
}

impl Page {
    /// Page for a matched request; `None` for an unmatched one
    pub fn from_request(request: &Request) -> Option<Self> {
        let matched = request.matched.as_ref()?;

        Some(Page {
            name: matched.data.name.clone(),
            params: Some(PageParams {
                path: matched.path_params.clone(),
                query: request.query_string.clone(),
            }),
        })
    }
}

/// Actions understood by [`reducer`]
///
/// Serialized as `{"type": "CHANGE_PAGE", "payload": {...} | null}`. Any other
/// `type` deserializes to [`Action::Unknown`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum Action {
    #[serde(rename = "CHANGE_PAGE")]
    ChangePage(Option<Page>),
    #[serde(other)]
    Unknown,
}

/// Builds a `CHANGE_PAGE` action
pub fn change_page(name: impl Into<String>, params: Option<PageParams>) -> Action {
    Action::ChangePage(Some(Page {
        name: name.into(),
        params,
    }))
}

/// Last payload wins; unknown actions leave the state untouched
pub fn reducer(state: Option<Page>, action: &Action) -> Option<Page> {
    match action {
        Action::ChangePage(payload) => payload.clone(),
        Action::Unknown => state,
    }
}

/// Reads the page stored under `base_path` of a combined state tree
pub fn page_selector(state: &Value, base_path: &str) -> Option<Page> {
    state
        .get(base_path)
        .filter(|page| !page.is_null())
        .and_then(|page| serde_json::from_value(page.clone()).ok())
}

// ============================================================================
// Stores
// ============================================================================

/// External state container receiving page changes
pub trait Store: Send + Sync {
    fn dispatch(&self, action: Action);
}

/// Shared handle to a state container
pub type StoreHandle = Arc<dyn Store>;

/// In-process store holding the current page
#[derive(Debug, Default)]
pub struct PageStore {
    page: RwLock<Option<Page>>,
    dispatched: AtomicUsize,
}

impl PageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current page
    pub fn page(&self) -> Option<Page> {
        self.page
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of actions dispatched so far
    pub fn dispatch_count(&self) -> usize {
        self.dispatched.load(Ordering::SeqCst)
    }
}

impl Store for PageStore {
    fn dispatch(&self, action: Action) {
        let mut page = self.page.write().unwrap_or_else(PoisonError::into_inner);
        *page = reducer(page.take(), &action);
        self.dispatched.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_change_page_without_params() {
        assert_eq!(
            serde_json::to_value(change_page("homepage", None)).unwrap(),
            json!({"type": "CHANGE_PAGE", "payload": {"name": "homepage"}})
        );
    }

    #[test]
    fn test_change_page_with_params() {
        let params = PageParams {
            path: [("name".to_string(), "John".to_string())].into(),
            query: None,
        };
        assert_eq!(
            serde_json::to_value(change_page("hello", Some(params))).unwrap(),
            json!({
                "type": "CHANGE_PAGE",
                "payload": {"name": "hello", "params": {"path": {"name": "John"}}}
            })
        );
    }

    #[test]
    fn test_null_payload_roundtrip() {
        let action: Action =
            serde_json::from_value(json!({"type": "CHANGE_PAGE", "payload": null})).unwrap();
        assert_eq!(action, Action::ChangePage(None));
    }

    #[test]
    fn test_reducer_initial_state() {
        assert_eq!(reducer(None, &Action::Unknown), None);
    }

    #[test]
    fn test_reducer_unknown_action_keeps_state() {
        let action: Action = serde_json::from_value(json!({"type": "SOMETHING_ELSE"})).unwrap();
        assert_eq!(action, Action::Unknown);

        let state = Some(Page {
            name: "homepage".to_string(),
            params: None,
        });
        assert_eq!(reducer(state.clone(), &action), state);
    }

    #[test]
    fn test_reducer_last_payload_wins() {
        let state = reducer(None, &change_page("homepage", None));
        let state = reducer(state, &change_page("hello", None));
        assert_eq!(state.map(|page| page.name), Some("hello".to_string()));

        assert_eq!(reducer(None, &Action::ChangePage(None)), None);
    }

    #[test]
    fn test_page_selector() {
        let state = json!({"router": {"name": "homepage"}, "other": 1});
        assert_eq!(
            page_selector(&state, "router"),
            Some(Page {
                name: "homepage".to_string(),
                params: None,
            })
        );
        assert_eq!(page_selector(&json!({"router": null}), "router"), None);
        assert_eq!(page_selector(&state, "missing"), None);
    }

    #[test]
    fn test_page_store_dispatch() {
        let store = PageStore::new();
        assert_eq!(store.page(), None);

        store.dispatch(change_page("homepage", None));
        store.dispatch(Action::Unknown);

        assert_eq!(store.page().map(|page| page.name), Some("homepage".to_string()));
        assert_eq!(store.dispatch_count(), 2);
    }
}
