//! Request enrichment pipeline
//!
//! Every resolved node produces a raw [`Request`]; the [`EnricherChain`] then
//! folds it through the configured steps, left to right. Steps take the
//! request by value and hand back a new one, so no stage can observe another
//! stage's input being changed behind its back.
//!
//! Absent steps are dropped when the chain is built, never checked per call.
//!
//! ```
//! use rhtmx_navigator::enrich::{EnricherChain, QueryStringEnricher};
//! use rhtmx_navigator::{Request, ResolveContext};
//!
//! let chain = EnricherChain::builder().step(QueryStringEnricher).build();
//! let context = ResolveContext {
//!     query_string: Some("a=b".to_string()),
//!     ..ResolveContext::default()
//! };
//!
//! let request = chain.apply(Request::empty(context.clone()), &context);
//! assert_eq!(request.query_string.as_deref(), Some("a=b"));
//! ```

use std::fmt;

use crate::request::{Request, ResolveContext};
use crate::store::StoreHandle;

/// A single enrichment step
pub trait Enricher: Send + Sync {
    fn enrich(&self, request: Request, context: &ResolveContext) -> Request;
}

impl<F> Enricher for F
where
    F: Fn(Request, &ResolveContext) -> Request + Send + Sync,
{
    fn enrich(&self, request: Request, context: &ResolveContext) -> Request {
        self(request, context)
    }
}

/// Adds the query string, but only a non-empty one
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryStringEnricher;

impl Enricher for QueryStringEnricher {
    fn enrich(&self, request: Request, context: &ResolveContext) -> Request {
        match context.query_string.as_deref() {
            Some(query) if !query.is_empty() => request.with_query_string(query),
            _ => request,
        }
    }
}

/// Attaches the state container handle through the request's private slot
#[derive(Clone)]
pub struct StoreEnricher {
    store: StoreHandle,
}

impl StoreEnricher {
    pub fn new(store: StoreHandle) -> Self {
        Self { store }
    }
}

impl Enricher for StoreEnricher {
    fn enrich(&self, request: Request, _context: &ResolveContext) -> Request {
        request.with_store(self.store.clone())
    }
}

impl fmt::Debug for StoreEnricher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StoreEnricher(..)")
    }
}

// ============================================================================
// Chain
// ============================================================================

/// Composed enrichment steps
#[derive(Default)]
pub struct EnricherChain {
    steps: Vec<Box<dyn Enricher>>,
}

impl EnricherChain {
    pub fn builder() -> EnricherChainBuilder {
        EnricherChainBuilder::default()
    }

    /// Composes the present steps, dropping absent ones
    pub fn compose<I>(steps: I) -> Self
    where
        I: IntoIterator<Item = Option<Box<dyn Enricher>>>,
    {
        Self {
            steps: steps.into_iter().flatten().collect(),
        }
    }

    /// Folds the request through every step, in order
    pub fn apply(&self, request: Request, context: &ResolveContext) -> Request {
        self.steps
            .iter()
            .fold(request, |request, step| step.enrich(request, context))
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl fmt::Debug for EnricherChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnricherChain")
            .field("steps", &self.steps.len())
            .finish()
    }
}

/// Configuration-time builder for an [`EnricherChain`]
#[derive(Default)]
pub struct EnricherChainBuilder {
    steps: Vec<Box<dyn Enricher>>,
}

impl EnricherChainBuilder {
    pub fn step(mut self, step: impl Enricher + 'static) -> Self {
        self.steps.push(Box::new(step));
        self
    }

    /// Adds the step only when present
    pub fn step_opt<E: Enricher + 'static>(self, step: Option<E>) -> Self {
        match step {
            Some(step) => self.step(step),
            None => self,
        }
    }

    pub fn boxed(mut self, step: Box<dyn Enricher>) -> Self {
        self.steps.push(step);
        self
    }

    pub fn build(self) -> EnricherChain {
        EnricherChain { steps: self.steps }
    }
}
