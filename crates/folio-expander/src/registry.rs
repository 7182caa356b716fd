//! Handler registration and lookup.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use folio_core::{Context, ExpandError, Node};
use indexmap::IndexMap;

use crate::expander::Expander;
use crate::template::{TemplateBlock, CORE_TEMPLATE_BLOCK};

/// What a handler did with its block element.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockOutcome {
    /// Replace the element; the replacement re-enters the full expansion
    /// algorithm, so composed templates expand layer by layer.
    Replace(Node),

    /// Replace the element verbatim. The engine will not recurse into the
    /// replacement; reserved for output that an external, non-block-aware
    /// library must parse untouched.
    Final(Node),

    /// Delete the element and stop recursing at this point.
    Remove,
}

/// Custom expansion logic for a block class.
///
/// Handlers receive the expansion context and a reference back into the
/// engine, which they may use to expand sub-elements they produce
/// ([`Expander::expand`]) or to load template fragments
/// ([`Expander::load_template`]).
#[async_trait]
pub trait BlockHandler: Send + Sync {
    async fn expand(&self, cx: Context, engine: &Expander) -> Result<BlockOutcome, ExpandError>;
}

/// A registered handler: custom logic or a static template reference.
///
/// Template handlers carry a path into the engine's [`TemplateLoader`]; the
/// loaded fragment replaces the block verbatim, with no argument binding.
///
/// [`TemplateLoader`]: crate::TemplateLoader
#[derive(Clone)]
pub enum Handler {
    Func(Arc<dyn BlockHandler>),
    Template(String),
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handler::Func(_) => f.write_str("Handler::Func"),
            Handler::Template(path) => write!(f, "Handler::Template({path:?})"),
        }
    }
}

impl From<&str> for Handler {
    fn from(path: &str) -> Self {
        Handler::Template(path.to_string())
    }
}

impl From<String> for Handler {
    fn from(path: String) -> Self {
        Handler::Template(path)
    }
}

impl From<Arc<dyn BlockHandler>> for Handler {
    fn from(handler: Arc<dyn BlockHandler>) -> Self {
        Handler::Func(handler)
    }
}

struct BlockFn<F>(F);

#[async_trait]
impl<F> BlockHandler for BlockFn<F>
where
    F: Fn(Context) -> Result<BlockOutcome, ExpandError> + Send + Sync,
{
    async fn expand(&self, cx: Context, _engine: &Expander) -> Result<BlockOutcome, ExpandError> {
        (self.0)(cx)
    }
}

/// Wraps a plain closure as a function handler. Handlers that need the
/// engine (recursive expansion, template loading) implement [`BlockHandler`]
/// directly instead.
pub fn block_fn<F>(f: F) -> Handler
where
    F: Fn(Context) -> Result<BlockOutcome, ExpandError> + Send + Sync + 'static,
{
    Handler::Func(Arc::new(BlockFn(f)))
}

/// The mapping from block class names to handlers.
///
/// Registration runs during module load, before any page is expanded, so the
/// registry is built mutably and then shared read-only behind an `Arc`.
#[derive(Debug, Default)]
pub struct HandlerRegistry {
    handlers: IndexMap<String, Handler>,
}

impl HandlerRegistry {
    /// An empty registry, without even the core handlers.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry preloaded with the engine's own handlers
    /// (currently only [`CORE_TEMPLATE_BLOCK`]).
    pub fn with_core_handlers() -> Self {
        let mut registry = Self::new();
        let _ = registry.add(CORE_TEMPLATE_BLOCK, Handler::Func(Arc::new(TemplateBlock)));
        registry
    }

    /// Pure lookup by class name.
    pub fn get(&self, name: &str) -> Option<&Handler> {
        self.handlers.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Registers `handler` under `name`. A second registration under the
    /// same name is rejected: the existing entry is left untouched, the
    /// error is reported to the diagnostics sink, and the caller is free to
    /// ignore the returned error and continue.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        handler: impl Into<Handler>,
    ) -> Result<(), ExpandError> {
        let name = name.into();
        if self.handlers.contains_key(&name) {
            let error = ExpandError::DuplicateHandler { name };
            tracing::error!(%error, "rejected duplicate block handler registration");
            return Err(error);
        }
        self.handlers.insert(name, handler.into());
        Ok(())
    }

    /// Registers every entry in `handlers`. Each duplicate is reported
    /// independently; successful registrations are never rolled back.
    pub fn add_handlers<N, H>(&mut self, handlers: impl IntoIterator<Item = (N, H)>)
    where
        N: Into<String>,
        H: Into<Handler>,
    {
        for (name, handler) in handlers {
            // Duplicates were already reported by `add`.
            let _ = self.add(name, handler);
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(|name| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
