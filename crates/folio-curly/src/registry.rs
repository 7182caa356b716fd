//! Curly handler registration.
//!
//! Same contract as the block handler registry: one handler per name, a
//! duplicate registration is reported and rejected without touching the
//! existing entry, and batch registration fails per entry.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use folio_core::{CurlyError, PageId};
use indexmap::IndexMap;

/// Produces the substitution string for one curly block.
///
/// `content` arrives with any nested curly blocks already resolved.
#[async_trait]
pub trait CurlyHandler: Send + Sync {
    async fn render(&self, page_id: &PageId, content: &str) -> Result<String, CurlyError>;
}

struct CurlyFn<F>(F);

#[async_trait]
impl<F> CurlyHandler for CurlyFn<F>
where
    F: Fn(&PageId, &str) -> Result<String, CurlyError> + Send + Sync,
{
    async fn render(&self, page_id: &PageId, content: &str) -> Result<String, CurlyError> {
        (self.0)(page_id, content)
    }
}

/// Wraps a plain closure as a curly handler.
pub fn curly_fn<F>(f: F) -> Arc<dyn CurlyHandler>
where
    F: Fn(&PageId, &str) -> Result<String, CurlyError> + Send + Sync + 'static,
{
    Arc::new(CurlyFn(f))
}

/// The mapping from dotted block names (`"article.title"`) to handlers.
#[derive(Default)]
pub struct CurlyRegistry {
    handlers: IndexMap<String, Arc<dyn CurlyHandler>>,
}

impl fmt::Debug for CurlyRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CurlyRegistry")
            .field("names", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl CurlyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn CurlyHandler>> {
        self.handlers.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Registers `handler` under `name`; rejects and reports duplicates,
    /// leaving the first registration in place.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        handler: Arc<dyn CurlyHandler>,
    ) -> Result<(), CurlyError> {
        let name = name.into();
        if self.handlers.contains_key(&name) {
            let error = CurlyError::DuplicateBlock { name };
            tracing::error!(%error, "rejected duplicate curly handler registration");
            return Err(error);
        }
        self.handlers.insert(name, handler);
        Ok(())
    }

    /// Registers every entry; each duplicate is reported independently.
    pub fn add_handlers<N>(&mut self, handlers: impl IntoIterator<Item = (N, Arc<dyn CurlyHandler>)>)
    where
        N: Into<String>,
    {
        for (name, handler) in handlers {
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
