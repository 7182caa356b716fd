//! Template loading.
//!
//! Template handlers and the core template block resolve fragment paths
//! through a [`TemplateLoader`]; where the fragments live (embedded in the
//! binary, on disk, behind HTTP) is the loader implementation's business.

use async_trait::async_trait;
use folio_core::{Context, ExpandError, Node};
use indexmap::IndexMap;

use crate::expander::Expander;
use crate::registry::{BlockHandler, BlockOutcome};

/// Class name of the core template block. The element's text content is a
/// template path; the loaded fragment replaces the element and re-enters
/// expansion.
pub const CORE_TEMPLATE_BLOCK: &str = "core_template_block";

/// Resolves template paths to document fragments.
#[async_trait]
pub trait TemplateLoader: Send + Sync {
    async fn load(&self, path: &str) -> Result<Node, ExpandError>;
}

/// A fixed, in-memory template set. Suitable for embedded fragments and for
/// tests; registration happens up front, lookups are infallible clones.
#[derive(Debug, Default)]
pub struct StaticTemplates {
    templates: IndexMap<String, Node>,
}

impl StaticTemplates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, fragment: impl Into<Node>) {
        self.templates.insert(path.into(), fragment.into());
    }

    pub fn with(mut self, path: impl Into<String>, fragment: impl Into<Node>) -> Self {
        self.insert(path, fragment);
        self
    }
}

#[async_trait]
impl TemplateLoader for StaticTemplates {
    async fn load(&self, path: &str) -> Result<Node, ExpandError> {
        self.templates.get(path).cloned().ok_or_else(|| {
            let error = ExpandError::TemplateNotFound {
                path: path.to_string(),
            };
            tracing::error!(%error, "template lookup failed");
            error
        })
    }
}

/// The core template block handler.
pub(crate) struct TemplateBlock;

#[async_trait]
impl BlockHandler for TemplateBlock {
    async fn expand(&self, cx: Context, engine: &Expander) -> Result<BlockOutcome, ExpandError> {
        let path = cx.element().text();
        let fragment = engine.load_template(path.trim()).await?;
        Ok(BlockOutcome::Replace(fragment))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::Element;

    #[tokio::test]
    async fn static_templates_clone_fragments() {
        let templates =
            StaticTemplates::new().with("templates/banner.html", Element::new("header"));
        let fragment = templates.load("templates/banner.html").await.unwrap();
        assert_eq!(fragment.as_element().unwrap().tag, "header");
    }

    #[tokio::test]
    async fn unknown_path_is_an_error() {
        let templates = StaticTemplates::new();
        let error = templates.load("templates/missing.html").await.unwrap_err();
        assert_eq!(
            error,
            ExpandError::TemplateNotFound {
                path: "templates/missing.html".to_string()
            }
        );
    }
}
