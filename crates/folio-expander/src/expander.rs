//! The recursive block expansion algorithm.
//!
//! Expansion is depth-first and strictly sequential: every block fully
//! completes (including all of its own nested expansion) before its next
//! sibling starts, and all of an element's children complete before the
//! element's own handler runs. Handlers therefore always see their block's
//! content in fully expanded form, and there is never more than one logical
//! mutation of the tree in flight.

use std::sync::Arc;

use folio_core::{
    Context, Element, ExpandError, Node, PageId, CORE_ID_BLOCK, CORE_QUOTE_BLOCK,
};
use futures_util::future::BoxFuture;
use futures_util::FutureExt;

use crate::registry::{BlockOutcome, Handler, HandlerRegistry};
use crate::template::TemplateLoader;

/// Maximum length of a replacement re-expansion chain. A handler whose
/// output keeps producing its own block class fails with
/// [`ExpandError::MaxDepthExceeded`] instead of recursing forever.
pub const MAX_EXPANSION_DEPTH: u32 = 100;

/// The block expansion engine: a frozen handler registry plus a template
/// loader.
pub struct Expander {
    registry: Arc<HandlerRegistry>,
    loader: Arc<dyn TemplateLoader>,
}

impl Expander {
    pub fn new(registry: Arc<HandlerRegistry>, loader: Arc<dyn TemplateLoader>) -> Self {
        Self { registry, loader }
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// Expands every block in `root` for the page identified by `page_id`.
    ///
    /// Returns the rewritten tree, or `None` when a handler removed the root
    /// itself.
    pub async fn expand_document(
        &self,
        page_id: impl Into<PageId>,
        root: Node,
    ) -> Result<Option<Node>, ExpandError> {
        let page_id = page_id.into();
        self.expand_node(&page_id, root, 0).await
    }

    /// Expands a single node. This is the recursive-expand helper handlers
    /// use on sub-elements they produce, without going back through the
    /// top-level entry point.
    pub async fn expand(
        &self,
        page_id: &PageId,
        node: Node,
    ) -> Result<Option<Node>, ExpandError> {
        self.expand_node(page_id, node, 0).await
    }

    /// Loads a template fragment through the engine's loader.
    pub async fn load_template(&self, path: &str) -> Result<Node, ExpandError> {
        self.loader.load(path).await
    }

    fn expand_node<'a>(
        &'a self,
        page_id: &'a PageId,
        node: Node,
        depth: u32,
    ) -> BoxFuture<'a, Result<Option<Node>, ExpandError>> {
        async move {
            let mut element = match node {
                Node::Text(text) => return Ok(Some(Node::Text(text))),
                Node::Element(element) => element,
            };

            if depth >= MAX_EXPANSION_DEPTH {
                let error = ExpandError::MaxDepthExceeded {
                    depth: MAX_EXPANSION_DEPTH,
                };
                tracing::error!(%error, "block expansion aborted");
                return Err(error);
            }

            // Reserved id block: substitute the page id and terminate. Not a
            // literal barrier; there is simply nothing below it to expand.
            if element.has_class(CORE_ID_BLOCK) {
                return Ok(Some(Node::Text(page_id.to_string())));
            }

            // Literal barrier: strip the marker, never expand descendants.
            if element.has_class(CORE_QUOTE_BLOCK) {
                element.remove_class(CORE_QUOTE_BLOCK);
                return Ok(Some(Node::Element(element)));
            }

            // Children first, strictly in source order.
            let children = std::mem::take(&mut element.children);
            element.children = self.expand_children(page_id, children, depth).await?;

            // The first class in source order that names a registered
            // handler governs this element; later classes are ignored for
            // this pass.
            let matched = element.class_names().find_map(|class| {
                self.registry
                    .get(class)
                    .map(|handler| (class.to_string(), handler.clone()))
            });
            let Some((name, handler)) = matched else {
                // No handler is not an error: plain content stays put.
                return Ok(Some(Node::Element(element)));
            };

            // Remove the governing class so a secondary pass cannot
            // reprocess the same block.
            element.remove_class(&name);

            let outcome = match handler {
                Handler::Func(handler) => {
                    handler
                        .expand(Context::new(page_id.clone(), element), self)
                        .await?
                }
                Handler::Template(path) => {
                    BlockOutcome::Replace(self.loader.load(&path).await?)
                }
            };

            match outcome {
                BlockOutcome::Replace(replacement) => {
                    // A handler's output is itself eligible for expansion.
                    self.expand_node(page_id, replacement, depth + 1).await
                }
                BlockOutcome::Final(replacement) => Ok(Some(replacement)),
                BlockOutcome::Remove => Ok(None),
            }
        }
        .boxed()
    }

    /// Walks `children` in source order, expanding each block-bearing
    /// descendant to completion before moving on. Plain markup is descended
    /// through in place; the search never descends past a block boundary,
    /// since what lies below one belongs to that block's own expansion.
    fn expand_children<'a>(
        &'a self,
        page_id: &'a PageId,
        children: Vec<Node>,
        depth: u32,
    ) -> BoxFuture<'a, Result<Vec<Node>, ExpandError>> {
        async move {
            let mut expanded = Vec::with_capacity(children.len());
            for child in children {
                match child {
                    Node::Element(element) if self.is_block(&element) => {
                        if let Some(node) = self
                            .expand_node(page_id, Node::Element(element), depth)
                            .await?
                        {
                            expanded.push(node);
                        }
                    }
                    Node::Element(mut element) => {
                        let inner = std::mem::take(&mut element.children);
                        element.children = self.expand_children(page_id, inner, depth).await?;
                        expanded.push(Node::Element(element));
                    }
                    text => expanded.push(text),
                }
            }
            Ok(expanded)
        }
        .boxed()
    }

    /// A block boundary: a reserved marker or a registered handler class.
    fn is_block(&self, element: &Element) -> bool {
        element.has_class(CORE_ID_BLOCK)
            || element.has_class(CORE_QUOTE_BLOCK)
            || element.class_names().any(|class| self.registry.contains(class))
    }
}
