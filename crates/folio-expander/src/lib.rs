//! Recursive block expansion for folio documents.
//!
//! This crate handles:
//! - Handler registration (one handler per block class name)
//! - Block-argument extraction against a per-handler schema
//! - The depth-first, strictly sequential expansion algorithm
//! - Template loading and the built-in core template block
//!
//! Content modules register handlers during their load phase, then the page
//! lifecycle hands the page's root node to [`Expander::expand_document`].

mod args;
mod expander;
mod registry;
mod template;

pub use args::{block_arguments, ArgSpec, ArgValue};
pub use expander::{Expander, MAX_EXPANSION_DEPTH};
pub use registry::{block_fn, BlockHandler, BlockOutcome, Handler, HandlerRegistry};
pub use template::{StaticTemplates, TemplateLoader, CORE_TEMPLATE_BLOCK};
