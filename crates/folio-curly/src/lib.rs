//! Inline template substitution for the folio engine.
//!
//! Curly blocks embed short dynamic values inside arbitrary text:
//! `{{#article.title}}article-12{{/article.title}}` hands `article-12` to
//! the handler registered under `article.title` and splices the handler's
//! string result into the surrounding text. Blocks nest; inner blocks
//! resolve before the enclosing handler runs, mirroring the DOM engine's
//! innermost-first ordering.
//!
//! Resolved output contains no curly syntax, so expansion is idempotent on
//! its own results.

mod expand;
mod registry;

pub use expand::expand;
pub use registry::{curly_fn, CurlyHandler, CurlyRegistry};
