//! Error types for the folio engine.

use thiserror::Error;

/// Top-level error type for the folio engine.
#[derive(Debug, Error)]
pub enum FolioError {
    #[error(transparent)]
    Expand(#[from] ExpandError),

    #[error(transparent)]
    Curly(#[from] CurlyError),

    #[error(transparent)]
    Template(#[from] TemplateError),
}

/// Errors during block expansion.
///
/// A missing handler is deliberately not represented here: an element whose
/// classes match no handler is plain content, not a failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpandError {
    /// A second registration attempt under an already-taken class name.
    /// Non-fatal to the registry: the first entry stays in place.
    #[error("a block handler is already registered for \"{name}\"")]
    DuplicateHandler { name: String },

    /// A schema-required argument element is absent from the block's direct
    /// children.
    #[error("the required \"{name}\" argument element is missing")]
    MissingRequiredArgument { name: String },

    #[error("template not found: {path}")]
    TemplateNotFound { path: String },

    /// Content referenced by a block (an article id, a book id, ...) does not
    /// resolve. Constructed by consuming modules, propagated by the engine.
    #[error("referenced {kind} \"{id}\" does not exist")]
    ContentNotFound { kind: String, id: String },

    /// A handler's own logic failed.
    #[error("block handler for \"{name}\" failed: {reason}")]
    HandlerFailed { name: String, reason: String },

    #[error("maximum block expansion depth ({depth}) exceeded")]
    MaxDepthExceeded { depth: u32 },
}

/// Errors during curly inline expansion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CurlyError {
    #[error("a curly handler is already registered for \"{name}\"")]
    DuplicateBlock { name: String },

    #[error("no curly handler registered for \"{name}\"")]
    UndefinedBlock { name: String },

    #[error("curly block \"{name}\" failed: {reason}")]
    BlockFailed { name: String, reason: String },
}

/// Errors during page template composition.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("no page template registered with id \"{id}\"")]
    PageNotFound { id: String },

    #[error("no section template registered with id \"{id}\"")]
    SectionNotFound { id: String },

    /// A template fragment resolved to a bare text node; fragments must be
    /// elements so they can be stamped with template metadata.
    #[error("template fragment at \"{path}\" is not an element")]
    NotAnElement { path: String },

    #[error(transparent)]
    Expand(#[from] ExpandError),
}
