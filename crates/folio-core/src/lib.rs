//! Core types for the folio block expansion engine.
//!
//! This crate provides the foundational types used across the other folio
//! crates:
//! - The document tree (`Node` / `Element`) that pages are expanded over
//! - The expansion context threaded through every recursive call
//! - Error types

pub mod context;
pub mod dom;
pub mod errors;

pub use context::*;
pub use dom::*;
pub use errors::*;
