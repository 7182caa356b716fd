//! The expansion context threaded through recursive block expansion.

use crate::dom::Element;
use std::fmt;

/// An opaque page identifier. Handlers may use it for link generation; the
/// engine substitutes it for reserved id blocks.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageId(pub String);

impl From<&str> for PageId {
    fn from(id: &str) -> Self {
        PageId(id.to_string())
    }
}

impl From<String> for PageId {
    fn from(id: String) -> Self {
        PageId(id)
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The immutable pairing of a page id and the element being expanded.
///
/// A fresh context is constructed for every recursive descent; the page id is
/// inherited unchanged unless a handler deliberately builds a new context
/// with a different id.
#[derive(Debug, Clone)]
pub struct Context {
    page_id: PageId,
    element: Element,
}

impl Context {
    pub fn new(page_id: impl Into<PageId>, element: Element) -> Self {
        Self {
            page_id: page_id.into(),
            element,
        }
    }

    pub fn page_id(&self) -> &PageId {
        &self.page_id
    }

    pub fn element(&self) -> &Element {
        &self.element
    }

    /// Consumes the context, yielding the element it wraps.
    pub fn into_element(self) -> Element {
        self.element
    }

    /// A new context for `element` with the same page id.
    pub fn with_element(&self, element: Element) -> Self {
        Self {
            page_id: self.page_id.clone(),
            element,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_element_inherits_page_id() {
        let context = Context::new("resume", Element::new("div"));
        let derived = context.with_element(Element::new("span"));
        assert_eq!(derived.page_id(), context.page_id());
        assert_eq!(derived.element().tag, "span");
    }

    #[test]
    fn page_id_displays_raw() {
        assert_eq!(PageId::from("about").to_string(), "about");
    }
}
