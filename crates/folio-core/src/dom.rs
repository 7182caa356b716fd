//! The document tree that pages are expanded over.
//!
//! The engine does not operate on a live browser DOM; callers hand it an
//! owned [`Node`] tree and receive the rewritten tree back. Class names play
//! the same role they do in HTML: an element whose class list contains a
//! registered block name is a block, and everything else is plain markup.

use smallvec::SmallVec;

/// Class name of the reserved id block. The engine replaces the element with
/// the current page id and never recurses into it.
pub const CORE_ID_BLOCK: &str = "core_id_block";

/// Class name of the literal-barrier block. The engine strips the marker and
/// leaves every descendant untouched, so authors can embed block-like markup
/// that must not be processed.
pub const CORE_QUOTE_BLOCK: &str = "core_quote_block";

/// A node in the document tree.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Node {
    Element(Element),
    Text(String),
}

impl Node {
    /// A text node.
    pub fn text(content: impl Into<String>) -> Self {
        Node::Text(content.into())
    }

    /// Concatenated text content of this node and all of its descendants.
    pub fn text_content(&self) -> String {
        match self {
            Node::Text(text) => text.clone(),
            Node::Element(element) => element.text(),
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        }
    }

    pub fn into_element(self) -> Option<Element> {
        match self {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        }
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

/// An element attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Attr {
    pub name: String,
    pub value: String,
}

/// An element: a tag, an ordered class list, attributes, and child nodes.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Element {
    pub tag: String,
    /// Class names in source order. Order matters: handler lookup uses the
    /// first class that names a registered handler.
    pub classes: SmallVec<[String; 4]>,
    pub attrs: Vec<Attr>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            classes: SmallVec::new(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder form of [`Element::add_class`].
    pub fn with_class(mut self, name: impl Into<String>) -> Self {
        self.add_class(name);
        self
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Builder shorthand for appending a text child.
    pub fn with_text(mut self, content: impl Into<String>) -> Self {
        self.children.push(Node::text(content));
        self
    }

    /// Appends `name` to the class list unless it is already present.
    pub fn add_class(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.has_class(&name) {
            self.classes.push(name);
        }
    }

    pub fn has_class(&self, name: &str) -> bool {
        self.classes.iter().any(|class| class == name)
    }

    /// Removes every occurrence of `name` from the class list.
    pub fn remove_class(&mut self, name: &str) {
        self.classes.retain(|class| class != name);
    }

    /// Class names in source order.
    pub fn class_names(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(|class| class.as_str())
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|attr| attr.name == name)
            .map(|attr| attr.value.as_str())
    }

    /// Sets `name` to `value`, replacing any existing value.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attrs.iter_mut().find(|attr| attr.name == name) {
            Some(attr) => attr.value = value,
            None => self.attrs.push(Attr { name, value }),
        }
    }

    /// Concatenated text content of all descendants, in document order.
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                Node::Text(text) => out.push_str(text),
                Node::Element(element) => element.collect_text(out),
            }
        }
    }

    /// Direct child elements, in source order.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// Direct child elements carrying `name`. Deep descendants are excluded
    /// on purpose: nested blocks of the same type must not leak their
    /// sub-elements into an outer block's arguments.
    pub fn children_with_class<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.child_elements()
            .filter(move |element| element.has_class(name))
    }

    /// Replaces every descendant element carrying `class` with a copy of
    /// `replacement` and returns how many were replaced. The search does not
    /// descend into replaced nodes.
    pub fn replace_descendants(&mut self, class: &str, replacement: &Node) -> usize {
        let mut count = 0;
        for child in &mut self.children {
            if let Node::Element(element) = child {
                if element.has_class(class) {
                    *child = replacement.clone();
                    count += 1;
                } else {
                    count += element.replace_descendants(class, replacement);
                }
            }
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_list_preserves_order() {
        let element = Element::new("div").with_class("b").with_class("a");
        let names: Vec<_> = element.class_names().collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn add_class_is_idempotent() {
        let mut element = Element::new("div");
        element.add_class("x");
        element.add_class("x");
        assert_eq!(element.classes.len(), 1);
    }

    #[test]
    fn remove_class_leaves_others() {
        let mut element = Element::new("div").with_class("a").with_class("b");
        element.remove_class("a");
        assert!(!element.has_class("a"));
        assert!(element.has_class("b"));
    }

    #[test]
    fn text_concatenates_descendants() {
        let element = Element::new("div")
            .with_text("a")
            .with_child(Element::new("span").with_text("b"))
            .with_text("c");
        assert_eq!(element.text(), "abc");
    }

    #[test]
    fn children_with_class_is_direct_only() {
        let element = Element::new("div")
            .with_child(Element::new("span").with_class("arg").with_text("direct"))
            .with_child(
                Element::new("div")
                    .with_child(Element::new("span").with_class("arg").with_text("nested")),
            );
        let matches: Vec<_> = element.children_with_class("arg").collect();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].text(), "direct");
    }

    #[test]
    fn set_attr_overwrites() {
        let mut element = Element::new("div").with_attr("id", "a");
        element.set_attr("id", "b");
        assert_eq!(element.attr("id"), Some("b"));
        assert_eq!(element.attrs.len(), 1);
    }

    #[test]
    fn replace_descendants_is_deep_but_stops_at_matches() {
        let mut element = Element::new("div")
            .with_child(Element::new("span").with_class("hole"))
            .with_child(Element::new("div").with_child(Element::new("span").with_class("hole")));
        let replacement = Node::text("x");
        let count = element.replace_descendants("hole", &replacement);
        assert_eq!(count, 2);
        assert_eq!(element.text(), "xx");
    }
}
