//! Block-argument extraction.
//!
//! Handlers declare the sub-elements they expect as an ordered schema; the
//! extractor pulls matching *direct* children out of the block element. This
//! is the typed-parameter convention handler authors follow to receive
//! structured input.

use folio_core::{Element, ExpandError};
use indexmap::IndexMap;

/// One entry in a block-argument schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgSpec {
    /// The argument name, which is also the class name the child element
    /// must carry.
    pub name: String,
    /// Extract the child's text content instead of the element itself.
    pub text: bool,
    pub required: bool,
}

impl ArgSpec {
    /// An optional argument extracted as an element.
    pub fn element(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: false,
            required: false,
        }
    }

    /// An optional argument extracted as text content.
    pub fn text(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: true,
            required: false,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// An extracted argument value.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    Text(String),
    Element(Element),
}

impl ArgValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ArgValue::Text(text) => Some(text),
            ArgValue::Element(_) => None,
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            ArgValue::Element(element) => Some(element),
            ArgValue::Text(_) => None,
        }
    }
}

/// Extracts the arguments declared in `schema` from `root`'s direct
/// children.
///
/// A missing optional argument is simply omitted from the result. A missing
/// required argument fails immediately; remaining schema entries are not
/// processed.
pub fn block_arguments(
    schema: &[ArgSpec],
    root: &Element,
) -> Result<IndexMap<String, ArgValue>, ExpandError> {
    let mut args = IndexMap::new();
    for spec in schema {
        match root.children_with_class(&spec.name).next() {
            Some(child) => {
                let value = if spec.text {
                    ArgValue::Text(child.text())
                } else {
                    ArgValue::Element(child.clone())
                };
                args.insert(spec.name.clone(), value);
            }
            None if spec.required => {
                let error = ExpandError::MissingRequiredArgument {
                    name: spec.name.clone(),
                };
                tracing::error!(%error, "block argument extraction failed");
                return Err(error);
            }
            None => {}
        }
    }
    Ok(args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::Node;

    fn article_element() -> Element {
        Element::new("div")
            .with_child(
                Element::new("span")
                    .with_class("article_id")
                    .with_text("article-12"),
            )
            .with_child(
                Element::new("div")
                    .with_class("article_body")
                    .with_child(Element::new("p").with_text("Lorem ipsum")),
            )
    }

    #[test]
    fn extracts_text_and_element_arguments() {
        let schema = [
            ArgSpec::text("article_id").required(),
            ArgSpec::element("article_body").required(),
        ];
        let args = block_arguments(&schema, &article_element()).unwrap();

        assert_eq!(args["article_id"].as_text(), Some("article-12"));
        let body = args["article_body"].as_element().unwrap();
        assert!(body.has_class("article_body"));
        assert_eq!(body.text(), "Lorem ipsum");
    }

    #[test]
    fn omits_missing_optional_arguments() {
        let schema = [
            ArgSpec::text("article_id").required(),
            ArgSpec::text("article_caption"),
        ];
        let args = block_arguments(&schema, &article_element()).unwrap();
        assert_eq!(args.len(), 1);
        assert!(!args.contains_key("article_caption"));
    }

    #[test]
    fn missing_required_argument_short_circuits() {
        // "article_caption" is required and absent; "article_body" comes
        // after it in the schema and must not be extracted.
        let schema = [
            ArgSpec::text("article_caption").required(),
            ArgSpec::element("article_body").required(),
        ];
        let error = block_arguments(&schema, &article_element()).unwrap_err();
        assert_eq!(
            error,
            ExpandError::MissingRequiredArgument {
                name: "article_caption".to_string()
            }
        );
    }

    #[test]
    fn deep_descendants_do_not_satisfy_the_schema() {
        let root = Element::new("div").with_child(
            Element::new("div").with_child(
                Element::new("span")
                    .with_class("article_id")
                    .with_child(Node::text("nested")),
            ),
        );
        let schema = [ArgSpec::text("article_id").required()];
        assert!(block_arguments(&schema, &root).is_err());
    }
}
