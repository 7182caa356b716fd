//! Template registration and page composition.

use std::sync::Arc;

use folio_core::{Element, Node, TemplateError};
use folio_expander::TemplateLoader;

use crate::template::{PageTemplate, SectionTemplate, Template};
use crate::{
    TEMPLATE_HOLE_BLOCK, TEMPLATE_ID_BLOCK, TEMPLATE_PAGE_CLASS, TEMPLATE_SECTION_CLASS,
};

/// Holds the registered template trees and composes page elements from
/// them. Registration runs during module load; composition runs per page.
pub struct TemplateStore {
    templates: Vec<Template>,
    loader: Arc<dyn TemplateLoader>,
}

impl TemplateStore {
    pub fn new(loader: Arc<dyn TemplateLoader>) -> Self {
        Self {
            templates: Vec::new(),
            loader,
        }
    }

    pub fn add(&mut self, template: Template) {
        self.templates.push(template);
    }

    pub fn add_templates(&mut self, templates: impl IntoIterator<Item = Template>) {
        self.templates.extend(templates);
    }

    /// Looks up the page template registered under `id`.
    pub fn page_template(&self, id: &str) -> Option<&PageTemplate> {
        let chain = self.find_page(id)?;
        match chain.last() {
            Some(Template::Page(page)) => Some(page),
            _ => None,
        }
    }

    /// Looks up the section template registered under `id`.
    pub fn section_template(&self, id: &str) -> Option<&SectionTemplate> {
        self.templates
            .iter()
            .find_map(|template| template.find_section(id))
    }

    fn find_page(&self, id: &str) -> Option<Vec<&Template>> {
        self.templates
            .iter()
            .find_map(|template| template.find_page(id))
    }

    /// Composes the full element for the page registered under `id`: the
    /// page's own fragment nested inside each ancestor section's fragment,
    /// innermost to outermost. Every fragment is stamped with its template
    /// id and level; each section's id and hole blocks are substituted on
    /// the way out.
    pub async fn page_element(&self, id: &str) -> Result<Node, TemplateError> {
        let Some(chain) = self.find_page(id) else {
            let error = TemplateError::PageNotFound { id: id.to_string() };
            tracing::error!(%error, "page template lookup failed");
            return Err(error);
        };

        let page = chain[chain.len() - 1];
        let mut composed = self.template_element(page, chain.len()).await?;

        for (index, section) in chain[..chain.len() - 1].iter().enumerate().rev() {
            let mut element = self.template_element(section, index + 1).await?;
            element.replace_descendants(TEMPLATE_ID_BLOCK, &Node::text(section.id()));
            element.replace_descendants(TEMPLATE_HOLE_BLOCK, &Node::Element(composed));
            composed = element;
        }

        Ok(Node::Element(composed))
    }

    /// Loads one template fragment and stamps it with its metadata.
    async fn template_element(
        &self,
        template: &Template,
        level: usize,
    ) -> Result<Element, TemplateError> {
        let node = self.loader.load(template.path()).await?;
        let Some(mut element) = node.into_element() else {
            let error = TemplateError::NotAnElement {
                path: template.path().to_string(),
            };
            tracing::error!(%error, "template composition failed");
            return Err(error);
        };

        for class in template.classes() {
            element.add_class(class.clone());
        }
        element.add_class(match template {
            Template::Page(_) => TEMPLATE_PAGE_CLASS,
            Template::Section(_) => TEMPLATE_SECTION_CLASS,
        });
        element.set_attr("data-template-id", template.id());
        element.set_attr("data-template-level", level.to_string());
        Ok(element)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_expander::{Expander, HandlerRegistry, StaticTemplates};

    fn store() -> TemplateStore {
        let templates = StaticTemplates::new()
            .with(
                "templates/site.html",
                Element::new("div")
                    .with_child(Element::new("span").with_class(TEMPLATE_ID_BLOCK))
                    .with_child(Element::new("div").with_class(TEMPLATE_HOLE_BLOCK)),
            )
            .with(
                "templates/docs.html",
                Element::new("section")
                    .with_child(Element::new("span").with_class(TEMPLATE_ID_BLOCK))
                    .with_child(Element::new("div").with_class(TEMPLATE_HOLE_BLOCK)),
            )
            .with(
                "templates/guide.html",
                Element::new("main")
                    .with_text("guide for ")
                    .with_child(Element::new("span").with_class("core_id_block")),
            );

        let mut store = TemplateStore::new(Arc::new(templates));
        store.add(Template::Section(
            SectionTemplate::new(
                "site",
                "templates/site.html",
                vec![Template::Section(SectionTemplate::new(
                    "docs",
                    "templates/docs.html",
                    vec![Template::Page(
                        PageTemplate::new("guide", "templates/guide.html").with_class("fancy"),
                    )],
                ))],
            ),
        ));
        store
    }

    #[tokio::test]
    async fn composes_page_inside_its_ancestor_sections() {
        let store = store();
        let node = store.page_element("guide").await.unwrap();
        let site = node.as_element().unwrap();

        assert!(site.has_class(TEMPLATE_SECTION_CLASS));
        assert_eq!(site.attr("data-template-id"), Some("site"));
        assert_eq!(site.attr("data-template-level"), Some("1"));

        // Section id blocks were substituted with the section ids.
        assert!(site.text().starts_with("site"));

        let docs = site
            .child_elements()
            .find(|element| element.tag == "section")
            .unwrap();
        assert_eq!(docs.attr("data-template-id"), Some("docs"));
        assert_eq!(docs.attr("data-template-level"), Some("2"));

        let guide = docs
            .child_elements()
            .find(|element| element.tag == "main")
            .unwrap();
        assert!(guide.has_class(TEMPLATE_PAGE_CLASS));
        assert!(guide.has_class("fancy"));
        assert_eq!(guide.attr("data-template-level"), Some("3"));
    }

    #[tokio::test]
    async fn unknown_page_id_is_an_error() {
        let store = store();
        let error = store.page_element("missing").await.unwrap_err();
        assert!(matches!(error, TemplateError::PageNotFound { .. }));
    }

    #[tokio::test]
    async fn lookups_find_pages_and_sections() {
        let store = store();
        assert_eq!(store.page_template("guide").unwrap().id, "guide");
        assert_eq!(store.section_template("docs").unwrap().id, "docs");
        assert!(store.page_template("docs").is_none());
        assert!(store.section_template("guide").is_none());
    }

    #[tokio::test]
    async fn composed_pages_feed_straight_into_block_expansion() {
        let store = store();
        let page = store.page_element("guide").await.unwrap();

        let engine = Expander::new(
            Arc::new(HandlerRegistry::with_core_handlers()),
            Arc::new(StaticTemplates::new()),
        );
        let expanded = engine
            .expand_document("guide", page)
            .await
            .unwrap()
            .unwrap();

        // The id block inside the page fragment resolved to the page id.
        assert!(expanded.text_content().contains("guide for guide"));
    }
}
