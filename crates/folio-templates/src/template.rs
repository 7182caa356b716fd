//! The template tree: sections with children, pages at the leaves.

/// A node in a template tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Template {
    Page(PageTemplate),
    Section(SectionTemplate),
}

/// A leaf template: one concrete page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTemplate {
    pub id: String,
    /// Fragment path, resolved through the store's template loader.
    pub path: String,
    /// Extra classes stamped onto the loaded fragment.
    pub classes: Vec<String>,
}

impl PageTemplate {
    pub fn new(id: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
            classes: Vec::new(),
        }
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }
}

/// An interior template: a section wrapping nested sections and pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionTemplate {
    pub id: String,
    pub path: String,
    pub classes: Vec<String>,
    pub children: Vec<Template>,
}

impl SectionTemplate {
    pub fn new(
        id: impl Into<String>,
        path: impl Into<String>,
        children: Vec<Template>,
    ) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
            classes: Vec::new(),
            children,
        }
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }
}

impl Template {
    pub fn id(&self) -> &str {
        match self {
            Template::Page(page) => &page.id,
            Template::Section(section) => &section.id,
        }
    }

    pub fn path(&self) -> &str {
        match self {
            Template::Page(page) => &page.path,
            Template::Section(section) => &section.path,
        }
    }

    pub fn classes(&self) -> &[String] {
        match self {
            Template::Page(page) => &page.classes,
            Template::Section(section) => &section.classes,
        }
    }

    /// The root-to-leaf chain ending at the page with `id`, if this tree
    /// contains it.
    pub(crate) fn find_page(&self, id: &str) -> Option<Vec<&Template>> {
        match self {
            Template::Page(page) => (page.id == id).then(|| vec![self]),
            Template::Section(section) => {
                for child in &section.children {
                    if let Some(mut chain) = child.find_page(id) {
                        chain.insert(0, self);
                        return Some(chain);
                    }
                }
                None
            }
        }
    }

    pub(crate) fn find_section(&self, id: &str) -> Option<&SectionTemplate> {
        match self {
            Template::Page(_) => None,
            Template::Section(section) => {
                if section.id == id {
                    return Some(section);
                }
                section.children.iter().find_map(|child| child.find_section(id))
            }
        }
    }

    /// Visits this template and every descendant, pre-order.
    pub fn visit(&self, f: &mut impl FnMut(&Template)) {
        f(self);
        if let Template::Section(section) = self {
            for child in &section.children {
                child.visit(f);
            }
        }
    }
}
