//! Page and section template trees for the folio engine.
//!
//! Sites organize their page templates hierarchically: sections nest inside
//! sections, pages sit at the leaves. Composing the element for a page means
//! loading the page's own fragment and then wrapping it outward through each
//! ancestor section's fragment, filling the section's hole with the element
//! composed so far. The composed element is what the block expander is then
//! run over.

mod store;
mod template;

pub use store::TemplateStore;
pub use template::{PageTemplate, SectionTemplate, Template};

/// Class name replaced by the enclosing section's id during composition.
pub const TEMPLATE_ID_BLOCK: &str = "template_id_block";

/// Class name replaced by the nested (page or section) element during
/// composition.
pub const TEMPLATE_HOLE_BLOCK: &str = "template_hole_block";

/// Class stamped onto every composed page fragment.
pub const TEMPLATE_PAGE_CLASS: &str = "template_page";

/// Class stamped onto every composed section fragment.
pub const TEMPLATE_SECTION_CLASS: &str = "template_section";
