//! Layout model types.
//!
//! The tree is owned strictly downward: a [`Document`] owns its pages, a
//! [`Page`] owns regions and graphics, a [`Region`] owns paragraphs, and so on
//! down to [`Word`]s. Upward links are plain indices (`Paragraph::page`,
//! `Paragraph::region`) used only for lookups.

mod content;
mod document;
mod geometry;
mod page;
mod paragraph;
mod style;

pub use content::{Color, ContentItem, GraphicObject, PageContent, TextRun};
pub use document::Document;
pub use geometry::Rect;
pub use page::{Page, Region};
pub use paragraph::{dominating_style, Line, Paragraph, Role, Word};
pub use style::{FontSpec, Style, StyleId, StyleRegistry};
