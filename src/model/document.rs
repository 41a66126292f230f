//! Document-level types.

use serde::{Deserialize, Serialize};

use super::{Page, Style, StyleId, StyleRegistry};
use crate::error::{Error, Result};

/// An analysed document: pages plus the style registry they reference.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    /// Pages in document order
    pub pages: Vec<Page>,

    /// Styles referenced by every word in the document
    pub styles: StyleRegistry,
}

impl Document {
    /// Create an empty document with a fresh registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document around an existing registry.
    pub fn with_styles(styles: StyleRegistry) -> Self {
        Self {
            pages: Vec::new(),
            styles,
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Resolve a style id, failing if the registry does not know it.
    pub fn style(&self, id: StyleId) -> Result<std::sync::Arc<Style>> {
        self.styles.get(id).ok_or(Error::UnknownStyle(id.0))
    }

    /// Get plain text content of the whole document.
    pub fn plain_text(&self) -> String {
        self.pages
            .iter()
            .map(Page::plain_text)
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
