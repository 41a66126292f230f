//! Section heading tagging.

use crate::error::Result;
use crate::model::{Document, Paragraph, Role, StyleId};

use super::styles::DocumentStyles;
use super::LogicalOperation;

/// Tags numbered section headings as [`Role::Div1`] to [`Role::Div3`].
///
/// The first three header-candidate styles found on paragraphs starting
/// with a digit become the three division levels, in document order.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecognizeDivisions;

impl RecognizeDivisions {
    pub fn new() -> Self {
        Self
    }

    /// Styles used for the division levels, outermost first.
    pub fn division_styles(&self, doc: &Document, styles: &DocumentStyles) -> Vec<StyleId> {
        let mut remaining = styles.header_candidates.clone();
        let mut levels = Vec::with_capacity(3);

        for paragraph in doc.pages.iter().flat_map(|p| p.paragraphs()) {
            if levels.len() == 3 {
                break;
            }
            if paragraph.role().is_some() || !starts_with_digit(paragraph) {
                continue;
            }
            let style = paragraph.dominating_style();
            if remaining.shift_remove(&style) {
                levels.push(style);
            }
        }
        levels
    }

    /// Tag headings and return how many paragraphs received a role.
    pub fn run(&self, doc: &mut Document, styles: &DocumentStyles) -> usize {
        let levels = self.division_styles(doc, styles);
        if levels.is_empty() {
            return 0;
        }
        log::info!("Division styles: {:?}", levels);

        let roles = [Role::Div1, Role::Div2, Role::Div3];
        let mut tagged = 0;
        for paragraph in doc.pages.iter_mut().flat_map(|p| p.paragraphs_mut()) {
            if !starts_with_digit(paragraph) {
                continue;
            }
            let style = paragraph.dominating_style();
            if let Some(level) = levels.iter().position(|s| *s == style) {
                if paragraph.set_role(roles[level]) {
                    tagged += 1;
                }
            }
        }
        tagged
    }
}

impl LogicalOperation for RecognizeDivisions {
    fn name(&self) -> &'static str {
        "recognize-divisions"
    }

    fn apply(&self, doc: &mut Document, styles: &DocumentStyles) -> Result<()> {
        let tagged = self.run(doc, styles);
        log::info!("Tagged {} section headings", tagged);
        Ok(())
    }
}

fn starts_with_digit(paragraph: &Paragraph) -> bool {
    paragraph
        .words()
        .find(|w| !w.is_graphic)
        .and_then(|w| w.text.chars().next())
        .map_or(false, |c| c.is_ascii_digit())
}
