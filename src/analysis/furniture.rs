//! Page-number removal.
//!
//! Candidates are bottom-of-page paragraphs made of a single number. When
//! enough pages carry one, the style most candidates share is taken as the
//! page-number style, and every page with exactly one candidate in that
//! style loses it. Anything ambiguous is left in place.

use crate::error::Result;
use crate::model::{dominating_style, Document, Page, Paragraph};

use super::styles::DocumentStyles;
use super::LogicalOperation;

/// Share of the page height above the page-number zone.
const BOTTOM_ZONE_START: f32 = 0.85;

/// Removes recurring page numbers from a document.
#[derive(Debug, Clone, Copy, Default)]
pub struct RemovePageNumbers;

impl RemovePageNumbers {
    pub fn new() -> Self {
        Self
    }

    /// Remove page numbers and hand the detached paragraphs back.
    pub fn run(&self, doc: &mut Document) -> Vec<Paragraph> {
        let candidates: Vec<(usize, Vec<u32>)> = doc
            .pages
            .iter()
            .enumerate()
            .filter_map(|(index, page)| {
                let ids: Vec<u32> = page
                    .paragraphs()
                    .filter(|p| is_candidate(page, p))
                    .map(|p| p.id)
                    .collect();
                (!ids.is_empty()).then_some((index, ids))
            })
            .collect();

        let required = (doc.pages.len() / 2).max(1);
        if candidates.len() < required {
            log::info!(
                "Could not find page numbers: {} of {} pages have candidates",
                candidates.len(),
                doc.pages.len()
            );
            return Vec::new();
        }

        let page_number_style = dominating_style(candidates.iter().flat_map(|(index, ids)| {
            let page = &doc.pages[*index];
            page.paragraphs()
                .filter(move |p| ids.contains(&p.id))
                .flat_map(|p| p.words())
        }));
        log::info!("Most probable page number style: {:?}", page_number_style);

        let mut removed = Vec::new();
        for (index, ids) in candidates {
            let page = &mut doc.pages[index];
            let matching: Vec<u32> = page
                .paragraphs()
                .filter(|p| ids.contains(&p.id) && p.dominating_style() == page_number_style)
                .map(|p| p.id)
                .collect();

            match matching.as_slice() {
                [] => log::warn!(
                    "Page {}: no page number left after checking style",
                    page.number
                ),
                [id] => {
                    if let Some(paragraph) = page.remove_paragraph(*id) {
                        log::debug!(
                            "Page {}: removing page number '{}'",
                            page.number,
                            paragraph.text()
                        );
                        removed.push(paragraph);
                    }
                }
                _ => log::warn!(
                    "Page {}: found {} possible page numbers, keeping all",
                    page.number,
                    matching.len()
                ),
            }
        }
        removed
    }
}

impl LogicalOperation for RemovePageNumbers {
    fn name(&self) -> &'static str {
        "remove-page-numbers"
    }

    fn apply(&self, doc: &mut Document, _styles: &DocumentStyles) -> Result<()> {
        let removed = self.run(doc);
        log::info!("Removed {} page numbers", removed.len());
        Ok(())
    }
}

fn is_candidate(page: &Page, paragraph: &Paragraph) -> bool {
    if paragraph.role().is_some() || paragraph.lines().len() != 1 || paragraph.word_count() != 1 {
        return false;
    }

    let zone_start = page.bounds.y1 + page.bounds.height() * BOTTOM_ZONE_START;
    if paragraph.rect().y1 < zone_start {
        return false;
    }

    let text = paragraph.text();
    let text = text.trim();
    !text.is_empty() && text.chars().all(|c| c.is_ascii_digit())
}
