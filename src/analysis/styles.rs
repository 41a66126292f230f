//! Document-wide style statistics.
//!
//! Counts character mass per style, picks the body-text style and collects
//! the styles that may be used for headings.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::{Document, Line, Style, StyleId};

/// First letters accepted as enumeration markers ("a", "B", "I", ...).
const MARKER_LETTERS: &str = "abcdABCI";

/// Longest leading token considered an enumeration marker.
const MAX_MARKER_LEN: usize = 3;

/// Style statistics for a whole document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentStyles {
    /// Characters per style, in first-encountered order
    pub counts: IndexMap<StyleId, usize>,

    /// Style with the most characters
    pub body: StyleId,

    /// Styles that may be used for headings, in first-encountered order
    pub header_candidates: IndexSet<StyleId>,
}

impl DocumentStyles {
    /// Collect statistics for `doc`.
    pub fn analyze(doc: &Document) -> Result<Self> {
        let counts = compute_style_counts(doc);
        let body = find_body_style(&counts);
        let header_candidates = find_header_candidates(doc, body)?;

        log::info!("Body text style is {:?}", body);
        log::info!("Header candidates: {:?}", header_candidates);

        Ok(Self {
            counts,
            body,
            header_candidates,
        })
    }

    pub fn is_header_candidate(&self, style: StyleId) -> bool {
        self.header_candidates.contains(&style)
    }
}

/// Sum text characters per style over every word of the document.
pub fn compute_style_counts(doc: &Document) -> IndexMap<StyleId, usize> {
    let mut counts = IndexMap::new();
    for word in doc
        .pages
        .iter()
        .flat_map(|p| p.paragraphs())
        .flat_map(|p| p.words())
        .filter(|w| !w.is_graphic)
    {
        *counts.entry(word.style).or_insert(0) += word.text.chars().count();
    }
    counts
}

/// The style with the highest count. Ties go to the first entry; an empty
/// map yields [`StyleId::NO_STYLE`].
pub fn find_body_style(counts: &IndexMap<StyleId, usize>) -> StyleId {
    let mut body = StyleId::NO_STYLE;
    let mut max = None;
    for (style, count) in counts {
        if max.map_or(true, |m| *count > m) {
            max = Some(*count);
            body = *style;
        }
    }
    body
}

/// Styles of lines that look like headings: at least body size, or a
/// bigger, different font starting with an enumeration marker.
pub fn find_header_candidates(doc: &Document, body: StyleId) -> Result<IndexSet<StyleId>> {
    let mut candidates = IndexSet::new();
    if body == StyleId::NO_STYLE {
        return Ok(candidates);
    }
    let body_style = doc.style(body)?;

    for line in doc
        .pages
        .iter()
        .flat_map(|p| p.paragraphs())
        .flat_map(|p| p.lines())
    {
        let line_style = line.dominating_style();
        if line_style == body || line_style.is_sentinel() || candidates.contains(&line_style) {
            continue;
        }

        let style = doc.style(line_style)?;
        if can_be_header_style(&style, &body_style) || can_be_line_id(line, &style, &body_style) {
            log::debug!("Line '{}' can be a header", line.text());
            candidates.insert(line_style);
        }
    }
    Ok(candidates)
}

fn can_be_header_style(style: &Style, body: &Style) -> bool {
    style.size_x >= body.size_x
}

fn can_be_line_id(line: &Line, style: &Style, body: &Style) -> bool {
    if style.font_family == body.font_family || body.size_x >= style.size_x {
        return false;
    }

    let text = line.text();
    let Some(first) = text.split_whitespace().next() else {
        return false;
    };
    if first.chars().count() > MAX_MARKER_LEN {
        return false;
    }
    is_marker_token(first)
}

/// Whether a short token looks like "1", "2.", "a" or "IV".
pub(crate) fn is_marker_token(token: &str) -> bool {
    let Some(c) = token.chars().next() else {
        return false;
    };
    c.is_ascii_digit() || token.contains('.') || MARKER_LETTERS.contains(c)
}
