//! Words, lines and paragraphs.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::{ContentItem, Rect, StyleId};

/// A single positioned word, or a placeholder for an inline graphic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub rect: Rect,
    pub text: String,
    pub style: StyleId,
    /// Stands in for a graphic rather than text
    pub is_graphic: bool,
    /// Position in the decoder's original output
    pub input_order: usize,
}

impl Word {
    /// Create a word from a content item.
    pub fn from_item(item: &ContentItem, input_order: usize) -> Self {
        match item {
            ContentItem::Text(run) => Self {
                rect: run.rect,
                text: run.text.clone(),
                style: run.style,
                is_graphic: false,
                input_order,
            },
            ContentItem::Graphic(graphic) => Self {
                rect: graphic.rect,
                text: String::new(),
                style: graphic.style(),
                is_graphic: true,
                input_order,
            },
        }
    }

    /// Number of characters, at least one so placeholders still weigh in.
    pub fn weight(&self) -> usize {
        self.text.chars().count().max(1)
    }
}

/// Style carrying the most character mass; the first seen wins ties.
pub fn dominating_style<'a, I>(words: I) -> StyleId
where
    I: IntoIterator<Item = &'a Word>,
{
    let mut counts: IndexMap<StyleId, usize> = IndexMap::new();
    for word in words {
        *counts.entry(word.style).or_insert(0) += word.weight();
    }

    let mut best = StyleId::NO_STYLE;
    let mut best_count = 0;
    for (style, count) in counts {
        if count > best_count {
            best = style;
            best_count = count;
        }
    }
    best
}

/// Words sharing one baseline.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Line {
    words: Vec<Word>,
    rect: Rect,
}

impl Line {
    /// Create a line from words, keeping their order.
    pub fn new(words: Vec<Word>) -> Self {
        let rect = Rect::union_all(words.iter().map(|w| w.rect)).unwrap_or_default();
        Self { words, rect }
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn into_words(self) -> Vec<Word> {
        self.words
    }

    /// Bounding rectangle, the union of all word rectangles.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Append the words of another line, then reorder with `order`.
    pub fn absorb<F>(&mut self, other: Line, order: F)
    where
        F: FnMut(&Word, &Word) -> std::cmp::Ordering,
    {
        self.words.extend(other.words);
        self.words.sort_by(order);
        self.rect = Rect::union_all(self.words.iter().map(|w| w.rect)).unwrap_or_default();
    }

    pub fn dominating_style(&self) -> StyleId {
        dominating_style(&self.words)
    }

    /// Whether any word carries `style`.
    pub fn has_word_with_style(&self, style: StyleId) -> bool {
        self.words.iter().any(|w| w.style == style)
    }

    /// Text content with words separated by single spaces.
    pub fn text(&self) -> String {
        self.words
            .iter()
            .filter(|w| !w.is_graphic)
            .map(|w| w.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Structural role attached by a post-pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Title,
    Div1,
    Div2,
    Div3,
    Footnote,
}

/// A group of consecutive lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    /// Reading-order key, unique within a page
    pub id: u32,

    /// Number of the owning page
    pub page: u32,

    /// Index of the owning region on the page
    pub region: usize,

    lines: Vec<Line>,
    rect: Rect,
    role: Option<Role>,

    /// Index into the page's graphics when the paragraph labels a figure
    pub graphic_anchor: Option<usize>,
}

impl Paragraph {
    pub fn new(id: u32, page: u32, region: usize, lines: Vec<Line>) -> Self {
        let rect = Rect::union_all(lines.iter().map(|l| l.rect)).unwrap_or_default();
        Self {
            id,
            page,
            region,
            lines,
            rect,
            role: None,
            graphic_anchor: None,
        }
    }

    /// Anchor the paragraph to a page graphic.
    pub fn anchored_to(mut self, graphic: usize) -> Self {
        self.graphic_anchor = Some(graphic);
        self
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Bounding rectangle, the union of all line rectangles.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn words(&self) -> impl Iterator<Item = &Word> {
        self.lines.iter().flat_map(|l| l.words.iter())
    }

    pub fn word_count(&self) -> usize {
        self.lines.iter().map(Line::len).sum()
    }

    pub fn dominating_style(&self) -> StyleId {
        dominating_style(self.words())
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    /// Attach a role. Returns `false` and leaves the paragraph unchanged if
    /// a role was already set.
    pub fn set_role(&mut self, role: Role) -> bool {
        if self.role.is_some() {
            return false;
        }
        self.role = Some(role);
        true
    }

    /// Text content with lines separated by newlines.
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(Line::text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}
