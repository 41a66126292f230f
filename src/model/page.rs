//! Page-level types.

use serde::{Deserialize, Serialize};

use super::{GraphicObject, Paragraph, Rect};

/// A vertical slice of a page holding paragraphs in reading order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    /// Position of the region on its page
    pub index: usize,
    rect: Rect,
    paragraphs: Vec<Paragraph>,
}

impl Region {
    pub fn new(index: usize, paragraphs: Vec<Paragraph>) -> Self {
        let rect = Self::bounds_of(&paragraphs);
        Self {
            index,
            rect,
            paragraphs,
        }
    }

    fn bounds_of(paragraphs: &[Paragraph]) -> Rect {
        Rect::union_all(paragraphs.iter().map(Paragraph::rect)).unwrap_or_default()
    }

    /// Bounding rectangle, the union of all paragraph rectangles.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraphs
    }

    /// Mutable access for role taggers. Geometry must not be changed.
    pub fn paragraphs_mut(&mut self) -> &mut [Paragraph] {
        &mut self.paragraphs
    }

    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }

    fn remove(&mut self, id: u32) -> Option<Paragraph> {
        let pos = self.paragraphs.iter().position(|p| p.id == id)?;
        let removed = self.paragraphs.remove(pos);
        self.rect = Self::bounds_of(&self.paragraphs);
        Some(removed)
    }
}

/// A single analysed page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Page number (1-indexed)
    pub number: u32,

    /// Page bounding rectangle
    pub bounds: Rect,

    /// Page rotation in degrees (0, 90, 180, 270)
    pub rotation: u16,

    /// Regions in reading order
    pub regions: Vec<Region>,

    /// Figures and images that are not part of a text line
    pub graphics: Vec<GraphicObject>,
}

impl Page {
    /// Create an empty page.
    pub fn new(number: u32, bounds: Rect) -> Self {
        Self {
            number,
            bounds,
            rotation: 0,
            regions: Vec::new(),
            graphics: Vec::new(),
        }
    }

    /// All paragraphs in reading order.
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.regions.iter().flat_map(|r| r.paragraphs.iter())
    }

    pub fn paragraphs_mut(&mut self) -> impl Iterator<Item = &mut Paragraph> {
        self.regions.iter_mut().flat_map(|r| r.paragraphs.iter_mut())
    }

    pub fn paragraph_count(&self) -> usize {
        self.regions.iter().map(|r| r.paragraphs.len()).sum()
    }

    /// Detach a paragraph from its region and hand it to the caller.
    pub fn remove_paragraph(&mut self, id: u32) -> Option<Paragraph> {
        self.regions.iter_mut().find_map(|r| r.remove(id))
    }

    /// Get plain text content of the page.
    pub fn plain_text(&self) -> String {
        self.paragraphs()
            .map(Paragraph::text)
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    pub fn is_empty(&self) -> bool {
        self.regions.iter().all(Region::is_empty) && self.graphics.is_empty()
    }
}
