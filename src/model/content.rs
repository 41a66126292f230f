//! Positioned content fragments produced by the page decoder.

use serde::{Deserialize, Serialize};

use super::{Rect, StyleId};

/// An RGB fill color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Whether the color is the page background.
    pub fn is_background(&self) -> bool {
        *self == Color::WHITE
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

/// A run of text with a single style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    pub rect: Rect,
    pub text: String,
    pub style: StyleId,
}

impl TextRun {
    pub fn new(rect: Rect, text: impl Into<String>, style: StyleId) -> Self {
        Self {
            rect,
            text: text.into(),
            style,
        }
    }
}

/// A vector shape or raster image, possibly merged from several inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphicObject {
    pub rect: Rect,
    pub color: Color,
    /// Raster image rather than vector drawing
    pub is_picture: bool,
    /// Number of decoder shapes absorbed into this object
    pub sources: usize,
}

impl GraphicObject {
    pub fn new(rect: Rect, color: Color, is_picture: bool) -> Self {
        Self {
            rect,
            color,
            is_picture,
            sources: 1,
        }
    }

    /// Style used when the graphic stands in for a word.
    pub fn style(&self) -> StyleId {
        if self.is_math_bar() {
            StyleId::MATH_BAR
        } else if self.is_picture {
            StyleId::GRAPHIC_IMAGE
        } else {
            StyleId::GRAPHIC_FIGURE
        }
    }

    /// Thin horizontal rule such as a fraction bar.
    pub fn is_math_bar(&self) -> bool {
        let height = self.rect.height();
        !self.is_picture && height <= 5.0 && (height <= 0.0 || self.rect.width() / height >= 6.0)
    }
}

/// Atomic positioned unit of page content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContentItem {
    Text(TextRun),
    Graphic(GraphicObject),
}

impl ContentItem {
    pub fn rect(&self) -> Rect {
        match self {
            ContentItem::Text(t) => t.rect,
            ContentItem::Graphic(g) => g.rect,
        }
    }

    pub fn style(&self) -> StyleId {
        match self {
            ContentItem::Text(t) => t.style,
            ContentItem::Graphic(g) => g.style(),
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, ContentItem::Text(_))
    }
}

/// Unordered content of one page, as delivered by the decoder.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PageContent {
    /// Page number (1-indexed)
    pub number: u32,

    /// Page bounding rectangle
    pub bounds: Rect,

    /// Page rotation in degrees (0, 90, 180, 270)
    #[serde(default)]
    pub rotation: u16,

    /// Text runs and graphics in arbitrary order
    pub items: Vec<ContentItem>,
}

impl PageContent {
    pub fn new(number: u32, bounds: Rect) -> Self {
        Self {
            number,
            bounds,
            rotation: 0,
            items: Vec::new(),
        }
    }

    /// Add a text run.
    pub fn push_text(&mut self, rect: Rect, text: impl Into<String>, style: StyleId) {
        self.items.push(ContentItem::Text(TextRun::new(rect, text, style)));
    }

    /// Add a vector shape or raster image.
    pub fn push_graphic(&mut self, rect: Rect, color: Color, is_picture: bool) {
        self.items
            .push(ContentItem::Graphic(GraphicObject::new(rect, color, is_picture)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_background_color() {
        assert!(Color::WHITE.is_background());
        assert!(!Color::rgb(254, 255, 255).is_background());
    }

    #[test]
    fn test_math_bar_shape() {
        let bar = GraphicObject::new(Rect::new(0.0, 0.0, 30.0, 1.0), Color::BLACK, false);
        assert!(bar.is_math_bar());
        assert_eq!(bar.style(), StyleId::MATH_BAR);

        let square = GraphicObject::new(Rect::new(0.0, 0.0, 4.0, 4.0), Color::BLACK, false);
        assert!(!square.is_math_bar());
        assert_eq!(square.style(), StyleId::GRAPHIC_FIGURE);

        let picture = GraphicObject::new(Rect::new(0.0, 0.0, 30.0, 1.0), Color::BLACK, true);
        assert!(!picture.is_math_bar());
    }

    #[test]
    fn test_content_item_accessors() {
        let run = ContentItem::Text(TextRun::new(
            Rect::new(0.0, 0.0, 5.0, 5.0),
            "a",
            StyleId(7),
        ));
        assert!(run.is_text());
        assert_eq!(run.style(), StyleId(7));

        let image = ContentItem::Graphic(GraphicObject::new(
            Rect::new(1.0, 1.0, 2.0, 2.0),
            Color::BLACK,
            true,
        ));
        assert_eq!(image.style(), StyleId::GRAPHIC_IMAGE);
        assert_eq!(image.rect().x1, 1.0);
    }
}
