//! Ingestion of decoder output.
//!
//! The page decoder hands over pages as JSON: page geometry plus an
//! unordered list of text runs (with raw font attributes) and graphics.
//! Ingestion normalizes rectangles, interns fonts in the document's
//! [`StyleRegistry`] and produces one [`PageContent`] per page.

use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::analysis::ErrorMode;
use crate::error::{Error, Result};
use crate::model::{
    Color, ContentItem, FontSpec, GraphicObject, PageContent, Rect, StyleRegistry, TextRun,
};

/// Decoder output for a whole document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawDocument {
    pub pages: Vec<RawPage>,
}

/// Decoder output for one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPage {
    /// Page number (1-indexed)
    pub number: u32,

    /// Page rectangle as `[x1, y1, x2, y2]`
    pub bounds: [f32; 4],

    /// Page rotation in degrees
    #[serde(default)]
    pub rotation: u16,

    #[serde(default)]
    pub items: Vec<RawItem>,
}

/// A positioned fragment as reported by the decoder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RawItem {
    Text {
        /// Rectangle as `[x1, y1, x2, y2]`, corners in any order
        bounds: [f32; 4],
        text: String,
        font: FontSpec,
    },
    Graphic {
        /// Rectangle as `[x1, y1, x2, y2]`, corners in any order
        bounds: [f32; 4],
        #[serde(default)]
        color: Color,
        /// Raster image rather than vector drawing
        #[serde(default)]
        picture: bool,
    },
}

impl RawItem {
    fn bounds(&self) -> &[f32; 4] {
        match self {
            RawItem::Text { bounds, .. } | RawItem::Graphic { bounds, .. } => bounds,
        }
    }
}

/// Parse decoder output from a JSON string.
pub fn parse_json(json: &str) -> Result<RawDocument> {
    Ok(serde_json::from_str(json)?)
}

/// Parse decoder output from a reader.
pub fn parse_reader<R: Read>(reader: R) -> Result<RawDocument> {
    Ok(serde_json::from_reader(reader)?)
}

/// Convert decoder output into page contents, interning fonts in
/// `registry`.
///
/// Items with non-finite coordinates fail the whole document in
/// [`ErrorMode::Strict`] and are skipped with a warning in
/// [`ErrorMode::Lenient`]. Whitespace-only text runs are dropped.
pub fn ingest(
    raw: RawDocument,
    registry: &StyleRegistry,
    mode: ErrorMode,
) -> Result<Vec<PageContent>> {
    raw.pages
        .into_iter()
        .map(|page| ingest_page(page, registry, mode))
        .collect()
}

fn ingest_page(raw: RawPage, registry: &StyleRegistry, mode: ErrorMode) -> Result<PageContent> {
    let bounds = match to_rect(&raw.bounds) {
        Some(rect) => rect,
        None => {
            let message = format!("page {} bounds {:?}", raw.number, raw.bounds);
            match mode {
                ErrorMode::Strict => return Err(Error::InvalidGeometry(message)),
                ErrorMode::Lenient => {
                    log::warn!("Invalid {}, using item extent", message);
                    item_extent(&raw.items).unwrap_or_default()
                }
            }
        }
    };

    let mut content = PageContent::new(raw.number, bounds);
    content.rotation = raw.rotation;

    for (index, item) in raw.items.into_iter().enumerate() {
        let Some(rect) = to_rect(item.bounds()) else {
            let message = format!(
                "page {} item {} bounds {:?}",
                raw.number,
                index,
                item.bounds()
            );
            match mode {
                ErrorMode::Strict => return Err(Error::InvalidGeometry(message)),
                ErrorMode::Lenient => {
                    log::warn!("Skipping item with invalid {}", message);
                    continue;
                }
            }
        };

        match item {
            RawItem::Text { text, font, .. } => {
                if text.trim().is_empty() {
                    continue;
                }
                let style = registry.get_or_create(&font);
                content
                    .items
                    .push(ContentItem::Text(TextRun::new(rect, text.trim(), style)));
            }
            RawItem::Graphic { color, picture, .. } => {
                content
                    .items
                    .push(ContentItem::Graphic(GraphicObject::new(rect, color, picture)));
            }
        }
    }

    log::debug!(
        "Ingested page {} with {} items",
        content.number,
        content.items.len()
    );
    Ok(content)
}

fn to_rect(bounds: &[f32; 4]) -> Option<Rect> {
    let [x1, y1, x2, y2] = *bounds;
    if bounds.iter().all(|v| v.is_finite()) {
        Some(Rect::new(x1, y1, x2, y2))
    } else {
        None
    }
}

fn item_extent(items: &[RawItem]) -> Option<Rect> {
    Rect::union_all(items.iter().filter_map(|item| to_rect(item.bounds())))
}
