//! JSON rendering for analysed documents.

use crate::error::{Error, Result};
use crate::model::Document;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert a document, styles included, to JSON.
pub fn to_json(doc: &Document, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(doc),
        JsonFormat::Compact => serde_json::to_string(doc),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FontSpec, Line, Page, Paragraph, Rect, Region, Word};

    fn sample() -> Document {
        let mut doc = Document::new();
        let style = doc.styles.get_or_create(&FontSpec::new("Times", 10.0));
        let word = Word {
            rect: Rect::new(72.0, 100.0, 100.0, 110.0),
            text: "Hello".to_string(),
            style,
            is_graphic: false,
            input_order: 0,
        };
        let mut page = Page::new(1, Rect::new(0.0, 0.0, 612.0, 792.0));
        page.regions.push(Region::new(
            0,
            vec![Paragraph::new(0, 1, 0, vec![Line::new(vec![word])])],
        ));
        doc.pages.push(page);
        doc
    }

    #[test]
    fn test_to_json_pretty() {
        let json = to_json(&sample(), JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"Hello\""));
        assert!(json.contains("\"Times\""));
        assert!(json.contains('\n'));
    }

    #[test]
    fn test_to_json_compact_reloads() {
        let doc = sample();
        let json = to_json(&doc, JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n'));

        let back: Document = serde_json::from_str(&json).unwrap();
        assert_eq!(back.pages, doc.pages);
        assert_eq!(back.styles.len(), doc.styles.len());
    }
}
