//! Plain text rendering for analysed documents.

use crate::error::Result;
use crate::model::{Document, Role};

use super::RenderOptions;

/// Convert a document to plain text, one blank line between paragraphs.
pub fn to_text(doc: &Document, options: &RenderOptions) -> Result<String> {
    let mut output = String::new();

    for page in doc
        .pages
        .iter()
        .filter(|p| options.page_selection.includes(p.number))
    {
        if options.page_headers {
            output.push_str(&format!("--- page {} ---\n\n", page.number));
        }
        for paragraph in page.paragraphs() {
            if options.mark_roles {
                if let Some(role) = paragraph.role() {
                    output.push_str(role_marker(role));
                    output.push(' ');
                }
            }
            output.push_str(&paragraph.text());
            output.push_str("\n\n");
        }
    }

    Ok(output.trim().to_string())
}

fn role_marker(role: Role) -> &'static str {
    match role {
        Role::Title => "[title]",
        Role::Div1 => "[div1]",
        Role::Div2 => "[div2]",
        Role::Div3 => "[div3]",
        Role::Footnote => "[footnote]",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Line, Page, Paragraph, Rect, Region, StyleId, Word};
    use crate::render::PageSelection;

    fn paragraph(id: u32, page: u32, text: &str) -> Paragraph {
        let words = text
            .split_whitespace()
            .enumerate()
            .map(|(i, t)| Word {
                rect: Rect::from_size(i as f32 * 40.0, id as f32 * 20.0, 35.0, 10.0),
                text: t.to_string(),
                style: StyleId(4),
                is_graphic: false,
                input_order: i,
            })
            .collect();
        Paragraph::new(id, page, 0, vec![Line::new(words)])
    }

    fn sample() -> Document {
        let mut doc = Document::new();
        for number in 1..=2 {
            let mut page = Page::new(number, Rect::new(0.0, 0.0, 600.0, 800.0));
            let mut heading = paragraph(0, number, "1 Introduction");
            heading.set_role(Role::Div1);
            page.regions.push(Region::new(
                0,
                vec![heading, paragraph(1, number, "Hello, world!")],
            ));
            doc.pages.push(page);
        }
        doc
    }

    #[test]
    fn test_to_text() {
        let text = to_text(&sample(), &RenderOptions::default()).unwrap();
        assert!(text.starts_with("1 Introduction\n\nHello, world!"));
        assert!(!text.ends_with('\n'));
    }

    #[test]
    fn test_roles_and_page_selection() {
        let options = RenderOptions::new()
            .with_roles(true)
            .with_page_headers(true)
            .with_pages(PageSelection::Pages(vec![2]));
        let text = to_text(&sample(), &options).unwrap();

        assert!(text.starts_with("--- page 2 ---"));
        assert!(text.contains("[div1] 1 Introduction"));
        assert!(!text.contains("page 1"));
    }
}
