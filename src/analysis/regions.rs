//! Region splitting at horizontal whitespace.
//!
//! Scans a region row by row from the top. At an empty row, if the content
//! seen since the last split contains real text, the row is far enough from
//! that split, and the style above the gap differs from the style of the
//! first content below it, the region is cut in two and the scan continues
//! in the lower half. This separates title blocks and similar differently
//! styled headers from the body without a dedicated title heuristic.

use crate::model::{dominating_style, Rect, StyleRegistry, Word};

use super::paragraphs::{style_compare, StyleDifference};

/// Minimum distance between splits when isolating the top of a page.
pub const TOP_SPLIT_MIN_DISTANCE: f32 = 10.0;

/// Minimum distance between splits inside a region.
pub const REGION_SPLIT_MIN_DISTANCE: f32 = 20.0;

/// Upper bound on scanned rows, guarding against absurd coordinates.
const MAX_SCAN_ROWS: usize = 1 << 16;

/// Split the words of a page into regions, top to bottom.
///
/// The top `top_fraction` of the page is scanned first with
/// [`TOP_SPLIT_MIN_DISTANCE`]; every resulting region is then scanned in
/// full with [`REGION_SPLIT_MIN_DISTANCE`].
pub fn split_page(
    words: Vec<Word>,
    page: &Rect,
    top_fraction: f32,
    registry: &StyleRegistry,
) -> Vec<Vec<Word>> {
    if words.is_empty() {
        return Vec::new();
    }

    split_region(words, page, top_fraction, TOP_SPLIT_MIN_DISTANCE, registry)
        .into_iter()
        .flat_map(|region| {
            let frame = bounds(&region);
            split_region(region, &frame, 1.0, REGION_SPLIT_MIN_DISTANCE, registry)
        })
        .collect()
}

/// Split one region. `frame` gives the scan start (`frame.y1`) and the
/// height that `fraction` applies to.
pub fn split_region(
    words: Vec<Word>,
    frame: &Rect,
    fraction: f32,
    min_distance: f32,
    registry: &StyleRegistry,
) -> Vec<Vec<Word>> {
    let mut result = Vec::new();
    let mut active = words;
    let mut active_pos = bounds(&active);

    let start_y = frame.y1;
    let end_y = active_pos.y2.min(start_y + frame.height() * fraction);
    let rows = ((end_y - start_y).max(0.0) as usize).min(MAX_SCAN_ROWS);

    let mut last_split = f32::NEG_INFINITY;
    let mut working = vec![false; active.len()];

    for row in 0..=rows {
        let y = start_y + row as f32;
        if y < active_pos.y1 {
            continue;
        }

        let mut row_empty = true;
        for (i, word) in active.iter().enumerate() {
            if covers_row(word, y) {
                working[i] = true;
                row_empty = false;
            }
        }
        if !row_empty {
            continue;
        }

        let over: Vec<&Word> = active
            .iter()
            .zip(&working)
            .filter_map(|(w, seen)| seen.then_some(w))
            .collect();
        if !over.iter().any(|w| is_styled_text(w)) {
            continue;
        }
        if y - last_split < min_distance {
            continue;
        }
        if same_style_across(&active, y, &over, registry) {
            continue;
        }

        let (upper, lower): (Vec<Word>, Vec<Word>) =
            active.into_iter().partition(|w| w.rect.y1 < y);
        if upper.is_empty() || lower.is_empty() {
            active = upper.into_iter().chain(lower).collect();
            break;
        }

        log::debug!(
            "Horizontal split at y={:.1}: {} words above, {} below",
            y,
            upper.len(),
            lower.len()
        );
        result.push(upper);
        active = lower;
        active_pos = bounds(&active);
        working = vec![false; active.len()];
        last_split = y;
    }

    if !active.is_empty() {
        result.push(active);
    }
    result
}

fn bounds(words: &[Word]) -> Rect {
    Rect::union_all(words.iter().map(|w| w.rect)).unwrap_or_default()
}

fn covers_row(word: &Word, y: f32) -> bool {
    word.rect.y1 <= y && y <= word.rect.y2
}

fn is_styled_text(word: &Word) -> bool {
    !word.is_graphic && !word.style.is_sentinel()
}

/// Whether the content above `y` and the first content row below it share
/// a style.
fn same_style_across(active: &[Word], y: f32, over: &[&Word], registry: &StyleRegistry) -> bool {
    // Row `y` is empty, so every word below it starts after `y`.
    let next_top = active
        .iter()
        .map(|w| w.rect.y1)
        .filter(|&top| top >= y)
        .fold(f32::INFINITY, f32::min);
    let under = active.iter().filter(|w| covers_row(w, next_top));

    let style_over = dominating_style(over.iter().copied());
    let style_under = dominating_style(under);
    matches!(
        style_compare(registry, style_over, style_under),
        StyleDifference::SameStyle | StyleDifference::SameStyleAndBigText
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FontSpec, StyleId};

    fn word(y: f32, height: f32, style: StyleId) -> Word {
        Word {
            rect: Rect::from_size(50.0, y, 100.0, height),
            text: "text".to_string(),
            style,
            is_graphic: false,
            input_order: 0,
        }
    }

    #[test]
    fn test_title_is_split_from_body() {
        let registry = StyleRegistry::new();
        let title = registry.get_or_create(&FontSpec::new("Helvetica", 20.0).bold());
        let body = registry.get_or_create(&FontSpec::new("Times", 10.0));
        let words = vec![
            word(50.0, 20.0, title),
            word(90.0, 10.0, body),
            word(102.0, 10.0, body),
        ];
        let page = Rect::new(0.0, 0.0, 600.0, 800.0);

        let regions = split_page(words, &page, 0.4, &registry);
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].len(), 1);
        assert_eq!(regions[0][0].style, title);
        assert_eq!(regions[1].len(), 2);
    }

    #[test]
    fn test_same_style_is_not_split() {
        let registry = StyleRegistry::new();
        let body = registry.get_or_create(&FontSpec::new("Times", 10.0));
        let words = vec![word(0.0, 10.0, body), word(40.0, 10.0, body)];
        let page = Rect::new(0.0, 0.0, 600.0, 800.0);

        let regions = split_page(words, &page, 0.4, &registry);
        assert_eq!(regions.len(), 1);
    }

    #[test]
    fn test_split_needs_minimum_distance() {
        let registry = StyleRegistry::new();
        let title = registry.get_or_create(&FontSpec::new("Helvetica", 20.0).bold());
        let body = registry.get_or_create(&FontSpec::new("Times", 10.0));
        let subtitle = registry.get_or_create(&FontSpec::new("Courier", 12.0));
        // The gap below the body text comes only 5 rows after the first
        // split, too close for a second split.
        let words = vec![
            word(0.0, 10.0, title),
            word(12.0, 3.0, body),
            word(17.0, 10.0, subtitle),
        ];
        let frame = bounds(&words);
        let regions = split_region(words, &frame, 1.0, TOP_SPLIT_MIN_DISTANCE, &registry);
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[1].len(), 2);
    }

    #[test]
    fn test_graphics_alone_do_not_split() {
        let registry = StyleRegistry::new();
        let body = registry.get_or_create(&FontSpec::new("Times", 10.0));
        let graphic = Word {
            is_graphic: true,
            text: String::new(),
            ..word(0.0, 10.0, StyleId::GRAPHIC_FIGURE)
        };
        let words = vec![graphic, word(30.0, 10.0, body)];
        let frame = bounds(&words);
        let regions = split_region(words, &frame, 1.0, TOP_SPLIT_MIN_DISTANCE, &registry);
        assert_eq!(regions.len(), 1);
    }

    #[test]
    fn test_far_outlier_shares_region() {
        let registry = StyleRegistry::new();
        let body = registry.get_or_create(&FontSpec::new("Times", 10.0));
        let words = vec![word(100.0, 10.0, body), word(3e7, 10.0, body)];
        let page = Rect::new(0.0, 0.0, 612.0, 792.0);

        let regions = split_page(words, &page, 0.4, &registry);
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].len(), 2);
    }

    #[test]
    fn test_far_outlier_with_other_style_is_split() {
        let registry = StyleRegistry::new();
        let title = registry.get_or_create(&FontSpec::new("Helvetica", 20.0).bold());
        let body = registry.get_or_create(&FontSpec::new("Times", 10.0));
        let words = vec![word(100.0, 20.0, title), word(3e7, 10.0, body)];
        let page = Rect::new(0.0, 0.0, 612.0, 792.0);

        let regions = split_page(words, &page, 0.4, &registry);
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0][0].style, title);
        assert_eq!(regions[1][0].style, body);
    }

    #[test]
    fn test_empty_input() {
        let registry = StyleRegistry::new();
        assert!(split_page(Vec::new(), &Rect::default(), 0.4, &registry).is_empty());
    }
}
