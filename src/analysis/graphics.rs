//! Graphic merging.
//!
//! Vector shapes arrive from the path splitter as many small axis-aligned
//! boxes; raster images arrive one per placement. Both lists are merged into
//! as few objects as possible by repeatedly unioning boxes that touch or lie
//! within [`COMBINE_DISTANCE`] of each other.

use std::cmp::Ordering;

use crate::model::{Color, GraphicObject, Rect};

/// Maximum gap between two graphics that still merges them.
pub const COMBINE_DISTANCE: f32 = 5.0;

/// Merge vector shapes and raster images separately.
///
/// Background-colored vector shapes are dropped first. The result holds the
/// merged figures followed by the merged pictures, each list ordered by top
/// edge then left edge.
pub fn merge_graphics(graphics: Vec<GraphicObject>) -> Vec<GraphicObject> {
    let input = graphics.len();
    let (pictures, figures): (Vec<_>, Vec<_>) = graphics.into_iter().partition(|g| g.is_picture);

    let figures: Vec<_> = figures
        .into_iter()
        .filter(|g| !g.color.is_background())
        .collect();

    let mut merged = combine(figures);
    merged.extend(combine(pictures));

    if merged.len() != input {
        log::debug!("Merged {} graphics into {}", input, merged.len());
    }
    merged
}

/// Whether two graphics are close enough to become one.
pub fn can_be_combined(a: &GraphicObject, b: &GraphicObject) -> bool {
    a.is_picture == b.is_picture && a.rect.distance(&b.rect) < COMBINE_DISTANCE
}

fn top_left(a: &GraphicObject, b: &GraphicObject) -> Ordering {
    a.rect
        .y1
        .total_cmp(&b.rect.y1)
        .then(a.rect.x1.total_cmp(&b.rect.x1))
}

/// Fixpoint merge of a single homogeneous list.
fn combine(mut list: Vec<GraphicObject>) -> Vec<GraphicObject> {
    list.sort_by(top_left);

    while let Some(merged) = combine_once(&mut list) {
        let pos = list
            .binary_search_by(|g| top_left(g, &merged).then(Ordering::Less))
            .unwrap_or_else(|e| e);
        list.insert(pos, merged);
    }
    list
}

/// Find the first item that absorbs at least one later item, remove every
/// absorbed item from `list` and return the union. `None` when nothing in
/// the list can be combined.
fn combine_once(list: &mut Vec<GraphicObject>) -> Option<GraphicObject> {
    for i in 0..list.len() {
        let mut running = list[i].clone();
        let mut absorbed = Vec::new();

        for (j, other) in list.iter().enumerate().skip(i + 1) {
            if can_be_combined(&running, other) {
                running = absorb(running, other);
                absorbed.push(j);
            }
        }

        if absorbed.is_empty() {
            continue;
        }

        for j in absorbed.into_iter().rev() {
            list.remove(j);
        }
        list.remove(i);
        return Some(running);
    }
    None
}

fn absorb(running: GraphicObject, other: &GraphicObject) -> GraphicObject {
    GraphicObject {
        rect: running.rect.union(&other.rect),
        color: propagate_color(running.color, other.color),
        is_picture: running.is_picture,
        sources: running.sources + other.sources,
    }
}

fn propagate_color(current: Color, next: Color) -> Color {
    if current.is_background() {
        next
    } else {
        current
    }
}

/// Graphics of a page sorted by how they take part in layout.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageGraphics {
    /// Thin bars that sit inside text lines
    pub inline: Vec<GraphicObject>,
    /// Figures and images laid out on their own
    pub figures: Vec<GraphicObject>,
}

/// Drop graphics at least as large as the page and split the rest into
/// inline bars and standalone figures.
pub fn categorize(graphics: Vec<GraphicObject>, page: &Rect) -> PageGraphics {
    let page_area = page.area();
    let mut result = PageGraphics::default();

    for graphic in graphics {
        if page_area > 0.0 && graphic.rect.area() >= page_area {
            log::debug!("Dropping page-sized graphic at {:?}", graphic.rect);
            continue;
        }
        if graphic.is_math_bar() {
            result.inline.push(graphic);
        } else {
            result.figures.push(graphic);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape(x1: f32, y1: f32, x2: f32, y2: f32, color: Color) -> GraphicObject {
        GraphicObject::new(Rect::new(x1, y1, x2, y2), color, false)
    }

    #[test]
    fn test_white_shapes_are_dropped_and_black_wins() {
        let merged = merge_graphics(vec![
            shape(0.0, 0.0, 10.0, 10.0, Color::WHITE),
            shape(2.0, 2.0, 12.0, 12.0, Color::WHITE),
            shape(0.0, 0.0, 10.0, 10.0, Color::BLACK),
        ]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].color, Color::BLACK);
        assert_eq!(merged[0].rect, Rect::new(0.0, 0.0, 10.0, 10.0));
    }

    #[test]
    fn test_adjacent_shapes_merge() {
        let merged = merge_graphics(vec![
            shape(0.0, 0.0, 10.0, 10.0, Color::BLACK),
            shape(12.0, 0.0, 20.0, 10.0, Color::BLACK),
            shape(100.0, 100.0, 110.0, 110.0, Color::BLACK),
        ]);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].rect, Rect::new(0.0, 0.0, 20.0, 10.0));
        assert_eq!(merged[0].sources, 2);
    }

    #[test]
    fn test_merge_creates_new_adjacency() {
        // The first union grows toward the third shape, which only then
        // comes within range.
        let merged = merge_graphics(vec![
            shape(0.0, 0.0, 10.0, 10.0, Color::BLACK),
            shape(0.0, 30.0, 10.0, 40.0, Color::BLACK),
            shape(0.0, 12.0, 10.0, 26.0, Color::BLACK),
        ]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].rect, Rect::new(0.0, 0.0, 10.0, 40.0));
        assert_eq!(merged[0].sources, 3);
    }

    #[test]
    fn test_pictures_and_figures_stay_apart() {
        let picture = GraphicObject::new(Rect::new(0.0, 0.0, 10.0, 10.0), Color::WHITE, true);
        let merged = merge_graphics(vec![picture.clone(), shape(0.0, 0.0, 10.0, 10.0, Color::BLACK)]);
        assert_eq!(merged.len(), 2);
        assert!(merged.contains(&picture));
    }

    #[test]
    fn test_color_propagation_prefers_non_background() {
        let red = Color::rgb(255, 0, 0);
        assert_eq!(propagate_color(Color::WHITE, red), red);
        assert_eq!(propagate_color(red, Color::BLACK), red);
    }

    #[test]
    fn test_empty_input() {
        assert!(merge_graphics(Vec::new()).is_empty());
    }

    #[test]
    fn test_categorize() {
        let page = Rect::new(0.0, 0.0, 100.0, 100.0);
        let graphics = vec![
            shape(0.0, 0.0, 100.0, 100.0, Color::BLACK),
            shape(10.0, 50.0, 40.0, 51.0, Color::BLACK),
            shape(10.0, 10.0, 40.0, 40.0, Color::BLACK),
        ];
        let sets = categorize(graphics, &page);
        assert_eq!(sets.inline.len(), 1);
        assert_eq!(sets.figures.len(), 1);
        assert_eq!(sets.figures[0].rect, Rect::new(10.0, 10.0, 40.0, 40.0));
    }
}
