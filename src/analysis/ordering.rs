//! Spatial ordering of positioned entities.
//!
//! Every mode is a lexicographic comparison over keys that are fixed per
//! entity (coordinates compared with `f32::total_cmp`, plus a precomputed
//! alignment class). That makes each comparator a strict weak order, so
//! `sort_by` yields a deterministic total order for any subset of items.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::model::{GraphicObject, Line, Paragraph, Rect, Region, Word};

/// Anything with a position that can be put in reading order.
pub trait SpatialEntity {
    /// Bounding rectangle on the page.
    fn bounds(&self) -> Rect;

    /// Number of the page the entity sits on.
    fn page_number(&self) -> u32 {
        0
    }

    /// Position in the decoder's original output.
    fn input_order(&self) -> usize {
        0
    }
}

impl SpatialEntity for Rect {
    fn bounds(&self) -> Rect {
        *self
    }
}

impl SpatialEntity for Word {
    fn bounds(&self) -> Rect {
        self.rect
    }

    fn input_order(&self) -> usize {
        self.input_order
    }
}

impl SpatialEntity for Line {
    fn bounds(&self) -> Rect {
        self.rect()
    }

    fn input_order(&self) -> usize {
        self.words().iter().map(|w| w.input_order).min().unwrap_or(0)
    }
}

impl SpatialEntity for GraphicObject {
    fn bounds(&self) -> Rect {
        self.rect
    }
}

impl SpatialEntity for Paragraph {
    fn bounds(&self) -> Rect {
        self.rect()
    }

    fn page_number(&self) -> u32 {
        self.page
    }

    fn input_order(&self) -> usize {
        self.id as usize
    }
}

impl SpatialEntity for Region {
    fn bounds(&self) -> Rect {
        self.rect()
    }

    fn input_order(&self) -> usize {
        self.index
    }
}

/// Ordering strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderingMode {
    /// Decoder output order
    Original,
    /// Page, then left edge
    Horizontal,
    /// Top edge
    Vertical,
    /// Top edge, then horizontal
    Mixed,
    /// Top edge, then bottom edge
    MixedAbsolute,
    /// Midline before left column before right column, each in mixed order
    ColumnAwareMixed,
    /// Page, then column-aware mixed
    #[default]
    PageColumnAwareMixed,
}

/// Horizontal placement of an entity relative to a dividing x coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    /// Straddles the divider
    Midline,
    /// Entirely left of the divider
    Left,
    /// Entirely right of the divider
    Right,
}

impl Alignment {
    /// Classify `rect` against the vertical line `x = median`.
    pub fn classify(rect: &Rect, median: f32) -> Self {
        if rect.x2 < median {
            Alignment::Left
        } else if rect.x1 > median {
            Alignment::Right
        } else {
            Alignment::Midline
        }
    }
}

/// Comparator for a fixed [`OrderingMode`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpatialOrdering {
    mode: OrderingMode,
    median: f32,
}

impl SpatialOrdering {
    /// Create a comparator. Column-aware modes divide at `x = 0` until a
    /// median is given with [`SpatialOrdering::with_median`].
    pub fn new(mode: OrderingMode) -> Self {
        Self { mode, median: 0.0 }
    }

    /// Set the x coordinate separating left and right columns.
    pub fn with_median(mut self, median: f32) -> Self {
        self.median = median;
        self
    }

    pub fn mode(&self) -> OrderingMode {
        self.mode
    }

    /// Alignment class of `entity` under this comparator's median.
    pub fn alignment<T: SpatialEntity + ?Sized>(&self, entity: &T) -> Alignment {
        Alignment::classify(&entity.bounds(), self.median)
    }

    pub fn compare<T: SpatialEntity + ?Sized>(&self, a: &T, b: &T) -> Ordering {
        match self.mode {
            OrderingMode::Original => a.input_order().cmp(&b.input_order()),
            OrderingMode::Horizontal => horizontal(a, b),
            OrderingMode::Vertical => a.bounds().y1.total_cmp(&b.bounds().y1),
            OrderingMode::Mixed => mixed(a, b),
            OrderingMode::MixedAbsolute => {
                let (ra, rb) = (a.bounds(), b.bounds());
                ra.y1.total_cmp(&rb.y1).then(ra.y2.total_cmp(&rb.y2))
            }
            OrderingMode::ColumnAwareMixed => self.column_aware(a, b),
            OrderingMode::PageColumnAwareMixed => a
                .page_number()
                .cmp(&b.page_number())
                .then_with(|| self.column_aware(a, b)),
        }
    }

    /// Stable sort of `items` under this comparator.
    pub fn sort<T: SpatialEntity>(&self, items: &mut [T]) {
        items.sort_by(|a, b| self.compare(a, b));
    }

    fn column_aware<T: SpatialEntity + ?Sized>(&self, a: &T, b: &T) -> Ordering {
        self.alignment(a)
            .cmp(&self.alignment(b))
            .then_with(|| mixed(a, b))
    }
}

impl Default for SpatialOrdering {
    fn default() -> Self {
        Self::new(OrderingMode::default())
    }
}

fn horizontal<T: SpatialEntity + ?Sized>(a: &T, b: &T) -> Ordering {
    a.page_number()
        .cmp(&b.page_number())
        .then_with(|| a.bounds().x1.total_cmp(&b.bounds().x1))
}

fn mixed<T: SpatialEntity + ?Sized>(a: &T, b: &T) -> Ordering {
    a.bounds()
        .y1
        .total_cmp(&b.bounds().y1)
        .then_with(|| horizontal(a, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alignment_classification() {
        assert_eq!(
            Alignment::classify(&Rect::new(0.0, 0.0, 40.0, 1.0), 50.0),
            Alignment::Left
        );
        assert_eq!(
            Alignment::classify(&Rect::new(60.0, 0.0, 90.0, 1.0), 50.0),
            Alignment::Right
        );
        assert_eq!(
            Alignment::classify(&Rect::new(10.0, 0.0, 90.0, 1.0), 50.0),
            Alignment::Midline
        );
    }

    #[test]
    fn test_mixed_orders_rows_then_columns() {
        let mut rects = vec![
            Rect::new(50.0, 10.0, 60.0, 20.0),
            Rect::new(0.0, 10.0, 10.0, 20.0),
            Rect::new(20.0, 0.0, 30.0, 5.0),
        ];
        SpatialOrdering::new(OrderingMode::Mixed).sort(&mut rects);
        let xs: Vec<f32> = rects.iter().map(|r| r.x1).collect();
        assert_eq!(xs, vec![20.0, 0.0, 50.0]);
    }

    #[test]
    fn test_mixed_absolute_breaks_ties_by_bottom() {
        let ordering = SpatialOrdering::new(OrderingMode::MixedAbsolute);
        let tall = Rect::new(0.0, 0.0, 1.0, 20.0);
        let short = Rect::new(5.0, 0.0, 6.0, 10.0);
        assert_eq!(ordering.compare(&short, &tall), Ordering::Less);
    }

    #[test]
    fn test_column_aware_puts_midline_first() {
        let ordering = SpatialOrdering::new(OrderingMode::ColumnAwareMixed).with_median(100.0);
        let title = Rect::new(50.0, 300.0, 150.0, 310.0);
        let left = Rect::new(10.0, 0.0, 90.0, 10.0);
        let right = Rect::new(110.0, 0.0, 190.0, 10.0);

        let mut rects = vec![right, left, title];
        ordering.sort(&mut rects);
        assert_eq!(rects, vec![title, left, right]);
    }

    #[test]
    fn test_original_uses_input_order() {
        let ordering = SpatialOrdering::new(OrderingMode::Original);
        let word = |order: usize, y: f32| Word {
            rect: Rect::new(0.0, y, 1.0, y + 1.0),
            text: String::new(),
            style: crate::model::StyleId::NO_STYLE,
            is_graphic: false,
            input_order: order,
        };
        let mut words = vec![word(2, 0.0), word(0, 50.0), word(1, 10.0)];
        ordering.sort(&mut words);
        let order: Vec<usize> = words.iter().map(|w| w.input_order).collect();
        assert_eq!(order, vec![0, 1, 2]);
    }

    #[test]
    fn test_page_column_aware_orders_pages_first() {
        use crate::model::Line;
        let ordering = SpatialOrdering::new(OrderingMode::PageColumnAwareMixed).with_median(100.0);
        let para = |page: u32, x: f32| {
            let word = Word {
                rect: Rect::new(x, 0.0, x + 10.0, 10.0),
                text: "w".to_string(),
                style: crate::model::StyleId::NO_STYLE,
                is_graphic: false,
                input_order: 0,
            };
            Paragraph::new(0, page, 0, vec![Line::new(vec![word])])
        };
        assert_eq!(
            ordering.compare(&para(1, 150.0), &para(2, 10.0)),
            Ordering::Less
        );
        assert_eq!(
            ordering.compare(&para(1, 150.0), &para(1, 10.0)),
            Ordering::Greater
        );
    }
}
