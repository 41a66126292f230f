//! Axis-aligned rectangle geometry.
//!
//! Coordinates follow the decoder convention: `x` grows to the right and
//! `y` grows downward, so `y1` is the top edge and `y2` the bottom edge.

use serde::{Deserialize, Serialize};

/// An axis-aligned bounding rectangle with `x1 <= x2` and `y1 <= y2`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x1: f32,
    /// Top edge
    pub y1: f32,
    /// Right edge
    pub x2: f32,
    /// Bottom edge
    pub y2: f32,
}

impl Rect {
    /// Create a rectangle from two corners, normalizing their order.
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self {
            x1: x1.min(x2),
            y1: y1.min(y2),
            x2: x1.max(x2),
            y2: y1.max(y2),
        }
    }

    /// Create a rectangle from an origin and a size.
    pub fn from_size(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    /// Whether every coordinate is finite.
    pub fn is_finite(&self) -> bool {
        self.x1.is_finite() && self.y1.is_finite() && self.x2.is_finite() && self.y2.is_finite()
    }

    pub fn width(&self) -> f32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f32 {
        self.y2 - self.y1
    }

    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    /// Whether the rectangle has no area.
    pub fn is_empty(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    pub fn mid_x(&self) -> f32 {
        (self.x1 + self.x2) / 2.0
    }

    pub fn mid_y(&self) -> f32 {
        (self.y1 + self.y2) / 2.0
    }

    /// Smallest rectangle covering both.
    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            x1: self.x1.min(other.x1),
            y1: self.y1.min(other.y1),
            x2: self.x2.max(other.x2),
            y2: self.y2.max(other.y2),
        }
    }

    /// Union of a sequence of rectangles, or `None` when empty.
    pub fn union_all<I>(rects: I) -> Option<Rect>
    where
        I: IntoIterator<Item = Rect>,
    {
        rects.into_iter().reduce(|a, b| a.union(&b))
    }

    /// Whether the rectangles share any point, edges included.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x1 <= other.x2 && other.x1 <= self.x2 && self.y1 <= other.y2 && other.y1 <= self.y2
    }

    /// Whether `other` lies completely inside this rectangle.
    pub fn contains(&self, other: &Rect) -> bool {
        self.x1 <= other.x1 && self.y1 <= other.y1 && self.x2 >= other.x2 && self.y2 >= other.y2
    }

    /// Euclidean gap between the rectangles; zero when they intersect.
    pub fn distance(&self, other: &Rect) -> f32 {
        if self.intersects(other) {
            return 0.0;
        }
        let dx = (other.x1 - self.x2).max(self.x1 - other.x2).max(0.0);
        let dy = (other.y1 - self.y2).max(self.y1 - other.y2).max(0.0);
        (dx * dx + dy * dy).sqrt()
    }

    /// Signed vertical gap from the bottom of this rectangle to the top of
    /// `other`. Negative when they overlap vertically.
    pub fn vertical_distance_to(&self, other: &Rect) -> f32 {
        other.y1 - self.y2
    }

    /// Length of the shared vertical extent, zero if disjoint.
    pub fn vertical_overlap(&self, other: &Rect) -> f32 {
        (self.y2.min(other.y2) - self.y1.max(other.y1)).max(0.0)
    }
}
