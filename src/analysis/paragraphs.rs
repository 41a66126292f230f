//! Paragraph segmentation.
//!
//! Consecutive lines stay together unless their styles differ enough, or
//! the whitespace between them is large compared to the page's median line
//! spacing.

use crate::error::{Error, Result};
use crate::model::{Line, Paragraph, StyleId, StyleRegistry};

use super::options::ErrorMode;

/// Vertical size from which same-style text never splits on spacing.
const BIG_TEXT_SIZE: i32 = 14;

/// Size difference above which two fonts are considered unrelated.
const BIG_SIZE_DIFFERENCE: i32 = 2;

/// Split threshold for same-style lines, in median spacings.
const SAME_STYLE_SPACING: f32 = 1.5;

/// Split threshold for subtly different lines, in median spacings.
const SUBTLE_SPACING: f32 = 1.1;

/// Paragraph ids reserved per region.
pub const REGION_STRIDE: u32 = 1000;

/// Offset of graphic-anchored paragraph ids inside a region's range.
pub const GRAPHIC_OFFSET: u32 = 500;

/// How much two styles differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleDifference {
    /// Unrelated content, always split
    Split,
    /// Identical large style, never split
    SameStyleAndBigText,
    SameStyle,
    /// Same size class, different font
    SubtleDifference,
    BigDifference,
}

/// Classify the difference between two interned styles.
pub fn style_compare(registry: &StyleRegistry, a: StyleId, b: StyleId) -> StyleDifference {
    if a == b {
        let big = registry
            .get(a)
            .map_or(false, |s| !a.is_sentinel() && s.size_y >= BIG_TEXT_SIZE);
        return if big {
            StyleDifference::SameStyleAndBigText
        } else {
            StyleDifference::SameStyle
        };
    }

    if a.is_sentinel() || b.is_sentinel() {
        return StyleDifference::Split;
    }

    let (Some(sa), Some(sb)) = (registry.get(a), registry.get(b)) else {
        log::warn!("Comparing unregistered styles {:?} and {:?}", a, b);
        return StyleDifference::Split;
    };

    let size_delta = (sa.size_x - sb.size_x)
        .abs()
        .max((sa.size_y - sb.size_y).abs());
    if size_delta > BIG_SIZE_DIFFERENCE {
        StyleDifference::BigDifference
    } else {
        StyleDifference::SubtleDifference
    }
}

/// Hands out paragraph ids that sort in reading order.
///
/// Text paragraphs of region `r` get `r * 1000 + k`, paragraphs anchored to
/// a graphic get `r * 1000 + 500 + k`, so within a region the ids increase
/// strictly and anchored paragraphs follow the text.
///
/// A region that outgrows its half of the range is an error in strict mode.
/// In lenient mode numbering continues with a warning and ids may repeat.
#[derive(Debug, Clone, Default)]
pub struct ParagraphNumberer {
    region: Option<usize>,
    text: u32,
    graphic: u32,
    error_mode: ErrorMode,
}

impl ParagraphNumberer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Start numbering the next region and return its index.
    pub fn new_region(&mut self) -> usize {
        let region = self.region.map_or(0, |r| r + 1);
        self.region = Some(region);
        self.text = 0;
        self.graphic = 0;
        region
    }

    /// Index of the region being numbered.
    pub fn region(&self) -> usize {
        self.region.unwrap_or(0)
    }

    fn base(&self) -> u32 {
        self.region() as u32 * REGION_STRIDE
    }

    /// Id for the next text paragraph.
    pub fn next_text_id(&mut self) -> Result<u32> {
        self.check_capacity(self.text, GRAPHIC_OFFSET, "text")?;
        let id = self.base() + self.text;
        self.text += 1;
        Ok(id)
    }

    /// Id for the next graphic-anchored paragraph.
    pub fn next_graphic_id(&mut self) -> Result<u32> {
        self.check_capacity(self.graphic, REGION_STRIDE - GRAPHIC_OFFSET, "graphic")?;
        let id = self.base() + GRAPHIC_OFFSET + self.graphic;
        self.graphic += 1;
        Ok(id)
    }

    fn check_capacity(&self, used: u32, capacity: u32, kind: &'static str) -> Result<()> {
        if used < capacity {
            return Ok(());
        }
        match self.error_mode {
            ErrorMode::Strict => Err(Error::ParagraphIdOverflow {
                region: self.region(),
                kind,
                capacity,
            }),
            ErrorMode::Lenient => {
                if used == capacity {
                    log::warn!(
                        "Region {} has more than {} {} paragraphs, ids overlap the next range",
                        self.region(),
                        capacity,
                        kind
                    );
                }
                Ok(())
            }
        }
    }
}

/// Groups lines into paragraphs.
#[derive(Debug, Clone, Default)]
pub struct ParagraphSegmentator {
    median_spacing: Option<f32>,
}

impl ParagraphSegmentator {
    /// Create a segmentator without spacing statistics. A median spacing
    /// must be set before [`ParagraphSegmentator::segment`] is called.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_median_spacing(mut self, spacing: f32) -> Self {
        self.median_spacing = Some(spacing);
        self
    }

    pub fn set_median_spacing(&mut self, spacing: f32) {
        self.median_spacing = Some(spacing);
    }

    /// Split `lines` of the current region into paragraphs.
    pub fn segment(
        &self,
        lines: Vec<Line>,
        registry: &StyleRegistry,
        numberer: &mut ParagraphNumberer,
        page: u32,
    ) -> Result<Vec<Paragraph>> {
        let median = self.median_spacing.ok_or(Error::MissingMedianSpacing)?;
        let region = numberer.region();

        let mut paragraphs = Vec::new();
        let mut current: Vec<Line> = Vec::new();
        let mut current_style: Option<StyleId> = None;
        let mut last_bottom = 0.0f32;

        for line in lines {
            let line_style = line.dominating_style();
            let running = *current_style.get_or_insert(line_style);
            if current.is_empty() {
                last_bottom = line.rect().y2;
            }

            let distance = line.rect().y1 - last_bottom;
            let split = match style_compare(registry, running, line_style) {
                StyleDifference::Split => true,
                StyleDifference::SameStyleAndBigText => false,
                StyleDifference::SameStyle => distance > median * SAME_STYLE_SPACING,
                StyleDifference::SubtleDifference => {
                    if line.has_word_with_style(running) {
                        distance > median * SAME_STYLE_SPACING
                    } else {
                        distance > median * SUBTLE_SPACING
                    }
                }
                StyleDifference::BigDifference => !line.has_word_with_style(running),
            };

            if split {
                if !current.is_empty() {
                    log::debug!(
                        "Paragraph split at y={:.1}: distance {:.1}, median {:.1}, style {:?} -> {:?}",
                        line.rect().y1,
                        distance,
                        median,
                        running,
                        line_style
                    );
                    let id = numberer.next_text_id()?;
                    paragraphs.push(Paragraph::new(id, page, region, std::mem::take(&mut current)));
                }
                current_style = Some(line_style);
            }

            last_bottom = line.rect().y2;
            current.push(line);
        }

        if !current.is_empty() {
            let id = numberer.next_text_id()?;
            paragraphs.push(Paragraph::new(id, page, region, current));
        }
        Ok(paragraphs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FontSpec, Rect, Word};

    fn line(y: f32, height: f32, words: &[(&str, StyleId)]) -> Line {
        Line::new(
            words
                .iter()
                .enumerate()
                .map(|(i, (text, style))| Word {
                    rect: Rect::from_size(i as f32 * 40.0, y, 35.0, height),
                    text: text.to_string(),
                    style: *style,
                    is_graphic: false,
                    input_order: i,
                })
                .collect(),
        )
    }

    #[test]
    fn test_missing_median_spacing() {
        let registry = StyleRegistry::new();
        let result = ParagraphSegmentator::new().segment(
            Vec::new(),
            &registry,
            &mut ParagraphNumberer::new(),
            1,
        );
        assert!(matches!(result, Err(Error::MissingMedianSpacing)));
    }

    #[test]
    fn test_same_style_splits_on_large_gap() {
        let registry = StyleRegistry::new();
        let body = registry.get_or_create(&FontSpec::new("Times", 10.0));
        let lines = vec![
            line(0.0, 10.0, &[("first", body)]),
            line(14.0, 10.0, &[("second", body)]),
        ];

        let mut numberer = ParagraphNumberer::new();
        numberer.new_region();
        let paragraphs = ParagraphSegmentator::new()
            .with_median_spacing(2.0)
            .segment(lines, &registry, &mut numberer, 1)
            .unwrap();

        assert_eq!(paragraphs.len(), 2);
        assert_eq!(paragraphs[0].id, 0);
        assert_eq!(paragraphs[1].id, 1);
    }

    #[test]
    fn test_same_style_keeps_close_lines() {
        let registry = StyleRegistry::new();
        let body = registry.get_or_create(&FontSpec::new("Times", 10.0));
        let lines = vec![
            line(0.0, 10.0, &[("first", body)]),
            line(12.0, 10.0, &[("second", body)]),
            line(24.0, 10.0, &[("third", body)]),
        ];
        let paragraphs = ParagraphSegmentator::new()
            .with_median_spacing(2.0)
            .segment(lines, &registry, &mut ParagraphNumberer::new(), 1)
            .unwrap();
        assert_eq!(paragraphs.len(), 1);
        assert_eq!(paragraphs[0].lines().len(), 3);
    }

    #[test]
    fn test_inline_emphasis_does_not_split() {
        let registry = StyleRegistry::new();
        let body = registry.get_or_create(&FontSpec::new("Times", 10.0));
        let italic = registry.get_or_create(&FontSpec::new("Times", 10.0).italic());
        let lines = vec![
            line(0.0, 10.0, &[("plain", body), ("text", body)]),
            line(12.5, 10.0, &[("emphasised", italic), ("words", italic), ("and", body)]),
        ];
        let paragraphs = ParagraphSegmentator::new()
            .with_median_spacing(2.0)
            .segment(lines, &registry, &mut ParagraphNumberer::new(), 1)
            .unwrap();
        assert_eq!(paragraphs.len(), 1);
    }

    #[test]
    fn test_heading_to_body_splits() {
        let registry = StyleRegistry::new();
        let heading = registry.get_or_create(&FontSpec::new("Helvetica", 18.0).bold());
        let body = registry.get_or_create(&FontSpec::new("Times", 10.0));
        let lines = vec![
            line(0.0, 18.0, &[("Results", heading)]),
            line(19.0, 10.0, &[("We", body), ("measured", body)]),
            line(30.0, 10.0, &[("things", body)]),
        ];
        let paragraphs = ParagraphSegmentator::new()
            .with_median_spacing(2.0)
            .segment(lines, &registry, &mut ParagraphNumberer::new(), 1)
            .unwrap();
        assert_eq!(paragraphs.len(), 2);
        assert_eq!(paragraphs[1].lines().len(), 2);
    }

    #[test]
    fn test_style_compare() {
        let registry = StyleRegistry::new();
        let body = registry.get_or_create(&FontSpec::new("Times", 10.0));
        let bold = registry.get_or_create(&FontSpec::new("Times", 11.0).bold());
        let title = registry.get_or_create(&FontSpec::new("Times", 20.0));

        assert_eq!(style_compare(&registry, body, body), StyleDifference::SameStyle);
        assert_eq!(
            style_compare(&registry, title, title),
            StyleDifference::SameStyleAndBigText
        );
        assert_eq!(
            style_compare(&registry, body, bold),
            StyleDifference::SubtleDifference
        );
        assert_eq!(
            style_compare(&registry, body, title),
            StyleDifference::BigDifference
        );
        assert_eq!(
            style_compare(&registry, body, StyleId::GRAPHIC_IMAGE),
            StyleDifference::Split
        );
    }

    #[test]
    fn test_numberer() {
        let mut numberer = ParagraphNumberer::new();
        assert_eq!(numberer.new_region(), 0);
        assert_eq!(numberer.next_text_id().unwrap(), 0);
        assert_eq!(numberer.next_text_id().unwrap(), 1);
        assert_eq!(numberer.next_graphic_id().unwrap(), 500);
        assert_eq!(numberer.new_region(), 1);
        assert_eq!(numberer.next_text_id().unwrap(), 1000);
        assert_eq!(numberer.next_graphic_id().unwrap(), 1500);
    }

    #[test]
    fn test_numberer_overflow_is_error_when_strict() {
        let mut numberer = ParagraphNumberer::new();
        numberer.new_region();
        for k in 0..GRAPHIC_OFFSET {
            assert_eq!(numberer.next_text_id().unwrap(), k);
        }
        assert!(matches!(
            numberer.next_text_id(),
            Err(Error::ParagraphIdOverflow { region: 0, kind: "text", .. })
        ));

        for _ in 0..REGION_STRIDE - GRAPHIC_OFFSET {
            numberer.next_graphic_id().unwrap();
        }
        assert!(matches!(
            numberer.next_graphic_id(),
            Err(Error::ParagraphIdOverflow { kind: "graphic", .. })
        ));
    }

    #[test]
    fn test_numberer_overflow_continues_when_lenient() {
        let mut numberer = ParagraphNumberer::new().with_error_mode(ErrorMode::Lenient);
        numberer.new_region();
        for _ in 0..GRAPHIC_OFFSET {
            numberer.next_text_id().unwrap();
        }
        assert_eq!(numberer.next_text_id().unwrap(), GRAPHIC_OFFSET);
    }

    #[test]
    fn test_segment_rejects_too_many_paragraphs() {
        let registry = StyleRegistry::new();
        let heading = registry.get_or_create(&FontSpec::new("Helvetica", 18.0).bold());
        let body = registry.get_or_create(&FontSpec::new("Times", 10.0));
        // Alternating unrelated styles force one paragraph per line.
        let lines: Vec<Line> = (0..=GRAPHIC_OFFSET)
            .map(|i| {
                let style = if i % 2 == 0 { heading } else { body };
                line(i as f32 * 20.0, 10.0, &[("w", style)])
            })
            .collect();

        let mut numberer = ParagraphNumberer::new();
        numberer.new_region();
        let result = ParagraphSegmentator::new()
            .with_median_spacing(2.0)
            .segment(lines, &registry, &mut numberer, 1);
        assert!(matches!(result, Err(Error::ParagraphIdOverflow { .. })));
    }
}
