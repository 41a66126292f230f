//! Median line spacing estimation.

use crate::model::Line;

/// Spacing used when a page has no measurable lines.
const FALLBACK_SPACING: f32 = 1.0;

/// Supplies the median vertical spacing used to split paragraphs.
pub trait SpacingEstimator: Send + Sync {
    /// Estimate the spacing of a page from its line blocks, each block
    /// ordered top to bottom.
    fn median_spacing(&self, blocks: &[Vec<Line>]) -> f32;
}

/// Median whitespace between consecutive lines of the same block.
///
/// Falls back to the median line height when no block has two lines with
/// a non-negative gap, and to 1.0 for pages without lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineGapEstimator;

impl SpacingEstimator for LineGapEstimator {
    fn median_spacing(&self, blocks: &[Vec<Line>]) -> f32 {
        let gaps: Vec<f32> = blocks
            .iter()
            .flat_map(|block| {
                block
                    .windows(2)
                    .map(|pair| pair[0].rect().vertical_distance_to(&pair[1].rect()))
            })
            .filter(|gap| *gap >= 0.0)
            .collect();

        if let Some(median) = median(gaps) {
            return median;
        }

        let heights: Vec<f32> = blocks
            .iter()
            .flatten()
            .map(|line| line.rect().height())
            .filter(|h| *h > 0.0)
            .collect();
        median(heights).unwrap_or(FALLBACK_SPACING)
    }
}

/// Median of `values`, taking the upper middle element for even lengths.
pub fn median(mut values: Vec<f32>) -> Option<f32> {
    values.retain(|v| v.is_finite());
    if values.is_empty() {
        return None;
    }
    values.sort_by(f32::total_cmp);
    Some(values[values.len() / 2])
}
