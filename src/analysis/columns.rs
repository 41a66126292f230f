//! Column detection inside a region.
//!
//! Finds a vertical gutter in the x-occupancy profile of a region's words
//! and partitions the words into content blocks: one per side of the
//! gutter, plus a midline block for anything straddling it.

use serde::{Deserialize, Serialize};

use crate::model::{Rect, Word};

use super::ordering::{Alignment, OrderingMode, SpatialEntity, SpatialOrdering};

/// Narrowest region in which a gutter is searched for.
const MIN_REGION_WIDTH: f32 = 250.0;

/// Width of one occupancy slice.
const SLICE_WIDTH: f32 = 3.0;

/// Narrowest empty run considered while searching.
const MIN_CANDIDATE_GAP: f32 = 10.0;

/// Narrowest gap accepted as a gutter.
const MIN_GUTTER: f32 = 12.0;

/// Narrowest column on either side of the gutter.
const MIN_COLUMN_WIDTH: f32 = 80.0;

/// Upper bound on occupancy slices, guarding against absurd coordinates.
const MAX_SLICES: usize = 1 << 16;

/// Words that can be laid out as one flow of lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentBlock {
    /// Side of the gutter the block sits on
    pub alignment: Alignment,
    pub rect: Rect,
    pub words: Vec<Word>,
}

impl ContentBlock {
    fn new(alignment: Alignment, words: Vec<Word>) -> Self {
        let rect = Rect::union_all(words.iter().map(|w| w.rect)).unwrap_or_default();
        Self {
            alignment,
            rect,
            words,
        }
    }
}

impl SpatialEntity for ContentBlock {
    fn bounds(&self) -> Rect {
        self.rect
    }
}

/// Locate the x coordinate of a column gutter, if the words have one.
pub fn detect_gutter(words: &[Word]) -> Option<f32> {
    if words.is_empty() {
        return None;
    }

    let min_x = words.iter().map(|w| w.rect.x1).fold(f32::INFINITY, f32::min);
    let max_x = words
        .iter()
        .map(|w| w.rect.x2)
        .fold(f32::NEG_INFINITY, f32::max);
    let width = max_x - min_x;
    if !width.is_finite() || width < MIN_REGION_WIDTH {
        return None;
    }

    let slices = width / SLICE_WIDTH;
    if slices >= MAX_SLICES as f32 {
        log::warn!("Region is {:.0} units wide, skipping column detection", width);
        return None;
    }
    let num_slices = slices as usize + 1;
    let mut occupancy = vec![0usize; num_slices];
    for word in words {
        let start = ((word.rect.x1 - min_x) / SLICE_WIDTH) as usize;
        let end = ((word.rect.x2 - min_x) / SLICE_WIDTH) as usize;
        for slot in occupancy
            .iter_mut()
            .take(end.min(num_slices - 1) + 1)
            .skip(start)
        {
            *slot += 1;
        }
    }

    // Only the middle 70% of the region can hold a gutter.
    let search_start = num_slices * 15 / 100;
    let search_end = num_slices * 85 / 100;
    let center = num_slices / 2;

    let mut best: Option<(usize, usize)> = None;
    let mut best_center_dist = usize::MAX;
    let mut consider = |start: usize, len: usize| {
        let gap = len as f32 * SLICE_WIDTH;
        if gap < MIN_CANDIDATE_GAP {
            return;
        }
        let best_gap = best.map_or(0.0, |(_, l)| l as f32 * SLICE_WIDTH);
        let center_dist = (start + len / 2).abs_diff(center);
        if gap > best_gap * 1.5 || (gap >= best_gap * 0.7 && center_dist < best_center_dist) {
            best = Some((start, len));
            best_center_dist = center_dist;
        }
    };

    let mut run_start = 0;
    let mut run_len = 0;
    for (i, &count) in occupancy
        .iter()
        .enumerate()
        .take(search_end)
        .skip(search_start)
    {
        if count == 0 {
            if run_len == 0 {
                run_start = i;
            }
            run_len += 1;
        } else {
            if run_len > 0 {
                consider(run_start, run_len);
            }
            run_len = 0;
        }
    }
    if run_len > 0 {
        consider(run_start, run_len);
    }

    let (gap_start, gap_len) = best?;
    if (gap_len as f32 * SLICE_WIDTH) < MIN_GUTTER {
        return None;
    }

    let gutter = min_x + (gap_start as f32 + gap_len as f32 / 2.0) * SLICE_WIDTH;
    if gutter - min_x < MIN_COLUMN_WIDTH || max_x - gutter < MIN_COLUMN_WIDTH {
        log::debug!("Column too narrow, treating as single column");
        return None;
    }

    // Both sides need at least 10% of the words.
    let left = words.iter().filter(|w| w.rect.mid_x() < gutter).count();
    let right = words.len() - left;
    let min_words = (words.len() / 10).max(2);
    if left < min_words || right < min_words {
        log::debug!("Words too imbalanced ({} / {}), treating as single column", left, right);
        return None;
    }

    log::debug!("Detected gutter at x={:.1}", gutter);
    Some(gutter)
}

/// Partition the words of a region into content blocks in reading order.
pub fn partition_blocks(
    words: Vec<Word>,
    ordering: OrderingMode,
    detect_columns: bool,
) -> Vec<ContentBlock> {
    if words.is_empty() {
        return Vec::new();
    }

    let gutter = if detect_columns {
        detect_gutter(&words)
    } else {
        None
    };
    let Some(gutter) = gutter else {
        return vec![ContentBlock::new(Alignment::Midline, words)];
    };

    let mut sides: [Vec<Word>; 3] = Default::default();
    for word in words {
        let index = match Alignment::classify(&word.rect, gutter) {
            Alignment::Midline => 0,
            Alignment::Left => 1,
            Alignment::Right => 2,
        };
        sides[index].push(word);
    }

    let mut blocks: Vec<ContentBlock> = [Alignment::Midline, Alignment::Left, Alignment::Right]
        .into_iter()
        .zip(sides)
        .filter(|(_, words)| !words.is_empty())
        .map(|(alignment, words)| ContentBlock::new(alignment, words))
        .collect();

    SpatialOrdering::new(ordering)
        .with_median(gutter)
        .sort(&mut blocks);
    blocks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::StyleId;

    fn word(x: f32, y: f32, width: f32) -> Word {
        Word {
            rect: Rect::from_size(x, y, width, 10.0),
            text: "w".to_string(),
            style: StyleId(4),
            is_graphic: false,
            input_order: 0,
        }
    }

    fn two_columns() -> Vec<Word> {
        let mut words = Vec::new();
        for row in 0..10 {
            let y = row as f32 * 12.0;
            words.push(word(50.0, y, 200.0));
            words.push(word(300.0, y, 200.0));
        }
        words
    }

    #[test]
    fn test_detect_gutter() {
        let gutter = detect_gutter(&two_columns()).unwrap();
        assert!(gutter > 250.0 && gutter < 300.0, "gutter at {}", gutter);
    }

    #[test]
    fn test_single_column_has_no_gutter() {
        let words: Vec<Word> = (0..10).map(|i| word(50.0, i as f32 * 12.0, 450.0)).collect();
        assert_eq!(detect_gutter(&words), None);
    }

    #[test]
    fn test_narrow_region_has_no_gutter() {
        assert_eq!(detect_gutter(&[word(0.0, 0.0, 50.0), word(100.0, 0.0, 50.0)]), None);
    }

    #[test]
    fn test_far_outlier_skips_detection() {
        let words = vec![
            word(72.0, 100.0, 40.0),
            word(72.0, 112.0, 40.0),
            word(4e12, 100.0, 40.0),
        ];
        assert_eq!(detect_gutter(&words), None);

        let blocks = partition_blocks(words, OrderingMode::ColumnAwareMixed, true);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].words.len(), 3);
    }

    #[test]
    fn test_partition_orders_left_before_right() {
        let blocks = partition_blocks(two_columns(), OrderingMode::ColumnAwareMixed, true);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].alignment, Alignment::Left);
        assert_eq!(blocks[1].alignment, Alignment::Right);
        assert_eq!(blocks[0].words.len(), 10);
    }

    #[test]
    fn test_partition_without_detection() {
        let blocks = partition_blocks(two_columns(), OrderingMode::ColumnAwareMixed, false);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].alignment, Alignment::Midline);
        assert_eq!(blocks[0].words.len(), 20);
    }
}
