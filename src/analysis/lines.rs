//! Line segmentation.
//!
//! Projects every word of a content block onto the y axis, weighting each
//! covered row by the word's width, and cuts lines at the rows where the
//! projection runs dry.

use crate::model::{Line, Word};

use super::ordering::{OrderingMode, SpatialOrdering};

/// Occupancy at or below which a histogram row counts as empty.
pub const LIMIT: i64 = 1;

/// Rows inspected before a low row is accepted as a line boundary.
pub const LOOKAHEAD: usize = 2;

/// Lines with at least this many words are never merged upward.
const ORPHAN_MAX_WORDS: usize = 4;

/// Maximum height of an orphan line relative to the line above it.
const ORPHAN_HEIGHT_RATIO: f32 = 0.7;

/// Maximum vertical gap between an orphan line and the line above it.
const ORPHAN_MAX_GAP: f32 = 2.0;

/// Blocks taller than this skip the histogram and group by overlap only.
const MAX_HISTOGRAM_ROWS: i64 = 1 << 20;

/// Group the words of one content block into lines, top to bottom.
///
/// Every input word ends up in exactly one line. Words inside a line are
/// ordered left to right.
pub fn segment_lines(mut words: Vec<Word>) -> Vec<Line> {
    if words.is_empty() {
        return Vec::new();
    }

    SpatialOrdering::new(OrderingMode::Mixed).sort(&mut words);

    let min_y = words.iter().map(|w| w.rect.y1 as i64).min().unwrap_or(0);
    let max_y = words
        .iter()
        .map(|w| w.rect.y2 as i64)
        .max()
        .unwrap_or(0)
        .saturating_add(1);

    let mut assigned = vec![false; words.len()];
    let mut groups: Vec<Vec<usize>> = Vec::new();

    if max_y.saturating_sub(min_y) <= MAX_HISTOGRAM_ROWS {
        let counts = histogram(&words, min_y, max_y);
        let boundaries = find_line_boundaries(&counts);

        for band in boundaries.windows(2) {
            let start = (min_y + band[0] as i64 - 1) as f32;
            let stop = (min_y + band[1] as i64) as f32;

            let members: Vec<usize> = (0..words.len())
                .filter(|&i| {
                    !assigned[i] && words[i].rect.y1 > start - 1.0 && words[i].rect.y2 < stop + 1.0
                })
                .collect();

            for &i in &members {
                assigned[i] = true;
            }
            if !members.is_empty() {
                groups.push(members);
            }
        }
    } else {
        log::warn!(
            "Block spans {} rows, grouping lines by overlap only",
            max_y.saturating_sub(min_y)
        );
    }

    assign_leftovers(&words, &assigned, &mut groups);

    let horizontal = SpatialOrdering::new(OrderingMode::Horizontal);
    let mut slots: Vec<Option<Word>> = words.into_iter().map(Some).collect();
    let mut lines: Vec<Line> = groups
        .into_iter()
        .map(|group| {
            let mut line_words: Vec<Word> =
                group.into_iter().filter_map(|i| slots[i].take()).collect();
            horizontal.sort(&mut line_words);
            Line::new(line_words)
        })
        .collect();

    SpatialOrdering::new(OrderingMode::Mixed).sort(&mut lines);
    combine_lines(&mut lines);
    lines
}

/// Width-weighted vertical occupancy of every row in `[min_y, max_y)`.
/// Words without area are left out.
fn histogram(words: &[Word], min_y: i64, max_y: i64) -> Vec<i64> {
    let mut counts = vec![0i64; (max_y - min_y).max(0) as usize];

    for word in words.iter().filter(|w| !w.rect.is_empty()) {
        let start = word.rect.y1 as i64;
        let height = word.rect.height() as i64;
        let width = word.rect.width() as i64;

        for row in 0..height {
            if let Some(slot) = usize::try_from(start + row - min_y)
                .ok()
                .and_then(|i| counts.get_mut(i))
            {
                *slot += width;
            }
        }
    }
    counts
}

/// Row offsets where lines start, beginning with 0 and ending with
/// `counts.len()`.
///
/// Once text has been seen, a low row becomes a boundary only when the
/// rows after it rise above [`LIMIT`] again, so a run of empty rows yields
/// a single boundary just before the next line.
pub fn find_line_boundaries(counts: &[i64]) -> Vec<usize> {
    let mut boundaries = vec![0];
    let mut found_text = false;

    for i in 0..counts.len() {
        if found_text && counts[i] < LOOKAHEAD as i64 {
            let end = (i + LOOKAHEAD).min(counts.len());
            let is_boundary = counts[i + 1..end].iter().all(|&c| c > LIMIT);

            if is_boundary {
                boundaries.push(i + 1);
                found_text = false;
            }
        } else if counts[i] > LIMIT {
            found_text = true;
        }
    }

    boundaries.push(counts.len());
    boundaries
}

/// Attach words no band claimed to the group they overlap most, or start
/// a new group.
fn assign_leftovers(words: &[Word], assigned: &[bool], groups: &mut Vec<Vec<usize>>) {
    for (i, word) in words.iter().enumerate().filter(|(i, _)| !assigned[*i]) {
        let best = groups
            .iter()
            .enumerate()
            .map(|(g, members)| {
                let overlap = members
                    .iter()
                    .map(|&m| words[m].rect.vertical_overlap(&word.rect))
                    .fold(0.0f32, f32::max);
                (g, overlap)
            })
            .filter(|(_, overlap)| *overlap > 0.0)
            .max_by(|a, b| a.1.total_cmp(&b.1).then(b.0.cmp(&a.0)));

        match best {
            Some((g, _)) => groups[g].push(i),
            None => groups.push(vec![i]),
        }
    }
}

/// Merge small stray lines, such as isolated punctuation, into the line
/// above.
fn combine_lines(lines: &mut Vec<Line>) {
    let horizontal = SpatialOrdering::new(OrderingMode::Horizontal);
    let mut i = 1;

    while i < lines.len() {
        if is_orphan(&lines[i - 1], &lines[i]) {
            let orphan = lines.remove(i);
            log::debug!("Combining line '{}' into the line above", orphan.text());
            lines[i - 1].absorb(orphan, |a, b| horizontal.compare(a, b));
        } else {
            i += 1;
        }
    }
}

/// The gap is taken as an absolute distance, so a small line whose top
/// dips up to [`ORPHAN_MAX_GAP`] into `previous` merges as well.
fn is_orphan(previous: &Line, current: &Line) -> bool {
    current.len() < ORPHAN_MAX_WORDS
        && current.dominating_style() == previous.dominating_style()
        && current.rect().height() <= ORPHAN_HEIGHT_RATIO * previous.rect().height()
        && previous.rect().vertical_distance_to(&current.rect()).abs() <= ORPHAN_MAX_GAP
}
