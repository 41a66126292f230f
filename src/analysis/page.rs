//! Per-page layout pipeline.
//!
//! graphics merge -> region split -> column blocks -> lines -> median
//! spacing -> paragraphs, with text over figures grouped into
//! graphic-anchored paragraphs.

use crate::error::Result;
use crate::model::{
    ContentItem, GraphicObject, Line, Page, PageContent, Paragraph, Rect, Region, StyleRegistry,
    Word,
};

use super::columns::partition_blocks;
use super::graphics::{categorize, merge_graphics};
use super::lines::segment_lines;
use super::options::AnalysisOptions;
use super::paragraphs::{ParagraphNumberer, ParagraphSegmentator};
use super::regions::split_page;
use super::spacing::SpacingEstimator;

/// Runs the layout pipeline on single pages.
pub struct PageAnalyzer<'a> {
    registry: &'a StyleRegistry,
    options: &'a AnalysisOptions,
    estimator: &'a dyn SpacingEstimator,
}

impl<'a> PageAnalyzer<'a> {
    pub fn new(
        registry: &'a StyleRegistry,
        options: &'a AnalysisOptions,
        estimator: &'a dyn SpacingEstimator,
    ) -> Self {
        Self {
            registry,
            options,
            estimator,
        }
    }

    /// Analyse one page.
    pub fn analyze(&self, content: &PageContent) -> Result<Page> {
        let mut page = Page::new(content.number, content.bounds);
        page.rotation = content.rotation;

        let mut words = Vec::new();
        let mut graphics = Vec::new();
        for (order, item) in content.items.iter().enumerate() {
            match item {
                ContentItem::Text(_) => words.push(Word::from_item(item, order)),
                ContentItem::Graphic(graphic) => graphics.push(graphic.clone()),
            }
        }

        let sets = categorize(merge_graphics(graphics), &content.bounds);
        let next_order = content.items.len();
        words.extend(sets.inline.into_iter().enumerate().map(|(i, g)| {
            Word::from_item(&ContentItem::Graphic(g), next_order + i)
        }));
        page.graphics = sets.figures;

        let (anchored, words) = take_anchored(words, &page.graphics);

        let regions: Vec<Vec<Vec<Line>>> = split_page(
            words,
            &content.bounds,
            self.options.top_split_fraction,
            self.registry,
        )
        .into_iter()
        .map(|region| {
            partition_blocks(region, self.options.ordering, self.options.detect_columns)
                .into_iter()
                .map(|block| segment_lines(block.words))
                .collect()
        })
        .collect();

        let anchored: Vec<(usize, Vec<Line>)> = anchored
            .into_iter()
            .map(|(graphic, words)| (graphic, segment_lines(words)))
            .collect();

        let median = match self.options.median_spacing {
            Some(spacing) => spacing,
            None => {
                let all_blocks: Vec<Vec<Line>> =
                    regions.iter().flatten().cloned().collect();
                self.estimator.median_spacing(&all_blocks)
            }
        };
        log::debug!("Page {}: median line spacing {:.2}", page.number, median);

        let segmentator = ParagraphSegmentator::new().with_median_spacing(median);
        let region_rects: Vec<Rect> = regions
            .iter()
            .map(|blocks| {
                Rect::union_all(blocks.iter().flatten().map(|l| l.rect())).unwrap_or_default()
            })
            .collect();
        let targets: Vec<usize> = anchored
            .iter()
            .map(|(graphic, _)| target_region(&region_rects, &page.graphics[*graphic].rect))
            .collect();

        let mut numberer = ParagraphNumberer::new().with_error_mode(self.options.error_mode);
        let region_count = regions.len().max(usize::from(!anchored.is_empty()));
        let mut regions = regions.into_iter();
        let mut anchored = anchored.into_iter().zip(targets).collect::<Vec<_>>();

        for _ in 0..region_count {
            let index = numberer.new_region();
            let mut paragraphs = Vec::new();

            for lines in regions.next().unwrap_or_default() {
                paragraphs.extend(segmentator.segment(
                    lines,
                    self.registry,
                    &mut numberer,
                    page.number,
                )?);
            }

            let (here, rest): (Vec<_>, Vec<_>) =
                anchored.into_iter().partition(|(_, target)| *target == index);
            anchored = rest;
            for ((graphic, lines), _) in here {
                if lines.is_empty() {
                    continue;
                }
                let id = numberer.next_graphic_id()?;
                paragraphs.push(Paragraph::new(id, page.number, index, lines).anchored_to(graphic));
            }

            if !paragraphs.is_empty() {
                page.regions.push(Region::new(index, paragraphs));
            }
        }

        log::debug!(
            "Page {}: {} regions, {} paragraphs, {} graphics",
            page.number,
            page.regions.len(),
            page.paragraph_count(),
            page.graphics.len()
        );
        Ok(page)
    }
}

/// Pull out the words lying on a figure, grouped by the first figure they
/// intersect.
fn take_anchored(
    words: Vec<Word>,
    figures: &[GraphicObject],
) -> (Vec<(usize, Vec<Word>)>, Vec<Word>) {
    let mut anchored: Vec<(usize, Vec<Word>)> = Vec::new();
    let mut free = Vec::new();

    for word in words {
        match figures.iter().position(|g| g.rect.intersects(&word.rect)) {
            Some(graphic) => match anchored.iter_mut().find(|(g, _)| *g == graphic) {
                Some((_, group)) => group.push(word),
                None => anchored.push((graphic, vec![word])),
            },
            None => free.push(word),
        }
    }
    anchored.sort_by_key(|(graphic, _)| *graphic);
    (anchored, free)
}

/// Region with the largest vertical overlap with `rect`, else the nearest.
fn target_region(regions: &[Rect], rect: &Rect) -> usize {
    regions
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let overlap = r.vertical_overlap(rect);
            let distance = if overlap > 0.0 {
                -overlap
            } else {
                r.vertical_distance_to(rect).abs().min(rect.vertical_distance_to(r).abs())
            };
            (i, distance)
        })
        .min_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)))
        .map_or(0, |(i, _)| i)
}
