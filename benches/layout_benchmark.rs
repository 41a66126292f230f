//! Benchmarks for layout analysis performance.
//!
//! Run with: cargo bench
//!
//! These benchmarks run the pipeline on synthetic two-column pages.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use pagelayout::analysis::graphics::merge_graphics;
use pagelayout::analysis::lines::segment_lines;
use pagelayout::{
    AnalysisOptions, Analyzer, Color, FontSpec, GraphicObject, PageContent, Rect, StyleRegistry,
    Word,
};

/// Creates `page_count` pages with a title, two body columns and a page number.
fn create_test_pages(styles: &StyleRegistry, page_count: u32) -> Vec<PageContent> {
    let title = styles.get_or_create(&FontSpec::new("Helvetica", 18.0).bold());
    let body = styles.get_or_create(&FontSpec::new("Times", 10.0));

    (1..=page_count)
        .map(|number| {
            let mut page = PageContent::new(number, Rect::new(0.0, 0.0, 612.0, 792.0));
            page.push_text(Rect::new(150.0, 60.0, 460.0, 80.0), "Benchmark Title", title);

            for column in 0..2 {
                let left = 60.0 + column as f32 * 260.0;
                for row in 0..50 {
                    let y = 110.0 + row as f32 * 12.0 + (row / 10) as f32 * 8.0;
                    let mut x = left;
                    for word in 0..8 {
                        let width = 18.0 + (word * 7 % 11) as f32;
                        page.push_text(Rect::from_size(x, y, width, 10.0), "lorem", body);
                        x += width + 4.0;
                    }
                }
            }

            page.push_text(
                Rect::from_size(300.0, 760.0, 12.0, 10.0),
                number.to_string(),
                body,
            );
            page
        })
        .collect()
}

/// Creates a grid of small touching vector boxes, as a path splitter emits.
fn create_test_graphics(count: usize) -> Vec<GraphicObject> {
    (0..count)
        .map(|i| {
            let x = (i % 20) as f32 * 6.0;
            let y = (i / 20) as f32 * 6.0;
            GraphicObject::new(Rect::from_size(x, y, 5.0, 5.0), Color::BLACK, false)
        })
        .collect()
}

/// Benchmark the full pipeline at various document sizes.
fn bench_analysis(c: &mut Criterion) {
    let mut group = c.benchmark_group("analysis");

    for page_count in [1, 5, 20].iter() {
        let styles = StyleRegistry::new();
        let pages = create_test_pages(&styles, *page_count);

        group.bench_function(format!("{}_pages", page_count), |b| {
            b.iter(|| {
                Analyzer::new()
                    .analyze(black_box(pages.clone()), styles.clone())
                    .unwrap()
            });
        });

        group.bench_function(format!("{}_pages_sequential", page_count), |b| {
            b.iter(|| {
                Analyzer::with_options(AnalysisOptions::new().sequential())
                    .analyze(black_box(pages.clone()), styles.clone())
                    .unwrap()
            });
        });
    }

    group.finish();
}

/// Benchmark line segmentation of one dense block.
fn bench_line_segmentation(c: &mut Criterion) {
    let styles = StyleRegistry::new();
    let page = create_test_pages(&styles, 1).remove(0);
    let words: Vec<Word> = page
        .items
        .iter()
        .enumerate()
        .map(|(i, item)| Word::from_item(item, i))
        .collect();

    c.bench_function("segment_lines", |b| {
        b.iter(|| segment_lines(black_box(words.clone())));
    });
}

/// Benchmark the fixpoint graphic merge.
fn bench_graphic_merge(c: &mut Criterion) {
    let graphics = create_test_graphics(400);

    c.bench_function("merge_graphics", |b| {
        b.iter(|| merge_graphics(black_box(graphics.clone())));
    });
}

criterion_group!(
    benches,
    bench_analysis,
    bench_line_segmentation,
    bench_graphic_merge,
);
criterion_main!(benches);
