//! # pagelayout
//!
//! Layout analysis for positioned document content.
//!
//! A page decoder reports text runs and graphics with coordinates and font
//! attributes but no reading order. This library reconstructs the page
//! structure from geometry and typography alone: words are grouped into
//! lines, lines into paragraphs, paragraphs into regions, and recurring page
//! furniture such as page numbers is removed.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pagelayout::{analyze_json, render};
//!
//! fn main() -> pagelayout::Result<()> {
//!     let json = std::fs::read_to_string("decoded.json")?;
//!     let doc = analyze_json(&json)?;
//!
//!     let text = render::to_text(&doc, &render::RenderOptions::default())?;
//!     println!("{}", text);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Line and paragraph segmentation** from vertical density histograms
//!   and style changes
//! - **Region splitting** on wide horizontal whitespace
//! - **Column-aware reading order** with pluggable ordering modes
//! - **Graphic merging** of fragmented vector drawings
//! - **Page-number removal** and numbered heading tagging
//! - **Parallel processing**: uses Rayon for multi-page documents

pub mod analysis;
pub mod error;
pub mod input;
pub mod model;
pub mod render;

pub use analysis::{
    AnalysisOptions, DocumentStyles, ErrorMode, LineGapEstimator, LogicalOperation,
    OrderingMode, PageAnalyzer, RecognizeDivisions, RemovePageNumbers, SpacingEstimator,
};
pub use error::{Error, Result};
pub use input::{RawDocument, RawItem, RawPage};
pub use model::{
    Color, ContentItem, Document, FontSpec, GraphicObject, Line, Page, PageContent, Paragraph,
    Rect, Region, Role, Style, StyleId, StyleRegistry, TextRun, Word,
};
pub use render::{JsonFormat, PageSelection, RenderOptions};

use rayon::prelude::*;

/// Configurable layout analysis pipeline.
///
/// # Example
///
/// ```no_run
/// use pagelayout::{AnalysisOptions, Analyzer, OrderingMode};
///
/// let analyzer = Analyzer::with_options(
///     AnalysisOptions::new()
///         .lenient()
///         .with_ordering(OrderingMode::ColumnAwareMixed),
/// );
/// let json = std::fs::read_to_string("decoded.json").unwrap();
/// let doc = analyzer.analyze_json(&json).unwrap();
/// println!("Pages: {}", doc.page_count());
/// ```
pub struct Analyzer {
    options: AnalysisOptions,
    estimator: Box<dyn SpacingEstimator>,
    operations: Vec<Box<dyn LogicalOperation>>,
}

impl Analyzer {
    /// Create an analyzer with default options.
    pub fn new() -> Self {
        Self::with_options(AnalysisOptions::default())
    }

    /// Create an analyzer with custom options.
    pub fn with_options(options: AnalysisOptions) -> Self {
        Self {
            options,
            estimator: Box::new(LineGapEstimator),
            operations: Vec::new(),
        }
    }

    /// Replace the median spacing estimator.
    pub fn with_estimator(mut self, estimator: impl SpacingEstimator + 'static) -> Self {
        self.estimator = Box::new(estimator);
        self
    }

    /// Append a document-wide operation, run after the built-in ones.
    pub fn with_operation(mut self, operation: impl LogicalOperation + 'static) -> Self {
        self.operations.push(Box::new(operation));
        self
    }

    pub fn options(&self) -> &AnalysisOptions {
        &self.options
    }

    /// Analyse decoded pages whose styles were interned in `styles`.
    pub fn analyze(&self, pages: Vec<PageContent>, styles: StyleRegistry) -> Result<Document> {
        log::info!("Analysing {} pages", pages.len());
        let analyzer = PageAnalyzer::new(&styles, &self.options, self.estimator.as_ref());

        let results: Vec<Result<Page>> = if self.options.parallel {
            pages.par_iter().map(|p| analyzer.analyze(p)).collect()
        } else {
            pages.iter().map(|p| analyzer.analyze(p)).collect()
        };

        let mut analysed = Vec::with_capacity(results.len());
        for (content, result) in pages.iter().zip(results) {
            match result {
                Ok(page) => analysed.push(page),
                Err(e) => match self.options.error_mode {
                    ErrorMode::Strict => return Err(e),
                    ErrorMode::Lenient => {
                        log::warn!("Page {}: analysis failed: {}", content.number, e);
                        let mut page = Page::new(content.number, content.bounds);
                        page.rotation = content.rotation;
                        analysed.push(page);
                    }
                },
            }
        }

        let mut doc = Document::with_styles(styles);
        doc.pages = analysed;
        self.run_operations(&mut doc)?;

        log::info!(
            "Analysed {} pages into {} paragraphs",
            doc.page_count(),
            doc.pages.iter().map(Page::paragraph_count).sum::<usize>()
        );
        Ok(doc)
    }

    /// Ingest raw decoder output and analyse it.
    pub fn analyze_raw(&self, raw: RawDocument) -> Result<Document> {
        let styles = StyleRegistry::new();
        let pages = input::ingest(raw, &styles, self.options.error_mode)?;
        self.analyze(pages, styles)
    }

    /// Parse decoder output from JSON and analyse it.
    pub fn analyze_json(&self, json: &str) -> Result<Document> {
        self.analyze_raw(input::parse_json(json)?)
    }

    fn run_operations(&self, doc: &mut Document) -> Result<()> {
        let styles = DocumentStyles::analyze(doc)?;

        let mut operations: Vec<&dyn LogicalOperation> = Vec::new();
        if self.options.remove_page_numbers {
            operations.push(&RemovePageNumbers);
        }
        if self.options.recognize_divisions {
            operations.push(&RecognizeDivisions);
        }
        for operation in &self.operations {
            operations.push(operation.as_ref());
        }

        for operation in operations {
            log::debug!("Running {}", operation.name());
            operation.apply(doc, &styles)?;
        }
        Ok(())
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Analyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Analyzer")
            .field("options", &self.options)
            .field(
                "operations",
                &self.operations.iter().map(|o| o.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Analyse decoded pages with default options.
///
/// # Example
///
/// ```no_run
/// use pagelayout::{analyze, FontSpec, PageContent, Rect, StyleRegistry};
///
/// let styles = StyleRegistry::new();
/// let body = styles.get_or_create(&FontSpec::new("Times", 10.0));
/// let mut page = PageContent::new(1, Rect::new(0.0, 0.0, 612.0, 792.0));
/// page.push_text(Rect::new(72.0, 100.0, 120.0, 110.0), "Hello", body);
///
/// let doc = analyze(vec![page], styles).unwrap();
/// assert_eq!(doc.plain_text(), "Hello");
/// ```
pub fn analyze(pages: Vec<PageContent>, styles: StyleRegistry) -> Result<Document> {
    Analyzer::new().analyze(pages, styles)
}

/// Analyse decoded pages with custom options.
pub fn analyze_with_options(
    pages: Vec<PageContent>,
    styles: StyleRegistry,
    options: AnalysisOptions,
) -> Result<Document> {
    Analyzer::with_options(options).analyze(pages, styles)
}

/// Parse decoder output from JSON and analyse it with default options.
pub fn analyze_json(json: &str) -> Result<Document> {
    Analyzer::new().analyze_json(json)
}
