//! Analysis options and configuration.

use super::ordering::OrderingMode;

/// Options for layout analysis.
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    /// Error handling mode for malformed input
    pub error_mode: ErrorMode,

    /// Reading order applied to content blocks inside a region
    pub ordering: OrderingMode,

    /// Whether to analyse pages in parallel
    pub parallel: bool,

    /// Fixed median line spacing, bypassing the per-page estimate
    pub median_spacing: Option<f32>,

    /// Fraction of the page height scanned when splitting off a title block
    pub top_split_fraction: f32,

    /// Whether to split regions into column blocks
    pub detect_columns: bool,

    /// Whether to remove page numbers after segmentation
    pub remove_page_numbers: bool,

    /// Whether to tag numbered section headings
    pub recognize_divisions: bool,
}

impl AnalysisOptions {
    /// Create new analysis options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Enable lenient mode (skip invalid content).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Set the block ordering mode.
    pub fn with_ordering(mut self, ordering: OrderingMode) -> Self {
        self.ordering = ordering;
        self
    }

    /// Enable or disable parallel processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Use a fixed median line spacing for every page.
    pub fn with_median_spacing(mut self, spacing: f32) -> Self {
        self.median_spacing = Some(spacing);
        self
    }

    /// Set the fraction of the page scanned by the title split.
    pub fn with_top_split_fraction(mut self, fraction: f32) -> Self {
        self.top_split_fraction = fraction.clamp(0.0, 1.0);
        self
    }

    /// Enable or disable column block detection.
    pub fn with_columns(mut self, detect: bool) -> Self {
        self.detect_columns = detect;
        self
    }

    /// Keep page numbers in the output.
    pub fn keep_page_numbers(mut self) -> Self {
        self.remove_page_numbers = false;
        self
    }

    /// Enable or disable section heading tagging.
    pub fn with_divisions(mut self, recognize: bool) -> Self {
        self.recognize_divisions = recognize;
        self
    }
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::Strict,
            ordering: OrderingMode::PageColumnAwareMixed,
            parallel: true,
            median_spacing: None,
            top_split_fraction: 0.4,
            detect_columns: true,
            remove_page_numbers: true,
            recognize_divisions: true,
        }
    }
}

/// Error handling mode during analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail on any error
    #[default]
    Strict,
    /// Skip invalid content and continue
    Lenient,
}
