//! Layout analysis.
//!
//! Physical analysis runs per page ([`page::PageAnalyzer`]): graphics are
//! merged, the page is split into regions and column blocks, words are
//! grouped into lines and lines into paragraphs. Logical analysis runs on
//! the whole document afterwards through [`LogicalOperation`]s such as
//! page-number removal and section heading tagging.

pub mod columns;
pub mod furniture;
pub mod graphics;
pub mod lines;
pub mod options;
pub mod ordering;
pub mod page;
pub mod paragraphs;
pub mod regions;
pub mod roles;
pub mod spacing;
pub mod styles;

pub use furniture::RemovePageNumbers;
pub use options::{AnalysisOptions, ErrorMode};
pub use ordering::{Alignment, OrderingMode, SpatialEntity, SpatialOrdering};
pub use page::PageAnalyzer;
pub use paragraphs::{ParagraphNumberer, ParagraphSegmentator, StyleDifference};
pub use roles::RecognizeDivisions;
pub use spacing::{LineGapEstimator, SpacingEstimator};
pub use styles::DocumentStyles;

use crate::error::Result;
use crate::model::Document;

/// A document-wide pass run after every page has been segmented.
///
/// Operations may attach roles to paragraphs or detach paragraphs from
/// their regions; they never change geometry.
pub trait LogicalOperation: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Apply the operation to `doc`.
    fn apply(&self, doc: &mut Document, styles: &DocumentStyles) -> Result<()>;
}
