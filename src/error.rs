//! Error types for the pagelayout library.

use std::io;
use thiserror::Error;

/// Result type alias for pagelayout operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during layout analysis.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The decoder output could not be read.
    #[error("Invalid input: {0}")]
    Input(String),

    /// A content item carries coordinates that cannot be normalized.
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// A style id is not present in the document's registry.
    #[error("Unknown style id {0}")]
    UnknownStyle(u32),

    /// Paragraph segmentation was started without a median line spacing.
    #[error("Median vertical spacing is required for paragraph segmentation")]
    MissingMedianSpacing,

    /// A region holds more paragraphs than its id range can number.
    #[error("Region {region} exceeds {capacity} {kind} paragraph ids")]
    ParagraphIdOverflow {
        region: usize,
        kind: &'static str,
        capacity: u32,
    },

    /// Error during rendering (JSON, text).
    #[error("Rendering error: {0}")]
    Render(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Input(err.to_string())
    }
}
