//! Error types for the shiplabel-core library.

use thiserror::Error;

/// Main error type for the shiplabel library.
#[derive(Error, Debug)]
pub enum LabelError {
    /// PDF loading or tokenization error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Landmark search or coordinate error.
    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),

    /// Field parsing error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// No word in the document names a known shipper.
    #[error("No label shipper detected")]
    UnknownShipper,

    /// Failed to serialize extracted data.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// The word tokenizer produced unusable output.
    #[error("failed to tokenize PDF: {0}")]
    Tokenizer(String),

    /// The `pdftotext` binary could not be found.
    #[error("pdftotext not found; install poppler-utils or set pdf.pdftotext_path")]
    PdftotextNotFound,

    /// `pdftotext` exited with a failure status.
    #[error("pdftotext failed with exit code {code}: {stderr}")]
    PdftotextFailed { code: i32, stderr: String },
}

/// Errors raised while locating words and boxes on the page.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    /// Axis name other than `x` or `y`.
    #[error("Invalid axis: {0}")]
    InvalidAxis(String),

    /// No word contains the search text.
    #[error("Text '{0}' not found in PDF")]
    NotFound(String),

    /// Requested occurrence is outside `1..=found`.
    #[error("Occurrence {requested} of '{text}' not found. Found {found} occurrences.")]
    OccurrenceOutOfRange {
        text: String,
        requested: usize,
        found: usize,
    },
}

/// Errors related to carrier field parsing.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtractionError {
    /// Block text does not match the carrier template's line/token counts.
    #[error("malformed {field}: {reason}")]
    MalformedLayout { field: String, reason: String },

    /// A block the parser needs was not extracted.
    #[error("missing block: {0}")]
    MissingBlock(String),
}

impl ExtractionError {
    pub(crate) fn malformed(field: &str, reason: impl Into<String>) -> Self {
        Self::MalformedLayout {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type for the shiplabel library.
pub type Result<T> = std::result::Result<T, LabelError>;
