//! PDF tokenization into positioned words.

mod pdftotext;

pub use pdftotext::PdftotextTokenizer;

use serde::{Deserialize, Serialize};

use crate::error::PdfError;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// A word token with its bounding box in absolute page units.
///
/// Coordinates use a top-left origin: `top` grows downwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    /// Word text.
    pub text: String,
    /// Left edge.
    pub x0: f64,
    /// Right edge.
    pub x1: f64,
    /// Top edge.
    pub top: f64,
    /// Bottom edge.
    pub bottom: f64,
}

impl Word {
    pub fn new(text: impl Into<String>, x0: f64, top: f64, x1: f64, bottom: f64) -> Self {
        Self {
            text: text.into(),
            x0,
            x1,
            top,
            bottom,
        }
    }
}

/// All words of a document plus the reference page size.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenizedDocument {
    /// Words of every page, concatenated in page order.
    pub words: Vec<Word>,
    /// Width of the first page.
    pub page_width: f64,
    /// Height of the first page.
    pub page_height: f64,
}

/// Trait for PDF word tokenizers.
///
/// Implementations must be usable from worker threads; the batch runner
/// shares one tokenizer across all documents.
pub trait PdfTokenizer: Send + Sync {
    /// Tokenize a PDF held in memory.
    fn tokenize(&self, data: &[u8]) -> Result<TokenizedDocument>;

    /// Short backend name for diagnostics.
    fn backend_name(&self) -> &str;
}
