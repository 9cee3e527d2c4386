//! Per-document processing: tokenize, detect, resolve layout, parse.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use serde::{Serialize, Serializer};
use tracing::{debug, info, warn};

use crate::carrier::{CarrierRegistry, ShipperDetector};
use crate::error::{LabelError, Result};
use crate::layout::{DEFAULT_LINE_TOLERANCE, WordIndex};
use crate::models::config::LabelConfig;
use crate::pdf::{PdfTokenizer, PdftotextTokenizer};

/// A document to process, identified by a caller-chosen key (usually its URL).
#[derive(Debug, Clone)]
pub struct DocumentInput {
    pub key: String,
    pub payload: Payload,
}

/// Document content as handed over by the retrieval layer.
#[derive(Debug, Clone)]
pub enum Payload {
    /// Raw PDF bytes.
    Bytes(Vec<u8>),
    /// Retrieval failed; the reason is reported in the result.
    Unavailable(String),
}

impl DocumentInput {
    pub fn bytes(key: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            key: key.into(),
            payload: Payload::Bytes(data),
        }
    }

    pub fn unavailable(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            payload: Payload::Unavailable(reason.into()),
        }
    }
}

/// Outcome of processing one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentStatus {
    /// Label data was extracted.
    Success,
    /// No known shipper keyword was found.
    UnknownShipper,
    /// The shipper is known but has no extraction rules.
    Unsupported(String),
    /// Processing failed with the given message.
    Failed(String),
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentStatus::Success => f.write_str("success"),
            DocumentStatus::UnknownShipper => f.write_str("unknown shipper"),
            DocumentStatus::Unsupported(name) => write!(f, "unsupported shipper: {}", name),
            DocumentStatus::Failed(message) => f.write_str(message),
        }
    }
}

impl Serialize for DocumentStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Result record for one document.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentResult {
    pub key: String,
    pub status: DocumentStatus,
    pub data: Option<serde_json::Value>,
    /// Wall time spent on the document.
    #[serde(skip)]
    pub processing_time_ms: u64,
}

impl DocumentResult {
    pub fn success(key: impl Into<String>, data: serde_json::Value) -> Self {
        Self::new(key, DocumentStatus::Success, Some(data))
    }

    pub fn failed(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(key, DocumentStatus::Failed(message.into()), None)
    }

    fn new(key: impl Into<String>, status: DocumentStatus, data: Option<serde_json::Value>) -> Self {
        Self {
            key: key.into(),
            status,
            data,
            processing_time_ms: 0,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == DocumentStatus::Success
    }
}

/// What [`LabelProcessor::extract`] found in a document.
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    /// A supported carrier's label data.
    Label {
        shipper: String,
        data: serde_json::Value,
    },
    /// The shipper was recognized but has no registered carrier.
    Unsupported(String),
}

/// Runs the extraction pipeline for single documents.
///
/// The processor holds no per-document state and can be shared between
/// worker threads.
#[derive(Clone)]
pub struct LabelProcessor {
    tokenizer: Arc<dyn PdfTokenizer>,
    detector: ShipperDetector,
    carriers: CarrierRegistry,
    line_tolerance: f64,
}

impl LabelProcessor {
    /// Create a processor with the default shippers and carriers.
    pub fn new(tokenizer: Arc<dyn PdfTokenizer>) -> Self {
        Self {
            tokenizer,
            detector: ShipperDetector::default(),
            carriers: CarrierRegistry::with_defaults(),
            line_tolerance: DEFAULT_LINE_TOLERANCE,
        }
    }

    /// Create a `pdftotext`-backed processor from configuration.
    pub fn from_config(config: &LabelConfig) -> Result<Self> {
        config.validate()?;
        Ok(
            Self::new(Arc::new(PdftotextTokenizer::from_config(&config.pdf)))
                .with_detector(ShipperDetector::from_config(&config.detection))
                .with_line_tolerance(config.layout.line_tolerance),
        )
    }

    pub fn with_detector(mut self, detector: ShipperDetector) -> Self {
        self.detector = detector;
        self
    }

    pub fn with_carriers(mut self, carriers: CarrierRegistry) -> Self {
        self.carriers = carriers;
        self
    }

    pub fn with_line_tolerance(mut self, tolerance: f64) -> Self {
        self.line_tolerance = tolerance;
        self
    }

    pub fn detector(&self) -> &ShipperDetector {
        &self.detector
    }

    pub fn carriers(&self) -> &CarrierRegistry {
        &self.carriers
    }

    /// Tokenize a PDF and build its word index.
    pub fn index(&self, data: &[u8]) -> Result<WordIndex> {
        Ok(WordIndex::from_pdf(self.tokenizer.as_ref(), data)?
            .with_line_tolerance(self.line_tolerance))
    }

    /// Extract label data from PDF bytes.
    pub fn extract(&self, data: &[u8]) -> Result<Extraction> {
        let index = self.index(data)?;
        self.extract_indexed(&index)
    }

    /// Extract label data from an already indexed document.
    pub fn extract_indexed(&self, index: &WordIndex) -> Result<Extraction> {
        let shipper = self.detector.detect(index)?;

        match self.carriers.get(&shipper) {
            Some(carrier) if carrier.detect_applicability(index) => {
                let data = carrier.extract(index)?;
                Ok(Extraction::Label { shipper, data })
            }
            _ => {
                debug!("No extraction rules for shipper {}", shipper);
                Ok(Extraction::Unsupported(shipper))
            }
        }
    }

    /// Process one document into a result record. Never fails.
    pub fn process(&self, input: DocumentInput) -> DocumentResult {
        let start = Instant::now();
        let DocumentInput { key, payload } = input;

        let mut result = match payload {
            Payload::Unavailable(reason) => {
                DocumentResult::failed(&key, format!("pdf download failed: {}", reason))
            }
            Payload::Bytes(data) => match self.extract(&data) {
                Ok(Extraction::Label { data, .. }) => DocumentResult::success(&key, data),
                Ok(Extraction::Unsupported(shipper)) => {
                    DocumentResult::new(&key, DocumentStatus::Unsupported(shipper), None)
                }
                Err(LabelError::UnknownShipper) => {
                    DocumentResult::new(&key, DocumentStatus::UnknownShipper, None)
                }
                Err(e) => DocumentResult::failed(&key, e.to_string()),
            },
        };

        result.processing_time_ms = start.elapsed().as_millis() as u64;

        match &result.status {
            DocumentStatus::Failed(message) => warn!("Failed to process {}: {}", key, message),
            status => info!("Processed {} in {}ms: {}", key, result.processing_time_ms, status),
        }

        result
    }
}

impl fmt::Debug for LabelProcessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LabelProcessor")
            .field("tokenizer", &self.tokenizer.backend_name())
            .field("detector", &self.detector)
            .field("carriers", &self.carriers)
            .field("line_tolerance", &self.line_tolerance)
            .finish()
    }
}
