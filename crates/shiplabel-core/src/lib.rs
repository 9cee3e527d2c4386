//! Core library for shipping label PDF extraction.
//!
//! This crate provides:
//! - PDF tokenization into positioned words
//! - A page word index with landmark search and box text extraction
//! - Shipper detection and carrier-specific layout/field parsing
//! - Per-document processing and bounded-concurrency batches

pub mod batch;
pub mod carrier;
pub mod error;
pub mod layout;
pub mod models;
pub mod pdf;
pub mod processor;

pub use batch::process_batch;
pub use carrier::{Carrier, CarrierRegistry, ShadowfaxCarrier, ShipperDetector};
pub use error::{ExtractionError, LabelError, LayoutError, PdfError, Result};
pub use layout::{Axis, BoxPercent, FieldBoxes, FieldTexts, PageGeometry, WordIndex};
pub use models::config::LabelConfig;
pub use models::label::{BillItem, BillLine, BillSummary, CustomerAddress, OrderDetails, ProductLine, ShadowfaxLabel};
pub use pdf::{PdfTokenizer, PdftotextTokenizer, TokenizedDocument, Word};
pub use processor::{DocumentInput, DocumentResult, DocumentStatus, Extraction, LabelProcessor, Payload};
