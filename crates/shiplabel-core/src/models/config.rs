//! Configuration structures for the label extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::LabelError;

/// Main configuration for the shiplabel pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    /// Shipper detection configuration.
    pub detection: DetectionConfig,

    /// Box text extraction configuration.
    pub layout: LayoutConfig,

    /// PDF tokenization configuration.
    pub pdf: PdfConfig,

    /// Batch processing configuration.
    pub batch: BatchConfig,
}

/// Shipper detection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Known shipper keywords, checked case-insensitively in this order.
    pub shippers: Vec<String>,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            shippers: vec!["shadowfax".to_string(), "amazon".to_string()],
        }
    }
}

/// Box text extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Vertical bucket size (page units) used to group words into lines.
    pub line_tolerance: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            line_tolerance: 2.0,
        }
    }
}

/// PDF tokenization configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Path or name of the `pdftotext` binary.
    pub pdftotext_path: PathBuf,

    /// Retry encrypted PDFs with an empty password.
    pub decrypt_empty_password: bool,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            pdftotext_path: PathBuf::from("pdftotext"),
            decrypt_empty_password: true,
        }
    }
}

/// Batch processing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Maximum number of documents processed at the same time.
    pub max_workers: usize,

    /// Timeout for downloading a single document, in seconds.
    pub fetch_timeout_secs: u64,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_workers: 4,
            fetch_timeout_secs: 30,
        }
    }
}

impl LabelConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }

    /// Check values that would make the pipeline misbehave.
    pub fn validate(&self) -> Result<(), LabelError> {
        if self.detection.shippers.iter().any(|s| s.trim().is_empty()) {
            return Err(LabelError::Config(
                "detection.shippers must not contain empty names".to_string(),
            ));
        }
        if !(self.layout.line_tolerance.is_finite() && self.layout.line_tolerance > 0.0) {
            return Err(LabelError::Config(format!(
                "layout.line_tolerance must be a positive number, got {}",
                self.layout.line_tolerance
            )));
        }
        if self.batch.max_workers == 0 {
            return Err(LabelError::Config(
                "batch.max_workers must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
