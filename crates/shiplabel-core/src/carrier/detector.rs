//! Shipper detection from label keywords.

use tracing::debug;

use crate::error::{LabelError, Result};
use crate::layout::WordIndex;
use crate::models::config::DetectionConfig;

/// Classifies a document by the first known shipper keyword it contains.
#[derive(Debug, Clone)]
pub struct ShipperDetector {
    shippers: Vec<String>,
    lowered: Vec<String>,
}

impl ShipperDetector {
    /// Create a detector for the given shipper keywords, checked in order.
    pub fn new<I, S>(shippers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let shippers: Vec<String> = shippers.into_iter().map(Into::into).collect();
        let lowered = shippers.iter().map(|s| s.to_lowercase()).collect();
        Self { shippers, lowered }
    }

    pub fn from_config(config: &DetectionConfig) -> Self {
        Self::new(config.shippers.iter().cloned())
    }

    pub fn shippers(&self) -> &[String] {
        &self.shippers
    }

    /// Return the first shipper whose name occurs in a word.
    ///
    /// Words are scanned in document order and each word is checked against
    /// every shipper, case-insensitively, before moving on.
    pub fn detect(&self, index: &WordIndex) -> Result<String> {
        for word in index.words() {
            let text = word.text.to_lowercase();
            if let Some(i) = self.lowered.iter().position(|s| text.contains(s.as_str())) {
                debug!("Detected shipper {} from word {:?}", self.shippers[i], word.text);
                return Ok(self.shippers[i].clone());
            }
        }
        Err(LabelError::UnknownShipper)
    }
}

impl Default for ShipperDetector {
    fn default() -> Self {
        Self::from_config(&DetectionConfig::default())
    }
}
