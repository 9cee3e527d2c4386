//! Carrier detection and carrier-specific extraction.
//!
//! Each carrier implements [`Carrier`]: it decides whether a document is
//! one of its labels, derives the named boxes of its template from landmark
//! words, and parses the text of those boxes. Adding a carrier means adding
//! an implementation and registering it; the pipeline itself is unchanged.

mod detector;
pub mod shadowfax;

pub use detector::ShipperDetector;
pub use shadowfax::ShadowfaxCarrier;

use std::sync::Arc;

use crate::error::Result;
use crate::layout::{FieldBoxes, FieldTexts, WordIndex};

/// Carrier-specific layout and parsing rules.
pub trait Carrier: Send + Sync {
    /// Shipper keyword this carrier is registered under.
    fn name(&self) -> &str;

    /// Check that the document looks like this carrier's label.
    fn detect_applicability(&self, index: &WordIndex) -> bool {
        let needle = self.name().to_lowercase();
        index
            .words()
            .iter()
            .any(|w| w.text.to_lowercase().contains(&needle))
    }

    /// Derive the named boxes of the label template.
    fn resolve_layout(&self, index: &WordIndex) -> Result<FieldBoxes>;

    /// Parse the extracted box texts into the carrier's output shape.
    fn parse_fields(&self, texts: &FieldTexts) -> Result<serde_json::Value>;

    /// Run layout resolution, box extraction and parsing.
    fn extract(&self, index: &WordIndex) -> Result<serde_json::Value> {
        let boxes = self.resolve_layout(index)?;
        let texts = index.extract_fields(&boxes);
        self.parse_fields(&texts)
    }
}

/// Carriers with a full extraction pipeline, looked up by shipper name.
#[derive(Clone, Default)]
pub struct CarrierRegistry {
    carriers: Vec<Arc<dyn Carrier>>,
}

impl CarrierRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in carrier.
    pub fn with_defaults() -> Self {
        Self::new().with_carrier(ShadowfaxCarrier::new())
    }

    /// Register a carrier. A later carrier with the same name wins.
    pub fn with_carrier(mut self, carrier: impl Carrier + 'static) -> Self {
        self.register(Arc::new(carrier));
        self
    }

    pub fn register(&mut self, carrier: Arc<dyn Carrier>) {
        self.carriers
            .retain(|c| !c.name().eq_ignore_ascii_case(carrier.name()));
        self.carriers.push(carrier);
    }

    /// Find the carrier registered under `name` (case-insensitive).
    pub fn get(&self, name: &str) -> Option<Arc<dyn Carrier>> {
        self.carriers
            .iter()
            .find(|c| c.name().eq_ignore_ascii_case(name))
            .cloned()
    }

    /// Names of all registered carriers.
    pub fn names(&self) -> Vec<&str> {
        self.carriers.iter().map(|c| c.name()).collect()
    }
}

impl std::fmt::Debug for CarrierRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CarrierRegistry")
            .field("carriers", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::BoxPercent;
    use crate::pdf::{TokenizedDocument, Word};
    use serde_json::json;

    struct Stub(&'static str);

    impl Carrier for Stub {
        fn name(&self) -> &str {
            self.0
        }

        fn resolve_layout(&self, _index: &WordIndex) -> Result<FieldBoxes> {
            Ok(vec![(
                "all".to_string(),
                BoxPercent::new(0.0, 100.0, 0.0, 100.0),
            )])
        }

        fn parse_fields(&self, texts: &FieldTexts) -> Result<serde_json::Value> {
            Ok(json!({ "all": texts["all"] }))
        }
    }

    fn index(words: &[&str]) -> WordIndex {
        let words = words
            .iter()
            .enumerate()
            .map(|(i, t)| Word::new(*t, 10.0 * i as f64, 10.0, 10.0 * i as f64 + 8.0, 14.0))
            .collect();
        WordIndex::new(TokenizedDocument {
            words,
            page_width: 100.0,
            page_height: 100.0,
        })
        .unwrap()
    }

    #[test]
    fn test_registry_lookup_is_case_insensitive() {
        let registry = CarrierRegistry::with_defaults();
        assert!(registry.get("Shadowfax").is_some());
        assert!(registry.get("amazon").is_none());
        assert_eq!(registry.names(), vec!["shadowfax"]);
    }

    #[test]
    fn test_register_replaces_same_name() {
        let registry = CarrierRegistry::new()
            .with_carrier(Stub("delhivery"))
            .with_carrier(Stub("Delhivery"));
        assert_eq!(registry.names(), vec!["Delhivery"]);
    }

    #[test]
    fn test_default_applicability_and_extract() {
        let idx = index(&["via", "DELHIVERY", "express"]);
        let carrier = Stub("delhivery");

        assert!(carrier.detect_applicability(&idx));
        assert!(!Stub("bluedart").detect_applicability(&idx));
        assert_eq!(
            carrier.extract(&idx).unwrap(),
            json!({ "all": "via DELHIVERY express" })
        );
    }
}
