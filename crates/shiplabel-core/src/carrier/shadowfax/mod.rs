//! Shadowfax shipping labels.

pub mod fields;
mod layout;

pub use layout::{
    BILL_BLOCK, BILL_TO_OR_SHIP_TO_BLOCK, CUSTOMER_ADDRESS_BLOCK, ORDER_DETAILS_BLOCK,
    PRODUCT_DETAILS_BLOCK, RETURN_ADDRESS_BLOCK, ShadowfaxLayout,
};

use tracing::info;

use super::Carrier;
use crate::error::Result;
use crate::layout::{FieldBoxes, FieldTexts, WordIndex};
use crate::models::label::ShadowfaxLabel;

/// Extraction rules for Shadowfax labels.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShadowfaxCarrier;

impl ShadowfaxCarrier {
    pub const NAME: &'static str = "shadowfax";

    pub fn new() -> Self {
        Self
    }

    /// Text of every template block, including the ones that are not parsed.
    pub fn extract_blocks(&self, index: &WordIndex) -> Result<FieldTexts> {
        let layout = ShadowfaxLayout::resolve(index)?;
        Ok(index.extract_fields(&layout.boxes()))
    }

    /// Extract the typed label data.
    pub fn extract_label(&self, index: &WordIndex) -> Result<ShadowfaxLabel> {
        let texts = self.extract_blocks(index)?;
        let label = fields::parse_label(&texts)?;
        info!(
            "Extracted Shadowfax label with {} products",
            label.product_details.len()
        );
        Ok(label)
    }
}

impl Carrier for ShadowfaxCarrier {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn resolve_layout(&self, index: &WordIndex) -> Result<FieldBoxes> {
        Ok(ShadowfaxLayout::resolve(index)?.boxes())
    }

    fn parse_fields(&self, texts: &FieldTexts) -> Result<serde_json::Value> {
        let label = fields::parse_label(texts)?;
        Ok(serde_json::to_value(label)?)
    }
}
