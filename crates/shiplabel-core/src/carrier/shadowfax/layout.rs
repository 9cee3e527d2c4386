//! Shadowfax label template: landmark words and the blocks derived from them.

use tracing::debug;

use crate::error::LayoutError;
use crate::layout::{BoxPercent, FieldBoxes, WordIndex};

pub const CUSTOMER_ADDRESS_BLOCK: &str = "customer_address_block";
pub const RETURN_ADDRESS_BLOCK: &str = "return_address_block";
pub const PRODUCT_DETAILS_BLOCK: &str = "product_details_block";
pub const BILL_TO_OR_SHIP_TO_BLOCK: &str = "bill_to_or_ship_to_block";
pub const ORDER_DETAILS_BLOCK: &str = "order_details_block";
pub const BILL_BLOCK: &str = "bill_block";

/// Right edge (percent) of the two address columns.
const ADDRESS_COLUMN_END: f64 = 40.0;
/// Margin (percent) kept away from the next section's landmark.
const MARGIN: f64 = 1.0;

/// Boxes of a Shadowfax label, in page percentages.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowfaxLayout {
    pub customer_address_block: BoxPercent,
    pub return_address_block: BoxPercent,
    pub product_details_block: BoxPercent,
    pub bill_to_or_ship_to_block: BoxPercent,
    pub order_details_block: BoxPercent,
    pub bill_block: BoxPercent,
}

impl ShadowfaxLayout {
    /// Locate the landmark words and derive every block.
    ///
    /// Fails if any landmark is missing; there is no partial layout.
    pub fn resolve(index: &WordIndex) -> Result<Self, LayoutError> {
        let customer = index.find_word_position("Customer", 1)?;
        let ret = index.find_word_position("return", 1)?;
        let product = index.find_word_position("Product", 1)?;
        let ship_or_bill = index.find_word_position("SHIP", 1)?;
        let sold_by = index.find_word_position("Sold", 1)?;
        let description = index.find_word_position("Description", 1)?;
        // The first "Total" is the table header column.
        let total = index.find_word_position("Total", 2)?;

        let layout = Self {
            customer_address_block: BoxPercent::new(
                customer.x1,
                ADDRESS_COLUMN_END,
                customer.y1,
                ret.y1 - MARGIN,
            ),
            return_address_block: BoxPercent::new(
                ret.x1,
                ADDRESS_COLUMN_END,
                ret.y1,
                product.y1 - MARGIN,
            ),
            product_details_block: BoxPercent::new(
                product.x1 - MARGIN,
                100.0,
                product.y1,
                ship_or_bill.y1 - MARGIN,
            ),
            bill_to_or_ship_to_block: BoxPercent::new(
                ship_or_bill.x1,
                sold_by.x1,
                ship_or_bill.y1,
                description.y1 - MARGIN,
            ),
            order_details_block: BoxPercent::new(
                sold_by.x1,
                100.0,
                sold_by.y1,
                description.y1 - MARGIN,
            ),
            bill_block: BoxPercent::new(
                description.x1,
                100.0,
                description.y1 - MARGIN,
                total.y2 + MARGIN,
            ),
        };

        debug!("Resolved Shadowfax layout: {:?}", layout);
        Ok(layout)
    }

    /// Named boxes in template order.
    pub fn boxes(&self) -> FieldBoxes {
        vec![
            (CUSTOMER_ADDRESS_BLOCK.to_string(), self.customer_address_block),
            (RETURN_ADDRESS_BLOCK.to_string(), self.return_address_block),
            (PRODUCT_DETAILS_BLOCK.to_string(), self.product_details_block),
            (BILL_TO_OR_SHIP_TO_BLOCK.to_string(), self.bill_to_or_ship_to_block),
            (ORDER_DETAILS_BLOCK.to_string(), self.order_details_block),
            (BILL_BLOCK.to_string(), self.bill_block),
        ]
    }
}
