//! Shipment label data models.
//!
//! Field names and nesting follow the JSON returned to API consumers, so
//! the structs serialize directly into the response `data` object.

use serde::{Deserialize, Serialize};

/// Data extracted from a Shadowfax shipping label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShadowfaxLabel {
    /// Delivery address of the customer.
    pub customer_address: CustomerAddress,

    /// One entry per product row.
    pub product_details: Vec<ProductLine>,

    /// Invoice and GST details of the seller.
    pub order_details: OrderDetails,

    /// Tax breakdown per product followed by the label total.
    pub bill_details: Vec<BillLine>,
}

/// Customer delivery address.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerAddress {
    pub name: String,
    /// Street lines joined with spaces.
    pub address: String,
    pub city: String,
    pub state: String,
    pub pin: String,
}

/// A product row from the product details table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductLine {
    pub sku: String,
    pub size: String,
    pub qty: String,
    pub order_no: String,
}

/// Order and invoice metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderDetails {
    pub order_date: String,
    pub invoice_date: String,
    pub invoice_no: String,
    pub gst_no: String,
}

/// An entry of the bill breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BillLine {
    /// Amounts for one product.
    Item(BillItem),
    /// Label totals, always the last entry.
    Summary(BillSummary),
}

/// Amounts for one billed product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BillItem {
    pub sgst: String,
    pub gross_amount: String,
    pub discount: String,
    pub taxable_amount: String,
    pub cgst: String,
}

/// Total tax and amount of the label.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BillSummary {
    pub tax: String,
    pub total: String,
}
