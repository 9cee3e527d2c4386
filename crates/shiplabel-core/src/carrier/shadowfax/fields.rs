//! Positional parsers for the text of each Shadowfax block.
//!
//! Every parser works on the newline-joined text produced by
//! [`WordIndex::extract_box_text`](crate::layout::WordIndex::extract_box_text)
//! and relies on the line and token counts of the printed template. When a
//! block does not match, the parser returns [`ExtractionError::MalformedLayout`].

use crate::error::ExtractionError;
use crate::layout::FieldTexts;
use crate::models::label::{
    BillItem, BillLine, BillSummary, CustomerAddress, OrderDetails, ProductLine, ShadowfaxLabel,
};

use super::layout::{BILL_BLOCK, CUSTOMER_ADDRESS_BLOCK, ORDER_DETAILS_BLOCK, PRODUCT_DETAILS_BLOCK};

type Result<T> = std::result::Result<T, ExtractionError>;

/// Separator printed before every amount in the bill block.
const RUPEE: &str = "Rs.";

/// Parse all blocks of a Shadowfax label.
pub fn parse_label(texts: &FieldTexts) -> Result<ShadowfaxLabel> {
    Ok(ShadowfaxLabel {
        customer_address: parse_customer_address(block(texts, CUSTOMER_ADDRESS_BLOCK)?)?,
        product_details: parse_product_details(block(texts, PRODUCT_DETAILS_BLOCK)?)?,
        order_details: parse_order_details(block(texts, ORDER_DETAILS_BLOCK)?)?,
        bill_details: parse_bill_details(block(texts, BILL_BLOCK)?)?,
    })
}

fn block<'a>(texts: &'a FieldTexts, name: &str) -> Result<&'a str> {
    texts
        .get(name)
        .map(String::as_str)
        .ok_or_else(|| ExtractionError::MissingBlock(name.to_string()))
}

/// Parse the customer address block.
///
/// Expects at least 2 lines: a heading, the customer name, any number of
/// street lines, and a final `city, state, pin` line with exactly three
/// comma-separated parts. The parts are kept as split, so state and pin
/// carry the space that follows each comma.
pub fn parse_customer_address(text: &str) -> Result<CustomerAddress> {
    const FIELD: &str = "customer_address";

    let lines: Vec<&str> = text.split('\n').collect();
    if lines.len() < 2 {
        return Err(ExtractionError::malformed(
            FIELD,
            format!("expected at least 2 lines, found {}", lines.len()),
        ));
    }

    let last = lines[lines.len() - 1];
    let parts: Vec<&str> = last.split(',').collect();
    let [city, state, pin] = parts.as_slice() else {
        return Err(ExtractionError::malformed(
            FIELD,
            format!("expected 'city, state, pin', found {:?}", last),
        ));
    };

    let street = lines.get(2..lines.len() - 1).unwrap_or_default();

    Ok(CustomerAddress {
        name: lines[1].to_string(),
        address: street.join(" "),
        city: city.to_string(),
        state: state.to_string(),
        pin: pin.to_string(),
    })
}

/// Parse the product table.
///
/// The first two lines (heading and column titles) and the last two lines
/// are not products. Every product row needs at least 4 space-separated
/// tokens: sku, size, qty, ..., order number.
pub fn parse_product_details(text: &str) -> Result<Vec<ProductLine>> {
    const FIELD: &str = "product_details";

    let lines: Vec<&str> = text.split('\n').collect();
    let rows = lines.get(2..lines.len().saturating_sub(2)).unwrap_or_default();

    rows.iter()
        .map(|row| {
            let tokens: Vec<&str> = row.split(' ').collect();
            if tokens.len() < 4 {
                return Err(ExtractionError::malformed(
                    FIELD,
                    format!("expected at least 4 tokens, found {:?}", row),
                ));
            }
            Ok(ProductLine {
                sku: tokens[0].to_string(),
                size: tokens[1].to_string(),
                qty: tokens[2].to_string(),
                order_no: tokens[tokens.len() - 1].to_string(),
            })
        })
        .collect()
}

/// Parse the seller/order block.
///
/// The last line is `<label> <invoice no> <order date> <invoice date>`; the
/// third line from the end carries the GST number after a `-`.
pub fn parse_order_details(text: &str) -> Result<OrderDetails> {
    const FIELD: &str = "order_details";

    let lines: Vec<&str> = text.split('\n').collect();
    if lines.len() < 3 {
        return Err(ExtractionError::malformed(
            FIELD,
            format!("expected at least 3 lines, found {}", lines.len()),
        ));
    }

    let last = lines[lines.len() - 1];
    let tokens: Vec<&str> = last.split(' ').collect();
    let [_, invoice_no, order_date, invoice_date] = tokens.as_slice() else {
        return Err(ExtractionError::malformed(
            FIELD,
            format!("expected 4 tokens in invoice line, found {:?}", last),
        ));
    };

    let gst_line = lines[lines.len() - 3];
    let gst_no = gst_line.split('-').nth(1).ok_or_else(|| {
        ExtractionError::malformed(FIELD, format!("no GST number in {:?}", gst_line))
    })?;

    Ok(OrderDetails {
        order_date: order_date.to_string(),
        invoice_date: invoice_date.to_string(),
        invoice_no: invoice_no.to_string(),
        gst_no: gst_no.trim().to_string(),
    })
}

/// Parse the bill block.
///
/// After the heading line, products come in groups of three lines (SGST,
/// amounts, CGST); the last line holds the total tax and amount. Groups
/// start at lines 1, 4, 7, ... below `len - 2`. SGST, CGST, tax and total
/// are trimmed; gross, discount and taxable amounts keep their spaces.
pub fn parse_bill_details(text: &str) -> Result<Vec<BillLine>> {
    const FIELD: &str = "bill_details";

    let lines: Vec<&str> = text.split('\n').collect();
    let mut result = Vec::new();

    for start in (1..lines.len().saturating_sub(2)).step_by(3) {
        let Some([sgst, amounts, cgst]) = lines.get(start..start + 3).map(|g| [g[0], g[1], g[2]])
        else {
            return Err(ExtractionError::malformed(
                FIELD,
                format!("incomplete product group at line {}", start),
            ));
        };

        let amount_parts: Vec<&str> = amounts.split(RUPEE).collect();
        result.push(BillLine::Item(BillItem {
            sgst: rupee_amount(sgst, 1, FIELD)?,
            gross_amount: part(&amount_parts, 1, amounts, FIELD)?,
            discount: part(&amount_parts, 2, amounts, FIELD)?,
            taxable_amount: part(&amount_parts, 3, amounts, FIELD)?,
            cgst: rupee_amount(cgst, 1, FIELD)?,
        }));
    }

    let total_line = lines[lines.len() - 1];
    result.push(BillLine::Summary(BillSummary {
        tax: rupee_amount(total_line, 1, FIELD)?,
        total: rupee_amount(total_line, 2, FIELD)?,
    }));

    Ok(result)
}

/// Trimmed amount after the `index`-th rupee sign of a tax or total line.
fn rupee_amount(line: &str, index: usize, field: &str) -> Result<String> {
    let parts: Vec<&str> = line.split(RUPEE).collect();
    Ok(part(&parts, index, line, field)?.trim().to_string())
}

/// Raw split part, surrounding spaces included.
fn part(parts: &[&str], index: usize, line: &str, field: &str) -> Result<String> {
    parts
        .get(index)
        .map(|p| p.to_string())
        .ok_or_else(|| {
            ExtractionError::malformed(
                field,
                format!("expected {} '{}' amounts in {:?}", index, RUPEE, line),
            )
        })
}
