//! End-to-end extraction over tokenized label fixtures.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use serde_json::json;

use shiplabel_core::carrier::shadowfax::{
    BILL_TO_OR_SHIP_TO_BLOCK, CUSTOMER_ADDRESS_BLOCK, ORDER_DETAILS_BLOCK, RETURN_ADDRESS_BLOCK,
};
use shiplabel_core::{
    DocumentInput, DocumentStatus, Extraction, LabelError, LabelProcessor, PdfError, PdfTokenizer,
    ShadowfaxCarrier, ShadowfaxLabel, TokenizedDocument, Word, process_batch,
};

const PAGE: f64 = 128.0;

const SHADOWFAX_PDF: &[u8] = b"%PDF shadowfax";
const AMAZON_PDF: &[u8] = b"%PDF amazon";
const PLAIN_PDF: &[u8] = b"%PDF plain";

/// Serves fixed documents keyed by payload bytes; anything else fails to parse.
struct FixtureTokenizer;

impl PdfTokenizer for FixtureTokenizer {
    fn tokenize(&self, data: &[u8]) -> Result<TokenizedDocument, PdfError> {
        let words = match data {
            SHADOWFAX_PDF => shadowfax_words(),
            AMAZON_PDF => line(&["amazon.in", "Ship", "To"], 10.0),
            PLAIN_PDF => line(&["Tax", "Invoice"], 10.0),
            _ => return Err(PdfError::Parse("not a PDF".to_string())),
        };
        Ok(TokenizedDocument {
            words,
            page_width: PAGE,
            page_height: PAGE,
        })
    }

    fn backend_name(&self) -> &str {
        "fixture"
    }
}

fn word(text: &str, x0: f64, top: f64) -> Word {
    Word::new(text, x0, top, x0 + 6.0, top + 2.0)
}

/// Words of one line, 14 units apart starting at the left margin.
fn line(texts: &[&str], top: f64) -> Vec<Word> {
    texts
        .iter()
        .enumerate()
        .map(|(i, t)| word(t, 2.0 + 14.0 * i as f64, top))
        .collect()
}

fn at(texts: &[(&str, f64)], top: f64) -> Vec<Word> {
    texts.iter().map(|(t, x)| word(t, *x, top)).collect()
}

/// A Shadowfax label in document order.
fn shadowfax_words() -> Vec<Word> {
    let rows: Vec<Vec<Word>> = vec![
        at(&[("shadowfax", 60.0)], 2.0),
        // Customer address column
        line(&["Customer", "Address"], 10.0),
        line(&["Ravi", "Kumar"], 14.0),
        line(&["12", "MG", "Road"], 18.0),
        line(&["Indiranagar"], 22.0),
        line(&["Bengaluru,", "Karnataka,", "560038"], 26.0),
        // Return address column
        line(&["return", "address"], 30.0),
        line(&["Acme", "Traders"], 34.0),
        line(&["Pune,", "Maharashtra,", "411001"], 38.0),
        // Product table
        line(&["Product", "Details"], 46.0),
        at(
            &[("SKU", 2.0), ("Size", 30.0), ("Qty", 40.0), ("Color", 50.0), ("Order", 70.0), ("No.", 80.0)],
            48.0,
        ),
        at(
            &[("TSHIRT-RED-M", 2.0), ("M", 30.0), ("1", 40.0), ("Red", 50.0), ("1234567890_1", 70.0)],
            50.0,
        ),
        at(
            &[("JEANS-BLU-32", 2.0), ("32", 30.0), ("2", 40.0), ("Blue", 50.0), ("1234567890_2", 70.0)],
            52.0,
        ),
        line(&["Free", "Shipping"], 54.0),
        line(&["Thank", "you"], 56.0),
        // Ship-to and seller columns
        at(
            &[("SHIP", 2.0), ("TO:", 10.0), ("Sold", 50.0), ("by:", 58.0), ("Acme", 66.0), ("Traders", 74.0)],
            60.0,
        ),
        at(
            &[("Ravi", 2.0), ("Kumar", 10.0), ("GSTIN", 52.0), ("-", 62.0), ("29ABCDE1234F1Z5", 66.0)],
            64.0,
        ),
        at(&[("Invoice", 52.0), ("Details", 62.0)], 68.0),
        at(
            &[("Ref", 52.0), ("INV-001", 60.0), ("2024-01-05", 72.0), ("2024-01-06", 86.0)],
            72.0,
        ),
        // Bill table
        at(
            &[
                ("Description", 2.0),
                ("Qty", 30.0),
                ("Gross", 40.0),
                ("Discount", 56.0),
                ("Taxable", 72.0),
                ("Total", 90.0),
            ],
            74.0,
        ),
        at(&[("SGST", 2.0), ("Rs.", 40.0), ("9.00", 48.0)], 76.0),
        at(
            &[
                ("TSHIRT-RED-M", 2.0),
                ("Rs.", 40.0),
                ("299.00", 48.0),
                ("Rs.", 56.0),
                ("0.00", 64.0),
                ("Rs.", 72.0),
                ("299.00", 80.0),
            ],
            78.0,
        ),
        at(&[("CGST", 2.0), ("Rs.", 40.0), ("9.00", 48.0)], 80.0),
        at(
            &[("Total", 2.0), ("Rs.", 40.0), ("18.00", 48.0), ("Rs.", 56.0), ("317.00", 64.0)],
            82.0,
        ),
    ];
    rows.into_iter().flatten().collect()
}

fn processor() -> LabelProcessor {
    LabelProcessor::new(Arc::new(FixtureTokenizer))
}

fn expected_label() -> serde_json::Value {
    json!({
        "customer_address": {
            "name": "Ravi Kumar",
            "address": "12 MG Road Indiranagar",
            "city": "Bengaluru",
            "state": " Karnataka",
            "pin": " 560038"
        },
        "product_details": [
            { "sku": "TSHIRT-RED-M", "size": "M", "qty": "1", "order_no": "1234567890_1" },
            { "sku": "JEANS-BLU-32", "size": "32", "qty": "2", "order_no": "1234567890_2" }
        ],
        "order_details": {
            "order_date": "2024-01-05",
            "invoice_date": "2024-01-06",
            "invoice_no": "INV-001",
            "gst_no": "29ABCDE1234F1Z5"
        },
        "bill_details": [
            {
                "sgst": "9.00",
                "gross_amount": " 299.00 ",
                "discount": " 0.00 ",
                "taxable_amount": " 299.00",
                "cgst": "9.00"
            },
            { "tax": "18.00", "total": "317.00" }
        ]
    })
}

#[test]
fn test_extracts_full_shadowfax_label() {
    let extraction = processor().extract(SHADOWFAX_PDF).unwrap();

    assert_eq!(
        extraction,
        Extraction::Label {
            shipper: "shadowfax".to_string(),
            data: expected_label(),
        }
    );
}

#[test]
fn test_typed_label_matches_json() {
    let index = processor().index(SHADOWFAX_PDF).unwrap();
    let label = ShadowfaxCarrier::new().extract_label(&index).unwrap();

    let parsed: ShadowfaxLabel = serde_json::from_value(expected_label()).unwrap();
    assert_eq!(label, parsed);
}

#[test]
fn test_unparsed_blocks_are_extracted() {
    let index = processor().index(SHADOWFAX_PDF).unwrap();
    let blocks = ShadowfaxCarrier::new().extract_blocks(&index).unwrap();

    assert_eq!(
        blocks[CUSTOMER_ADDRESS_BLOCK],
        "Customer Address\nRavi Kumar\n12 MG Road\nIndiranagar\nBengaluru, Karnataka, 560038"
    );
    assert_eq!(
        blocks[RETURN_ADDRESS_BLOCK],
        "return address\nAcme Traders\nPune, Maharashtra, 411001"
    );
    assert_eq!(blocks[BILL_TO_OR_SHIP_TO_BLOCK], "SHIP TO: Sold\nRavi Kumar");
    assert_eq!(
        blocks[ORDER_DETAILS_BLOCK],
        "Sold by: Acme Traders\nGSTIN - 29ABCDE1234F1Z5\nInvoice Details\nRef INV-001 2024-01-05 2024-01-06"
    );
}

#[test]
fn test_recognized_shipper_without_rules() {
    assert_eq!(
        processor().extract(AMAZON_PDF).unwrap(),
        Extraction::Unsupported("amazon".to_string())
    );
}

#[test]
fn test_no_shipper_keyword() {
    assert!(matches!(
        processor().extract(PLAIN_PDF),
        Err(LabelError::UnknownShipper)
    ));
}

#[tokio::test]
async fn test_batch_isolates_failures() {
    let inputs = vec![
        DocumentInput::bytes("https://labels.example/1.pdf", SHADOWFAX_PDF.to_vec()),
        DocumentInput::bytes("https://labels.example/2.pdf", b"garbage".to_vec()),
        DocumentInput::bytes("https://labels.example/3.pdf", PLAIN_PDF.to_vec()),
        DocumentInput::unavailable("https://labels.example/4.pdf", "HTTP 404 Not Found"),
        DocumentInput::bytes("https://labels.example/5.pdf", AMAZON_PDF.to_vec()),
    ];

    let results = process_batch(Arc::new(processor()), inputs, 2).await;
    let summary: Vec<(String, String)> = results
        .iter()
        .map(|r| (r.key.clone(), r.status.to_string()))
        .collect();

    assert_eq!(
        summary,
        vec![
            ("https://labels.example/1.pdf".to_string(), "success".to_string()),
            (
                "https://labels.example/2.pdf".to_string(),
                "PDF error: failed to parse PDF: not a PDF".to_string()
            ),
            ("https://labels.example/3.pdf".to_string(), "unknown shipper".to_string()),
            (
                "https://labels.example/4.pdf".to_string(),
                "pdf download failed: HTTP 404 Not Found".to_string()
            ),
            (
                "https://labels.example/5.pdf".to_string(),
                "unsupported shipper: amazon".to_string()
            ),
        ]
    );
    assert_eq!(results[0].data, Some(expected_label()));
    assert!(results[1..].iter().all(|r| r.data.is_none()));
    assert_eq!(results[0].status, DocumentStatus::Success);
}

#[test]
fn test_truncated_label_reports_layout_error() {
    let mut words = shadowfax_words();
    words.retain(|w| w.text != "Description");
    let index = shiplabel_core::WordIndex::new(TokenizedDocument {
        words,
        page_width: PAGE,
        page_height: PAGE,
    })
    .unwrap();

    let err = processor().extract_indexed(&index).unwrap_err();
    assert_eq!(err.to_string(), "layout error: Text 'Description' not found in PDF");
}
