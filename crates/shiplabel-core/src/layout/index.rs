//! Positioned word index for a single document.

use std::collections::BTreeMap;

use tracing::{debug, trace};

use super::geometry::{Axis, BoxPercent, FieldBoxes, FieldTexts, PageGeometry};
use crate::error::{LayoutError, PdfError, Result};
use crate::pdf::{PdfTokenizer, TokenizedDocument, Word};

/// Default vertical bucket size used to group words into lines.
pub const DEFAULT_LINE_TOLERANCE: f64 = 2.0;

/// All words of one document with the page geometry they were measured on.
#[derive(Debug, Clone)]
pub struct WordIndex {
    words: Vec<Word>,
    geometry: PageGeometry,
    line_tolerance: f64,
}

impl WordIndex {
    /// Build an index from an already tokenized document.
    pub fn new(document: TokenizedDocument) -> std::result::Result<Self, PdfError> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(document.page_width) || !valid(document.page_height) {
            return Err(PdfError::Tokenizer(format!(
                "invalid page size {}x{}",
                document.page_width, document.page_height
            )));
        }

        Ok(Self {
            words: document.words,
            geometry: PageGeometry::new(document.page_width, document.page_height),
            line_tolerance: DEFAULT_LINE_TOLERANCE,
        })
    }

    /// Tokenize PDF bytes and index the words.
    pub fn from_pdf(tokenizer: &dyn PdfTokenizer, data: &[u8]) -> Result<Self> {
        let document = tokenizer.tokenize(data)?;
        debug!(
            "Indexed {} words via {}",
            document.words.len(),
            tokenizer.backend_name()
        );
        Ok(Self::new(document)?)
    }

    /// Set the vertical bucket size used by [`WordIndex::extract_box_text`].
    pub fn with_line_tolerance(mut self, tolerance: f64) -> Self {
        self.line_tolerance = tolerance;
        self
    }

    /// All words in document order.
    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn geometry(&self) -> PageGeometry {
        self.geometry
    }

    /// Convert a page percentage to absolute units.
    pub fn to_absolute(&self, axis: Axis, percent: f64) -> f64 {
        self.geometry.to_absolute(axis, percent)
    }

    /// Find the `occurrence`-th (1-based) word containing `search_text`.
    ///
    /// Matching is a case-sensitive substring test. The word's bounding box
    /// is returned in page percentages.
    pub fn find_word_position(
        &self,
        search_text: &str,
        occurrence: usize,
    ) -> std::result::Result<BoxPercent, LayoutError> {
        let matches: Vec<&Word> = self
            .words
            .iter()
            .filter(|w| w.text.contains(search_text))
            .collect();

        if matches.is_empty() {
            return Err(LayoutError::NotFound(search_text.to_string()));
        }

        if occurrence < 1 || occurrence > matches.len() {
            return Err(LayoutError::OccurrenceOutOfRange {
                text: search_text.to_string(),
                requested: occurrence,
                found: matches.len(),
            });
        }

        let word = matches[occurrence - 1];
        let page = &self.geometry;

        Ok(BoxPercent {
            x1: page.to_percent(Axis::X, word.x0),
            x2: page.to_percent(Axis::X, word.x1),
            y1: page.to_percent(Axis::Y, word.top),
            y2: page.to_percent(Axis::Y, word.bottom),
        })
    }

    /// Collect the text of every word anchored inside `area`.
    ///
    /// A word belongs to the box when its `(x0, top)` point lies inside it,
    /// bounds inclusive. Words are grouped into lines by rounding `top` to
    /// the line tolerance, ordered left to right within a line and top to
    /// bottom across lines.
    pub fn extract_box_text(&self, area: &BoxPercent) -> String {
        if area.is_inverted() {
            trace!("inverted box {:?}", area);
            return String::new();
        }

        let x0 = self.to_absolute(Axis::X, area.x1);
        let x1 = self.to_absolute(Axis::X, area.x2);
        let y0 = self.to_absolute(Axis::Y, area.y1);
        let y1 = self.to_absolute(Axis::Y, area.y2);

        let mut lines: BTreeMap<i64, Vec<&Word>> = BTreeMap::new();
        for word in self
            .words
            .iter()
            .filter(|w| x0 <= w.x0 && w.x0 <= x1 && y0 <= w.top && w.top <= y1)
        {
            lines.entry(self.line_key(word.top)).or_default().push(word);
        }

        lines
            .into_values()
            .map(|mut line| {
                line.sort_by(|a, b| a.x0.total_cmp(&b.x0));
                line.iter()
                    .map(|w| w.text.as_str())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Apply [`WordIndex::extract_box_text`] to every named box.
    pub fn extract_fields(&self, boxes: &FieldBoxes) -> FieldTexts {
        boxes
            .iter()
            .map(|(name, area)| {
                let text = self.extract_box_text(area);
                debug!(block = %name, "{}", text);
                (name.clone(), text)
            })
            .collect()
    }

    // Ties round to even, so 3.0 with tolerance 2 lands in bucket 2.0.
    fn line_key(&self, top: f64) -> i64 {
        let key = (top / self.line_tolerance).round_ties_even() as i64;
        trace!("top {} -> bucket {}", top, key);
        key
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn index(words: Vec<Word>) -> WordIndex {
        WordIndex::new(TokenizedDocument {
            words,
            page_width: 128.0,
            page_height: 128.0,
        })
        .unwrap()
    }

    fn pct(v: f64) -> f64 {
        v / 128.0 * 100.0
    }

    fn full_page() -> BoxPercent {
        BoxPercent::new(0.0, 100.0, 0.0, 100.0)
    }

    #[test]
    fn test_rejects_zero_page_size() {
        let err = WordIndex::new(TokenizedDocument::default()).unwrap_err();
        assert!(matches!(err, PdfError::Tokenizer(_)));
    }

    #[test]
    fn test_find_word_position_occurrences() {
        let idx = index(vec![
            Word::new("Total", 10.0, 20.0, 30.0, 24.0),
            Word::new("Subtotal", 40.0, 20.0, 70.0, 24.0),
            Word::new("Total:", 10.0, 60.0, 32.0, 64.0),
        ]);

        let first = idx.find_word_position("Total", 1).unwrap();
        let second = idx.find_word_position("Total", 2).unwrap();

        assert_eq!(first, BoxPercent::new(pct(10.0), pct(30.0), pct(20.0), pct(24.0)));
        assert_eq!(second.y1, pct(60.0));
        assert_eq!(second.x2, pct(32.0));
        assert_ne!(first, second);

        assert_eq!(
            idx.find_word_position("Total", 3).unwrap_err(),
            LayoutError::OccurrenceOutOfRange {
                text: "Total".to_string(),
                requested: 3,
                found: 2,
            }
        );
        assert!(matches!(
            idx.find_word_position("Total", 0),
            Err(LayoutError::OccurrenceOutOfRange { requested: 0, .. })
        ));
    }

    #[test]
    fn test_find_word_position_is_case_sensitive() {
        let idx = index(vec![Word::new("Return", 0.0, 0.0, 10.0, 4.0)]);
        assert_eq!(
            idx.find_word_position("return", 1).unwrap_err(),
            LayoutError::NotFound("return".to_string())
        );
    }

    #[test]
    fn test_extract_box_text_groups_and_orders_lines() {
        let idx = index(vec![
            Word::new("world", 40.0, 10.6, 60.0, 14.0),
            Word::new("second", 10.0, 20.0, 30.0, 24.0),
            Word::new("hello", 10.0, 10.0, 30.0, 14.0),
            Word::new("line", 35.0, 19.2, 50.0, 24.0),
        ]);

        assert_eq!(idx.extract_box_text(&full_page()), "hello world\nsecond line");
    }

    #[test]
    fn test_extract_box_text_is_deterministic() {
        let idx = index(vec![
            Word::new("b", 20.0, 31.0, 25.0, 34.0),
            Word::new("a", 10.0, 29.5, 15.0, 34.0),
            Word::new("c", 5.0, 50.0, 10.0, 54.0),
        ]);

        let first = idx.extract_box_text(&full_page());
        for _ in 0..10 {
            assert_eq!(idx.extract_box_text(&full_page()), first);
        }
    }

    #[test]
    fn test_bucket_rounding_ties_to_even() {
        // 3.0 / 2 = 1.5 rounds to 2 and 5.0 / 2 = 2.5 rounds to 2.
        let idx = index(vec![
            Word::new("right", 20.0, 3.0, 30.0, 6.0),
            Word::new("left", 10.0, 5.0, 18.0, 8.0),
        ]);
        assert_eq!(idx.extract_box_text(&full_page()), "left right");
    }

    #[test]
    fn test_anchor_point_inclusion() {
        let idx = index(vec![
            // Anchor inside, right edge far outside.
            Word::new("wide", 10.0, 10.0, 120.0, 14.0),
            // Right edge inside, anchor outside.
            Word::new("early", 2.0, 10.0, 20.0, 14.0),
            // Anchor exactly on the corner.
            Word::new("corner", 64.0, 64.0, 80.0, 68.0),
        ]);

        let area = BoxPercent::new(pct(8.0), pct(64.0), pct(8.0), pct(64.0));
        assert_eq!(idx.extract_box_text(&area), "wide\ncorner");
    }

    #[test]
    fn test_inverted_box_is_empty() {
        let idx = index(vec![Word::new("x", 10.0, 10.0, 12.0, 12.0)]);
        let area = BoxPercent::new(0.0, 100.0, 50.0, 5.0);
        assert_eq!(idx.extract_box_text(&area), "");
        let area = BoxPercent::new(60.0, 2.0, 0.0, 100.0);
        assert_eq!(idx.extract_box_text(&area), "");
    }

    #[test]
    fn test_custom_line_tolerance() {
        let words = vec![
            Word::new("a", 10.0, 10.0, 12.0, 12.0),
            Word::new("b", 20.0, 13.0, 22.0, 15.0),
        ];
        assert_eq!(index(words.clone()).extract_box_text(&full_page()), "a\nb");
        assert_eq!(
            index(words).with_line_tolerance(10.0).extract_box_text(&full_page()),
            "a b"
        );
    }

    #[test]
    fn test_extract_fields() {
        let idx = index(vec![
            Word::new("top", 10.0, 10.0, 20.0, 14.0),
            Word::new("bottom", 10.0, 100.0, 30.0, 104.0),
        ]);
        let boxes: FieldBoxes = vec![
            ("upper".to_string(), BoxPercent::new(0.0, 100.0, 0.0, 50.0)),
            ("lower".to_string(), BoxPercent::new(0.0, 100.0, 50.0, 100.0)),
            ("none".to_string(), BoxPercent::new(90.0, 100.0, 0.0, 5.0)),
        ];

        let texts = idx.extract_fields(&boxes);
        assert_eq!(texts["upper"], "top");
        assert_eq!(texts["lower"], "bottom");
        assert_eq!(texts["none"], "");
    }
}
