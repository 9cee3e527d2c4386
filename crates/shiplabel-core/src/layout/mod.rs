//! Word geometry and box text extraction.

mod geometry;
mod index;

pub use geometry::{Axis, BoxPercent, FieldBoxes, FieldTexts, PageGeometry};
pub use index::{DEFAULT_LINE_TOLERANCE, WordIndex};
