//! Page geometry and percentage boxes.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LayoutError;

/// Page axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Horizontal axis (page width).
    X,
    /// Vertical axis (page height).
    Y,
}

impl FromStr for Axis {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "x" => Ok(Axis::X),
            "y" => Ok(Axis::Y),
            other => Err(LayoutError::InvalidAxis(other.to_string())),
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => f.write_str("x"),
            Axis::Y => f.write_str("y"),
        }
    }
}

/// Reference page size used for percentage conversion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageGeometry {
    pub width: f64,
    pub height: f64,
}

impl PageGeometry {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Length of the page along an axis.
    pub fn extent(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.width,
            Axis::Y => self.height,
        }
    }

    /// Convert a percentage (0-100) to absolute page units.
    pub fn to_absolute(&self, axis: Axis, percent: f64) -> f64 {
        self.extent(axis) * percent / 100.0
    }

    /// Convert absolute page units to a percentage of the page.
    pub fn to_percent(&self, axis: Axis, value: f64) -> f64 {
        value / self.extent(axis) * 100.0
    }
}

/// A rectangle in percentages of the page width and height.
///
/// `x1 <= x2` and `y1 <= y2` are expected but not enforced. Boxes derived
/// from landmark arithmetic may come out inverted; such boxes contain no
/// words.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxPercent {
    pub x1: f64,
    pub x2: f64,
    pub y1: f64,
    pub y2: f64,
}

impl BoxPercent {
    pub fn new(x1: f64, x2: f64, y1: f64, y2: f64) -> Self {
        Self { x1, x2, y1, y2 }
    }

    /// Whether either axis range is inverted.
    pub fn is_inverted(&self) -> bool {
        self.x1 > self.x2 || self.y1 > self.y2
    }
}

/// Named boxes in the order a carrier layout defines them.
pub type FieldBoxes = Vec<(String, BoxPercent)>;

/// Extracted text per named box.
pub type FieldTexts = BTreeMap<String, String>;
