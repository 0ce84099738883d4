//! Measurement units used by WordprocessingML.

use serde::{Deserialize, Serialize};

/// Twips per inch (1 twip = 1/20 point).
pub const TWIPS_PER_INCH: f64 = 1440.0;

/// Length in twentieths of a point, the unit of page margins and indents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Twips(pub i64);

impl Twips {
    /// Create from inches, rounding to the nearest twip.
    pub fn from_inches(inches: f64) -> Self {
        Self((inches * TWIPS_PER_INCH).round() as i64)
    }

    /// Convert to inches.
    pub fn to_inches(self) -> f64 {
        self.0 as f64 / TWIPS_PER_INCH
    }

    /// Parse an OOXML measurement attribute (plain integer twips).
    pub fn parse(value: &str) -> Option<Self> {
        value.trim().parse::<i64>().ok().map(Self)
    }
}

impl std::fmt::Display for Twips {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Font size in half-points (`w:sz`).
pub fn half_points(points: f32) -> u32 {
    (points * 2.0).round().max(0.0) as u32
}

/// Line spacing in 240ths of a line (`w:line` with `w:lineRule="auto"`).
pub fn line_units(multiplier: f32) -> u32 {
    (multiplier * 240.0).round().max(0.0) as u32
}
