//! Formatting settings and validation.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Fonts offered by the formatter. Any other installed font name is accepted too.
pub const STANDARD_FONTS: [&str; 4] = ["Times New Roman", "Arial", "Mangal", "Kruti Dev"];

/// Allowed line-spacing multipliers.
pub const LINE_SPACINGS: [f32; 4] = [1.0, 1.15, 1.5, 2.0];

/// Allowed font sizes in points.
pub const FONT_SIZE_RANGE: std::ops::RangeInclusive<u32> = 10..=18;

/// Allowed uniform margin in inches.
pub const MARGIN_RANGE: std::ops::RangeInclusive<f64> = 0.5..=2.0;

/// How the mark-alignment step treats section-header paragraphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MarkMode {
    /// Rewrite every matching paragraph, header or not.
    ///
    /// A section header that also ends in a mark annotation loses the
    /// bolding applied earlier in the pass.
    #[default]
    Compatible,
    /// Leave section-header paragraphs out of the mark step so they stay bold.
    PreserveSectionHeaders,
}

/// Settings for one reformatting pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Font family applied to every text run
    pub font: String,

    /// Font size in points
    pub size: u32,

    /// Line-spacing multiplier
    pub spacing: f32,

    /// Uniform page margin in inches
    pub margin: f64,

    /// Rewrite header and footer text
    pub header_enabled: bool,

    /// School name shown in the header
    pub school: String,

    /// Exam name shown in the header
    pub exam: String,

    /// Bold paragraphs detected as section headers
    pub bold_sections: bool,

    /// Indent every body paragraph by a quarter inch
    pub auto_indent: bool,

    /// Mark-alignment behavior for section headers
    pub mark_mode: MarkMode,

    /// Text placed before the page number in the footer
    pub footer_label: String,
}

impl Settings {
    /// Create settings with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings from a JSON file. Missing keys take their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json(&data)
    }

    /// Parse settings from JSON. Missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set the font family.
    pub fn with_font(mut self, font: impl Into<String>) -> Self {
        self.font = font.into();
        self
    }

    /// Set the font size in points.
    pub fn with_size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    /// Set the line-spacing multiplier.
    pub fn with_spacing(mut self, spacing: f32) -> Self {
        self.spacing = spacing;
        self
    }

    /// Set the uniform page margin in inches.
    pub fn with_margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    /// Enable or disable the header/footer step.
    pub fn with_header(mut self, enabled: bool) -> Self {
        self.header_enabled = enabled;
        self
    }

    /// Set the school name.
    pub fn with_school(mut self, school: impl Into<String>) -> Self {
        self.school = school.into();
        self
    }

    /// Set the exam name.
    pub fn with_exam(mut self, exam: impl Into<String>) -> Self {
        self.exam = exam.into();
        self
    }

    /// Enable or disable section-header bolding.
    pub fn with_bold_sections(mut self, bold: bool) -> Self {
        self.bold_sections = bold;
        self
    }

    /// Enable or disable the quarter-inch left indent.
    pub fn with_auto_indent(mut self, indent: bool) -> Self {
        self.auto_indent = indent;
        self
    }

    /// Set the mark-alignment mode.
    pub fn with_mark_mode(mut self, mode: MarkMode) -> Self {
        self.mark_mode = mode;
        self
    }

    /// Set the footer label.
    pub fn with_footer_label(mut self, label: impl Into<String>) -> Self {
        self.footer_label = label.into();
        self
    }

    /// Header line written to every section: `"<school> | <exam>"`.
    pub fn header_text(&self) -> String {
        format!("{} | {}", self.school, self.exam)
    }

    /// Check if the font is one of [`STANDARD_FONTS`].
    pub fn is_standard_font(&self) -> bool {
        STANDARD_FONTS.contains(&self.font.as_str())
    }

    /// Check every value against its allowed domain.
    pub fn validate(&self) -> Result<()> {
        if self.font.trim().is_empty() {
            return Err(Error::InvalidSettings("font name is empty".into()));
        }
        if !FONT_SIZE_RANGE.contains(&self.size) {
            return Err(Error::InvalidSettings(format!(
                "font size {} is outside {}-{} pt",
                self.size,
                FONT_SIZE_RANGE.start(),
                FONT_SIZE_RANGE.end()
            )));
        }
        if !LINE_SPACINGS
            .iter()
            .any(|allowed| (allowed - self.spacing).abs() < 1e-4)
        {
            return Err(Error::InvalidSettings(format!(
                "line spacing {} is not one of 1.0, 1.15, 1.5, 2.0",
                self.spacing
            )));
        }
        if !MARGIN_RANGE.contains(&self.margin) {
            return Err(Error::InvalidSettings(format!(
                "margin {} in is outside {}-{} in",
                self.margin,
                MARGIN_RANGE.start(),
                MARGIN_RANGE.end()
            )));
        }
        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            font: "Times New Roman".to_string(),
            size: 12,
            spacing: 1.0,
            margin: 1.0,
            header_enabled: true,
            school: "Your School Name".to_string(),
            exam: "Term 1 Examination".to_string(),
            bold_sections: true,
            auto_indent: false,
            mark_mode: MarkMode::Compatible,
            footer_label: "Page ".to_string(),
        }
    }
}
