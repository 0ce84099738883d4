//! Statistics collected during a reformatting pass.

use serde::{Deserialize, Serialize};

/// Counts of what a reformatting pass changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatStats {
    /// Number of sections whose margins were set
    pub section_count: u32,

    /// Number of body paragraphs processed
    pub paragraph_count: u32,

    /// Number of text runs given the settings font and size
    pub run_count: u32,

    /// Number of paragraphs bolded as section headers
    pub section_header_count: u32,

    /// Number of paragraphs split into question and marks
    pub mark_count: u32,

    /// Number of distinct header and footer parts rewritten
    pub header_footer_parts: u32,
}

impl FormatStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge another stats instance into this one.
    pub fn merge(&mut self, other: &FormatStats) {
        self.section_count += other.section_count;
        self.paragraph_count += other.paragraph_count;
        self.run_count += other.run_count;
        self.section_header_count += other.section_header_count;
        self.mark_count += other.mark_count;
        self.header_footer_parts += other.header_footer_parts;
    }
}
