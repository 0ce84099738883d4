//! Text heuristics for question papers.

/// Lower-case prefixes that mark a paragraph as a section header.
///
/// Prefix match only: "Sectional analysis" counts as a header too.
pub const SECTION_KEYWORDS: [&str; 4] = ["section", "instructions", "general", "note"];

/// Check if a paragraph's text introduces a part of the paper.
pub fn is_section_header(text: &str) -> bool {
    let text = text.trim().to_lowercase();
    SECTION_KEYWORDS.iter().any(|kw| text.starts_with(kw))
}

/// A paragraph split into question text and its trailing mark annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkSplit {
    /// Text before the last `(`, trimmed
    pub question: String,
    /// `(` plus the text after the last `(`, trimmed
    pub marks: String,
}

/// Split off a trailing parenthesized mark annotation.
///
/// Matches when the text has both `(` and `)` and the part after the last
/// `(` contains a `)`. Anything after that `)` stays in the marks text.
pub fn split_mark_annotation(text: &str) -> Option<MarkSplit> {
    if !text.contains(')') {
        return None;
    }
    let (before, after) = text.rsplit_once('(')?;
    if !after.contains(')') {
        return None;
    }
    Some(MarkSplit {
        question: before.trim().to_string(),
        marks: format!("({}", after.trim()),
    })
}
