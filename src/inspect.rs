//! Read-only document summaries.

use crate::detect::{detect_format_from_bytes, DocxFormat};
use crate::error::Result;
use crate::format::{is_section_header, split_mark_annotation};
use crate::model::{Document, Metadata, Section};
use serde::{Deserialize, Serialize};

/// Summary of a document as the formatter sees it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentInfo {
    /// Package description (e.g. `Word document (word/document.xml)`)
    pub format: String,

    /// Core properties
    pub metadata: Metadata,

    /// Number of body paragraphs
    pub paragraph_count: usize,

    /// Sections with margins and the header/footer in effect
    pub sections: Vec<Section>,

    /// Paragraph texts that would be bolded as section headers
    pub section_headers: Vec<String>,

    /// Number of paragraphs ending in a mark annotation
    pub mark_annotation_count: usize,

    /// Distinct explicit fonts used by body runs
    pub fonts: Vec<String>,
}

impl DocumentInfo {
    /// Summarize an opened document.
    pub fn from_document(format: &DocxFormat, doc: &Document) -> Result<Self> {
        let paragraphs = doc.paragraphs();
        let mut section_headers = Vec::new();
        let mut mark_annotation_count = 0;
        let mut fonts: Vec<String> = Vec::new();

        for paragraph in &paragraphs {
            let text = paragraph.plain_text();
            if is_section_header(&text) {
                section_headers.push(text.trim().to_string());
            }
            if split_mark_annotation(&text).is_some() {
                mark_annotation_count += 1;
            }
            for font in paragraph.runs.iter().filter_map(|r| r.style.font_name.as_ref()) {
                if !fonts.contains(font) {
                    fonts.push(font.clone());
                }
            }
        }
        fonts.sort();

        Ok(Self {
            format: format.to_string(),
            metadata: doc.metadata().clone(),
            paragraph_count: paragraphs.len(),
            sections: doc.sections()?,
            section_headers,
            mark_annotation_count,
            fonts,
        })
    }

    /// Summarize DOCX bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let format = detect_format_from_bytes(data)?;
        let doc = Document::from_bytes(data)?;
        Self::from_document(&format, &doc)
    }

    /// Serialize as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
