//! # qpfmt
//!
//! Question paper formatter for Word documents.
//!
//! This library reformats DOCX question papers in place: uniform page
//! margins, one font family and size, fixed line spacing, a school/exam
//! header with a live page number in the footer, bold section headers and
//! justified mark annotations such as `(5 marks)`.
//!
//! ## Quick Start
//!
//! ```no_run
//! use qpfmt::{format_file, Settings};
//!
//! fn main() -> qpfmt::Result<()> {
//!     let settings = Settings::default()
//!         .with_font("Mangal")
//!         .with_school("Kendriya Vidyalaya")
//!         .with_exam("Half Yearly Examination");
//!
//!     let stats = format_file("paper.docx", "paper-formatted.docx", &settings)?;
//!     println!("{} paragraphs formatted", stats.paragraph_count);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Batch processing**: many documents into one ZIP archive, see [`batch`]
//! - **Devanagari support**: fonts are set for complex-script runs too
//! - **Lossless round trip**: parts the formatter does not touch are copied verbatim
//! - **C ABI** (`ffi` feature) and **async file API** (`async` feature)

pub mod batch;
pub mod detect;
pub mod error;
pub mod format;
pub mod inspect;
pub mod model;
pub mod package;
pub mod xml;

#[cfg(feature = "ffi")]
pub mod ffi;

// Re-export commonly used types
pub use batch::{
    BatchFormatter, BatchInput, BatchOutput, BatchReport, EntryReport, EntryStatus,
    FailurePolicy, DEFAULT_ARCHIVE_NAME,
};
pub use detect::{detect_format_from_bytes, detect_format_from_path, is_docx, DocxFormat, DocxKind};
pub use error::{Error, Result};
pub use format::{reformat, FormatStats, MarkMode, Settings, STANDARD_FONTS};
pub use inspect::DocumentInfo;
pub use model::{
    Alignment, Document, HeaderFooter, HeaderFooterKind, Margins, Metadata, Paragraph,
    ParagraphStyle, Section, TextRun, TextStyle, Twips,
};

use std::path::Path;

/// Reformat a DOCX file and write the result to `output`.
///
/// # Example
///
/// ```no_run
/// use qpfmt::{format_file, Settings};
///
/// let stats = format_file("paper.docx", "out/paper.docx", &Settings::default()).unwrap();
/// println!("Sections: {}", stats.section_count);
/// ```
pub fn format_file<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    settings: &Settings,
) -> Result<FormatStats> {
    let data = std::fs::read(input)?;
    let (bytes, stats) = format_bytes(&data, settings)?;
    std::fs::write(output, bytes)?;
    Ok(stats)
}

/// Reformat DOCX bytes and return the new document bytes.
///
/// # Example
///
/// ```no_run
/// use qpfmt::{format_bytes, Settings};
///
/// let data = std::fs::read("paper.docx").unwrap();
/// let (formatted, _stats) = format_bytes(&data, &Settings::default()).unwrap();
/// std::fs::write("paper-formatted.docx", formatted).unwrap();
/// ```
pub fn format_bytes(data: &[u8], settings: &Settings) -> Result<(Vec<u8>, FormatStats)> {
    let mut doc = Document::from_bytes(data)?;
    let stats = reformat(&mut doc, settings)?;
    Ok((doc.to_bytes()?, stats))
}

/// Summarize a DOCX file without changing it.
///
/// # Example
///
/// ```no_run
/// use qpfmt::inspect_file;
///
/// let info = inspect_file("paper.docx").unwrap();
/// println!("{} sections, {} headers", info.sections.len(), info.section_headers.len());
/// ```
pub fn inspect_file<P: AsRef<Path>>(path: P) -> Result<DocumentInfo> {
    let data = std::fs::read(path)?;
    DocumentInfo::from_bytes(&data)
}

/// Extract the body text of a DOCX file, one paragraph per line.
pub fn extract_text<P: AsRef<Path>>(path: P) -> Result<String> {
    Ok(Document::open(path)?.plain_text())
}

/// Reformat a DOCX file using tokio for file I/O.
///
/// The reformatting itself runs on the calling task.
#[cfg(feature = "async")]
pub async fn format_file_async<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    settings: &Settings,
) -> Result<FormatStats> {
    let data = tokio::fs::read(input).await?;
    let (bytes, stats) = format_bytes(&data, settings)?;
    tokio::fs::write(output, bytes).await?;
    Ok(stats)
}

/// Builder for one-off formatting.
///
/// # Example
///
/// ```no_run
/// use qpfmt::Qpfmt;
///
/// Qpfmt::new()
///     .with_font("Arial")
///     .with_size(14)
///     .with_spacing(1.5)
///     .without_header()
///     .format("paper.docx")?
///     .save("paper-formatted.docx")?;
/// # Ok::<(), qpfmt::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Qpfmt {
    settings: Settings,
}

impl Qpfmt {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from existing settings.
    pub fn with_settings(settings: Settings) -> Self {
        Self { settings }
    }

    /// Set the font family.
    pub fn with_font(mut self, font: impl Into<String>) -> Self {
        self.settings = self.settings.with_font(font);
        self
    }

    /// Set the font size in points.
    pub fn with_size(mut self, size: u32) -> Self {
        self.settings = self.settings.with_size(size);
        self
    }

    /// Set the line-spacing multiplier.
    pub fn with_spacing(mut self, spacing: f32) -> Self {
        self.settings = self.settings.with_spacing(spacing);
        self
    }

    /// Set the uniform margin in inches.
    pub fn with_margin(mut self, margin: f64) -> Self {
        self.settings = self.settings.with_margin(margin);
        self
    }

    /// Set school and exam names for the header.
    pub fn with_header_text(mut self, school: impl Into<String>, exam: impl Into<String>) -> Self {
        self.settings = self.settings.with_school(school).with_exam(exam);
        self
    }

    /// Leave headers and footers alone.
    pub fn without_header(mut self) -> Self {
        self.settings = self.settings.with_header(false);
        self
    }

    /// Indent every body paragraph by a quarter inch.
    pub fn with_auto_indent(mut self) -> Self {
        self.settings = self.settings.with_auto_indent(true);
        self
    }

    /// Keep section headers bold even when they end in a mark annotation.
    pub fn preserve_section_headers(mut self) -> Self {
        self.settings = self.settings.with_mark_mode(MarkMode::PreserveSectionHeaders);
        self
    }

    /// Settings built so far.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Open and reformat a DOCX file.
    pub fn format<P: AsRef<Path>>(self, path: P) -> Result<QpfmtResult> {
        let document = Document::open(path)?;
        self.format_document(document)
    }

    /// Reformat DOCX bytes.
    pub fn format_bytes(self, data: &[u8]) -> Result<QpfmtResult> {
        let document = Document::from_bytes(data)?;
        self.format_document(document)
    }

    fn format_document(self, mut document: Document) -> Result<QpfmtResult> {
        let stats = reformat(&mut document, &self.settings)?;
        Ok(QpfmtResult { document, stats })
    }
}

/// Result of formatting a document.
#[derive(Debug, Clone)]
pub struct QpfmtResult {
    /// The reformatted document
    pub document: Document,
    /// What the pass changed
    pub stats: FormatStats,
}

impl QpfmtResult {
    /// Serialize to DOCX bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        self.document.to_bytes()
    }

    /// Write the document to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.document.save(path)
    }

    /// Body text after formatting.
    pub fn plain_text(&self) -> String {
        self.document.plain_text()
    }

    /// Get the document.
    pub fn document(&self) -> &Document {
        &self.document
    }
}
