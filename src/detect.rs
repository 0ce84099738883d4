//! DOCX format detection and validation.

use crate::error::{Error, Result};
use crate::package::{
    resolve_target, ContentTypes, Package, Relationships, CONTENT_TYPES_PART,
    CT_DOCUMENT_MACRO, CT_TEMPLATE_MAIN, REL_OFFICE_DOCUMENT, ROOT_RELS_PART,
};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// ZIP local file header magic: PK\x03\x04
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

/// Flavor of word-processing package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocxKind {
    /// Regular document (`.docx`)
    Document,
    /// Macro-enabled document (`.docm`)
    MacroEnabled,
    /// Template (`.dotx`, `.dotm`)
    Template,
}

/// DOCX format information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocxFormat {
    /// Package flavor
    pub kind: DocxKind,
    /// Main document part name (e.g. `word/document.xml`)
    pub main_part: String,
}

impl std::fmt::Display for DocxFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self.kind {
            DocxKind::Document => "Word document",
            DocxKind::MacroEnabled => "Word macro-enabled document",
            DocxKind::Template => "Word template",
        };
        write!(f, "{} ({})", kind, self.main_part)
    }
}

/// Check for the ZIP local-file magic.
pub fn is_zip_bytes(data: &[u8]) -> bool {
    data.starts_with(ZIP_MAGIC)
}

/// Detect DOCX format from a file path.
///
/// # Example
/// ```no_run
/// use qpfmt::detect::detect_format_from_path;
///
/// let format = detect_format_from_path("paper.docx").unwrap();
/// println!("Main part: {}", format.main_part);
/// ```
pub fn detect_format_from_path<P: AsRef<Path>>(path: P) -> Result<DocxFormat> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    detect_format_from_bytes(&data)
}

/// Detect DOCX format from the complete file content.
///
/// # Returns
/// * `Ok(DocxFormat)` if the data is a word-processing package
/// * `Err(Error::UnknownFormat)` if the data is not a ZIP archive
/// * `Err(Error::NotWordDocument)` if the archive has no word-processing main part
pub fn detect_format_from_bytes(data: &[u8]) -> Result<DocxFormat> {
    if !is_zip_bytes(data) {
        return Err(Error::UnknownFormat);
    }
    let package = Package::from_bytes(data)?;
    let main_part = locate_main_part(&package)?;
    let kind = package
        .get(CONTENT_TYPES_PART)
        .and_then(|types| ContentTypes::from_bytes(types).ok())
        .and_then(|types| types.content_type(&main_part).map(kind_of))
        .unwrap_or(DocxKind::Document);
    Ok(DocxFormat { kind, main_part })
}

fn kind_of(content_type: &str) -> DocxKind {
    if content_type == CT_DOCUMENT_MACRO {
        DocxKind::MacroEnabled
    } else if content_type == CT_TEMPLATE_MAIN
        || content_type.starts_with("application/vnd.ms-word.template")
    {
        DocxKind::Template
    } else {
        DocxKind::Document
    }
}

/// Check if a file is a DOCX package.
pub fn is_docx<P: AsRef<Path>>(path: P) -> bool {
    detect_format_from_path(path).is_ok()
}

/// Check if bytes are a DOCX package.
pub fn is_docx_bytes(data: &[u8]) -> bool {
    detect_format_from_bytes(data).is_ok()
}

/// Find the main document part through the package relationships.
///
/// Falls back to the first part whose content type is a word-processing
/// main document when `_rels/.rels` is missing.
pub(crate) fn locate_main_part(package: &Package) -> Result<String> {
    let types = package
        .get(CONTENT_TYPES_PART)
        .ok_or_else(|| Error::NotWordDocument(format!("missing {}", CONTENT_TYPES_PART)))?;
    let types = ContentTypes::from_bytes(types)?;
    let is_main = |part: &str| types.content_type(part).is_some_and(ContentTypes::is_word_main);

    let from_rels = match package.get(ROOT_RELS_PART) {
        Some(data) => Relationships::from_bytes(data)?
            .first_of_type(REL_OFFICE_DOCUMENT)
            .map(|rel| resolve_target("", &rel.target)),
        None => None,
    };
    let candidate = from_rels.or_else(|| {
        package
            .part_names()
            .find(|name| is_main(name))
            .map(str::to_string)
    });

    match candidate {
        None => Err(Error::NotWordDocument("no main document part".into())),
        Some(part) if !package.contains(&part) => Err(Error::MissingPart(part)),
        Some(part) if !is_main(&part) => Err(Error::NotWordDocument(format!(
            "{} is not a word-processing document",
            part
        ))),
        Some(part) => Ok(part),
    }
}
