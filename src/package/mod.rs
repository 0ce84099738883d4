//! OOXML package container.
//!
//! A DOCX file is a ZIP archive of parts. [`Package`] keeps every part as
//! raw bytes in archive order so untouched parts are written back verbatim,
//! and exposes the two package-level indexes the reformatter edits:
//! relationships and content types.

mod content_types;
mod relationships;

pub use content_types::{
    ContentTypes, CT_DOCUMENT_MACRO, CT_DOCUMENT_MAIN, CT_FOOTER, CT_HEADER, CT_TEMPLATE_MAIN,
};
pub use relationships::{Relationship, Relationships};

use crate::error::{Error, Result};
use std::io::{Cursor, Read, Write};
use zip::write::SimpleFileOptions;
use zip::CompressionMethod;

/// Part name of the content-type index.
pub const CONTENT_TYPES_PART: &str = "[Content_Types].xml";

/// Part name of the package-level relationships.
pub const ROOT_RELS_PART: &str = "_rels/.rels";

/// Relationship type of the main document part.
pub const REL_OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";

/// Relationship type of a header part.
pub const REL_HEADER: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/header";

/// Relationship type of a footer part.
pub const REL_FOOTER: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/footer";

/// A single part of the package.
#[derive(Debug, Clone)]
pub struct Part {
    /// Part name without leading slash (e.g. `word/document.xml`)
    pub name: String,

    /// Raw part content
    pub data: Vec<u8>,
}

/// An opened OOXML package.
#[derive(Debug, Clone, Default)]
pub struct Package {
    parts: Vec<Part>,
}

impl Package {
    /// Create an empty package.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read every part of a ZIP package from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut archive = zip::ZipArchive::new(Cursor::new(data))?;
        let mut parts = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            let mut entry = archive.by_index(i)?;
            if entry.is_dir() {
                continue;
            }
            let name = entry.name().trim_start_matches('/').to_string();
            let mut buf = Vec::with_capacity(entry.size() as usize);
            entry.read_to_end(&mut buf)?;
            parts.push(Part { name, data: buf });
        }
        log::debug!("Read package with {} parts", parts.len());
        Ok(Self { parts })
    }

    /// Write the package back to ZIP bytes.
    ///
    /// Media parts are stored uncompressed, everything else is deflated,
    /// matching the layout Word itself produces.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let deflated = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        for part in &self.parts {
            let options = if part.name.contains("/media/") {
                stored
            } else {
                deflated
            };
            zip.start_file(part.name.as_str(), options)?;
            zip.write_all(&part.data)?;
        }
        let cursor = zip.finish()?;
        Ok(cursor.into_inner())
    }

    /// Number of parts.
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Check if the package has no parts.
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Names of all parts in archive order.
    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().map(|p| p.name.as_str())
    }

    /// Check if a part exists.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Get a part's content.
    pub fn get(&self, name: &str) -> Option<&[u8]> {
        let name = name.trim_start_matches('/');
        self.parts
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.data.as_slice())
    }

    /// Get a part's content or fail with [`Error::MissingPart`].
    pub fn require(&self, name: &str) -> Result<&[u8]> {
        self.get(name)
            .ok_or_else(|| Error::MissingPart(name.to_string()))
    }

    /// Replace a part's content, appending the part if it is new.
    pub fn put(&mut self, name: impl Into<String>, data: Vec<u8>) {
        let name: String = name.into();
        let name = name.trim_start_matches('/').to_string();
        match self.parts.iter_mut().find(|p| p.name == name) {
            Some(part) => part.data = data,
            None => self.parts.push(Part { name, data }),
        }
    }

    /// Pick an unused part name `<prefix><n><suffix>` with the smallest `n >= 1`.
    pub fn next_part_name(&self, prefix: &str, suffix: &str) -> String {
        (1..)
            .map(|n| format!("{}{}{}", prefix, n, suffix))
            .find(|name| !self.contains(name))
            .unwrap_or_else(|| format!("{}{}", prefix, suffix))
    }
}

/// Relationships part that belongs to a source part.
///
/// `word/document.xml` → `word/_rels/document.xml.rels`.
pub fn rels_part_for(part: &str) -> String {
    match part.rsplit_once('/') {
        Some((dir, file)) => format!("{}/_rels/{}.rels", dir, file),
        None => format!("_rels/{}.rels", part),
    }
}

/// Resolve a relationship target against the part that owns the relationship.
pub fn resolve_target(source_part: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }
    let mut segments: Vec<&str> = match source_part.rsplit_once('/') {
        Some((dir, _)) => dir.split('/').collect(),
        None => Vec::new(),
    };
    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}

/// Express `part` relative to the directory of `source_part`, for use as a target.
pub fn relative_target(source_part: &str, part: &str) -> String {
    match source_part.rsplit_once('/') {
        Some((dir, _)) => part
            .strip_prefix(dir)
            .and_then(|rest| rest.strip_prefix('/'))
            .map(str::to_string)
            .unwrap_or_else(|| format!("/{}", part)),
        None => part.to_string(),
    }
}
