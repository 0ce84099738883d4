//! Error types for qpfmt library.

use std::io;
use thiserror::Error;

/// Result type alias for qpfmt operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while reformatting documents.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The bytes are not a ZIP-based document package.
    #[error("Unknown file format: not a valid DOCX package")]
    UnknownFormat,

    /// The package is a ZIP archive but has no word-processing main part.
    #[error("Not a word-processing document: {0}")]
    NotWordDocument(String),

    /// Error reading or writing the ZIP container.
    #[error("ZIP error: {0}")]
    Zip(String),

    /// Error parsing or writing part XML.
    #[error("XML error: {0}")]
    Xml(String),

    /// A part referenced by the package is missing.
    #[error("Missing package part: {0}")]
    MissingPart(String),

    /// Settings outside their allowed domain.
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    /// Section index is out of range.
    #[error("Section {0} is out of range (document has {1} sections)")]
    SectionOutOfRange(usize, usize),

    /// A batch was started without any documents.
    #[error("No documents to format")]
    EmptyBatch,

    /// Two batch inputs map to the same archive entry name.
    #[error("Duplicate document name in batch: {0}")]
    DuplicateEntry(String),

    /// A document inside a batch failed.
    #[error("Failed to format {name}: {source}")]
    Document {
        /// Entry name of the failing document
        name: String,
        /// Underlying error
        #[source]
        source: Box<Error>,
    },

    /// JSON (de)serialization error for settings or reports.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Wrap an error with the name of the batch entry it belongs to.
    pub fn in_document(self, name: impl Into<String>) -> Self {
        Error::Document {
            name: name.into(),
            source: Box::new(self),
        }
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(e) => Error::Io(e),
            zip::result::ZipError::InvalidArchive(_) => Error::UnknownFormat,
            _ => Error::Zip(err.to_string()),
        }
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::Xml(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::Xml(err.to_string())
    }
}
