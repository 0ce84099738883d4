//! The `[Content_Types].xml` index.

use crate::error::Result;
use crate::xml::{Element, XmlDocument};

/// Content type of the main document part of a `.docx`.
pub const CT_DOCUMENT_MAIN: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";

/// Content type of the main document part of a macro-enabled `.docm`.
pub const CT_DOCUMENT_MACRO: &str = "application/vnd.ms-word.document.macroEnabled.main+xml";

/// Content type of the main document part of a `.dotx` template.
pub const CT_TEMPLATE_MAIN: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.template.main+xml";

/// Content type of a header part.
pub const CT_HEADER: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.header+xml";

/// Content type of a footer part.
pub const CT_FOOTER: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.footer+xml";

/// Parsed content-type index.
#[derive(Debug, Clone)]
pub struct ContentTypes {
    xml: XmlDocument,
}

impl ContentTypes {
    /// Parse the index.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Ok(Self {
            xml: XmlDocument::from_bytes(data)?,
        })
    }

    /// Content type of a part, by override first, then by extension default.
    pub fn content_type(&self, part: &str) -> Option<&str> {
        let part_name = format!("/{}", part.trim_start_matches('/'));
        let by_override = self
            .xml
            .root
            .elements()
            .filter(|el| el.local_name() == "Override")
            .find(|el| {
                el.attr("PartName")
                    .is_some_and(|p| p.eq_ignore_ascii_case(&part_name))
            })
            .and_then(|el| el.attr("ContentType"));
        if by_override.is_some() {
            return by_override;
        }
        let ext = part.rsplit_once('.').map(|(_, ext)| ext)?;
        self.xml
            .root
            .elements()
            .filter(|el| el.local_name() == "Default")
            .find(|el| {
                el.attr("Extension")
                    .is_some_and(|e| e.eq_ignore_ascii_case(ext))
            })
            .and_then(|el| el.attr("ContentType"))
    }

    /// Check if a content type names a word-processing main document.
    pub fn is_word_main(content_type: &str) -> bool {
        matches!(
            content_type,
            CT_DOCUMENT_MAIN | CT_DOCUMENT_MACRO | CT_TEMPLATE_MAIN
        ) || content_type.starts_with("application/vnd.ms-word.template.macroEnabled")
    }

    /// Register (or replace) an override for a part.
    pub fn set_override(&mut self, part: &str, content_type: &str) {
        let part_name = format!("/{}", part.trim_start_matches('/'));
        let existing = self
            .xml
            .root
            .elements_mut()
            .filter(|el| el.local_name() == "Override")
            .find(|el| el.attr("PartName") == Some(part_name.as_str()));
        match existing {
            Some(el) => el.set_attr("ContentType", content_type),
            None => self.xml.root.push(
                Element::new("Override")
                    .with_attr("PartName", part_name)
                    .with_attr("ContentType", content_type),
            ),
        }
    }

    /// Serialize back to part bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.xml.to_bytes()
    }
}
