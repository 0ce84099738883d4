//! Minimal XML element tree for package parts.
//!
//! Parts are parsed into an owned tree, mutated through the model views, and
//! written back. Namespace declarations are ordinary attributes and qualified
//! names are kept verbatim (`w:p`, `r:id`), which is all the reformatting pass
//! needs.

mod tree;

pub use tree::{Element, Node, XmlDocument};

/// The standard declaration written at the top of every part.
pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

/// Escape text for use in element content or attribute values.
pub fn escape(text: &str) -> std::borrow::Cow<'_, str> {
    quick_xml::escape::escape(text)
}
