//! Relationship parts (`*.rels`).

use crate::error::Result;
use crate::xml::{Element, XmlDocument};

const NS_RELATIONSHIPS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

/// One `<Relationship>` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    /// Relationship ID (e.g. `rId7`)
    pub id: String,
    /// Relationship type URI
    pub rel_type: String,
    /// Target as written (relative to the source part unless external)
    pub target: String,
    /// Whether the target lives outside the package
    pub external: bool,
}

/// A parsed relationships part.
#[derive(Debug, Clone)]
pub struct Relationships {
    xml: XmlDocument,
}

impl Relationships {
    /// Create an empty relationships part.
    pub fn new() -> Self {
        Self {
            xml: XmlDocument::new(
                Element::new("Relationships").with_attr("xmlns", NS_RELATIONSHIPS),
            ),
        }
    }

    /// Parse a relationships part.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Ok(Self {
            xml: XmlDocument::from_bytes(data)?,
        })
    }

    /// All relationships in part order.
    pub fn iter(&self) -> impl Iterator<Item = Relationship> + '_ {
        self.xml
            .root
            .elements()
            .filter(|el| el.local_name() == "Relationship")
            .map(|el| Relationship {
                id: el.attr("Id").unwrap_or_default().to_string(),
                rel_type: el.attr("Type").unwrap_or_default().to_string(),
                target: el.attr("Target").unwrap_or_default().to_string(),
                external: el.attr("TargetMode") == Some("External"),
            })
    }

    /// Look up a relationship by ID.
    pub fn get(&self, id: &str) -> Option<Relationship> {
        self.iter().find(|rel| rel.id == id)
    }

    /// First relationship of the given type.
    pub fn first_of_type(&self, rel_type: &str) -> Option<Relationship> {
        self.iter().find(|rel| rel.rel_type == rel_type)
    }

    /// Number of relationships.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Check if there are no relationships.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Add an internal relationship and return its new ID.
    pub fn add(&mut self, rel_type: &str, target: &str) -> String {
        let id = self.next_id();
        self.xml.root.push(
            Element::new("Relationship")
                .with_attr("Id", id.as_str())
                .with_attr("Type", rel_type)
                .with_attr("Target", target),
        );
        id
    }

    fn next_id(&self) -> String {
        let max = self
            .iter()
            .filter_map(|rel| rel.id.strip_prefix("rId")?.parse::<u32>().ok())
            .max()
            .unwrap_or(0);
        (max + 1..)
            .map(|n| format!("rId{}", n))
            .find(|id| self.get(id).is_none())
            .unwrap_or_else(|| format!("rId{}", max + 1))
    }

    /// Serialize back to part bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.xml.to_bytes()
    }
}

impl Default for Relationships {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package::REL_HEADER;

    const RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/><Relationship Id="rId8" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/header" Target="header1.xml"/><Relationship Id="rId9" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink" Target="https://example.com" TargetMode="External"/></Relationships>"#;

    #[test]
    fn test_parse_and_lookup() {
        let rels = Relationships::from_bytes(RELS.as_bytes()).unwrap();
        assert_eq!(rels.len(), 3);
        let header = rels.get("rId8").unwrap();
        assert_eq!(header.rel_type, REL_HEADER);
        assert_eq!(header.target, "header1.xml");
        assert!(!header.external);
        assert!(rels.get("rId9").unwrap().external);
        assert_eq!(rels.first_of_type(REL_HEADER).unwrap().id, "rId8");
    }

    #[test]
    fn test_add_uses_next_free_id() {
        let mut rels = Relationships::from_bytes(RELS.as_bytes()).unwrap();
        let id = rels.add(REL_HEADER, "header2.xml");
        assert_eq!(id, "rId10");
        let reparsed = Relationships::from_bytes(&rels.to_bytes()).unwrap();
        assert_eq!(reparsed.get("rId10").unwrap().target, "header2.xml");
    }

    #[test]
    fn test_empty_relationships() {
        let mut rels = Relationships::new();
        assert!(rels.is_empty());
        assert_eq!(rels.add(REL_HEADER, "header1.xml"), "rId1");
    }
}
