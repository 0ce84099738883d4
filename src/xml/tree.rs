//! Owned element tree with quick-xml parsing and string serialization.

use crate::error::{Error, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::{escape, XML_DECLARATION};

/// A node inside an element.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Child element
    Element(Element),
    /// Unescaped character data
    Text(String),
    /// CDATA section content
    CData(String),
    /// Comment content (without delimiters)
    Comment(String),
    /// Processing instruction content (without delimiters)
    ProcessingInstruction(String),
}

impl Node {
    /// Borrow the element if this node is one.
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Mutably borrow the element if this node is one.
    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }
}

/// An XML element with its qualified name, attributes and children.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    /// Qualified name as written in the source (e.g. `w:p`)
    pub name: String,

    /// Attributes in source order, values unescaped
    pub attrs: Vec<(String, String)>,

    /// Child nodes in source order
    pub children: Vec<Node>,
}

impl Element {
    /// Create an element without attributes or children.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder: add an attribute.
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(key, value);
        self
    }

    /// Builder: add a child element.
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    /// Builder: add a text node.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    fn from_start(start: &BytesStart<'_>) -> Result<Self> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let mut attrs = Vec::new();
        for attr in start.attributes() {
            let attr = attr?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr.unescape_value()?.into_owned();
            attrs.push((key, value));
        }
        Ok(Self {
            name,
            attrs,
            children: Vec::new(),
        })
    }

    /// Local part of the qualified name.
    pub fn local_name(&self) -> &str {
        self.name
            .rsplit_once(':')
            .map(|(_, local)| local)
            .unwrap_or(&self.name)
    }

    /// Get an attribute value.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, replacing any previous value in place.
    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.attrs.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((key, value)),
        }
    }

    /// Remove an attribute, returning its value.
    pub fn remove_attr(&mut self, key: &str) -> Option<String> {
        let pos = self.attrs.iter().position(|(k, _)| k == key)?;
        Some(self.attrs.remove(pos).1)
    }

    /// Iterate over child elements.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// Iterate mutably over child elements.
    pub fn elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(Node::as_element_mut)
    }

    /// First child element with the given qualified name.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.elements().find(|el| el.name == name)
    }

    /// First child element with the given qualified name, mutably.
    pub fn child_mut(&mut self, name: &str) -> Option<&mut Element> {
        self.elements_mut().find(|el| el.name == name)
    }

    /// Child elements with the given qualified name.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.elements().filter(move |el| el.name == name)
    }

    /// Append a child element.
    pub fn push(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    /// Append a text node.
    pub fn push_text(&mut self, text: impl Into<String>) {
        self.children.push(Node::Text(text.into()));
    }

    /// Keep only the child nodes matching the predicate.
    pub fn retain(&mut self, f: impl FnMut(&Node) -> bool) {
        self.children.retain(f);
    }

    /// Concatenated direct text content.
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|node| match node {
                Node::Text(t) | Node::CData(t) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }

    fn element_at_mut(&mut self, idx: usize) -> &mut Element {
        match &mut self.children[idx] {
            Node::Element(el) => el,
            _ => unreachable!("node {idx} is not an element"),
        }
    }

    /// Insert a child element respecting a schema sequence.
    ///
    /// `order` lists qualified names in the order the schema requires. The
    /// child lands before the first existing sibling that must follow it;
    /// names absent from `order` are appended.
    pub fn insert_ordered(&mut self, child: Element, order: &[&str]) -> &mut Element {
        let rank_of = |name: &str| order.iter().position(|n| *n == name);
        let idx = match rank_of(&child.name) {
            Some(rank) => self
                .children
                .iter()
                .position(|node| {
                    node.as_element()
                        .and_then(|el| rank_of(&el.name))
                        .is_some_and(|r| r > rank)
                })
                .unwrap_or(self.children.len()),
            None => self.children.len(),
        };
        self.children.insert(idx, Node::Element(child));
        self.element_at_mut(idx)
    }

    /// Get the named child, inserting an empty one in schema order if absent.
    pub fn get_or_insert_ordered(&mut self, name: &str, order: &[&str]) -> &mut Element {
        let existing = self
            .children
            .iter()
            .position(|node| matches!(node, Node::Element(el) if el.name == name));
        match existing {
            Some(idx) => self.element_at_mut(idx),
            None => self.insert_ordered(Element::new(name), order),
        }
    }

    /// Get the named child, inserting an empty one as the first child if absent.
    ///
    /// Property containers (`w:pPr`, `w:rPr`) must lead their parent.
    pub fn get_or_insert_first(&mut self, name: &str) -> &mut Element {
        let existing = self
            .children
            .iter()
            .position(|node| matches!(node, Node::Element(el) if el.name == name));
        match existing {
            Some(idx) => self.element_at_mut(idx),
            None => {
                self.children.insert(0, Node::Element(Element::new(name)));
                self.element_at_mut(0)
            }
        }
    }

    fn write_to(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for (key, value) in &self.attrs {
            out.push(' ');
            out.push_str(key);
            out.push_str("=\"");
            out.push_str(&escape(value));
            out.push('"');
        }
        if self.children.is_empty() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        for child in &self.children {
            match child {
                Node::Element(el) => el.write_to(out),
                Node::Text(text) => out.push_str(&escape(text)),
                Node::CData(text) => {
                    out.push_str("<![CDATA[");
                    out.push_str(text);
                    out.push_str("]]>");
                }
                Node::Comment(text) => {
                    out.push_str("<!--");
                    out.push_str(text);
                    out.push_str("-->");
                }
                Node::ProcessingInstruction(text) => {
                    out.push_str("<?");
                    out.push_str(text);
                    out.push_str("?>");
                }
            }
        }
        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }
}

/// A parsed XML part.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlDocument {
    /// Whether the source carried an XML declaration
    pub declaration: bool,

    /// Comments and processing instructions before the root element
    pub prolog: Vec<Node>,

    /// Root element
    pub root: Element,
}

impl XmlDocument {
    /// Create a document around a root element, with declaration.
    pub fn new(root: Element) -> Self {
        Self {
            declaration: true,
            prolog: Vec::new(),
            root,
        }
    }

    /// Parse part bytes (UTF-8, optional BOM).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
        let xml = std::str::from_utf8(bytes)
            .map_err(|e| Error::Xml(format!("part is not valid UTF-8: {}", e)))?;
        Self::parse(xml)
    }

    /// Parse an XML string.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        reader.trim_text(false);

        let mut declaration = false;
        let mut prolog = Vec::new();
        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            let event = reader.read_event().map_err(|e| {
                Error::Xml(format!("at byte {}: {}", reader.buffer_position(), e))
            })?;
            match event {
                Event::Decl(_) => declaration = true,
                Event::Start(start) => stack.push(Element::from_start(&start)?),
                Event::Empty(start) => {
                    let el = Element::from_start(&start)?;
                    attach(&mut stack, &mut root, &mut prolog, Node::Element(el))?;
                }
                Event::End(_) => {
                    let el = stack
                        .pop()
                        .ok_or_else(|| Error::Xml("unbalanced end tag".into()))?;
                    attach(&mut stack, &mut root, &mut prolog, Node::Element(el))?;
                }
                Event::Text(text) => {
                    if let Some(parent) = stack.last_mut() {
                        parent.children.push(Node::Text(text.unescape()?.into_owned()));
                    }
                }
                Event::CData(data) => {
                    if let Some(parent) = stack.last_mut() {
                        let text = String::from_utf8_lossy(&data.into_inner()).into_owned();
                        parent.children.push(Node::CData(text));
                    }
                }
                Event::Comment(comment) => {
                    let text = String::from_utf8_lossy(&comment.into_inner()).into_owned();
                    attach(&mut stack, &mut root, &mut prolog, Node::Comment(text))?;
                }
                Event::PI(pi) => {
                    let text = String::from_utf8_lossy(&pi.into_inner()).into_owned();
                    attach(
                        &mut stack,
                        &mut root,
                        &mut prolog,
                        Node::ProcessingInstruction(text),
                    )?;
                }
                Event::DocType(_) => {}
                Event::Eof => break,
            }
        }

        if let Some(open) = stack.last() {
            return Err(Error::Xml(format!("unclosed element <{}>", open.name)));
        }
        let root = root.ok_or_else(|| Error::Xml("document has no root element".into()))?;

        Ok(Self {
            declaration,
            prolog,
            root,
        })
    }

    /// Serialize to an XML string.
    pub fn to_xml(&self) -> String {
        let mut out = String::with_capacity(4096);
        if self.declaration {
            out.push_str(XML_DECLARATION);
            out.push_str("\r\n");
        }
        for node in &self.prolog {
            match node {
                Node::Comment(text) => {
                    out.push_str("<!--");
                    out.push_str(text);
                    out.push_str("-->");
                }
                Node::ProcessingInstruction(text) => {
                    out.push_str("<?");
                    out.push_str(text);
                    out.push_str("?>");
                }
                _ => {}
            }
        }
        self.root.write_to(&mut out);
        out
    }

    /// Serialize to UTF-8 bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.to_xml().into_bytes()
    }
}

fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    prolog: &mut Vec<Node>,
    node: Node,
) -> Result<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(node);
        return Ok(());
    }
    match node {
        Node::Element(el) => {
            if root.is_some() {
                return Err(Error::Xml(format!(
                    "unexpected second root element <{}>",
                    el.name
                )));
            }
            *root = Some(el);
        }
        Node::Text(_) | Node::CData(_) => {}
        other => {
            if root.is_none() {
                prolog.push(other);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body><w:p><w:r><w:t xml:space="preserve">A &amp; B </w:t></w:r></w:p><w:sectPr/></w:body></w:document>"#;

    #[test]
    fn test_parse_structure() {
        let doc = XmlDocument::parse(SAMPLE).unwrap();
        assert!(doc.declaration);
        assert_eq!(doc.root.name, "w:document");
        assert_eq!(doc.root.local_name(), "document");

        let body = doc.root.child("w:body").unwrap();
        assert_eq!(body.elements().count(), 2);
        let t = body
            .child("w:p")
            .and_then(|p| p.child("w:r"))
            .and_then(|r| r.child("w:t"))
            .unwrap();
        assert_eq!(t.text(), "A & B ");
        assert_eq!(t.attr("xml:space"), Some("preserve"));
    }

    #[test]
    fn test_serialize_escapes_and_reparses() {
        let doc = XmlDocument::parse(SAMPLE).unwrap();
        let xml = doc.to_xml();
        assert!(xml.starts_with(XML_DECLARATION));
        assert!(xml.contains("A &amp; B "));
        assert!(xml.contains("<w:sectPr/>"));

        let again = XmlDocument::parse(&xml).unwrap();
        assert_eq!(again.root, doc.root);
    }

    #[test]
    fn test_insert_ordered() {
        let order = ["w:rFonts", "w:b", "w:sz"];
        let mut rpr = Element::new("w:rPr").with_child(Element::new("w:sz"));
        rpr.insert_ordered(Element::new("w:rFonts"), &order);
        rpr.insert_ordered(Element::new("w:b"), &order);
        let names: Vec<_> = rpr.elements().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["w:rFonts", "w:b", "w:sz"]);
    }

    #[test]
    fn test_get_or_insert_reuses_existing() {
        let order = ["w:spacing", "w:ind", "w:jc"];
        let mut ppr = Element::new("w:pPr").with_child(Element::new("w:jc"));
        ppr.get_or_insert_ordered("w:spacing", &order)
            .set_attr("w:line", "240");
        ppr.get_or_insert_ordered("w:spacing", &order)
            .set_attr("w:lineRule", "auto");
        assert_eq!(ppr.children_named("w:spacing").count(), 1);
        assert_eq!(ppr.elements().next().unwrap().name, "w:spacing");
    }

    #[test]
    fn test_attr_roundtrip() {
        let mut el = Element::new("w:jc").with_attr("w:val", "left");
        el.set_attr("w:val", "both");
        assert_eq!(el.attr("w:val"), Some("both"));
        assert_eq!(el.attrs.len(), 1);
        assert_eq!(el.remove_attr("w:val").as_deref(), Some("both"));
        assert!(el.attr("w:val").is_none());
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            XmlDocument::parse("<a><b></a>"),
            Err(Error::Xml(_))
        ));
        assert!(matches!(XmlDocument::parse(""), Err(Error::Xml(_))));
        assert!(XmlDocument::from_bytes(&[0xFF, 0xFE, 0x00]).is_err());
    }

    #[test]
    fn test_bom_is_skipped() {
        let mut bytes = b"\xEF\xBB\xBF".to_vec();
        bytes.extend_from_slice(b"<root/>");
        let doc = XmlDocument::from_bytes(&bytes).unwrap();
        assert_eq!(doc.root.name, "root");
        assert!(!doc.declaration);
    }
}
