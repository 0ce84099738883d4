//! Header and footer parts.

use super::paragraph::{Paragraph, ParagraphMut};
use crate::package::{CT_FOOTER, CT_HEADER, REL_FOOTER, REL_HEADER};
use crate::xml::{Element, XmlDocument};
use serde::{Deserialize, Serialize};

const NS_W: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
pub(crate) const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Which of the two page-margin stories a part holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderFooterKind {
    /// Page header (`w:hdr`)
    Header,
    /// Page footer (`w:ftr`)
    Footer,
}

impl HeaderFooterKind {
    /// Reference element inside `w:sectPr`.
    pub fn reference_tag(self) -> &'static str {
        match self {
            HeaderFooterKind::Header => "w:headerReference",
            HeaderFooterKind::Footer => "w:footerReference",
        }
    }

    /// Relationship type from the main part.
    pub fn rel_type(self) -> &'static str {
        match self {
            HeaderFooterKind::Header => REL_HEADER,
            HeaderFooterKind::Footer => REL_FOOTER,
        }
    }

    /// Content type of the part.
    pub fn content_type(self) -> &'static str {
        match self {
            HeaderFooterKind::Header => CT_HEADER,
            HeaderFooterKind::Footer => CT_FOOTER,
        }
    }

    /// File stem used when naming a new part (`header` → `header1.xml`).
    pub fn part_stem(self) -> &'static str {
        match self {
            HeaderFooterKind::Header => "header",
            HeaderFooterKind::Footer => "footer",
        }
    }

    fn root_tag(self) -> &'static str {
        match self {
            HeaderFooterKind::Header => "w:hdr",
            HeaderFooterKind::Footer => "w:ftr",
        }
    }

    /// A fresh part holding one empty paragraph.
    pub(crate) fn empty_part(self) -> XmlDocument {
        XmlDocument::new(
            Element::new(self.root_tag())
                .with_attr("xmlns:w", NS_W)
                .with_attr("xmlns:r", NS_R)
                .with_child(Element::new("w:p")),
        )
    }
}

impl std::fmt::Display for HeaderFooterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.part_stem())
    }
}

/// Read-only copy of a header or footer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeaderFooter {
    /// Header or footer
    pub kind: HeaderFooterKind,

    /// Part name inside the package
    pub part: String,

    /// Whether the part is inherited from an earlier section
    pub linked_to_previous: bool,

    /// Paragraphs of the part
    pub paragraphs: Vec<Paragraph>,
}

impl HeaderFooter {
    pub(crate) fn from_root(
        kind: HeaderFooterKind,
        part: impl Into<String>,
        linked_to_previous: bool,
        root: &Element,
    ) -> Self {
        Self {
            kind,
            part: part.into(),
            linked_to_previous,
            paragraphs: root
                .children_named("w:p")
                .map(Paragraph::from_element)
                .collect(),
        }
    }

    /// Text of all paragraphs, one per line.
    pub fn text(&self) -> String {
        self.paragraphs
            .iter()
            .map(Paragraph::plain_text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Whether any paragraph holds a `PAGE` field.
    pub fn has_page_number_field(&self) -> bool {
        self.paragraphs.iter().any(|p| p.page_number_field)
    }
}

/// Mutable view over a header or footer part.
pub struct HeaderFooterMut<'a> {
    kind: HeaderFooterKind,
    part: String,
    root: &'a mut Element,
}

impl<'a> HeaderFooterMut<'a> {
    pub(crate) fn new(kind: HeaderFooterKind, part: impl Into<String>, root: &'a mut Element) -> Self {
        Self {
            kind,
            part: part.into(),
            root,
        }
    }

    /// Header or footer.
    pub fn kind(&self) -> HeaderFooterKind {
        self.kind
    }

    /// Part name inside the package.
    pub fn part_name(&self) -> &str {
        &self.part
    }

    /// Number of top-level paragraphs.
    pub fn paragraph_count(&self) -> usize {
        self.root.children_named("w:p").count()
    }

    /// The first paragraph, created if the part has none.
    pub fn first_paragraph_mut(&mut self) -> ParagraphMut<'_> {
        ParagraphMut::new(self.root.get_or_insert_ordered("w:p", &[]))
    }

    /// All top-level paragraphs.
    pub fn paragraphs_mut(&mut self) -> Vec<ParagraphMut<'_>> {
        self.root
            .elements_mut()
            .filter(|el| el.name == "w:p")
            .map(ParagraphMut::new)
            .collect()
    }

    /// Text of all paragraphs, one per line.
    pub fn text(&self) -> String {
        HeaderFooter::from_root(self.kind, self.part.as_str(), false, self.root).text()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TextRun;

    #[test]
    fn test_empty_part_has_namespaces_and_paragraph() {
        let part = HeaderFooterKind::Footer.empty_part();
        assert_eq!(part.root.name, "w:ftr");
        assert_eq!(part.root.attr("xmlns:r"), Some(NS_R));
        assert_eq!(part.root.children_named("w:p").count(), 1);
    }

    #[test]
    fn test_first_paragraph_created_on_demand() {
        let mut root = Element::new("w:hdr").with_child(Element::new("w:tbl"));
        let mut header = HeaderFooterMut::new(HeaderFooterKind::Header, "word/header1.xml", &mut root);
        assert_eq!(header.paragraph_count(), 0);
        header.first_paragraph_mut().set_text("School | Exam");
        header.first_paragraph_mut().append_run(&TextRun::new("!"));
        assert_eq!(header.paragraph_count(), 1);
        assert_eq!(header.text(), "School | Exam!");
    }

    #[test]
    fn test_kind_metadata() {
        assert_eq!(HeaderFooterKind::Header.rel_type(), REL_HEADER);
        assert_eq!(HeaderFooterKind::Footer.content_type(), CT_FOOTER);
        assert_eq!(HeaderFooterKind::Footer.to_string(), "footer");
    }
}
