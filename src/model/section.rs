//! Document sections (`w:sectPr`).

use super::header_footer::{HeaderFooter, HeaderFooterKind};
use super::units::Twips;
use super::SECTPR_ORDER;
use crate::xml::Element;
use serde::{Deserialize, Serialize};

/// Header and footer distance written when a `w:pgMar` has to be created.
const DEFAULT_HEADER_DISTANCE: Twips = Twips(720);

/// Page margins of a section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Margins {
    /// Top margin
    pub top: Twips,
    /// Right margin
    pub right: Twips,
    /// Bottom margin
    pub bottom: Twips,
    /// Left margin
    pub left: Twips,
    /// Distance from the page edge to the header
    pub header: Twips,
    /// Distance from the page edge to the footer
    pub footer: Twips,
    /// Binding gutter
    pub gutter: Twips,
}

impl Margins {
    /// Same margin on all four sides, with Word's default header/footer distances.
    pub fn uniform(margin: Twips) -> Self {
        Self {
            top: margin,
            right: margin,
            bottom: margin,
            left: margin,
            header: DEFAULT_HEADER_DISTANCE,
            footer: DEFAULT_HEADER_DISTANCE,
            gutter: Twips(0),
        }
    }

    fn from_element(pg_mar: &Element) -> Self {
        let get = |key: &str| pg_mar.attr(key).and_then(Twips::parse).unwrap_or_default();
        Self {
            top: get("w:top"),
            right: get("w:right"),
            bottom: get("w:bottom"),
            left: get("w:left"),
            header: get("w:header"),
            footer: get("w:footer"),
            gutter: get("w:gutter"),
        }
    }
}

/// Read-only copy of a section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    /// Zero-based index in document order
    pub index: usize,

    /// Page margins, if the section declares them
    pub margins: Option<Margins>,

    /// Default header in effect for this section
    pub header: Option<HeaderFooter>,

    /// Default footer in effect for this section
    pub footer: Option<HeaderFooter>,
}

impl Section {
    pub(crate) fn from_element(index: usize, sect_pr: &Element) -> Self {
        Self {
            index,
            margins: sect_pr.child("w:pgMar").map(Margins::from_element),
            header: None,
            footer: None,
        }
    }
}

/// Mutable view over one `w:sectPr` element.
pub struct SectionMut<'a> {
    index: usize,
    el: &'a mut Element,
}

impl<'a> SectionMut<'a> {
    pub(crate) fn new(index: usize, el: &'a mut Element) -> Self {
        Self { index, el }
    }

    /// Zero-based index in document order.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Current page margins, if declared.
    pub fn margins(&self) -> Option<Margins> {
        self.el.child("w:pgMar").map(Margins::from_element)
    }

    /// Set the four page margins, leaving header/footer distances and gutter as they are.
    ///
    /// A missing `w:pgMar` is created with header/footer distance 720 and gutter 0.
    pub fn set_page_margins(&mut self, top: Twips, right: Twips, bottom: Twips, left: Twips) {
        let created = self.el.child("w:pgMar").is_none();
        let pg_mar = self.el.get_or_insert_ordered("w:pgMar", SECTPR_ORDER);
        pg_mar.set_attr("w:top", top.to_string());
        pg_mar.set_attr("w:right", right.to_string());
        pg_mar.set_attr("w:bottom", bottom.to_string());
        pg_mar.set_attr("w:left", left.to_string());
        if created {
            pg_mar.set_attr("w:header", DEFAULT_HEADER_DISTANCE.to_string());
            pg_mar.set_attr("w:footer", DEFAULT_HEADER_DISTANCE.to_string());
            pg_mar.set_attr("w:gutter", "0");
        }
    }

    /// Set all four page margins to the same value.
    pub fn set_uniform_margin(&mut self, margin: Twips) {
        self.set_page_margins(margin, margin, margin, margin);
    }

    /// Relationship ID of this section's own default header or footer.
    pub fn reference_id(&self, kind: HeaderFooterKind) -> Option<String> {
        reference_id(self.el, kind)
    }

    pub(crate) fn add_reference(&mut self, kind: HeaderFooterKind, rel_id: &str) {
        self.el.insert_ordered(
            Element::new(kind.reference_tag())
                .with_attr("w:type", "default")
                .with_attr("r:id", rel_id),
            SECTPR_ORDER,
        );
    }
}

/// Relationship ID of a section's default header or footer reference.
pub(crate) fn reference_id(sect_pr: &Element, kind: HeaderFooterKind) -> Option<String> {
    sect_pr
        .children_named(kind.reference_tag())
        .find(|el| el.attr("w:type").unwrap_or("default") == "default")
        .and_then(|el| el.attr("r:id"))
        .map(str::to_string)
}

/// Section properties in document order: paragraph-level ones, then the body's own.
pub(crate) fn collect_sect_prs(body: &Element) -> Vec<&Element> {
    let mut out = Vec::new();
    for el in body.elements() {
        if el.name == "w:sectPr" {
            out.push(el);
        } else if el.name == "w:p" {
            if let Some(sect_pr) = el.child("w:pPr").and_then(|ppr| ppr.child("w:sectPr")) {
                out.push(sect_pr);
            }
        }
    }
    out
}

/// Mutable counterpart of [`collect_sect_prs`].
pub(crate) fn collect_sect_prs_mut(body: &mut Element) -> Vec<&mut Element> {
    let mut out = Vec::new();
    for el in body.elements_mut() {
        if el.name == "w:sectPr" {
            out.push(el);
        } else if el.name == "w:p" {
            if let Some(sect_pr) = el
                .child_mut("w:pPr")
                .and_then(|ppr| ppr.child_mut("w:sectPr"))
            {
                out.push(sect_pr);
            }
        }
    }
    out
}
