//! Paragraph and text-level types.

use super::run::{build_run, run_style, run_text, RunMut};
use super::units::{line_units, Twips};
use super::PPR_ORDER;
use crate::xml::{Element, Node};
use serde::{Deserialize, Serialize};

/// Read-only copy of a paragraph.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Paragraph {
    /// Text runs in the paragraph
    pub runs: Vec<TextRun>,

    /// Paragraph style
    pub style: ParagraphStyle,

    /// Whether the paragraph holds a `PAGE` field
    pub page_number_field: bool,
}

impl Paragraph {
    /// Create an empty paragraph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a paragraph with plain text.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            runs: vec![TextRun::new(text)],
            ..Self::default()
        }
    }

    pub(crate) fn from_element(el: &Element) -> Self {
        let mut runs = Vec::new();
        visit_runs(el, &mut |run| runs.push(TextRun::from_element(run)));
        Self {
            runs,
            style: ParagraphStyle::from_element(el),
            page_number_field: has_page_field(el),
        }
    }

    /// Get plain text content of the paragraph.
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }

    /// Check if the paragraph is empty.
    pub fn is_empty(&self) -> bool {
        self.plain_text().trim().is_empty()
    }
}

/// A run of text with consistent styling.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    /// The text content
    pub text: String,

    /// Text styling
    pub style: TextStyle,
}

impl TextRun {
    /// Create a new text run with default style.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: TextStyle::default(),
        }
    }

    /// Set font name (all script slots) and size in points.
    pub fn with_font(mut self, name: impl Into<String>, size: f32) -> Self {
        let name = name.into();
        self.style.east_asia_font = Some(name.clone());
        self.style.complex_font = Some(name.clone());
        self.style.font_name = Some(name);
        self.style.font_size = Some(size);
        self.style.complex_font_size = Some(size);
        self
    }

    pub(crate) fn from_element(el: &Element) -> Self {
        Self {
            text: run_text(el),
            style: run_style(el),
        }
    }

    /// Check if this run is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Text styling properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    /// Bold text
    pub bold: bool,

    /// Bold complex-script text
    pub bold_complex: bool,

    /// Italic text
    pub italic: bool,

    /// Underlined text
    pub underline: bool,

    /// Default (ASCII) font name
    pub font_name: Option<String>,

    /// East-Asian font slot
    pub east_asia_font: Option<String>,

    /// Complex-script font slot (Devanagari and other scripts)
    pub complex_font: Option<String>,

    /// Font size in points
    pub font_size: Option<f32>,

    /// Complex-script font size in points
    pub complex_font_size: Option<f32>,
}

/// Paragraph styling properties.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParagraphStyle {
    /// Referenced paragraph style ID
    pub style_id: Option<String>,

    /// Explicit alignment, if set
    pub alignment: Option<Alignment>,

    /// Line spacing multiplier (1.0 = single, 2.0 = double)
    pub line_spacing: Option<f32>,

    /// Left indent
    pub left_indent: Option<Twips>,
}

impl ParagraphStyle {
    fn from_element(el: &Element) -> Self {
        let Some(ppr) = el.child("w:pPr") else {
            return Self::default();
        };
        let line_spacing = ppr.child("w:spacing").and_then(|spacing| {
            let rule = spacing.attr("w:lineRule").unwrap_or("auto");
            if rule != "auto" {
                return None;
            }
            spacing
                .attr("w:line")
                .and_then(|v| v.parse::<f32>().ok())
                .map(|line| line / 240.0)
        });
        let left_indent = ppr.child("w:ind").and_then(|ind| {
            ind.attr("w:left")
                .or_else(|| ind.attr("w:start"))
                .and_then(Twips::parse)
        });
        Self {
            style_id: ppr
                .child("w:pStyle")
                .and_then(|s| s.attr("w:val"))
                .map(str::to_string),
            alignment: ppr
                .child("w:jc")
                .and_then(|jc| jc.attr("w:val"))
                .and_then(Alignment::from_ooxml),
            line_spacing,
            left_indent,
        }
    }
}

/// Text alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Left alignment (default)
    #[default]
    Left,
    /// Center alignment
    Center,
    /// Right alignment
    Right,
    /// Justified alignment
    Justify,
}

impl Alignment {
    /// Value written to `w:jc/@w:val`.
    pub fn as_ooxml(self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
            Alignment::Justify => "both",
        }
    }

    /// Parse a `w:jc/@w:val` value.
    pub fn from_ooxml(value: &str) -> Option<Self> {
        match value {
            "left" | "start" => Some(Alignment::Left),
            "center" => Some(Alignment::Center),
            "right" | "end" => Some(Alignment::Right),
            "both" | "distribute" => Some(Alignment::Justify),
            _ => None,
        }
    }
}

/// Mutable view over one `w:p` element.
pub struct ParagraphMut<'a> {
    el: &'a mut Element,
}

impl<'a> ParagraphMut<'a> {
    pub(crate) fn new(el: &'a mut Element) -> Self {
        Self { el }
    }

    /// Text of all runs, including runs inside hyperlinks, insertions and content controls.
    pub fn text(&self) -> String {
        let mut text = String::new();
        visit_runs(self.el, &mut |run| text.push_str(&run_text(run)));
        text
    }

    /// Number of runs.
    pub fn run_count(&self) -> usize {
        let mut count = 0;
        visit_runs(self.el, &mut |_| count += 1);
        count
    }

    /// Mutable views over every run in document order.
    pub fn runs_mut(&mut self) -> Vec<RunMut<'_>> {
        let mut runs = Vec::new();
        collect_runs_mut(self.el, &mut runs);
        runs
    }

    /// Set the line-spacing multiplier.
    pub fn set_line_spacing(&mut self, multiplier: f32) {
        let spacing = self.ppr().get_or_insert_ordered("w:spacing", PPR_ORDER);
        spacing.set_attr("w:line", line_units(multiplier).to_string());
        spacing.set_attr("w:lineRule", "auto");
    }

    /// Set the left indent.
    pub fn set_left_indent(&mut self, indent: Twips) {
        let ind = self.ppr().get_or_insert_ordered("w:ind", PPR_ORDER);
        ind.set_attr("w:left", indent.to_string());
        if ind.attr("w:start").is_some() {
            ind.set_attr("w:start", indent.to_string());
        }
    }

    /// Set the paragraph alignment.
    pub fn set_alignment(&mut self, alignment: Alignment) {
        self.ppr()
            .get_or_insert_ordered("w:jc", PPR_ORDER)
            .set_attr("w:val", alignment.as_ooxml());
    }

    /// Explicit paragraph alignment, if any.
    pub fn alignment(&self) -> Option<Alignment> {
        ParagraphStyle::from_element(self.el).alignment
    }

    /// Replace the paragraph content with a new ordered run list.
    ///
    /// Everything except the paragraph properties is removed: runs,
    /// hyperlinks, bookmarks and fields alike.
    pub fn replace_runs(&mut self, runs: &[TextRun]) {
        self.el
            .retain(|node| matches!(node, Node::Element(el) if el.name == "w:pPr"));
        for run in runs {
            self.el.push(build_run(run));
        }
    }

    /// Replace the paragraph content with a single unformatted run.
    pub fn set_text(&mut self, text: &str) {
        self.replace_runs(&[TextRun::new(text)]);
    }

    /// Append a run.
    pub fn append_run(&mut self, run: &TextRun) {
        self.el.push(build_run(run));
    }

    /// Append a live `PAGE` field, recomputed by the viewing application.
    pub fn append_page_number_field(&mut self) {
        let fld_char = |kind: &str| {
            Element::new("w:r")
                .with_child(Element::new("w:fldChar").with_attr("w:fldCharType", kind))
        };
        self.el.push(fld_char("begin"));
        self.el.push(
            Element::new("w:r").with_child(
                Element::new("w:instrText")
                    .with_attr("xml:space", "preserve")
                    .with_text(" PAGE "),
            ),
        );
        self.el.push(fld_char("separate"));
        self.el.push(build_run(&TextRun::new("1")));
        self.el.push(fld_char("end"));
    }

    /// Whether the paragraph holds a `PAGE` field.
    pub fn has_page_number_field(&self) -> bool {
        has_page_field(self.el)
    }

    /// Read-only copy of the paragraph.
    pub fn snapshot(&self) -> Paragraph {
        Paragraph::from_element(self.el)
    }

    fn ppr(&mut self) -> &mut Element {
        self.el.get_or_insert_first("w:pPr")
    }
}

/// Elements whose `w:r` children are part of the paragraph's visible text.
///
/// `w:del` and `w:moveFrom` are left out: their runs hold removed text.
fn is_run_container(name: &str) -> bool {
    matches!(
        name,
        "w:hyperlink"
            | "w:smartTag"
            | "w:ins"
            | "w:moveTo"
            | "w:sdt"
            | "w:sdtContent"
            | "w:fldSimple"
            | "w:customXml"
            | "w:dir"
            | "w:bdo"
    )
}

fn visit_runs<'a>(el: &'a Element, f: &mut dyn FnMut(&'a Element)) {
    for child in el.elements() {
        if child.name == "w:r" {
            f(child);
        } else if is_run_container(&child.name) {
            visit_runs(child, f);
        }
    }
}

fn collect_runs_mut<'a>(el: &'a mut Element, out: &mut Vec<RunMut<'a>>) {
    for child in el.elements_mut() {
        if child.name == "w:r" {
            out.push(RunMut::new(child));
        } else if is_run_container(&child.name) {
            collect_runs_mut(child, out);
        }
    }
}

fn has_page_field(el: &Element) -> bool {
    let is_page = |instr: &str| {
        instr
            .split_whitespace()
            .next()
            .is_some_and(|word| word.eq_ignore_ascii_case("PAGE"))
    };
    el.elements().any(|child| match child.name.as_str() {
        "w:fldSimple" => child.attr("w:instr").is_some_and(is_page),
        "w:r" => child
            .children_named("w:instrText")
            .any(|instr| is_page(&instr.text())),
        _ => is_run_container(&child.name) && has_page_field(child),
    })
}
