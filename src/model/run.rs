//! Text runs (`w:r`).

use super::units::half_points;
use super::{TextRun, TextStyle, RPR_ORDER};
use crate::xml::Element;

const FONT_SLOTS: [&str; 4] = ["w:ascii", "w:hAnsi", "w:eastAsia", "w:cs"];
const THEME_FONT_SLOTS: [&str; 4] = ["w:asciiTheme", "w:hAnsiTheme", "w:eastAsiaTheme", "w:cstheme"];

/// Mutable view over one `w:r` element.
pub struct RunMut<'a> {
    el: &'a mut Element,
}

impl<'a> RunMut<'a> {
    pub(crate) fn new(el: &'a mut Element) -> Self {
        Self { el }
    }

    /// Text of the run; tabs and line breaks become `\t` and `\n`.
    pub fn text(&self) -> String {
        run_text(self.el)
    }

    /// Whether the run carries any text.
    ///
    /// Runs holding only drawings, field characters or bookmarks have none.
    pub fn has_text(&self) -> bool {
        !self.text().is_empty()
    }

    /// Set the font for the default, high-ANSI, East-Asian and complex-script slots.
    ///
    /// Theme font references are removed because Word resolves them ahead
    /// of explicit names.
    pub fn set_font(&mut self, name: &str) {
        let fonts = self.rpr().get_or_insert_ordered("w:rFonts", RPR_ORDER);
        for slot in FONT_SLOTS {
            fonts.set_attr(slot, name);
        }
        for slot in THEME_FONT_SLOTS {
            fonts.remove_attr(slot);
        }
    }

    /// Set the font size in points, including the complex-script size.
    pub fn set_size(&mut self, points: f32) {
        let value = half_points(points).to_string();
        let rpr = self.rpr();
        rpr.get_or_insert_ordered("w:sz", RPR_ORDER)
            .set_attr("w:val", value.as_str());
        rpr.get_or_insert_ordered("w:szCs", RPR_ORDER)
            .set_attr("w:val", value);
    }

    /// Turn bold on or off for both Latin and complex scripts.
    pub fn set_bold(&mut self, bold: bool) {
        let rpr = self.rpr();
        for tag in ["w:b", "w:bCs"] {
            let el = rpr.get_or_insert_ordered(tag, RPR_ORDER);
            if bold {
                el.remove_attr("w:val");
            } else {
                el.set_attr("w:val", "0");
            }
        }
    }

    /// Whether the run is bold.
    pub fn is_bold(&self) -> bool {
        run_style(self.el).bold
    }

    /// Read-only copy of the run's text and formatting.
    pub fn snapshot(&self) -> TextRun {
        TextRun::from_element(self.el)
    }

    fn rpr(&mut self) -> &mut Element {
        self.el.get_or_insert_first("w:rPr")
    }
}

/// Build a new `w:r` element from a run description.
pub(crate) fn build_run(run: &TextRun) -> Element {
    let mut el = Element::new("w:r");
    {
        let mut view = RunMut::new(&mut el);
        if let Some(font) = run.style.font_name.as_deref() {
            view.set_font(font);
        }
        if run.style.bold {
            view.set_bold(true);
        }
        if let Some(size) = run.style.font_size {
            view.set_size(size);
        }
    }
    if run.style.italic {
        el.get_or_insert_first("w:rPr")
            .insert_ordered(Element::new("w:i"), RPR_ORDER);
    }
    push_text_content(&mut el, &run.text);
    el
}

/// Append `text` to a run as `w:t`, `w:tab` and `w:br` children.
fn push_text_content(run: &mut Element, text: &str) {
    let mut buf = String::new();
    let flush = |buf: &mut String, run: &mut Element| {
        if buf.is_empty() {
            return;
        }
        let mut t = Element::new("w:t");
        if buf.starts_with(char::is_whitespace) || buf.ends_with(char::is_whitespace) {
            t.set_attr("xml:space", "preserve");
        }
        t.push_text(std::mem::take(buf));
        run.push(t);
    };
    for ch in text.chars() {
        match ch {
            '\t' => {
                flush(&mut buf, run);
                run.push(Element::new("w:tab"));
            }
            '\n' => {
                flush(&mut buf, run);
                run.push(Element::new("w:br"));
            }
            '\r' => {}
            other => buf.push(other),
        }
    }
    flush(&mut buf, run);
}

/// Concatenated text of a `w:r` element.
pub(crate) fn run_text(run: &Element) -> String {
    let mut text = String::new();
    for child in run.elements() {
        match child.name.as_str() {
            "w:t" => text.push_str(&child.text()),
            "w:tab" | "w:ptab" => text.push('\t'),
            "w:cr" => text.push('\n'),
            "w:br" => {
                if matches!(child.attr("w:type"), None | Some("textWrapping")) {
                    text.push('\n');
                }
            }
            "w:noBreakHyphen" => text.push('-'),
            _ => {}
        }
    }
    text
}

/// Read a run's formatting from its `w:rPr`.
pub(crate) fn run_style(run: &Element) -> TextStyle {
    let Some(rpr) = run.child("w:rPr") else {
        return TextStyle::default();
    };
    let toggle = |tag: &str| {
        rpr.child(tag)
            .is_some_and(|el| !matches!(el.attr("w:val"), Some("0" | "false" | "off")))
    };
    let fonts = rpr.child("w:rFonts");
    let font = |slot: &str| fonts.and_then(|f| f.attr(slot)).map(str::to_string);
    TextStyle {
        bold: toggle("w:b"),
        bold_complex: toggle("w:bCs"),
        italic: toggle("w:i"),
        underline: rpr
            .child("w:u")
            .is_some_and(|el| el.attr("w:val") != Some("none")),
        font_name: font("w:ascii"),
        east_asia_font: font("w:eastAsia"),
        complex_font: font("w:cs"),
        font_size: rpr
            .child("w:sz")
            .and_then(|el| el.attr("w:val"))
            .and_then(|v| v.parse::<f32>().ok())
            .map(|half| half / 2.0),
        complex_font_size: rpr
            .child("w:szCs")
            .and_then(|el| el.attr("w:val"))
            .and_then(|v| v.parse::<f32>().ok())
            .map(|half| half / 2.0),
    }
}
