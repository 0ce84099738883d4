//! The reformatting pass.
//!
//! [`reformat`] applies one [`Settings`] value to a [`Document`] in place:
//! page margins, header and footer text with a live page number, run fonts
//! and sizes, line spacing, optional indent, section-header bolding and
//! mark-annotation alignment.

mod heuristics;
mod settings;
mod stats;

pub use heuristics::{is_section_header, split_mark_annotation, MarkSplit, SECTION_KEYWORDS};
pub use settings::{
    MarkMode, Settings, FONT_SIZE_RANGE, LINE_SPACINGS, MARGIN_RANGE, STANDARD_FONTS,
};
pub use stats::FormatStats;

use crate::error::Result;
use crate::model::{Alignment, Document, ParagraphMut, TextRun, Twips};
use std::collections::BTreeSet;

/// Left indent applied by `auto_indent`, in inches.
pub const AUTO_INDENT_INCHES: f64 = 0.25;

/// Reformat a document in place.
///
/// Settings are validated first; nothing is changed when they are rejected.
///
/// # Example
///
/// ```no_run
/// use qpfmt::{format::reformat, Document, Settings};
///
/// let mut doc = Document::open("paper.docx").unwrap();
/// let stats = reformat(&mut doc, &Settings::default()).unwrap();
/// println!("{} mark annotations aligned", stats.mark_count);
/// doc.save("paper-formatted.docx").unwrap();
/// ```
pub fn reformat(doc: &mut Document, settings: &Settings) -> Result<FormatStats> {
    settings.validate()?;
    if !settings.is_standard_font() {
        log::warn!(
            "Font {:?} is not a standard font; it must be installed where the document is opened",
            settings.font
        );
    }

    let mut stats = FormatStats::new();
    doc.ensure_section();

    apply_margins(doc, settings, &mut stats);
    if settings.header_enabled {
        apply_header_footer(doc, settings, &mut stats)?;
    }
    for mut paragraph in doc.paragraphs_mut() {
        format_paragraph(&mut paragraph, settings, &mut stats);
    }

    log::debug!(
        "Formatted {} paragraphs ({} runs, {} section headers, {} marks)",
        stats.paragraph_count,
        stats.run_count,
        stats.section_header_count,
        stats.mark_count
    );
    Ok(stats)
}

fn apply_margins(doc: &mut Document, settings: &Settings, stats: &mut FormatStats) {
    let margin = Twips::from_inches(settings.margin);
    for mut section in doc.sections_mut() {
        section.set_uniform_margin(margin);
        stats.section_count += 1;
    }
    log::debug!("Set {} section margins to {} twips", stats.section_count, margin);
}

fn apply_header_footer(
    doc: &mut Document,
    settings: &Settings,
    stats: &mut FormatStats,
) -> Result<()> {
    let header_text = settings.header_text();
    let mut parts = BTreeSet::new();

    for index in 0..doc.section_count() {
        let mut header = doc.header_mut(index)?;
        header.first_paragraph_mut().set_text(&header_text);
        parts.insert(header.part_name().to_string());

        let mut footer = doc.footer_mut(index)?;
        let mut paragraph = footer.first_paragraph_mut();
        paragraph.replace_runs(&[TextRun::new(settings.footer_label.as_str())]);
        paragraph.append_page_number_field();
        paragraph.set_alignment(Alignment::Center);
        parts.insert(footer.part_name().to_string());
    }

    stats.header_footer_parts = parts.len() as u32;
    log::debug!("Rewrote {} header/footer parts", parts.len());
    Ok(())
}

fn format_paragraph(paragraph: &mut ParagraphMut<'_>, settings: &Settings, stats: &mut FormatStats) {
    stats.paragraph_count += 1;

    for mut run in paragraph.runs_mut() {
        if !run.has_text() {
            continue;
        }
        run.set_font(&settings.font);
        run.set_size(settings.size as f32);
        stats.run_count += 1;
    }
    paragraph.set_line_spacing(settings.spacing);

    if settings.auto_indent {
        paragraph.set_left_indent(Twips::from_inches(AUTO_INDENT_INCHES));
    }

    let text = paragraph.text();
    let section_header = settings.bold_sections && is_section_header(&text);
    if section_header {
        for mut run in paragraph.runs_mut() {
            run.set_bold(true);
        }
        stats.section_header_count += 1;
    }

    if section_header && settings.mark_mode == MarkMode::PreserveSectionHeaders {
        return;
    }
    if let Some(split) = split_mark_annotation(&text) {
        let size = settings.size as f32;
        paragraph.replace_runs(&[
            TextRun::new(format!("{} ", split.question)).with_font(settings.font.as_str(), size),
            TextRun::new(split.marks).with_font(settings.font.as_str(), size),
        ]);
        paragraph.set_alignment(Alignment::Justify);
        stats.mark_count += 1;
    }
}
