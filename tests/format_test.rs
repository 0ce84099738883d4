//! Integration tests for the reformatting pass.

mod common;

use common::{read_part, sample_paper, DocxBuilder};
use qpfmt::{
    format_bytes, reformat, Alignment, Document, Error, HeaderFooterKind, MarkMode, Settings,
    Twips,
};

fn formatted(data: &[u8], settings: &Settings) -> Document {
    let (bytes, _) = format_bytes(data, settings).unwrap();
    Document::from_bytes(&bytes).unwrap()
}

#[test]
fn test_margins_applied_to_every_section() {
    let data = DocxBuilder::new()
        .paragraph("Section A")
        .raw(r#"<w:p><w:pPr><w:sectPr><w:pgMar w:top="100" w:right="100" w:bottom="100" w:left="100" w:header="500" w:footer="500" w:gutter="0"/></w:sectPr></w:pPr></w:p>"#)
        .paragraph("Section B")
        .raw(r#"<w:sectPr/>"#)
        .build();

    let doc = formatted(&data, &Settings::new().with_margin(1.5));
    let sections = doc.sections().unwrap();
    assert_eq!(sections.len(), 2);

    let first = sections[0].margins.unwrap();
    assert_eq!(first.top, Twips(2160));
    assert_eq!(first.left, Twips(2160));
    assert_eq!(first.header, Twips(500));

    let second = sections[1].margins.unwrap();
    assert_eq!(second.bottom, Twips(2160));
    assert_eq!(second.right, Twips(2160));
    assert_eq!(second.header, Twips(720));
    assert_eq!(second.footer, Twips(720));
    assert_eq!(second.gutter, Twips(0));
}

#[test]
fn test_document_without_section_gets_one() {
    let data = DocxBuilder::new().paragraph("Q1. Name two gases.").build();
    let doc = formatted(&data, &Settings::default());

    assert_eq!(doc.section_count(), 1);
    let sections = doc.sections().unwrap();
    assert_eq!(sections[0].margins.unwrap().top, Twips(1440));
}

#[test]
fn test_fonts_and_size_on_every_run() {
    let data = DocxBuilder::new()
        .raw(r#"<w:p><w:r><w:rPr><w:rFonts w:asciiTheme="minorHAnsi" w:hAnsiTheme="minorHAnsi"/><w:sz w:val="22"/></w:rPr><w:t>Q1. </w:t></w:r><w:r><w:t>प्रकाश संश्लेषण समझाइए।</w:t></w:r></w:p>"#)
        .raw(r#"<w:sectPr/>"#)
        .build();

    let settings = Settings::new().with_font("Mangal").with_size(16);
    let (bytes, stats) = format_bytes(&data, &settings).unwrap();
    assert_eq!(stats.run_count, 2);

    let doc = Document::from_bytes(&bytes).unwrap();
    for run in &doc.paragraphs()[0].runs {
        assert_eq!(run.style.font_name.as_deref(), Some("Mangal"));
        assert_eq!(run.style.east_asia_font.as_deref(), Some("Mangal"));
        assert_eq!(run.style.complex_font.as_deref(), Some("Mangal"));
        assert_eq!(run.style.font_size, Some(16.0));
        assert_eq!(run.style.complex_font_size, Some(16.0));
    }

    let xml = read_part(&bytes, "word/document.xml").unwrap();
    assert!(!xml.contains("asciiTheme"));
    assert!(xml.contains(r#"w:sz w:val="32""#));
}

#[test]
fn test_line_spacing_and_indent() {
    let settings = Settings::new().with_spacing(1.15).with_auto_indent(true);
    let (bytes, _) = format_bytes(&sample_paper(), &settings).unwrap();
    let doc = Document::from_bytes(&bytes).unwrap();

    for paragraph in doc.paragraphs() {
        assert_eq!(paragraph.style.left_indent, Some(Twips(360)));
        assert_eq!(paragraph.style.line_spacing, Some(1.15));
    }
    let xml = read_part(&bytes, "word/document.xml").unwrap();
    assert!(xml.contains(r#"w:line="276""#));
    assert!(xml.contains(r#"w:lineRule="auto""#));
}

#[test]
fn test_section_headers_bolded() {
    let doc = formatted(&sample_paper(), &Settings::default());
    let paragraphs = doc.paragraphs();

    assert!(paragraphs[0].runs.iter().all(|r| r.style.bold));
    assert!(paragraphs[1].runs.iter().all(|r| !r.style.bold));
    assert!(paragraphs[2].runs.iter().all(|r| !r.style.bold));
}

#[test]
fn test_bold_sections_disabled() {
    let doc = formatted(&sample_paper(), &Settings::new().with_bold_sections(false));
    assert!(doc.paragraphs()[0].runs.iter().all(|r| !r.style.bold));
}

#[test]
fn test_mark_annotation_split() {
    let (bytes, stats) = format_bytes(&sample_paper(), &Settings::default()).unwrap();
    let doc = Document::from_bytes(&bytes).unwrap();
    let question = &doc.paragraphs()[1];

    assert_eq!(question.runs.len(), 2);
    assert_eq!(question.runs[0].text, "Q1. What is 2+2? ");
    assert_eq!(question.runs[1].text, "(5 marks)");
    assert_eq!(question.style.alignment, Some(Alignment::Justify));
    assert!(question
        .runs
        .iter()
        .all(|r| r.style.font_name.as_deref() == Some("Times New Roman")
            && r.style.font_size == Some(12.0)));

    let plain = &doc.paragraphs()[2];
    assert_eq!(plain.style.alignment, None);

    // "Q1. ..." and "General Instructions (read carefully)"
    assert_eq!(stats.mark_count, 2);
}

#[test]
fn test_split_uses_last_parenthesis() {
    let data = DocxBuilder::new()
        .paragraph("Q4. Compare (a) mitosis and (b) meiosis. (3 + 2 marks)")
        .raw("<w:sectPr/>")
        .build();
    let doc = formatted(&data, &Settings::default());
    let runs = &doc.paragraphs()[0].runs;

    assert_eq!(runs[0].text, "Q4. Compare (a) mitosis and (b) meiosis. ");
    assert_eq!(runs[1].text, "(3 + 2 marks)");
}

#[test]
fn test_unclosed_parenthesis_not_split() {
    let data = DocxBuilder::new()
        .paragraph("Q5. Fill in the blank (use a pencil")
        .raw("<w:sectPr/>")
        .build();
    let (bytes, stats) = format_bytes(&data, &Settings::default()).unwrap();
    assert_eq!(stats.mark_count, 0);

    let doc = Document::from_bytes(&bytes).unwrap();
    assert_eq!(doc.paragraphs()[0].runs.len(), 1);
}

#[test]
fn test_compatible_mode_header_with_marks_loses_bold() {
    let doc = formatted(&sample_paper(), &Settings::default());
    let instructions = &doc.paragraphs()[3];

    assert_eq!(instructions.runs.len(), 2);
    assert_eq!(instructions.runs[1].text, "(read carefully)");
    assert!(instructions.runs.iter().all(|r| !r.style.bold));
}

#[test]
fn test_preserve_mode_header_with_marks_keeps_bold() {
    let settings = Settings::new().with_mark_mode(MarkMode::PreserveSectionHeaders);
    let doc = formatted(&sample_paper(), &settings);
    let instructions = &doc.paragraphs()[3];

    assert_eq!(instructions.runs.len(), 1);
    assert!(instructions.runs[0].style.bold);
    assert_eq!(instructions.style.alignment, None);

    // Ordinary questions are still split
    assert_eq!(doc.paragraphs()[1].runs.len(), 2);
}

#[test]
fn test_text_survives_formatting() {
    let original = Document::from_bytes(&sample_paper()).unwrap().plain_text();
    let settings = Settings::new().with_bold_sections(false);
    let doc = formatted(&sample_paper(), &settings);

    assert_eq!(doc.plain_text(), original);
}

#[test]
fn test_header_and_footer_created() {
    let settings = Settings::new()
        .with_school("KV No. 1")
        .with_exam("Unit Test 2");
    let (bytes, stats) = format_bytes(&sample_paper(), &settings).unwrap();
    assert_eq!(stats.header_footer_parts, 2);

    let doc = Document::from_bytes(&bytes).unwrap();
    let section = &doc.sections().unwrap()[0];
    let header = section.header.as_ref().unwrap();
    assert_eq!(header.text(), "KV No. 1 | Unit Test 2");
    assert!(!header.linked_to_previous);

    let footer = section.footer.as_ref().unwrap();
    assert!(footer.has_page_number_field());
    assert!(footer.text().starts_with("Page "));
    assert_eq!(footer.paragraphs[0].style.alignment, Some(Alignment::Center));

    let footer_xml = read_part(&bytes, &footer.part).unwrap();
    assert!(footer_xml.contains(r#"w:fldCharType="begin""#));
    assert!(footer_xml.contains(r#"w:fldCharType="separate""#));
    assert!(footer_xml.contains(r#"w:fldCharType="end""#));
    assert!(footer_xml.contains(" PAGE "));

    let content_types = read_part(&bytes, "[Content_Types].xml").unwrap();
    assert!(content_types.contains(HeaderFooterKind::Header.content_type()));
    assert!(content_types.contains(HeaderFooterKind::Footer.content_type()));

    let rels = read_part(&bytes, "word/_rels/document.xml.rels").unwrap();
    assert!(rels.contains(HeaderFooterKind::Header.rel_type()));
    assert!(rels.contains(HeaderFooterKind::Footer.rel_type()));
}

#[test]
fn test_linked_header_rewritten_once() {
    let data = DocxBuilder::new()
        .header_part("rId7", "header1.xml", "Old school")
        .paragraph("Section A")
        .raw(r#"<w:p><w:pPr><w:sectPr><w:headerReference w:type="default" r:id="rId7"/></w:sectPr></w:pPr></w:p>"#)
        .paragraph("Section B")
        .raw("<w:sectPr/>")
        .build();

    let settings = Settings::new().with_school("DPS").with_exam("Finals");
    let (bytes, stats) = format_bytes(&data, &settings).unwrap();
    // One existing header shared by both sections plus one new footer
    assert_eq!(stats.header_footer_parts, 2);

    let doc = Document::from_bytes(&bytes).unwrap();
    let sections = doc.sections().unwrap();
    let first = sections[0].header.as_ref().unwrap();
    let second = sections[1].header.as_ref().unwrap();
    assert_eq!(first.part, "word/header1.xml");
    assert_eq!(second.part, "word/header1.xml");
    assert!(second.linked_to_previous);
    assert_eq!(second.text(), "DPS | Finals");
    assert!(read_part(&bytes, "word/header2.xml").is_none());
}

#[test]
fn test_header_disabled_leaves_parts_alone() {
    let data = DocxBuilder::new()
        .header_part("rId7", "header1.xml", "Old school")
        .paragraph("Q1. Define work. (2 marks)")
        .raw(r#"<w:sectPr><w:headerReference w:type="default" r:id="rId7"/></w:sectPr>"#)
        .build();

    let (bytes, stats) = format_bytes(&data, &Settings::new().with_header(false)).unwrap();
    assert_eq!(stats.header_footer_parts, 0);

    let doc = Document::from_bytes(&bytes).unwrap();
    let section = &doc.sections().unwrap()[0];
    assert_eq!(section.header.as_ref().unwrap().text(), "Old school");
    assert!(section.footer.is_none());
}

#[test]
fn test_invalid_settings_rejected_before_changes() {
    let mut doc = Document::from_bytes(&sample_paper()).unwrap();

    let result = reformat(&mut doc, &Settings::new().with_size(30));
    assert!(matches!(result, Err(Error::InvalidSettings(_))));
    assert!(doc.sections().unwrap()[0].margins.is_none());
    assert!(doc.paragraphs()[0].runs.iter().all(|r| !r.style.bold));

    let result = reformat(&mut doc, &Settings::new().with_spacing(1.25));
    assert!(matches!(result, Err(Error::InvalidSettings(_))));

    let result = reformat(&mut doc, &Settings::new().with_margin(3.0));
    assert!(matches!(result, Err(Error::InvalidSettings(_))));
}

#[test]
fn test_non_docx_input() {
    assert!(matches!(
        format_bytes(b"plain text, not a package", &Settings::default()),
        Err(Error::UnknownFormat)
    ));
}

#[test]
fn test_untouched_parts_copied() {
    let (bytes, _) = format_bytes(&sample_paper(), &Settings::default()).unwrap();
    let core = read_part(&bytes, "docProps/core.xml").unwrap();
    assert!(core.contains("<dc:title>Science Paper</dc:title>"));

    let doc = Document::from_bytes(&bytes).unwrap();
    assert_eq!(doc.metadata().title.as_deref(), Some("Science Paper"));
    assert_eq!(doc.metadata().author.as_deref(), Some("Exam Cell"));
}

#[test]
fn test_format_file_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("paper.docx");
    let output = dir.path().join("paper-formatted.docx");
    std::fs::write(&input, sample_paper()).unwrap();

    let stats = qpfmt::format_file(&input, &output, &Settings::default()).unwrap();
    assert_eq!(stats.paragraph_count, 4);
    assert_eq!(stats.section_count, 1);

    let text = qpfmt::extract_text(&output).unwrap();
    assert!(text.contains("Q1. What is 2+2? (5 marks)"));

    let info = qpfmt::inspect_file(&output).unwrap();
    assert_eq!(info.mark_annotation_count, 2);
    assert_eq!(info.fonts, vec!["Times New Roman".to_string()]);
}

#[cfg(feature = "async")]
#[tokio::test]
async fn test_format_file_async() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("paper.docx");
    let output = dir.path().join("out.docx");
    tokio::fs::write(&input, sample_paper()).await.unwrap();

    let stats = qpfmt::format_file_async(&input, &output, &Settings::default())
        .await
        .unwrap();
    assert_eq!(stats.mark_count, 2);
    assert!(output.exists());
}
