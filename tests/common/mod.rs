//! In-memory DOCX fixtures for integration tests.

#![allow(dead_code)]

use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;

const NS_W: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Builds a minimal Word package part by part.
#[derive(Default)]
pub struct DocxBuilder {
    body: String,
    rels: Vec<(String, String, String)>,
    overrides: Vec<(String, String)>,
    extra_parts: Vec<(String, String)>,
}

impl DocxBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a plain paragraph with one run.
    pub fn paragraph(mut self, text: &str) -> Self {
        self.body.push_str(&format!(
            r#"<w:p><w:r><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#,
            text
        ));
        self
    }

    /// Append raw body XML.
    pub fn raw(mut self, xml: &str) -> Self {
        self.body.push_str(xml);
        self
    }

    /// Add a header part referenced by `rel_id`.
    pub fn header_part(mut self, rel_id: &str, file: &str, text: &str) -> Self {
        self.rels.push((
            rel_id.to_string(),
            "http://schemas.openxmlformats.org/officeDocument/2006/relationships/header"
                .to_string(),
            file.to_string(),
        ));
        self.overrides.push((
            format!("/word/{}", file),
            "application/vnd.openxmlformats-officedocument.wordprocessingml.header+xml"
                .to_string(),
        ));
        self.extra_parts.push((
            format!("word/{}", file),
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:hdr xmlns:w="{}" xmlns:r="{}"><w:p><w:r><w:t>{}</w:t></w:r></w:p></w:hdr>"#,
                NS_W, NS_R, text
            ),
        ));
        self
    }

    fn document_xml(&self) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="{}" xmlns:r="{}"><w:body>{}</w:body></w:document>"#,
            NS_W, NS_R, self.body
        )
    }

    fn content_types_xml(&self) -> String {
        let overrides: String = self
            .overrides
            .iter()
            .map(|(part, ct)| format!(r#"<Override PartName="{}" ContentType="{}"/>"#, part, ct))
            .collect();
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>{}</Types>"#,
            overrides
        )
    }

    fn document_rels_xml(&self) -> String {
        let rels: String = self
            .rels
            .iter()
            .map(|(id, ty, target)| {
                format!(r#"<Relationship Id="{}" Type="{}" Target="{}"/>"#, id, ty, target)
            })
            .collect();
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{}</Relationships>"#,
            rels
        )
    }

    pub fn build(self) -> Vec<u8> {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();
        let mut parts = vec![
            ("[Content_Types].xml".to_string(), self.content_types_xml()),
            (
                "_rels/.rels".to_string(),
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/></Relationships>"#
                    .to_string(),
            ),
            ("word/document.xml".to_string(), self.document_xml()),
            (
                "docProps/core.xml".to_string(),
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"><dc:title>Science Paper</dc:title><dc:creator>Exam Cell</dc:creator><dcterms:modified xsi:type="dcterms:W3CDTF">2024-03-01T10:00:00Z</dcterms:modified></cp:coreProperties>"#
                    .to_string(),
            ),
        ];
        if !self.rels.is_empty() {
            parts.push((
                "word/_rels/document.xml.rels".to_string(),
                self.document_rels_xml(),
            ));
        }
        parts.extend(self.extra_parts);

        for (name, content) in parts {
            zip.start_file(name, options).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }
        zip.finish().unwrap().into_inner()
    }
}

/// A small question paper with one body-level section.
pub fn sample_paper() -> Vec<u8> {
    DocxBuilder::new()
        .paragraph("Section A")
        .paragraph("Q1. What is 2+2? (5 marks)")
        .paragraph("Q2. Define velocity.")
        .paragraph("General Instructions (read carefully)")
        .raw(r#"<w:sectPr><w:pgSz w:w="11906" w:h="16838"/></w:sectPr>"#)
        .build()
}

/// Read one part of a ZIP package as a string.
pub fn read_part(data: &[u8], name: &str) -> Option<String> {
    use std::io::Read;
    let mut archive = zip::ZipArchive::new(Cursor::new(data)).ok()?;
    let mut entry = archive.by_name(name).ok()?;
    let mut content = String::new();
    entry.read_to_string(&mut content).ok()?;
    Some(content)
}
