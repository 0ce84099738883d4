//! Integration tests for batch formatting.

mod common;

use std::io::Cursor;

use common::{read_part, sample_paper, DocxBuilder};
use qpfmt::{
    BatchFormatter, BatchInput, BatchReport, Document, EntryStatus, Error, FailurePolicy, Settings,
    DEFAULT_ARCHIVE_NAME,
};

fn archive_names(archive: &[u8]) -> Vec<String> {
    let zip = zip::ZipArchive::new(Cursor::new(archive)).unwrap();
    zip.file_names().map(String::from).collect()
}

fn read_entry(archive: &[u8], name: &str) -> Vec<u8> {
    use std::io::Read;
    let mut zip = zip::ZipArchive::new(Cursor::new(archive)).unwrap();
    let mut entry = zip.by_name(name).unwrap();
    let mut buf = Vec::new();
    entry.read_to_end(&mut buf).unwrap();
    buf
}

#[test]
fn test_archive_has_one_entry_per_input() {
    let inputs = vec![
        BatchInput::new("uploads/Science_Class9.docx", sample_paper()),
        BatchInput::new("Hindi Paper.docx", sample_paper()),
        BatchInput::new(r"C:\papers\maths.docx", sample_paper()),
    ];
    let output = BatchFormatter::new(Settings::default()).format(inputs).unwrap();

    let mut names = archive_names(&output.archive);
    names.sort();
    assert_eq!(names, vec!["Hindi Paper.docx", "Science_Class9.docx", "maths.docx"]);

    let doc = Document::from_bytes(&read_entry(&output.archive, "maths.docx")).unwrap();
    let question = &doc.paragraphs()[1];
    assert_eq!(question.runs.len(), 2);
    assert_eq!(question.runs[1].text, "(5 marks)");

    assert_eq!(output.report.formatted_count(), 3);
    assert_eq!(output.report.skipped_count(), 0);
    assert_eq!(output.report.total_stats().mark_count, 6);
}

#[test]
fn test_entries_keep_input_order() {
    let inputs = vec![
        BatchInput::new("b.docx", sample_paper()),
        BatchInput::new("a.docx", sample_paper()),
    ];
    let output = BatchFormatter::new(Settings::default()).format(inputs).unwrap();
    let names: Vec<_> = output.report.entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["b.docx", "a.docx"]);
}

#[test]
fn test_empty_batch_is_an_error() {
    let result = BatchFormatter::new(Settings::default()).format(Vec::<BatchInput>::new());
    assert!(matches!(result, Err(Error::EmptyBatch)));
}

#[test]
fn test_abort_policy_stops_at_first_failure() {
    let inputs = vec![
        BatchInput::new("good.docx", sample_paper()),
        BatchInput::new("notes.txt", b"just some notes".to_vec()),
    ];
    let err = BatchFormatter::new(Settings::default())
        .format(inputs)
        .unwrap_err();

    match err {
        Error::Document { name, source } => {
            assert_eq!(name, "notes.txt");
            assert!(matches!(*source, Error::UnknownFormat));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_skip_policy_records_failures() {
    let not_word = {
        use std::io::Write;
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        zip.start_file("hello.txt", zip::write::SimpleFileOptions::default())
            .unwrap();
        zip.write_all(b"hello").unwrap();
        zip.finish().unwrap().into_inner()
    };
    let inputs = vec![
        BatchInput::new("first.docx", sample_paper()),
        BatchInput::new("archive.zip", not_word),
        BatchInput::new("last.docx", sample_paper()),
    ];

    let mut seen = Vec::new();
    let output = BatchFormatter::new(Settings::default())
        .with_policy(FailurePolicy::Skip)
        .format_with_progress(inputs, |entry| seen.push((entry.name.clone(), entry.status)))
        .unwrap();

    assert_eq!(
        seen,
        vec![
            ("first.docx".to_string(), EntryStatus::Formatted),
            ("archive.zip".to_string(), EntryStatus::Skipped),
            ("last.docx".to_string(), EntryStatus::Formatted),
        ]
    );

    let mut names = archive_names(&output.archive);
    names.sort();
    assert_eq!(names, vec!["first.docx", "last.docx"]);

    let skipped = &output.report.entries[1];
    assert!(skipped.error.is_some());
    assert!(skipped.stats.is_none());
    assert_eq!(skipped.output_bytes, 0);
}

#[test]
fn test_report_json() {
    let inputs = vec![BatchInput::new("paper.docx", sample_paper())];
    let output = BatchFormatter::new(Settings::new().with_font("Arial"))
        .format(inputs)
        .unwrap();

    let json = output.report.to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["policy"], "abort");
    assert_eq!(value["settings"]["font"], "Arial");
    assert_eq!(value["entries"][0]["name"], "paper.docx");
    assert_eq!(value["entries"][0]["status"], "formatted");
    assert_eq!(value["entries"][0]["stats"]["paragraph_count"], 4);
    assert!(value["entries"][0].get("error").is_none());

    let report: BatchReport = serde_json::from_str(&json).unwrap();
    assert_eq!(report.entries.len(), 1);
}

#[test]
fn test_save_archive() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(DEFAULT_ARCHIVE_NAME);

    let data = DocxBuilder::new()
        .paragraph("Note: attempt all questions.")
        .raw("<w:sectPr/>")
        .build();
    let output = BatchFormatter::new(Settings::default())
        .format(vec![BatchInput::new("note.docx", data)])
        .unwrap();
    output.save_archive(&path).unwrap();

    let written = std::fs::read(&path).unwrap();
    assert_eq!(written, output.archive);
    let entry = read_entry(&written, "note.docx");
    let xml = read_part(&entry, "word/document.xml").unwrap();
    assert!(xml.contains("<w:b/>"));
}

#[test]
fn test_from_path_names_entry_after_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Term1_English.docx");
    std::fs::write(&path, sample_paper()).unwrap();

    let input = BatchInput::from_path(&path).unwrap();
    assert_eq!(input.entry_name(), "Term1_English.docx");
}
