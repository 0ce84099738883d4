//! Batch formatting into a single ZIP archive.
//!
//! Documents are processed one at a time: each is opened, reformatted,
//! serialized and written into the archive before the next one is read.

use crate::error::{Error, Result};
use crate::format::{FormatStats, Settings};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::{Cursor, Write};
use std::path::Path;
use std::time::{Duration, Instant};
use zip::write::SimpleFileOptions;
use zip::CompressionMethod;

/// File name offered for the combined archive.
pub const DEFAULT_ARCHIVE_NAME: &str = "Formatted_Questions.zip";

/// One document to format.
#[derive(Debug, Clone)]
pub struct BatchInput {
    /// Name as supplied (may include directories)
    pub name: String,

    /// DOCX bytes
    pub data: Vec<u8>,
}

impl BatchInput {
    /// Create an input from a name and its bytes.
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    /// Read an input from a file, named after the file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        Ok(Self::new(path.to_string_lossy(), data))
    }

    /// Archive entry name: the file name without directory components.
    pub fn entry_name(&self) -> &str {
        self.name
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(&self.name)
    }
}

/// What to do when one document of a batch fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Stop the batch at the first failure; no archive is produced.
    #[default]
    Abort,
    /// Leave the failed document out of the archive and record it in the report.
    Skip,
}

/// Outcome of one batch entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    /// Reformatted and written to the archive
    Formatted,
    /// Failed and left out of the archive
    Skipped,
}

/// Report line for one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryReport {
    /// Archive entry name
    pub name: String,

    /// Outcome
    pub status: EntryStatus,

    /// Input size in bytes
    pub input_bytes: usize,

    /// Output size in bytes (0 when skipped)
    pub output_bytes: usize,

    /// Formatting statistics (absent when skipped)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<FormatStats>,

    /// Failure message (present when skipped)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Processing time in milliseconds
    pub duration_ms: u64,
}

impl EntryReport {
    fn formatted(
        name: String,
        input_bytes: usize,
        output_bytes: usize,
        stats: FormatStats,
        elapsed: Duration,
    ) -> Self {
        Self {
            name,
            status: EntryStatus::Formatted,
            input_bytes,
            output_bytes,
            stats: Some(stats),
            error: None,
            duration_ms: elapsed.as_millis() as u64,
        }
    }

    fn skipped(name: String, input_bytes: usize, error: &Error, elapsed: Duration) -> Self {
        Self {
            name,
            status: EntryStatus::Skipped,
            input_bytes,
            output_bytes: 0,
            stats: None,
            error: Some(error.to_string()),
            duration_ms: elapsed.as_millis() as u64,
        }
    }
}

/// Report for a whole batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    /// When the batch started
    pub started_at: DateTime<Utc>,

    /// When the batch finished
    pub finished_at: DateTime<Utc>,

    /// Settings applied to every document
    pub settings: Settings,

    /// Failure policy in effect
    pub policy: FailurePolicy,

    /// Per-document results in input order
    pub entries: Vec<EntryReport>,
}

impl BatchReport {
    /// Number of documents written to the archive.
    pub fn formatted_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.status == EntryStatus::Formatted)
            .count()
    }

    /// Number of documents left out.
    pub fn skipped_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.status == EntryStatus::Skipped)
            .count()
    }

    /// Combined statistics of all formatted documents.
    pub fn total_stats(&self) -> FormatStats {
        let mut total = FormatStats::new();
        for stats in self.entries.iter().filter_map(|e| e.stats.as_ref()) {
            total.merge(stats);
        }
        total
    }

    /// Serialize the report as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Result of a batch: the archive bytes and the report.
#[derive(Debug, Clone)]
pub struct BatchOutput {
    /// ZIP archive with one entry per formatted document
    pub archive: Vec<u8>,

    /// Per-document report
    pub report: BatchReport,
}

impl BatchOutput {
    /// Write the archive to a file.
    pub fn save_archive<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, &self.archive)?;
        Ok(())
    }
}

/// Formats many documents with the same settings.
///
/// # Example
///
/// ```no_run
/// use qpfmt::batch::{BatchFormatter, BatchInput, FailurePolicy, DEFAULT_ARCHIVE_NAME};
/// use qpfmt::Settings;
///
/// let inputs = vec![
///     BatchInput::from_path("unit1.docx").unwrap(),
///     BatchInput::from_path("unit2.docx").unwrap(),
/// ];
/// let output = BatchFormatter::new(Settings::default())
///     .with_policy(FailurePolicy::Skip)
///     .format(inputs)
///     .unwrap();
/// output.save_archive(DEFAULT_ARCHIVE_NAME).unwrap();
/// ```
#[derive(Debug, Clone, Default)]
pub struct BatchFormatter {
    settings: Settings,
    policy: FailurePolicy,
}

impl BatchFormatter {
    /// Create a formatter that aborts on the first failure.
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            policy: FailurePolicy::Abort,
        }
    }

    /// Set the failure policy.
    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Settings applied to every document.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Format all inputs into one archive.
    pub fn format<I>(&self, inputs: I) -> Result<BatchOutput>
    where
        I: IntoIterator<Item = BatchInput>,
    {
        self.format_with_progress(inputs, |_| {})
    }

    /// Format all inputs, calling `on_entry` after each document.
    pub fn format_with_progress<I, F>(&self, inputs: I, mut on_entry: F) -> Result<BatchOutput>
    where
        I: IntoIterator<Item = BatchInput>,
        F: FnMut(&EntryReport),
    {
        let inputs: Vec<BatchInput> = inputs.into_iter().collect();
        if inputs.is_empty() {
            return Err(Error::EmptyBatch);
        }
        self.settings.validate()?;

        {
            let mut seen = HashSet::new();
            for input in &inputs {
                if !seen.insert(input.entry_name()) {
                    return Err(Error::DuplicateEntry(input.entry_name().to_string()));
                }
            }
        }

        let started_at = Utc::now();
        log::info!(
            "Formatting {} documents (policy: {:?})",
            inputs.len(),
            self.policy
        );

        // DOCX entries are already deflated inside; store them as they are.
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let mut entries = Vec::with_capacity(inputs.len());

        for input in inputs {
            let name = input.entry_name().to_string();
            let started = Instant::now();
            let entry = match crate::format_bytes(&input.data, &self.settings) {
                Ok((bytes, stats)) => {
                    zip.start_file(name.as_str(), options)?;
                    zip.write_all(&bytes)?;
                    log::info!("Formatted {} ({} -> {} bytes)", name, input.data.len(), bytes.len());
                    EntryReport::formatted(name, input.data.len(), bytes.len(), stats, started.elapsed())
                }
                Err(e) => match self.policy {
                    FailurePolicy::Abort => return Err(e.in_document(name)),
                    FailurePolicy::Skip => {
                        log::warn!("Skipping {}: {}", name, e);
                        EntryReport::skipped(name, input.data.len(), &e, started.elapsed())
                    }
                },
            };
            on_entry(&entry);
            entries.push(entry);
        }

        let archive = zip.finish()?.into_inner();
        let report = BatchReport {
            started_at,
            finished_at: Utc::now(),
            settings: self.settings.clone(),
            policy: self.policy,
            entries,
        };
        log::info!(
            "Batch done: {} formatted, {} skipped, archive {} bytes",
            report.formatted_count(),
            report.skipped_count(),
            archive.len()
        );
        Ok(BatchOutput { archive, report })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_name_strips_directories() {
        assert_eq!(BatchInput::new("a/b/paper.docx", Vec::new()).entry_name(), "paper.docx");
        assert_eq!(BatchInput::new(r"C:\exams\hindi.docx", Vec::new()).entry_name(), "hindi.docx");
        assert_eq!(BatchInput::new("plain.docx", Vec::new()).entry_name(), "plain.docx");
    }

    #[test]
    fn test_empty_batch() {
        let result = BatchFormatter::new(Settings::default()).format(Vec::new());
        assert!(matches!(result, Err(Error::EmptyBatch)));
    }

    #[test]
    fn test_duplicate_names_rejected_up_front() {
        let inputs = vec![
            BatchInput::new("x/paper.docx", b"junk".to_vec()),
            BatchInput::new("y/paper.docx", b"junk".to_vec()),
        ];
        let result = BatchFormatter::new(Settings::default())
            .with_policy(FailurePolicy::Skip)
            .format(inputs);
        assert!(matches!(result, Err(Error::DuplicateEntry(name)) if name == "paper.docx"));
    }

    #[test]
    fn test_abort_wraps_document_name() {
        let inputs = vec![BatchInput::new("broken.docx", b"not a zip".to_vec())];
        let err = BatchFormatter::new(Settings::default())
            .format(inputs)
            .unwrap_err();
        assert!(matches!(&err, Error::Document { name, .. } if name == "broken.docx"));
    }

    #[test]
    fn test_invalid_settings_fail_whole_batch() {
        let inputs = vec![BatchInput::new("a.docx", Vec::new())];
        let result = BatchFormatter::new(Settings::new().with_size(40))
            .with_policy(FailurePolicy::Skip)
            .format(inputs);
        assert!(matches!(result, Err(Error::InvalidSettings(_))));
    }
}
