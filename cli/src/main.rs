//! qpfmt CLI - DOCX question paper formatter

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use qpfmt::{
    inspect_file, BatchFormatter, BatchInput, EntryStatus, FailurePolicy, MarkMode, Settings,
    DEFAULT_ARCHIVE_NAME,
};

#[derive(Parser)]
#[command(name = "qpfmt")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Reformat DOCX question papers in one pass", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(flatten)]
    format: FormatArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Format documents into a ZIP archive
    #[command(alias = "fmt")]
    Format(FormatArgs),

    /// Show document information
    Inspect {
        /// Input DOCX file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

#[derive(Args, Default)]
struct FormatArgs {
    /// Input DOCX files
    #[arg(value_name = "FILE")]
    inputs: Vec<PathBuf>,

    /// Output archive
    #[arg(short, long, value_name = "ZIP")]
    output: Option<PathBuf>,

    /// JSON settings file; flags override its values
    #[arg(long, value_name = "JSON")]
    config: Option<PathBuf>,

    /// Font family (Times New Roman, Arial, Mangal, Kruti Dev, ...)
    #[arg(long)]
    font: Option<String>,

    /// Font size in points (10-18)
    #[arg(long)]
    size: Option<u32>,

    /// Line spacing (1.0, 1.15, 1.5, 2.0)
    #[arg(long)]
    spacing: Option<f32>,

    /// Page margin in inches (0.5-2.0)
    #[arg(long)]
    margin: Option<f64>,

    /// Leave headers and footers unchanged
    #[arg(long)]
    no_header: bool,

    /// School name for the header
    #[arg(long, env = "QPFMT_SCHOOL")]
    school: Option<String>,

    /// Exam name for the header
    #[arg(long, env = "QPFMT_EXAM")]
    exam: Option<String>,

    /// Text before the page number in the footer
    #[arg(long)]
    footer_label: Option<String>,

    /// Bold section headers (default)
    #[arg(long, overrides_with = "no_bold_sections")]
    bold_sections: bool,

    /// Do not bold section headers
    #[arg(long)]
    no_bold_sections: bool,

    /// Indent every paragraph by a quarter inch
    #[arg(long)]
    auto_indent: bool,

    /// Keep section headers bold when they end in marks
    #[arg(long)]
    preserve_header_bold: bool,

    /// Leave failed documents out instead of aborting
    #[arg(long)]
    skip_failed: bool,

    /// Write a JSON report of the batch
    #[arg(long, value_name = "JSON")]
    report: Option<PathBuf>,
}

impl FormatArgs {
    fn settings(&self) -> qpfmt::Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => Settings::from_json_file(path)?,
            None => Settings::default(),
        };
        if let Some(font) = &self.font {
            settings = settings.with_font(font.as_str());
        }
        if let Some(size) = self.size {
            settings = settings.with_size(size);
        }
        if let Some(spacing) = self.spacing {
            settings = settings.with_spacing(spacing);
        }
        if let Some(margin) = self.margin {
            settings = settings.with_margin(margin);
        }
        if self.no_header {
            settings = settings.with_header(false);
        }
        if let Some(school) = &self.school {
            settings = settings.with_school(school.as_str());
        }
        if let Some(exam) = &self.exam {
            settings = settings.with_exam(exam.as_str());
        }
        if let Some(label) = &self.footer_label {
            settings = settings.with_footer_label(label.as_str());
        }
        if self.bold_sections {
            settings = settings.with_bold_sections(true);
        }
        if self.no_bold_sections {
            settings = settings.with_bold_sections(false);
        }
        if self.auto_indent {
            settings = settings.with_auto_indent(true);
        }
        if self.preserve_header_bold {
            settings = settings.with_mark_mode(MarkMode::PreserveSectionHeaders);
        }
        Ok(settings)
    }

    fn policy(&self) -> FailurePolicy {
        if self.skip_failed {
            FailurePolicy::Skip
        } else {
            FailurePolicy::Abort
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Format(args)) => cmd_format(&args),
        Some(Commands::Inspect { input, json }) => cmd_inspect(&input, json),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: format if inputs are provided
            if cli.format.inputs.is_empty() {
                println!("{}", "Usage: qpfmt <FILE>... [-o OUTPUT.zip]".yellow());
                println!("       qpfmt --help for more information");
                Ok(())
            } else {
                cmd_format(&cli.format)
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_format(args: &FormatArgs) -> Result<(), Box<dyn std::error::Error>> {
    let settings = args.settings()?;
    log::debug!("Settings: {:?}", settings);

    let inputs = args
        .inputs
        .iter()
        .map(BatchInput::from_path)
        .collect::<qpfmt::Result<Vec<_>>>()?;

    let pb = ProgressBar::new(inputs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let output = BatchFormatter::new(settings)
        .with_policy(args.policy())
        .format_with_progress(inputs, |entry| {
            pb.set_message(entry.name.clone());
            pb.inc(1);
        })?;
    pb.finish_with_message("Done!");

    let archive_path = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_ARCHIVE_NAME));
    output.save_archive(&archive_path)?;

    println!("\n{}", "Documents:".green().bold());
    let count = output.report.entries.len();
    for (i, entry) in output.report.entries.iter().enumerate() {
        let branch = if i + 1 == count { "└─" } else { "├─" };
        match entry.status {
            EntryStatus::Formatted => {
                let marks = entry.stats.as_ref().map(|s| s.mark_count).unwrap_or(0);
                println!(
                    "  {} {} {}",
                    branch.dimmed(),
                    entry.name,
                    format!("({} marks aligned)", marks).dimmed()
                );
            }
            EntryStatus::Skipped => {
                println!(
                    "  {} {} {}",
                    branch.dimmed(),
                    entry.name.red(),
                    entry.error.as_deref().unwrap_or("failed").dimmed()
                );
            }
        }
    }

    if let Some(report_path) = &args.report {
        fs::write(report_path, output.report.to_json()?)?;
        println!("{} {}", "Report saved to".green(), report_path.display());
    }

    println!(
        "\n{} {} formatted, {} skipped -> {}",
        "Done!".green().bold(),
        output.report.formatted_count(),
        output.report.skipped_count(),
        archive_path.display()
    );

    Ok(())
}

fn cmd_inspect(input: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let info = inspect_file(input)?;

    if json {
        println!("{}", info.to_json()?);
        return Ok(());
    }

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Format".bold(), info.format);
    if let Some(ref title) = info.metadata.title {
        println!("{}: {}", "Title".bold(), title);
    }
    if let Some(ref author) = info.metadata.author {
        println!("{}: {}", "Author".bold(), author);
    }
    if let Some(ref modified) = info.metadata.modified {
        println!("{}: {}", "Modified".bold(), modified);
    }
    println!("{}: {}", "Paragraphs".bold(), info.paragraph_count);
    if !info.fonts.is_empty() {
        println!("{}: {}", "Fonts".bold(), info.fonts.join(", "));
    }

    println!();
    println!("{}", "Sections".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    for section in &info.sections {
        let margins = section
            .margins
            .map(|m| {
                format!(
                    "{:.2}/{:.2}/{:.2}/{:.2} in",
                    m.top.to_inches(),
                    m.right.to_inches(),
                    m.bottom.to_inches(),
                    m.left.to_inches()
                )
            })
            .unwrap_or_else(|| "default".to_string());
        println!("{} {}: margins {}", "Section".bold(), section.index + 1, margins);
        if let Some(ref header) = section.header {
            println!("  {} {}", "Header:".dimmed(), header.text());
        }
        if let Some(ref footer) = section.footer {
            let page = if footer.has_page_number_field() {
                " [PAGE]"
            } else {
                ""
            };
            println!("  {} {}{}", "Footer:".dimmed(), footer.text(), page);
        }
    }

    println!();
    println!("{}", "Question Paper".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Mark annotations".bold(), info.mark_annotation_count);
    println!("{}: {}", "Section headers".bold(), info.section_headers.len());
    for header in &info.section_headers {
        println!("  {} {}", "•".dimmed(), header);
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "qpfmt".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("DOCX question paper formatter");
    println!();
    println!("Repository: {}", "https://github.com/iyulab/qpfmt".dimmed());
    println!("License: MIT");
}
