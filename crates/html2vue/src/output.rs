//! Output formatting.

use crate::cli::OutputFormat;
use camino::Utf8PathBuf;
use html2vue_transformer::{ConversionStats, Outcome};
use serde::Serialize;

/// What happened to one input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileStatus {
    /// A component was produced.
    Converted,
    /// The file was blank; nothing was produced.
    EmptyInput,
    /// The file does not look like markup.
    InvalidMarkup,
    /// Nothing was left of the template.
    EmptyTemplate,
    /// Conversion failed unexpectedly.
    Failed,
    /// The file could not be read.
    ReadFailed,
    /// The component could not be written.
    WriteFailed,
}

impl From<Outcome> for FileStatus {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Converted => Self::Converted,
            Outcome::EmptyInput => Self::EmptyInput,
            Outcome::InvalidMarkup => Self::InvalidMarkup,
            Outcome::EmptyTemplate => Self::EmptyTemplate,
            Outcome::Failed => Self::Failed,
        }
    }
}

impl FileStatus {
    /// Returns the status name used in JSON and machine output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Converted => "converted",
            Self::EmptyInput => "empty-input",
            Self::InvalidMarkup => "invalid-markup",
            Self::EmptyTemplate => "empty-template",
            Self::Failed => "failed",
            Self::ReadFailed => "read-failed",
            Self::WriteFailed => "write-failed",
        }
    }

    fn describe(&self) -> &'static str {
        match self {
            Self::Converted => "converted",
            Self::EmptyInput => "empty input, nothing written",
            Self::InvalidMarkup => "invalid HTML, placeholder emitted",
            Self::EmptyTemplate => "no template content, placeholder emitted",
            Self::Failed => "conversion failed, placeholder emitted",
            Self::ReadFailed => "read failed",
            Self::WriteFailed => "write failed",
        }
    }

    /// Returns true for I/O failures.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::ReadFailed | Self::WriteFailed)
    }
}

/// Statement and block counts of a converted file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Counts {
    /// Reactive state declarations.
    pub state: usize,
    /// Functions or methods.
    pub functions: usize,
    /// Style blocks.
    pub styles: usize,
}

impl From<ConversionStats> for Counts {
    fn from(stats: ConversionStats) -> Self {
        Self {
            state: stats.state,
            functions: stats.functions,
            styles: stats.styles,
        }
    }
}

/// The report for one input file.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    /// The input path.
    pub input: Utf8PathBuf,
    /// Where the component was written, if it was.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<Utf8PathBuf>,
    /// What happened.
    pub status: FileStatus,
    /// Counts for converted files.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counts: Option<Counts>,
    /// Error detail for failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Totals over a run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Totals {
    /// Number of input files.
    pub files: usize,
    /// Number of files converted into components.
    pub converted: usize,
    /// Number of files that produced no component.
    pub not_converted: usize,
    /// Number of read or write failures.
    pub errors: usize,
}

/// Summary of a conversion run.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Per-file reports, in input order.
    pub files: Vec<FileReport>,
}

impl RunSummary {
    /// Computes the totals.
    pub fn totals(&self) -> Totals {
        let mut totals = Totals {
            files: self.files.len(),
            ..Totals::default()
        };
        for report in &self.files {
            match report.status {
                FileStatus::Converted => totals.converted += 1,
                status if status.is_error() => totals.errors += 1,
                _ => totals.not_converted += 1,
            }
        }
        totals
    }

    /// Returns true if any file failed to read or write.
    pub fn has_errors(&self) -> bool {
        self.files.iter().any(|report| report.status.is_error())
    }

    /// Returns true if every file was converted.
    pub fn all_converted(&self) -> bool {
        self.files
            .iter()
            .all(|report| report.status == FileStatus::Converted)
    }
}

#[derive(Serialize)]
struct JsonSummary<'a> {
    files: &'a [FileReport],
    totals: Totals,
}

/// Formats run summaries for output.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats a run summary.
    pub fn format(&self, summary: &RunSummary) -> String {
        match self.format {
            OutputFormat::Human => Self::format_human(summary),
            OutputFormat::Json => Self::format_json(summary),
            OutputFormat::Machine => Self::format_machine(summary),
        }
    }

    fn format_human(summary: &RunSummary) -> String {
        let mut output = String::new();

        for report in &summary.files {
            match (&report.output, &report.message) {
                (Some(path), _) if report.status == FileStatus::Converted => {
                    output.push_str(&format!("{} -> {}\n", report.input, path));
                }
                (_, Some(message)) => {
                    output.push_str(&format!(
                        "{}: {}: {}\n",
                        report.input,
                        report.status.describe(),
                        message
                    ));
                }
                _ => {
                    output.push_str(&format!(
                        "{}: {}\n",
                        report.input,
                        report.status.describe()
                    ));
                }
            }
        }

        let totals = summary.totals();
        let file_word = if totals.files == 1 { "file" } else { "files" };
        let error_word = if totals.errors == 1 { "error" } else { "errors" };

        output.push_str(&format!(
            "====================================\nhtml2vue converted {} of {} {} ({} not converted, {} {})",
            totals.converted,
            totals.files,
            file_word,
            totals.not_converted,
            totals.errors,
            error_word
        ));
        output
    }

    fn format_json(summary: &RunSummary) -> String {
        let json = JsonSummary {
            files: &summary.files,
            totals: summary.totals(),
        };
        serde_json::to_string_pretty(&json).unwrap_or_default()
    }

    fn format_machine(summary: &RunSummary) -> String {
        summary
            .files
            .iter()
            .map(|report| {
                let output = report.output.as_ref().map_or("-", |path| path.as_str());
                format!("{}\t{}\t{}", report.status.as_str(), report.input, output)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
