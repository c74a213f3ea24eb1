//! CLI argument parsing.

use camino::Utf8PathBuf;
use clap::{Parser, ValueEnum};
use html2vue_transformer::ApiStyle;

/// Convert HTML pages into Vue single-file components.
#[derive(Debug, Parser)]
#[command(name = "html2vue")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// HTML files or directories to convert (none, or `-`, reads stdin)
    pub paths: Vec<Utf8PathBuf>,

    /// Vue API style of the generated script block [default: composition]
    #[arg(long, value_enum)]
    pub api: Option<ApiArg>,

    /// Directory to write components into (default: next to each input)
    #[arg(long = "out-dir")]
    pub out_dir: Option<Utf8PathBuf>,

    /// Print components to stdout instead of writing files
    #[arg(long)]
    pub stdout: bool,

    /// Summary format
    #[arg(long, value_enum, default_value = "human")]
    pub output: OutputFormat,

    /// Glob patterns to ignore when walking directories
    #[arg(long)]
    pub ignore: Vec<String>,

    /// Exit with error when any input is not converted
    #[arg(long = "fail-on-invalid")]
    pub fail_on_invalid: bool,

    /// Path to a config file (default: ./html2vue.json if present)
    #[arg(long)]
    pub config: Option<Utf8PathBuf>,

    /// Print timing breakdowns
    #[arg(long)]
    pub timings: bool,

    /// Timing output format
    #[arg(long, value_enum, default_value = "text")]
    pub timings_format: TimingFormat,
}

/// API style as spelled on the command line.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ApiArg {
    /// `<script setup>` with `ref()` state
    Composition,
    /// `defineComponent` with `data` and `methods`
    Options,
}

impl From<ApiArg> for ApiStyle {
    fn from(arg: ApiArg) -> Self {
        match arg {
            ApiArg::Composition => ApiStyle::Composition,
            ApiArg::Options => ApiStyle::Options,
        }
    }
}

/// Output format options.
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output
    Json,
    /// Machine-readable (one tab-separated line per file)
    Machine,
}

/// Timing output format.
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum TimingFormat {
    /// Human-readable output
    #[default]
    Text,
    /// JSON output (machine-readable)
    Json,
}

impl Args {
    /// Returns whether the document is read from stdin.
    pub fn reads_stdin(&self) -> bool {
        match self.paths.as_slice() {
            [] => true,
            [only] => only.as_str() == "-",
            _ => false,
        }
    }
}
