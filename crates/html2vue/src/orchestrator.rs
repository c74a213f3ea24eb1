//! Main orchestration logic.

use crate::cli::{Args, TimingFormat};
use crate::config::{ConfigError, ProjectConfig, DEFAULT_IGNORES};
use crate::output::{FileReport, FileStatus, Formatter, RunSummary};
use camino::{Utf8Path, Utf8PathBuf};
use globset::{Glob, GlobSet, GlobSetBuilder};
use html2vue_transformer::{component_name_from_path, convert_with_report, ApiStyle, Conversion};
use rayon::prelude::*;
use std::collections::hash_map::{Entry, HashMap};
use std::fs;
use std::io::{self, Write};
use std::time::{Duration, Instant};
use thiserror::Error;
use walkdir::WalkDir;

/// Orchestration errors.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// Failed to read an input.
    #[error("failed to read {path}: {source}")]
    ReadFailed {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to write an output.
    #[error("failed to write {path}: {source}")]
    WriteFailed {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },

    /// Invalid glob pattern.
    #[error("invalid glob pattern: {0}")]
    InvalidGlob(String),

    /// Invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A directory could not be walked.
    #[error("failed to walk {path}: {message}")]
    Walk { path: Utf8PathBuf, message: String },

    /// Two inputs map to the same component file.
    #[error("{path} conflicts with {first}")]
    OutputConflict {
        /// The component file both inputs map to.
        path: Utf8PathBuf,
        /// The input that claimed the file first.
        first: Utf8PathBuf,
    },
}

/// Settings resolved from the command line and config file.
#[derive(Debug)]
struct RunSettings {
    api: ApiStyle,
    out_dir: Option<Utf8PathBuf>,
    extensions: Vec<String>,
    ignore: GlobSet,
    timings: Option<TimingFormat>,
}

impl RunSettings {
    fn resolve(args: &Args, config: ProjectConfig) -> Result<Self, OrchestratorError> {
        let mut ignore_builder = GlobSetBuilder::new();
        for pattern in config.ignore.iter().chain(&args.ignore) {
            let glob =
                Glob::new(pattern).map_err(|e| OrchestratorError::InvalidGlob(e.to_string()))?;
            ignore_builder.add(glob);
        }
        for pattern in DEFAULT_IGNORES {
            if let Ok(glob) = Glob::new(pattern) {
                ignore_builder.add(glob);
            }
        }
        let ignore = ignore_builder
            .build()
            .map_err(|e| OrchestratorError::InvalidGlob(e.to_string()))?;

        let timings_enabled = args.timings
            || args.timings_format == TimingFormat::Json
            || read_env_bool("HTML2VUE_TIMINGS").unwrap_or(false);

        Ok(Self {
            api: args.api.map(ApiStyle::from).or(config.api_style).unwrap_or_default(),
            extensions: config
                .file_extensions()
                .iter()
                .map(|ext| ext.to_ascii_lowercase())
                .collect(),
            out_dir: args.out_dir.clone().or(config.out_dir),
            ignore,
            timings: timings_enabled.then_some(args.timings_format),
        })
    }
}

/// An input file and the directory it sits in relative to the walked root.
#[derive(Debug, Clone)]
struct InputFile {
    path: Utf8PathBuf,
    relative_dir: Utf8PathBuf,
}

/// A file after reading and converting.
struct ConvertedFile {
    input: InputFile,
    result: Result<Conversion, OrchestratorError>,
}

#[derive(Debug, Default)]
struct Timings {
    scan: Duration,
    convert: Duration,
    write: Duration,
}

/// Runs a conversion of every input named by `args`.
pub fn run(args: Args) -> Result<RunSummary, OrchestratorError> {
    let total_start = Instant::now();
    let cwd = std::env::current_dir()
        .ok()
        .and_then(|p| Utf8PathBuf::try_from(p).ok())
        .unwrap_or_else(|| Utf8PathBuf::from("."));

    let config = ProjectConfig::load(&cwd, args.config.as_deref())?;
    let settings = RunSettings::resolve(&args, config)?;

    if args.reads_stdin() {
        return run_stdin(settings.api);
    }

    let mut timings = Timings::default();

    let scan_start = Instant::now();
    let files = collect_inputs(&args.paths, &settings)?;
    timings.scan = scan_start.elapsed();

    let convert_start = Instant::now();
    let converted: Vec<ConvertedFile> = files
        .into_par_iter()
        .map(|input| {
            let result =
                read_input(&input.path).map(|source| convert_with_report(&source, settings.api));
            ConvertedFile { input, result }
        })
        .collect();
    timings.convert = convert_start.elapsed();

    let write_start = Instant::now();
    let summary = if args.stdout {
        print_components(converted)?
    } else {
        write_components(converted, settings.out_dir.as_deref())
    };
    timings.write = write_start.elapsed();

    let report = Formatter::new(args.output).format(&summary);
    if args.stdout {
        eprintln!("{}", report);
    } else {
        println!("{}", report);
    }

    if let Some(format) = settings.timings {
        print_timings(format, &timings, summary.files.len(), total_start.elapsed());
    }

    Ok(summary)
}

/// Converts stdin to stdout.
fn run_stdin(api: ApiStyle) -> Result<RunSummary, OrchestratorError> {
    let stdin_path = Utf8PathBuf::from("-");
    let source = io::read_to_string(io::stdin()).map_err(|source| OrchestratorError::ReadFailed {
        path: stdin_path.clone(),
        source,
    })?;

    let conversion = convert_with_report(&source, api);
    if !conversion.output.is_empty() {
        write_stdout(&format!("{}\n", conversion.output))?;
    }

    Ok(RunSummary {
        files: vec![FileReport {
            input: stdin_path,
            output: None,
            status: conversion.outcome.into(),
            counts: conversion.stats.map(Into::into),
            message: None,
        }],
    })
}

/// Expands the given paths into input files.
///
/// Files are taken as given. Directories are walked recursively, keeping
/// files with a configured extension that match no ignore pattern.
fn collect_inputs(
    paths: &[Utf8PathBuf],
    settings: &RunSettings,
) -> Result<Vec<InputFile>, OrchestratorError> {
    let mut inputs = Vec::new();

    for path in paths {
        if !path.is_dir() {
            inputs.push(InputFile {
                path: path.clone(),
                relative_dir: Utf8PathBuf::new(),
            });
            continue;
        }

        for entry in WalkDir::new(path).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => {
                    return Err(OrchestratorError::Walk {
                        path: path.clone(),
                        message: e.to_string(),
                    });
                }
                Err(e) => {
                    eprintln!("Warning: {}", e);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(file) = Utf8PathBuf::try_from(entry.into_path()) else {
                continue;
            };

            let relative = file.strip_prefix(path).unwrap_or(&file);
            if settings.ignore.is_match(relative.as_str()) || !has_extension(&file, settings) {
                continue;
            }

            inputs.push(InputFile {
                relative_dir: relative.parent().map(Utf8Path::to_owned).unwrap_or_default(),
                path: file,
            });
        }
    }

    Ok(inputs)
}

fn has_extension(path: &Utf8Path, settings: &RunSettings) -> bool {
    let file_name = path.file_name().unwrap_or("").to_ascii_lowercase();
    settings
        .extensions
        .iter()
        .any(|ext| file_name.ends_with(ext.as_str()))
}

fn read_input(path: &Utf8Path) -> Result<String, OrchestratorError> {
    fs::read_to_string(path).map_err(|source| OrchestratorError::ReadFailed {
        path: path.to_owned(),
        source,
    })
}

/// Returns where the component for `input` is written.
///
/// `pages/my-page.html` becomes `pages/MyPage.vue`, or
/// `<out_dir>/<relative dir>/MyPage.vue` with an output directory.
fn output_path(input: &InputFile, out_dir: Option<&Utf8Path>) -> Utf8PathBuf {
    let file_name = format!("{}.vue", component_name_from_path(input.path.as_str()));
    match out_dir {
        Some(dir) => dir.join(&input.relative_dir).join(file_name),
        None => input.path.with_file_name(file_name),
    }
}

/// Writes each component file in parallel.
fn write_components(converted: Vec<ConvertedFile>, out_dir: Option<&Utf8Path>) -> RunSummary {
    let planned = plan_targets(converted, out_dir);

    let files = planned
        .into_par_iter()
        .map(|(file, target)| match (file.result, target) {
            (Err(error), _) => failed_report(file.input.path, FileStatus::ReadFailed, error),
            (Ok(_), Err(conflict)) => {
                failed_report(file.input.path, FileStatus::WriteFailed, conflict)
            }
            (Ok(conversion), Ok(None)) => conversion_report(file.input.path, None, conversion),
            (Ok(conversion), Ok(Some(target))) => {
                match write_component(&target, &conversion.output) {
                    Ok(()) => conversion_report(file.input.path, Some(target), conversion),
                    Err(error) => failed_report(file.input.path, FileStatus::WriteFailed, error),
                }
            }
        })
        .collect();

    RunSummary { files }
}

type PlannedWrite = (ConvertedFile, Result<Option<Utf8PathBuf>, OrchestratorError>);

/// Assigns each converted file its component path, in input order.
///
/// Files with empty output get no path. A path already claimed by an earlier
/// input is an [`OrchestratorError::OutputConflict`].
fn plan_targets(converted: Vec<ConvertedFile>, out_dir: Option<&Utf8Path>) -> Vec<PlannedWrite> {
    let mut claimed: HashMap<Utf8PathBuf, Utf8PathBuf> = HashMap::new();

    converted
        .into_iter()
        .map(|file| {
            let target = match &file.result {
                Ok(conversion) if !conversion.output.is_empty() => {
                    let path = output_path(&file.input, out_dir);
                    match claimed.entry(path.clone()) {
                        Entry::Occupied(first) => Err(OrchestratorError::OutputConflict {
                            path,
                            first: first.get().clone(),
                        }),
                        Entry::Vacant(slot) => {
                            slot.insert(file.input.path.clone());
                            Ok(Some(path))
                        }
                    }
                }
                _ => Ok(None),
            };
            (file, target)
        })
        .collect()
}

fn write_component(target: &Utf8Path, output: &str) -> Result<(), OrchestratorError> {
    let write_failed = |source| OrchestratorError::WriteFailed {
        path: target.to_owned(),
        source,
    };
    if let Some(parent) = target.parent().filter(|p| !p.as_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_failed)?;
    }
    fs::write(target, format!("{output}\n")).map_err(write_failed)
}

/// Prints every component to stdout, with a `// <path>` header before each
/// one when there is more than one.
fn print_components(converted: Vec<ConvertedFile>) -> Result<RunSummary, OrchestratorError> {
    let printable = converted
        .iter()
        .filter(|file| matches!(&file.result, Ok(c) if !c.output.is_empty()))
        .count();

    let mut files = Vec::with_capacity(converted.len());
    let mut text = String::new();
    for file in converted {
        match file.result {
            Err(error) => files.push(failed_report(file.input.path, FileStatus::ReadFailed, error)),
            Ok(conversion) => {
                if !conversion.output.is_empty() {
                    if printable > 1 {
                        text.push_str(&format!("// {}\n", file.input.path));
                    }
                    text.push_str(&conversion.output);
                    text.push('\n');
                }
                files.push(conversion_report(file.input.path, None, conversion));
            }
        }
    }

    write_stdout(&text)?;
    Ok(RunSummary { files })
}

fn write_stdout(text: &str) -> Result<(), OrchestratorError> {
    let mut stdout = io::stdout().lock();
    stdout
        .write_all(text.as_bytes())
        .and_then(|()| stdout.flush())
        .map_err(|source| OrchestratorError::WriteFailed {
            path: Utf8PathBuf::from("-"),
            source,
        })
}

fn conversion_report(
    input: Utf8PathBuf,
    output: Option<Utf8PathBuf>,
    conversion: Conversion,
) -> FileReport {
    FileReport {
        input,
        output,
        status: conversion.outcome.into(),
        counts: conversion.stats.map(Into::into),
        message: None,
    }
}

fn failed_report(input: Utf8PathBuf, status: FileStatus, error: OrchestratorError) -> FileReport {
    eprintln!("Warning: {}", error);
    let message = match &error {
        OrchestratorError::ReadFailed { source, .. }
        | OrchestratorError::WriteFailed { source, .. } => source.to_string(),
        other => other.to_string(),
    };
    FileReport {
        input,
        output: None,
        status,
        counts: None,
        message: Some(message),
    }
}

fn print_timings(format: TimingFormat, timings: &Timings, file_count: usize, total: Duration) {
    match format {
        TimingFormat::Json => {
            let json = serde_json::json!({
                "file_scan_ms": duration_ms(timings.scan),
                "convert_ms": duration_ms(timings.convert),
                "write_ms": duration_ms(timings.write),
                "file_count": file_count,
                "total_ms": duration_ms(total),
            });
            eprintln!("{}", json);
        }
        TimingFormat::Text => {
            eprintln!("=== html2vue timings ===");
            eprintln!("file scan: {:?} ({} files)", timings.scan, file_count);
            eprintln!("convert: {:?}", timings.convert);
            eprintln!("write: {:?}", timings.write);
            eprintln!("total: {:?}", total);
        }
    }
}

fn duration_ms(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}

fn read_env_bool(name: &str) -> Option<bool> {
    let value = std::env::var(name).ok()?;
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn settings(args: &[&str]) -> RunSettings {
        let args = Args::parse_from(args);
        RunSettings::resolve(&args, ProjectConfig::default()).unwrap()
    }

    fn utf8_dir(dir: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::try_from(dir.path().to_path_buf()).expect("utf-8 temp dir")
    }

    #[test]
    fn test_output_path_next_to_input() {
        let input = InputFile {
            path: "site/pages/my-page.html".into(),
            relative_dir: "pages".into(),
        };
        assert_eq!(output_path(&input, None).as_str(), "site/pages/MyPage.vue");
    }

    #[test]
    fn test_output_path_in_out_dir_keeps_relative_dir() {
        let input = InputFile {
            path: "site/pages/my-page.html".into(),
            relative_dir: "pages".into(),
        };
        assert_eq!(
            output_path(&input, Some(Utf8Path::new("out"))).as_str(),
            "out/pages/MyPage.vue"
        );
    }

    #[test]
    fn test_output_path_for_bare_file_name() {
        let input = InputFile {
            path: "index.html".into(),
            relative_dir: Utf8PathBuf::new(),
        };
        assert_eq!(output_path(&input, None).as_str(), "Index.vue");
    }

    #[test]
    fn test_cli_flags_override_config() {
        let args = Args::parse_from(["html2vue", "--api", "composition", "x.html"]);
        let config: ProjectConfig =
            serde_json::from_str(r#"{ "apiStyle": "options", "outDir": "gen" }"#).unwrap();
        let settings = RunSettings::resolve(&args, config).unwrap();

        assert_eq!(settings.api, ApiStyle::Composition);
        assert_eq!(settings.out_dir.as_deref().map(|p| p.as_str()), Some("gen"));
    }

    #[test]
    fn test_config_api_style_used_without_flag() {
        let args = Args::parse_from(["html2vue", "x.html"]);
        let config: ProjectConfig = serde_json::from_str(r#"{ "apiStyle": "options" }"#).unwrap();
        let settings = RunSettings::resolve(&args, config).unwrap();
        assert_eq!(settings.api, ApiStyle::Options);
    }

    #[test]
    fn test_invalid_glob_is_rejected() {
        let args = Args::parse_from(["html2vue", "--ignore", "a/{b", "x.html"]);
        let result = RunSettings::resolve(&args, ProjectConfig::default());
        assert!(matches!(result, Err(OrchestratorError::InvalidGlob(_))));
    }

    #[test]
    fn test_timings_json_format_enables_timings() {
        let settings = settings(&["html2vue", "--timings-format", "json", "x.html"]);
        assert_eq!(settings.timings, Some(TimingFormat::Json));
    }

    #[test]
    fn test_collect_inputs_walks_and_filters() {
        let dir = TempDir::new().unwrap();
        let root = utf8_dir(&dir);
        fs::create_dir_all(root.join("pages")).unwrap();
        fs::create_dir_all(root.join("node_modules/pkg")).unwrap();
        fs::create_dir_all(root.join("drafts")).unwrap();
        fs::write(root.join("index.html"), "<p>a</p>").unwrap();
        fs::write(root.join("pages/about.HTM"), "<p>b</p>").unwrap();
        fs::write(root.join("pages/notes.txt"), "<p>c</p>").unwrap();
        fs::write(root.join("node_modules/pkg/demo.html"), "<p>d</p>").unwrap();
        fs::write(root.join("drafts/wip.html"), "<p>e</p>").unwrap();

        let settings = settings(&["html2vue", "--ignore", "drafts/**", "x.html"]);
        let inputs = collect_inputs(&[root.clone()], &settings).unwrap();
        let found: Vec<String> = inputs
            .iter()
            .map(|input| {
                input
                    .path
                    .strip_prefix(&root)
                    .unwrap()
                    .as_str()
                    .replace('\\', "/")
            })
            .collect();

        assert_eq!(found, vec!["index.html", "pages/about.HTM"]);
        assert_eq!(inputs[1].relative_dir.as_str(), "pages");
    }

    #[test]
    fn test_collect_inputs_keeps_explicit_files() {
        let settings = settings(&["html2vue", "x.html"]);
        let inputs =
            collect_inputs(&[Utf8PathBuf::from("does-not-exist.txt")], &settings).unwrap();
        assert_eq!(inputs.len(), 1);
        assert_eq!(inputs[0].relative_dir, Utf8PathBuf::new());
    }

    #[test]
    fn test_plan_targets_rejects_shared_component_paths() {
        let converted = |path: &str, html: &str| ConvertedFile {
            input: InputFile {
                path: path.into(),
                relative_dir: Utf8PathBuf::new(),
            },
            result: Ok(convert_with_report(html, ApiStyle::Composition)),
        };
        let planned = plan_targets(
            vec![
                converted("site/page.htm", "<p>one</p>"),
                converted("site/page.html", "<p>two</p>"),
                converted("site/blank.html", ""),
                converted("site/other.html", "<p>three</p>"),
            ],
            None,
        );
        let targets: Vec<_> = planned.iter().map(|(_, target)| target).collect();

        assert!(matches!(targets[0], Ok(Some(path)) if path.as_str() == "site/Page.vue"));
        let conflict = targets[1].as_ref().unwrap_err();
        assert!(matches!(
            conflict,
            OrchestratorError::OutputConflict { first, .. } if first.as_str() == "site/page.htm"
        ));
        assert_eq!(
            conflict.to_string(),
            "site/Page.vue conflicts with site/page.htm"
        );
        assert!(matches!(targets[2], Ok(None)));
        assert!(matches!(targets[3], Ok(Some(path)) if path.as_str() == "site/Other.vue"));
    }

    #[test]
    fn test_read_env_bool() {
        assert_eq!(read_env_bool("HTML2VUE_TEST_UNSET_VARIABLE"), None);
    }
}
