//! Configuration loading.

use camino::{Utf8Path, Utf8PathBuf};
use html2vue_transformer::ApiStyle;
use serde::{Deserialize, Deserializer};
use std::fs;
use std::io;
use thiserror::Error;

/// Config file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "html2vue.json";

/// Extensions converted when the config names none.
pub const DEFAULT_EXTENSIONS: &[&str] = &[".html", ".htm"];

/// Patterns always ignored when walking directories.
pub const DEFAULT_IGNORES: &[&str] = &["**/node_modules/**", "**/dist/**", "**/.git/**"];

/// Config file errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file is not valid config JSON.
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: Utf8PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Project configuration from `html2vue.json`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    /// API style used when `--api` is not given.
    #[serde(default, deserialize_with = "deserialize_api_style")]
    pub api_style: Option<ApiStyle>,

    /// Output directory used when `--out-dir` is not given.
    #[serde(default)]
    pub out_dir: Option<Utf8PathBuf>,

    /// File extensions to convert when walking directories.
    #[serde(default)]
    pub extensions: Vec<String>,

    /// Glob patterns to ignore, in addition to `--ignore`.
    #[serde(default)]
    pub ignore: Vec<String>,
}

impl ProjectConfig {
    /// Loads the configuration for a run.
    ///
    /// An explicit path must load. Otherwise `html2vue.json` in `cwd` is
    /// used if it exists; if it is malformed a warning is printed and the
    /// defaults are used.
    pub fn load(cwd: &Utf8Path, explicit: Option<&Utf8Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        let path = cwd.join(CONFIG_FILE_NAME);
        if !path.exists() {
            return Ok(Self::default());
        }

        match Self::from_file(&path) {
            Ok(config) => Ok(config),
            Err(e) => {
                eprintln!("Warning: {}", e);
                Ok(Self::default())
            }
        }
    }

    /// Reads and parses a config file. `//` and `/* */` comments are allowed.
    pub fn from_file(path: &Utf8Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;

        serde_json::from_str(&strip_json_comments(&content)).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })
    }

    /// Returns the file extensions to convert.
    pub fn file_extensions(&self) -> Vec<&str> {
        if self.extensions.is_empty() {
            DEFAULT_EXTENSIONS.to_vec()
        } else {
            self.extensions.iter().map(|s| s.as_str()).collect()
        }
    }
}

fn deserialize_api_style<'de, D>(deserializer: D) -> Result<Option<ApiStyle>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(|name| name.parse().map_err(serde::de::Error::custom))
        .transpose()
}

/// Removes single-line and multi-line comments outside of strings.
fn strip_json_comments(json: &str) -> String {
    let mut result = String::with_capacity(json.len());
    let mut chars = json.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            result.push(c);
            if c == '"' {
                in_string = false;
            } else if c == '\\' {
                if let Some(next) = chars.next() {
                    result.push(next);
                }
            }
            continue;
        }

        if c == '"' {
            result.push(c);
            in_string = true;
        } else if c == '/' {
            match chars.peek() {
                Some('/') => {
                    while chars.next_if(|&next| next != '\n').is_some() {}
                }
                Some('*') => {
                    chars.next();
                    while let Some(next) = chars.next() {
                        if next == '*' && chars.next_if_eq(&'/').is_some() {
                            break;
                        }
                    }
                }
                _ => result.push(c),
            }
        } else {
            result.push(c);
        }
    }

    result
}
