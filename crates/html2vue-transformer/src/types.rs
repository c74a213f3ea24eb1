//! Shared types: the API dialect selector and component naming.

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Name used when none can be derived from a file name.
pub const DEFAULT_COMPONENT_NAME: &str = "Component";

/// The Vue API dialect the script block is emitted in.
///
/// The dialect only changes the script section; template and style sections
/// are identical for both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ApiStyle {
    /// `<script setup>` with `ref()`-wrapped state.
    #[default]
    Composition,
    /// `defineComponent({ data, methods })`.
    Options,
}

impl ApiStyle {
    /// Returns the dialect's name as accepted by [`FromStr`].
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Composition => "composition",
            Self::Options => "options",
        }
    }
}

impl fmt::Display for ApiStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An API style name that is neither `composition` nor `options`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown API style `{0}`: expected `composition` or `options`")]
pub struct UnknownApiStyle(pub String);

impl FromStr for ApiStyle {
    type Err = UnknownApiStyle;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        if name.eq_ignore_ascii_case("composition") {
            Ok(Self::Composition)
        } else if name.eq_ignore_ascii_case("options") {
            Ok(Self::Options)
        } else {
            Err(UnknownApiStyle(s.to_string()))
        }
    }
}

/// Derives a PascalCase component name from a file path.
///
/// Given `/pages/my-page.html`, returns `"MyPage"`. Leading characters that
/// are not letters are dropped; every other non-alphanumeric character
/// starts a new word. Returns [`DEFAULT_COMPONENT_NAME`] when nothing usable
/// is left.
pub fn component_name_from_path(path: &str) -> String {
    let stem = Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();

    let name: String = stem
        .trim_start_matches(|c: char| !c.is_alphabetic())
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect();

    if name.is_empty() {
        DEFAULT_COMPONENT_NAME.to_string()
    } else {
        name
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
