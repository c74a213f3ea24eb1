//! Main conversion logic.

use crate::composition::emit_composition;
use crate::options::emit_options;
use crate::style::emit_styles;
use crate::template::emit_template;
use crate::types::ApiStyle;
use html2vue_parser::{parse, HtmlDocument, InvalidMarkupReason, ParseError};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use thiserror::Error;

/// Output when the template is empty after wrapper removal.
pub const NO_TEMPLATE_PLACEHOLDER: &str = "<!-- No valid template content found -->";

/// Output when the template does not look like markup.
pub const INVALID_HTML_PLACEHOLDER: &str =
    "<!-- Invalid HTML: Please paste valid HTML markup, not plain text or JavaScript code -->";

const FAILURE_PLACEHOLDER_PREFIX: &str = "<!-- Error converting HTML to Vue component: ";
const PLACEHOLDER_SUFFIX: &str = " -->";

/// Why a document could not be converted into a component.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConvertError {
    /// The input was empty or whitespace only.
    #[error("input is empty")]
    EmptyInput,

    /// Nothing was left of the template after wrapper removal.
    #[error("no valid template content found")]
    EmptyTemplate,

    /// The template does not look like markup.
    #[error("invalid HTML: {0}")]
    InvalidMarkup(InvalidMarkupReason),

    /// Conversion failed unexpectedly.
    #[error("{0}")]
    Internal(String),
}

impl ConvertError {
    /// Returns the placeholder output standing in for a component.
    ///
    /// Empty input converts to an empty string.
    pub fn placeholder(&self) -> String {
        match self {
            Self::EmptyInput => String::new(),
            Self::EmptyTemplate => NO_TEMPLATE_PLACEHOLDER.to_string(),
            Self::InvalidMarkup(_) => INVALID_HTML_PLACEHOLDER.to_string(),
            Self::Internal(message) => {
                let message = message.replace('\n', " ");
                format!("{FAILURE_PLACEHOLDER_PREFIX}{message}{PLACEHOLDER_SUFFIX}")
            }
        }
    }

    /// Returns the outcome this error reports as.
    pub fn outcome(&self) -> Outcome {
        match self {
            Self::EmptyInput => Outcome::EmptyInput,
            Self::EmptyTemplate => Outcome::EmptyTemplate,
            Self::InvalidMarkup(_) => Outcome::InvalidMarkup,
            Self::Internal(_) => Outcome::Failed,
        }
    }
}

impl From<ParseError> for ConvertError {
    fn from(error: ParseError) -> Self {
        match error {
            ParseError::EmptyTemplate => Self::EmptyTemplate,
            ParseError::InvalidMarkup { reason } => Self::InvalidMarkup(reason),
        }
    }
}

/// How a conversion ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// A component was produced.
    Converted,
    /// The input was blank; the output is empty.
    EmptyInput,
    /// The output is the invalid-markup placeholder.
    InvalidMarkup,
    /// The output is the empty-template placeholder.
    EmptyTemplate,
    /// The output is the failure placeholder.
    Failed,
}

impl Outcome {
    /// Classifies a [`convert`] output by its content.
    pub fn from_output(output: &str) -> Self {
        if output.is_empty() {
            Self::EmptyInput
        } else if output == NO_TEMPLATE_PLACEHOLDER {
            Self::EmptyTemplate
        } else if output == INVALID_HTML_PLACEHOLDER {
            Self::InvalidMarkup
        } else if output.starts_with(FAILURE_PLACEHOLDER_PREFIX)
            && output.ends_with(PLACEHOLDER_SUFFIX)
            && !output.contains('\n')
        {
            Self::Failed
        } else {
            Self::Converted
        }
    }

    /// Returns true if a component was produced.
    pub fn is_converted(&self) -> bool {
        matches!(self, Self::Converted)
    }

    /// Returns a short machine-readable name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Converted => "converted",
            Self::EmptyInput => "empty-input",
            Self::InvalidMarkup => "invalid-markup",
            Self::EmptyTemplate => "empty-template",
            Self::Failed => "failed",
        }
    }
}

/// Counts of what went into a converted component.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversionStats {
    /// State declarations emitted as reactive state or data fields.
    pub state: usize,
    /// Functions emitted as functions or methods.
    pub functions: usize,
    /// Style blocks carried into the style section.
    pub styles: usize,
}

impl ConversionStats {
    fn of(document: &HtmlDocument) -> Self {
        Self {
            state: document.script.state.len(),
            functions: document.script.functions.len(),
            styles: document.styles.len(),
        }
    }
}

/// The result of [`convert_with_report`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    /// The component text, or a placeholder.
    pub output: String,
    /// How the conversion ended.
    pub outcome: Outcome,
    /// Statement and block counts; `None` unless converted.
    pub stats: Option<ConversionStats>,
}

/// Converts an HTML document into a Vue single-file component.
///
/// Never fails: blank input gives an empty string, and every other problem
/// gives a one-line placeholder comment (see [`Outcome::from_output`]).
pub fn convert(html: &str, style: ApiStyle) -> String {
    convert_with_report(html, style).output
}

/// Converts an HTML document, surfacing the degraded cases as errors.
///
/// Panics raised while converting are returned as [`ConvertError::Internal`].
pub fn try_convert(html: &str, style: ApiStyle) -> Result<String, ConvertError> {
    guarded(html, style, render).map(|(output, _)| output)
}

/// Converts an HTML document and reports how the conversion went.
///
/// Panics raised while converting are caught here and reported as
/// [`Outcome::Failed`].
pub fn convert_with_report(html: &str, style: ApiStyle) -> Conversion {
    match guarded(html, style, render) {
        Ok((output, stats)) => Conversion {
            output,
            outcome: Outcome::Converted,
            stats: Some(stats),
        },
        Err(error) => Conversion {
            output: error.placeholder(),
            outcome: error.outcome(),
            stats: None,
        },
    }
}

type Rendered = Result<(String, ConversionStats), ConvertError>;

/// Runs `render_fn`, turning a panic into [`ConvertError::Internal`].
fn guarded(html: &str, style: ApiStyle, render_fn: fn(&str, ApiStyle) -> Rendered) -> Rendered {
    panic::catch_unwind(AssertUnwindSafe(|| render_fn(html, style)))
        .unwrap_or_else(|payload| Err(ConvertError::Internal(panic_message(&*payload))))
}

fn render(html: &str, style: ApiStyle) -> Rendered {
    if html.trim().is_empty() {
        return Err(ConvertError::EmptyInput);
    }

    let document = parse(html)?;
    let mut lines = Vec::new();

    emit_template(&document.template, &mut lines);
    lines.push(String::new());

    match style {
        ApiStyle::Composition => emit_composition(&document.script, &mut lines),
        ApiStyle::Options => emit_options(&document.script, &mut lines),
    }

    if !document.styles.is_empty() {
        lines.push(String::new());
        emit_styles(&document.styles, &mut lines);
    }

    Ok((lines.join("\n"), ConversionStats::of(&document)))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown error".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholders() {
        assert_eq!(ConvertError::EmptyInput.placeholder(), "");
        assert_eq!(
            ConvertError::EmptyTemplate.placeholder(),
            NO_TEMPLATE_PLACEHOLDER
        );
        assert_eq!(
            ConvertError::InvalidMarkup(InvalidMarkupReason::NoElements).placeholder(),
            INVALID_HTML_PLACEHOLDER
        );
        assert_eq!(
            ConvertError::Internal("boom\nagain".to_string()).placeholder(),
            "<!-- Error converting HTML to Vue component: boom again -->"
        );
    }

    #[test]
    fn test_outcome_from_output_matches_error() {
        for error in [
            ConvertError::EmptyInput,
            ConvertError::EmptyTemplate,
            ConvertError::InvalidMarkup(InvalidMarkupReason::NoElements),
            ConvertError::Internal("x".to_string()),
        ] {
            assert_eq!(Outcome::from_output(&error.placeholder()), error.outcome());
        }
        assert_eq!(
            Outcome::from_output("<template>\n</template>"),
            Outcome::Converted
        );
    }

    #[test]
    fn test_panic_message() {
        let payload: Box<dyn Any + Send> = Box::new("static");
        assert_eq!(panic_message(&*payload), "static");
        let payload: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(&*payload), "owned");
        let payload: Box<dyn Any + Send> = Box::new(42_u8);
        assert_eq!(panic_message(&*payload), "unknown error");
    }

    #[test]
    fn test_guarded_catches_panics() {
        fn exploding(_: &str, _: ApiStyle) -> Rendered {
            panic!("emitter\nexploded")
        }

        let result = guarded("<p>x</p>", ApiStyle::Options, exploding);
        assert_eq!(
            result,
            Err(ConvertError::Internal("emitter\nexploded".to_string()))
        );
        assert_eq!(
            result.unwrap_err().placeholder(),
            "<!-- Error converting HTML to Vue component: emitter exploded -->"
        );
    }

    #[test]
    fn test_report_stats() {
        let report = convert_with_report(
            "<style>p {}</style><p>x</p><script>const a = 1;\nfunction f() {\n}</script>",
            ApiStyle::Options,
        );
        assert_eq!(report.outcome, Outcome::Converted);
        assert_eq!(
            report.stats,
            Some(ConversionStats {
                state: 1,
                functions: 1,
                styles: 1
            })
        );
    }

    #[test]
    fn test_try_convert_errors() {
        assert_eq!(
            try_convert("  \n", ApiStyle::Composition),
            Err(ConvertError::EmptyInput)
        );
        assert_eq!(
            try_convert("<html><body></body></html>", ApiStyle::Composition),
            Err(ConvertError::EmptyTemplate)
        );
        assert!(matches!(
            try_convert("let x = 1; <b>", ApiStyle::Options),
            Err(ConvertError::InvalidMarkup(
                InvalidMarkupReason::LooksLikeCode { .. }
            ))
        ));
    }
}
