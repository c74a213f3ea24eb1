//! HTML document parser for html2vue.
//!
//! This crate splits a raw HTML document into the pieces a Vue single-file
//! component is built from:
//! - Style and script block contents (`<style>`, `<script>`)
//! - The template markup, with document, head and metadata wrappers removed
//! - State and function statements classified from the script blocks
//!
//! Nothing here builds a DOM or an AST. Extraction is textual and
//! case-insensitive; classification is a line-based heuristic.
//!
//! # Example
//!
//! ```
//! use html2vue_parser::parse;
//!
//! let source = r#"
//! <body>
//!     <button>Count</button>
//!     <script>
//!         let count = 0;
//!     </script>
//! </body>
//! "#;
//!
//! let document = parse(source).expect("valid markup");
//! assert_eq!(document.template, "<button>Count</button>");
//! assert_eq!(document.script.state[0].name.as_str(), "count");
//! ```

mod document;
mod error;
mod lexer;
mod scan;
mod script;

pub use document::{extract_template, sanitize, validate_template, SanitizedDocument};
pub use error::{InvalidMarkupReason, ParseError};
pub use lexer::{Lexer, Token, TokenKind};
pub use script::{
    classify_script, classify_scripts, strip_diagnostic_calls, DeclarationKeyword, FunctionForm,
    FunctionStatement, ScriptAnalysis, StateStatement,
};

/// A document split into template, styles and classified script.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HtmlDocument {
    /// The validated template markup.
    pub template: String,
    /// Style block contents, in document order.
    pub styles: Vec<String>,
    /// Statements classified from all script blocks.
    pub script: ScriptAnalysis,
}

/// Parses an HTML document.
///
/// Blocks are extracted first, then the template is isolated and validated.
/// Script blocks are only classified once the template is accepted.
pub fn parse(source: &str) -> Result<HtmlDocument, ParseError> {
    let sanitized = sanitize(source);
    let template = extract_template(&sanitized.residual);
    validate_template(&template)?;

    Ok(HtmlDocument {
        template,
        styles: sanitized.styles,
        script: classify_scripts(&sanitized.scripts),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty() {
        assert_eq!(parse(""), Err(ParseError::EmptyTemplate));
    }

    #[test]
    fn test_parse_simple_element() {
        let document = parse("<div>hello</div>").unwrap();
        assert_eq!(document.template, "<div>hello</div>");
        assert!(document.styles.is_empty());
        assert!(document.script.is_empty());
    }

    #[test]
    fn test_parse_with_script_and_style() {
        let source = r#"<style>p { color: red; }</style><p>x</p><script>const a = 1;</script>"#;
        let document = parse(source).unwrap();
        assert_eq!(document.template, "<p>x</p>");
        assert_eq!(document.styles, vec!["p { color: red; }"]);
        assert_eq!(document.script.state.len(), 1);
    }

    #[test]
    fn test_parse_plain_text() {
        assert!(matches!(
            parse("not html at all"),
            Err(ParseError::InvalidMarkup {
                reason: InvalidMarkupReason::NoElements
            })
        ));
    }

    #[test]
    fn test_parse_malformed() {
        assert!(parse("<<<>>><script>let x = {{{</script>").is_err());
    }
}
