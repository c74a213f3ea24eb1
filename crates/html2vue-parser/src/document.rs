//! Document-level extraction: block excision, template isolation and
//! template validation.

use crate::error::{InvalidMarkupReason, ParseError};
use crate::scan::{
    collapse_blank_lines, excise_elements, find_element, starts_with_ignore_case, strip_tags,
    TagForm,
};

/// Keywords that mark a template candidate as source code rather than markup.
const CODE_KEYWORDS: &[&str] = &[
    "const", "let", "var", "function", "class", "import", "export",
];

/// A document with its presentation and behavior blocks removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SanitizedDocument {
    /// The document text left after excising the blocks.
    pub residual: String,
    /// Trimmed contents of every non-empty `<style>` block, in document order.
    pub styles: Vec<String>,
    /// Trimmed contents of every non-empty `<script>` block, in document order.
    pub scripts: Vec<String>,
}

/// Removes the doctype declaration and extracts `<style>` and `<script>`
/// block contents.
///
/// Style blocks are excised first, then script blocks from what remains.
/// Blocks whose content is blank are removed from the text but not kept.
pub fn sanitize(source: &str) -> SanitizedDocument {
    let text = strip_tags(source, "!doctype", TagForm::Open);

    let mut styles = Vec::new();
    let text = excise_elements(&text, "style", |content| {
        push_trimmed(&mut styles, content)
    });

    let mut scripts = Vec::new();
    let residual = excise_elements(&text, "script", |content| {
        push_trimmed(&mut scripts, content)
    });

    SanitizedDocument {
        residual,
        styles,
        scripts,
    }
}

fn push_trimmed(blocks: &mut Vec<String>, content: &str) {
    let trimmed = content.trim();
    if !trimmed.is_empty() {
        blocks.push(trimmed.to_string());
    }
}

/// Isolates the template candidate from a sanitized document's residual text.
///
/// Wrapper and metadata markup is removed, the body's inner text is taken
/// when a body element with content exists (otherwise the whole residual),
/// and the result is trimmed with blank-line runs collapsed.
pub fn extract_template(residual: &str) -> String {
    let text = strip_tags(residual, "html", TagForm::OpenOrClose);
    let text = excise_elements(&text, "head", |_| {});

    let working = match find_element(&text, "body", 0) {
        Some(body) if body.content_end > body.content_start => {
            &text[body.content_start..body.content_end]
        }
        _ => text.as_str(),
    };

    let template = strip_tags(working, "body", TagForm::OpenOrClose);
    let template = strip_tags(&template, "meta", TagForm::Open);
    let template = strip_tags(&template, "link", TagForm::Open);
    let template = excise_elements(&template, "title", |_| {});

    collapse_blank_lines(template.trim())
}

/// Checks that a template candidate looks like markup.
///
/// A blank candidate is [`ParseError::EmptyTemplate`]. A candidate with no
/// element-like syntax, or one that opens with a declaration keyword, is
/// [`ParseError::InvalidMarkup`].
pub fn validate_template(candidate: &str) -> Result<(), ParseError> {
    if candidate.trim().is_empty() {
        return Err(ParseError::EmptyTemplate);
    }

    if !has_element_syntax(candidate) {
        return Err(ParseError::InvalidMarkup {
            reason: InvalidMarkupReason::NoElements,
        });
    }

    if let Some(keyword) = leading_code_keyword(candidate) {
        return Err(ParseError::InvalidMarkup {
            reason: InvalidMarkupReason::LooksLikeCode {
                keyword: keyword.to_string(),
            },
        });
    }

    Ok(())
}

/// Returns true if some `<` is directly followed by a letter and a `>`
/// appears anywhere after it.
fn has_element_syntax(text: &str) -> bool {
    let bytes = text.as_bytes();
    let first_open = bytes
        .windows(2)
        .position(|pair| pair[0] == b'<' && pair[1].is_ascii_alphabetic());

    match first_open {
        Some(pos) => bytes[pos + 2..].contains(&b'>'),
        None => false,
    }
}

/// Returns the declaration keyword `text` opens with, if it is followed by
/// whitespace.
fn leading_code_keyword(text: &str) -> Option<&'static str> {
    CODE_KEYWORDS.iter().copied().find(|keyword| {
        starts_with_ignore_case(text, keyword)
            && text[keyword.len()..]
                .chars()
                .next()
                .is_some_and(char::is_whitespace)
    })
}
