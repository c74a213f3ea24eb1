//! Parse error types.

use thiserror::Error;

/// Why a template candidate was rejected as markup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidMarkupReason {
    /// No `<tag ...>`-like syntax anywhere in the candidate.
    #[error("no element-like syntax found")]
    NoElements,

    /// The candidate opens like a source statement.
    #[error("content starts with the `{keyword}` keyword")]
    LooksLikeCode {
        /// The keyword the candidate opens with.
        keyword: String,
    },
}

/// An error that stops a document from being parsed into a component.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Nothing was left of the template after wrapper removal.
    #[error("no template content found")]
    EmptyTemplate,

    /// The template candidate does not look like markup.
    #[error("invalid markup: {reason}")]
    InvalidMarkup {
        /// What made the candidate invalid.
        reason: InvalidMarkupReason,
    },
}
