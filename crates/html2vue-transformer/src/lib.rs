//! HTML to Vue single-file component transformation.
//!
//! This crate turns an HTML document into a `.vue` component. It handles:
//! - Wrapping the document's body markup in a `<template>` section
//! - Rewriting script state and functions for the Composition API or the
//!   Options API
//! - Carrying style blocks into a scoped `<style>` section
//!
//! Conversion never fails outright. Problems are reported through the
//! returned text itself: blank input gives an empty string, and rejected
//! input gives a one-line placeholder comment.
//!
//! # Example
//!
//! ```
//! use html2vue_transformer::{convert, ApiStyle};
//!
//! let html = r#"
//! <body>
//!     <button>Clicked {{ count }} times</button>
//!     <script>
//!         let count = 0;
//!     </script>
//! </body>
//! "#;
//!
//! let component = convert(html, ApiStyle::Composition);
//! assert!(component.contains("const count = ref(0)"));
//! ```

mod composition;
mod options;
mod style;
mod template;
mod transform;
mod types;

pub use composition::REVIEW_COMMENT;
pub use options::COMPONENT_NAME;
pub use style::STYLE_REVIEW_COMMENT;
pub use template::WRAPPER_CLASS;
pub use transform::{
    convert, convert_with_report, try_convert, Conversion, ConversionStats, ConvertError, Outcome,
    INVALID_HTML_PLACEHOLDER, NO_TEMPLATE_PLACEHOLDER,
};
pub use types::{component_name_from_path, ApiStyle, UnknownApiStyle, DEFAULT_COMPONENT_NAME};
