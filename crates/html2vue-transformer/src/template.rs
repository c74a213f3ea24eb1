//! Template section emission.

/// Class of the root element every template is wrapped in.
pub const WRAPPER_CLASS: &str = "app-wrapper";

/// Emits the `<template>` section.
///
/// Each template line is trimmed and indented four spaces inside the
/// wrapper element; blank lines stay empty.
pub(crate) fn emit_template(template: &str, lines: &mut Vec<String>) {
    lines.push("<template>".to_string());
    lines.push(format!("  <div class=\"{WRAPPER_CLASS}\">"));

    for line in template.split('\n') {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            lines.push(String::new());
        } else {
            lines.push(format!("    {trimmed}"));
        }
    }

    lines.push("  </div>".to_string());
    lines.push("</template>".to_string());
}
