//! Style section emission.

/// Comment placed at the top of the emitted style block.
pub const STYLE_REVIEW_COMMENT: &str = "/* Converted styles - review and adjust */";

/// Emits a scoped `<style>` section holding every extracted style block.
///
/// Each block is preceded by a blank line. Lines are trimmed and blank lines
/// dropped, so the original indentation is not kept.
pub(crate) fn emit_styles(styles: &[String], lines: &mut Vec<String>) {
    lines.push("<style scoped>".to_string());
    lines.push(STYLE_REVIEW_COMMENT.to_string());

    for block in styles {
        lines.push(String::new());
        lines.extend(
            block
                .split('\n')
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string),
        );
    }

    lines.push("</style>".to_string());
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_emit_styles_normalizes_indentation() {
        let mut lines = Vec::new();
        emit_styles(
            &[
                ".a {\n    color: red;\n\n}".to_string(),
                ".b { color: blue; }".to_string(),
            ],
            &mut lines,
        );
        assert_eq!(
            lines,
            vec![
                "<style scoped>",
                STYLE_REVIEW_COMMENT,
                "",
                ".a {",
                "color: red;",
                "}",
                "",
                ".b { color: blue; }",
                "</style>",
            ]
        );
    }
}
