//! Composition API (`<script setup>`) emission.

use html2vue_parser::{ScriptAnalysis, StateStatement};

/// Reminder appended after converted statements.
pub const REVIEW_COMMENT: &str = "// TODO: Review and adjust the converted code";

/// Emits a `<script setup lang="ts">` block.
///
/// State declarations become `const name = ref(initializer)`; functions are
/// copied verbatim. Without any statements, a commented starter is emitted
/// instead and nothing is imported.
pub(crate) fn emit_composition(script: &ScriptAnalysis, lines: &mut Vec<String>) {
    lines.push(r#"<script setup lang="ts">"#.to_string());

    if script.is_empty() {
        lines.push("// Add your Composition API logic here".to_string());
        lines.push("// import { ref } from 'vue'".to_string());
        lines.push("// const count = ref(0)".to_string());
    } else {
        lines.push("import { ref } from 'vue'".to_string());
        lines.push(String::new());

        if !script.state.is_empty() {
            lines.push("// Reactive state (converted from variables)".to_string());
            lines.extend(script.state.iter().map(reactive_declaration));
            lines.push(String::new());
        }

        if !script.functions.is_empty() {
            lines.push("// Functions".to_string());
            lines.extend(script.functions.iter().map(|f| f.source.clone()));
            lines.push(String::new());
        }

        lines.push(REVIEW_COMMENT.to_string());
    }

    lines.push("</script>".to_string());
}

/// `let count = 0;` → `const count = ref(0)`
///
/// A declaration with nothing after the `=` is copied as written.
fn reactive_declaration(statement: &StateStatement) -> String {
    match &statement.initializer {
        Some(initializer) => format!("const {} = ref({})", statement.name, initializer),
        None => statement.source.clone(),
    }
}
