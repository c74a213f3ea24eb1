//! Options API (`defineComponent`) emission.

use html2vue_parser::{FunctionForm, FunctionStatement, ScriptAnalysis, StateStatement};

/// The `name` field of every emitted component.
pub const COMPONENT_NAME: &str = "ConvertedComponent";

/// Emits a `<script lang="ts">` block exporting `defineComponent({...})`.
///
/// State declarations become `data()` fields and functions become entries of
/// `methods`, rewritten to method shorthand.
pub(crate) fn emit_options(script: &ScriptAnalysis, lines: &mut Vec<String>) {
    lines.push(r#"<script lang="ts">"#.to_string());
    lines.push("import { defineComponent } from 'vue'".to_string());
    lines.push(String::new());
    lines.push("export default defineComponent({".to_string());
    lines.push(format!("  name: '{COMPONENT_NAME}',"));

    lines.push("  data() {".to_string());
    lines.push("    return {".to_string());
    if script.state.is_empty() {
        lines.push("      // Add your component data here".to_string());
    } else {
        lines.extend(script.state.iter().map(data_field));
    }
    lines.push("    }".to_string());
    lines.push("  },".to_string());

    lines.push("  methods: {".to_string());
    if script.functions.is_empty() {
        lines.push("    // Add your component methods here".to_string());
    } else {
        emit_methods(&script.functions, lines);
    }
    lines.push("  },".to_string());

    lines.push("  mounted() {".to_string());
    lines.push("    // Add lifecycle hooks here".to_string());
    lines.push("  }".to_string());
    lines.push("})".to_string());
    lines.push("</script>".to_string());
}

/// `let count = 0;` → `      count: 0,`
///
/// A declaration with nothing after the `=` is copied as written.
fn data_field(statement: &StateStatement) -> String {
    match &statement.initializer {
        Some(initializer) => format!("      {}: {},", statement.name, initializer),
        None => statement.source.clone(),
    }
}

/// Emits every method, comma-separated, without a comma after the last one.
fn emit_methods(functions: &[FunctionStatement], lines: &mut Vec<String>) {
    for function in functions {
        lines.extend(
            method_shorthand(function)
                .split('\n')
                .map(|line| format!("    {line}")),
        );

        if !function.source.ends_with(',') {
            if let Some(last) = lines.last_mut() {
                if !last.trim_end().ends_with(',') {
                    last.push(',');
                }
            }
        }
    }

    if let Some(last) = lines.last_mut() {
        if last.ends_with(',') {
            last.pop();
        }
    }
}

/// Rewrites a function into method shorthand.
///
/// Only the head changes: `function name` becomes `name`, and
/// `const name = params =>` becomes `name` followed by the parameters. The
/// rest of the source is kept as written. Function expressions are copied
/// unchanged.
pub(crate) fn method_shorthand(function: &FunctionStatement) -> String {
    match function.form {
        FunctionForm::Declaration => function
            .source
            .strip_prefix("function")
            .map_or_else(|| function.source.clone(), |rest| rest.trim_start().to_string()),
        FunctionForm::Arrow => {
            format!("{}{} {}", function.name, function.params, function.body)
        }
        FunctionForm::Expression => function.source.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use html2vue_parser::classify_script;
    use pretty_assertions::assert_eq;

    fn shorthand(source: &str) -> String {
        let analysis = classify_script(source);
        method_shorthand(&analysis.functions[0])
    }

    fn emit(script: &str) -> String {
        let mut lines = Vec::new();
        emit_options(&classify_script(script), &mut lines);
        lines.join("\n")
    }

    #[test]
    fn test_declaration_shorthand() {
        assert_eq!(shorthand("function inc() { count++; }"), "inc() { count++; }");
        assert_eq!(
            shorthand("function add (a, b) {\nreturn a + b;\n}"),
            "add (a, b) {\nreturn a + b;\n}"
        );
    }

    #[test]
    fn test_arrow_shorthand_keeps_body() {
        assert_eq!(
            shorthand("const reset = () => {\ncount = 0;\n};"),
            "reset() {\ncount = 0;\n};"
        );
        assert_eq!(shorthand("const double = (x) => x * 2;"), "double(x) x * 2;");
        assert_eq!(shorthand("const id = v => v"), "idv v");
        assert_eq!(shorthand("const noop = () =>"), "noop() ");
    }

    #[test]
    fn test_expression_is_unchanged() {
        let source = "const greet = function (name) {\nreturn name;\n};";
        assert_eq!(shorthand(source), source);
    }

    #[test]
    fn test_methods_keep_terminators() {
        let output = emit("const reset = () => {\ncount = 0;\n};\nconst double = (x) => x * 2;");
        assert!(output.contains(
            "  methods: {\n    reset() {\n    count = 0;\n    };,\n    double(x) x * 2;\n  },"
        ));
    }

    #[test]
    fn test_empty_script_placeholders() {
        let output = emit("");
        assert!(output.contains("      // Add your component data here"));
        assert!(output.contains("    // Add your component methods here"));
        assert!(output.contains("  mounted() {\n    // Add lifecycle hooks here\n  }"));
    }

    #[test]
    fn test_full_options_block() {
        let output = emit(
            "let count = 0;\nconst step = 1;\nfunction increment() {\ncount += step;\n}\nconst reset = () => {\ncount = 0;\n}",
        );
        assert_eq!(
            output,
            r#"<script lang="ts">
import { defineComponent } from 'vue'

export default defineComponent({
  name: 'ConvertedComponent',
  data() {
    return {
      count: 0,
      step: 1,
    }
  },
  methods: {
    increment() {
    count += step;
    },
    reset() {
    count = 0;
    }
  },
  mounted() {
    // Add lifecycle hooks here
  }
})
</script>"#
        );
    }

    #[test]
    fn test_single_method_has_no_trailing_comma() {
        let output = emit("function inc() { count++; }");
        assert!(output.contains("  methods: {\n    inc() { count++; }\n  },"));
    }

    #[test]
    fn test_declaration_without_value_is_copied() {
        let output = emit("let pending =");
        assert!(output.contains("    return {\nlet pending =\n    }"));
        assert!(!output.contains("undefined"));
    }
}
