//! Behavior block classification.
//!
//! Each block is scanned line by line and split into state declarations and
//! function-like constructs. This is a heuristic, not a JavaScript parser:
//! function bodies are delimited by counting raw `{` and `}` characters, so
//! braces inside string literals, template literals or comments throw the
//! count off. That limitation is part of the classification behavior.
//!
//! The scanner is a two-state machine ([`ScanState`]): `Idle`, where lines are
//! either function starts, state declarations or dropped, and
//! `AccumulatingFunction`, where lines are appended to the current function
//! until its brace depth returns to zero.

use crate::lexer::{Lexer, Token, TokenKind};
use smol_str::SmolStr;

/// Diagnostic output calls stripped from behavior blocks (`console.<name>(...)`).
const DIAGNOSTIC_CALLS: &[&str] = &["log", "error", "warn", "info"];

/// The keyword a state declaration was written with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclarationKeyword {
    /// `const`
    Const,
    /// `let`
    Let,
    /// `var`
    Var,
}

impl DeclarationKeyword {
    fn from_token(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Const => Some(Self::Const),
            TokenKind::Let => Some(Self::Let),
            TokenKind::Var => Some(Self::Var),
            _ => None,
        }
    }

    /// Returns the keyword as written in source.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Const => "const",
            Self::Let => "let",
            Self::Var => "var",
        }
    }
}

/// A declaration with an initializer, e.g. `let count = 0;`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateStatement {
    /// The declaring keyword.
    pub keyword: DeclarationKeyword,
    /// The declared name.
    pub name: SmolStr,
    /// The initializer text with surrounding whitespace and one trailing `;`
    /// removed. `None` when nothing follows the `=`.
    pub initializer: Option<String>,
    /// The trimmed source line.
    pub source: String,
}

/// The syntactic form a function was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionForm {
    /// `function name(params) { ... }`
    Declaration,
    /// `const name = (params) => ...`
    Arrow,
    /// `const name = function(params) { ... }`
    Expression,
}

/// A named function, possibly spanning several source lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionStatement {
    /// The function name (the declared name for assigned forms).
    pub name: SmolStr,
    /// How the function was written.
    pub form: FunctionForm,
    /// The parameter list as written. Includes the parentheses, except for a
    /// bare single arrow parameter. Empty when no parameter list was found.
    pub params: String,
    /// Everything after the parameters (after `=>` and whitespace for arrows),
    /// through the end of the function, with lines joined by `\n`.
    pub body: String,
    /// The trimmed source lines joined by `\n`.
    pub source: String,
}

/// The classified statements of one or more behavior blocks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptAnalysis {
    /// State declarations, in source order.
    pub state: Vec<StateStatement>,
    /// Functions, in source order.
    pub functions: Vec<FunctionStatement>,
}

impl ScriptAnalysis {
    /// Returns true if no statement was classified.
    pub fn is_empty(&self) -> bool {
        self.state.is_empty() && self.functions.is_empty()
    }

    /// Appends the statements of a later block.
    pub fn extend(&mut self, other: ScriptAnalysis) {
        self.state.extend(other.state);
        self.functions.extend(other.functions);
    }
}

/// Classifies several behavior blocks, concatenating results in block order.
pub fn classify_scripts<I, S>(blocks: I) -> ScriptAnalysis
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut analysis = ScriptAnalysis::default();
    for block in blocks {
        analysis.extend(classify_script(block.as_ref()));
    }
    analysis
}

/// Classifies the statements of one behavior block.
pub fn classify_script(block: &str) -> ScriptAnalysis {
    let cleaned = strip_diagnostic_calls(block);
    let mut analysis = ScriptAnalysis::default();
    let mut state = ScanState::Idle;

    for raw_line in cleaned.trim().split('\n') {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with("//") {
            continue;
        }
        state = state.step(line, &mut analysis);
    }

    if let ScanState::AccumulatingFunction(pending) = state {
        // Unbalanced braces: keep what was collected.
        analysis.functions.push(pending.finish());
    }

    analysis
}

/// Removes `console.log(...)`-style calls from a block.
///
/// A call matches when its arguments contain no `)`; the first `)` closes it
/// and a directly following `;` goes with it.
pub fn strip_diagnostic_calls(script: &str) -> String {
    const PREFIX: &str = "console.";

    let mut out = String::with_capacity(script.len());
    let mut cursor = 0;
    let mut search = 0;

    while let Some(offset) = script[search..].find(PREFIX) {
        let start = search + offset;
        let after_prefix = start + PREFIX.len();

        let call_end = DIAGNOSTIC_CALLS.iter().find_map(|name| {
            let args = script[after_prefix..]
                .strip_prefix(name)?
                .strip_prefix('(')?;
            let args_start = script.len() - args.len();
            let mut end = args_start + args.find(')')? + 1;
            if script[end..].starts_with(';') {
                end += 1;
            }
            Some(end)
        });

        match call_end {
            Some(end) => {
                out.push_str(&script[cursor..start]);
                cursor = end;
                search = end;
            }
            None => search = after_prefix,
        }
    }

    out.push_str(&script[cursor..]);
    out
}

#[derive(Debug)]
enum ScanState {
    Idle,
    AccumulatingFunction(PendingFunction),
}

impl ScanState {
    fn step(self, line: &str, analysis: &mut ScriptAnalysis) -> ScanState {
        match (recognize(line), self) {
            // A new function start replaces whatever was being accumulated.
            (LineShape::FunctionStart(head), _) => {
                let pending = PendingFunction::new(head, line);
                if line.contains("=>") && !line.ends_with('{') {
                    analysis.functions.push(pending.finish());
                    ScanState::Idle
                } else {
                    ScanState::AccumulatingFunction(pending)
                }
            }
            (_, ScanState::AccumulatingFunction(mut pending)) => {
                pending.push_line(line);
                if pending.depth == 0 {
                    analysis.functions.push(pending.finish());
                    ScanState::Idle
                } else {
                    ScanState::AccumulatingFunction(pending)
                }
            }
            (LineShape::State(statement), ScanState::Idle) => {
                analysis.state.push(statement);
                ScanState::Idle
            }
            (LineShape::Other, ScanState::Idle) => ScanState::Idle,
        }
    }
}

#[derive(Debug)]
struct PendingFunction {
    head: FunctionHead,
    first_line_len: usize,
    source: String,
    depth: isize,
}

impl PendingFunction {
    fn new(head: FunctionHead, line: &str) -> Self {
        Self {
            head,
            first_line_len: line.len(),
            source: line.to_string(),
            depth: brace_delta(line),
        }
    }

    fn push_line(&mut self, line: &str) {
        self.source.push('\n');
        self.source.push_str(line);
        self.depth += brace_delta(line);
    }

    fn finish(self) -> FunctionStatement {
        let mut body = self.head.rest;
        body.push_str(&self.source[self.first_line_len..]);
        FunctionStatement {
            name: self.head.name,
            form: self.head.form,
            params: self.head.params,
            body,
            source: self.source,
        }
    }
}

fn brace_delta(line: &str) -> isize {
    line.chars().fold(0, |depth, c| match c {
        '{' => depth + 1,
        '}' => depth - 1,
        _ => depth,
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct FunctionHead {
    name: SmolStr,
    form: FunctionForm,
    params: String,
    /// The rest of the first line after the parameters.
    rest: String,
}

#[derive(Debug)]
enum LineShape {
    FunctionStart(FunctionHead),
    State(StateStatement),
    Other,
}

/// Matches a trimmed line against the recognized statement shapes.
fn recognize(line: &str) -> LineShape {
    let tokens: Vec<Token> = Lexer::new(line).collect();
    let cursor = Cursor::new(line, &tokens);

    let head = match cursor.peek() {
        TokenKind::Function => declaration_head(cursor),
        TokenKind::Const => arrow_head(cursor).or_else(|| expression_head(cursor)),
        _ => None,
    };

    if let Some(head) = head {
        return LineShape::FunctionStart(head);
    }

    match state_statement(cursor) {
        Some(statement) => LineShape::State(statement),
        None => LineShape::Other,
    }
}

/// `function` WS+ Ident ...
fn declaration_head(mut cursor: Cursor<'_>) -> Option<FunctionHead> {
    cursor.eat(TokenKind::Function)?;
    cursor.expect_whitespace()?;
    let name = cursor.eat(TokenKind::Ident)?;
    let (params, rest) = cursor.parenthesized_params();

    Some(FunctionHead {
        name: SmolStr::new(cursor.text(name)),
        form: FunctionForm::Declaration,
        params,
        rest,
    })
}

/// `const` WS+ Ident WS* `=` WS* ( `(`...`)` | Ident ) WS* `=>` WS* ...
fn arrow_head(mut cursor: Cursor<'_>) -> Option<FunctionHead> {
    let name = cursor.const_assignment()?;

    let params = match cursor.peek() {
        TokenKind::LParen => {
            let start = cursor.offset();
            cursor.skip_past(TokenKind::RParen)?;
            cursor.line[start..cursor.offset()].to_string()
        }
        TokenKind::Ident => {
            let param = cursor.eat(TokenKind::Ident)?;
            cursor.text(param).to_string()
        }
        _ => return None,
    };

    cursor.skip_whitespace();
    cursor.eat(TokenKind::Arrow)?;
    cursor.skip_whitespace();

    Some(FunctionHead {
        name,
        form: FunctionForm::Arrow,
        params,
        rest: cursor.rest().to_string(),
    })
}

/// `const` WS+ Ident WS* `=` WS* `function` ...
fn expression_head(mut cursor: Cursor<'_>) -> Option<FunctionHead> {
    let name = cursor.const_assignment()?;
    cursor.eat(TokenKind::Function)?;

    // An inner name (`function inner(...)`) is dropped in favor of the
    // declared one.
    let mut lookahead = cursor;
    lookahead.skip_whitespace();
    if lookahead.eat(TokenKind::Ident).is_some() {
        cursor = lookahead;
    }
    let (params, rest) = cursor.parenthesized_params();

    Some(FunctionHead {
        name,
        form: FunctionForm::Expression,
        params,
        rest,
    })
}

/// (`const`|`let`|`var`) WS+ Ident WS* `=` ...
fn state_statement(mut cursor: Cursor<'_>) -> Option<StateStatement> {
    let keyword = DeclarationKeyword::from_token(cursor.peek())?;
    cursor.bump();
    cursor.expect_whitespace()?;
    let name = cursor.eat(TokenKind::Ident)?;
    cursor.skip_whitespace();

    // `=>` also starts with `=`; the initializer then begins at `>`.
    if !matches!(cursor.peek(), TokenKind::Eq | TokenKind::Arrow) {
        return None;
    }
    let value = cursor.line[cursor.offset() + 1..].trim();
    let initializer = (!value.is_empty())
        .then(|| value.strip_suffix(';').unwrap_or(value).to_string());

    Some(StateStatement {
        keyword,
        name: SmolStr::new(cursor.text(name)),
        initializer,
        source: cursor.line.to_string(),
    })
}

/// A position in a lexed line.
#[derive(Debug, Clone, Copy)]
struct Cursor<'a> {
    line: &'a str,
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(line: &'a str, tokens: &'a [Token]) -> Self {
        Self {
            line,
            tokens,
            pos: 0,
        }
    }

    fn peek(&self) -> TokenKind {
        self.tokens
            .get(self.pos)
            .map_or(TokenKind::Eof, |token| token.kind)
    }

    fn bump(&mut self) -> Option<Token> {
        let token = *self.tokens.get(self.pos)?;
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        Some(token)
    }

    fn eat(&mut self, kind: TokenKind) -> Option<Token> {
        if self.peek() == kind {
            self.bump()
        } else {
            None
        }
    }

    fn skip_whitespace(&mut self) {
        self.eat(TokenKind::Whitespace);
    }

    fn expect_whitespace(&mut self) -> Option<()> {
        self.eat(TokenKind::Whitespace).map(|_| ())
    }

    /// Advances past the first token of `kind`; `None` if the line ends first.
    fn skip_past(&mut self, kind: TokenKind) -> Option<()> {
        loop {
            match self.peek() {
                TokenKind::Eof => return None,
                found => {
                    self.bump();
                    if found == kind {
                        return Some(());
                    }
                }
            }
        }
    }

    /// `const` WS+ Ident WS* `=` WS*, returning the declared name.
    fn const_assignment(&mut self) -> Option<SmolStr> {
        self.eat(TokenKind::Const)?;
        self.expect_whitespace()?;
        let name = self.eat(TokenKind::Ident)?;
        self.skip_whitespace();
        self.eat(TokenKind::Eq)?;
        self.skip_whitespace();
        Some(SmolStr::new(self.text(name)))
    }

    /// Splits off a `(`...`)` parameter list after optional whitespace.
    ///
    /// Without one, the parameters are empty and the rest starts here.
    fn parenthesized_params(self) -> (String, String) {
        let mut params = self;
        params.skip_whitespace();
        let start = params.offset();
        if params.eat(TokenKind::LParen).is_some() && params.skip_past(TokenKind::RParen).is_some()
        {
            return (
                self.line[start..params.offset()].to_string(),
                params.rest().to_string(),
            );
        }
        (String::new(), self.rest().to_string())
    }

    fn offset(&self) -> usize {
        self.tokens
            .get(self.pos)
            .map_or(self.line.len(), |token| usize::from(token.range.start()))
    }

    fn rest(&self) -> &'a str {
        &self.line[self.offset()..]
    }

    fn text(&self, token: Token) -> &'a str {
        token.text(self.line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn names(analysis: &ScriptAnalysis) -> (Vec<&str>, Vec<&str>) {
        (
            analysis.state.iter().map(|s| s.name.as_str()).collect(),
            analysis.functions.iter().map(|f| f.name.as_str()).collect(),
        )
    }

    #[test]
    fn test_state_declarations() {
        let analysis = classify_script("let count = 0;\nvar name = \"x\";\nconst items = [];");
        assert_eq!(names(&analysis), (vec!["count", "name", "items"], vec![]));
        assert_eq!(analysis.state[0].keyword, DeclarationKeyword::Let);
        assert_eq!(analysis.state[0].initializer.as_deref(), Some("0"));
        assert_eq!(analysis.state[1].initializer.as_deref(), Some("\"x\""));
        assert_eq!(analysis.state[2].source, "const items = [];");
    }

    #[test]
    fn test_initializer_keeps_inner_semicolons() {
        let analysis = classify_script("let s = \"a;b\";;");
        assert_eq!(analysis.state[0].initializer.as_deref(), Some("\"a;b\";"));
    }

    #[test]
    fn test_declaration_without_value() {
        let analysis = classify_script("let pending =");
        assert_eq!(analysis.state.len(), 1);
        assert_eq!(analysis.state[0].initializer, None);
    }

    #[test]
    fn test_multiline_function_declaration() {
        let analysis = classify_script(
            "function increment() {\n    count++;\n    render();\n}\nlet after = 1;",
        );
        assert_eq!(names(&analysis), (vec!["after"], vec!["increment"]));
        let func = &analysis.functions[0];
        assert_eq!(func.form, FunctionForm::Declaration);
        assert_eq!(func.params, "()");
        assert_eq!(func.body, " {\ncount++;\nrender();\n}");
        assert_eq!(func.source, "function increment() {\ncount++;\nrender();\n}");
    }

    #[test]
    fn test_single_line_arrow_function() {
        let analysis = classify_script("const double = (x) => x * 2;\nconst y = 1;");
        assert_eq!(names(&analysis), (vec!["y"], vec!["double"]));
        let func = &analysis.functions[0];
        assert_eq!(func.form, FunctionForm::Arrow);
        assert_eq!(func.params, "(x)");
        assert_eq!(func.body, "x * 2;");
    }

    #[test]
    fn test_bare_parameter_arrow() {
        let analysis = classify_script("const square = n=>n * n");
        assert_eq!(analysis.functions[0].params, "n");
        assert_eq!(analysis.functions[0].body, "n * n");
    }

    #[test]
    fn test_multiline_arrow_function() {
        let analysis = classify_script("const reset = () => {\n  count = 0;\n};");
        let func = &analysis.functions[0];
        assert_eq!(func.params, "()");
        assert_eq!(func.body, "{\ncount = 0;\n};");
    }

    #[test]
    fn test_function_expression() {
        let analysis = classify_script("const add = function named (a, b) {\nreturn a + b;\n}");
        let func = &analysis.functions[0];
        assert_eq!(func.name.as_str(), "add");
        assert_eq!(func.form, FunctionForm::Expression);
        assert_eq!(func.params, "(a, b)");
        assert_eq!(func.body, " {\nreturn a + b;\n}");
    }

    #[test]
    fn test_let_arrow_is_state() {
        let analysis = classify_script("let handler = () => go();");
        assert_eq!(names(&analysis), (vec!["handler"], vec![]));
        assert_eq!(analysis.state[0].initializer.as_deref(), Some("() => go()"));
    }

    #[test]
    fn test_async_arrow_is_state() {
        let analysis = classify_script("const load = async () => fetchAll();");
        assert_eq!(names(&analysis), (vec!["load"], vec![]));
    }

    #[test]
    fn test_unrecognized_lines_are_dropped() {
        let analysis = classify_script("document.title = 'x';\nif (ready) {\nstart();\n}\nconst a = 1;");
        assert_eq!(names(&analysis), (vec!["a"], vec![]));
    }

    #[test]
    fn test_comments_and_blank_lines_skipped() {
        let analysis = classify_script("// state\n\nconst a = 1;\n   // more\nconst b = 2;");
        assert_eq!(names(&analysis), (vec!["a", "b"], vec![]));
    }

    #[test]
    fn test_balanced_single_line_declaration_absorbs_next_line() {
        // Depth is already zero after the first line, so the next line is
        // appended and closes the function.
        let analysis = classify_script("function inc() { count++; }\nconst x = 1;\nconst y = 2;");
        assert_eq!(names(&analysis), (vec!["y"], vec!["inc"]));
        assert_eq!(
            analysis.functions[0].source,
            "function inc() { count++; }\nconst x = 1;"
        );
    }

    #[test]
    fn test_unbalanced_function_is_flushed() {
        let analysis = classify_script("function broken() {\nif (a) {\nrun();");
        assert_eq!(names(&analysis), (vec![], vec!["broken"]));
        assert_eq!(analysis.functions[0].source, "function broken() {\nif (a) {\nrun();");
    }

    #[test]
    fn test_new_function_start_replaces_pending_function() {
        let analysis = classify_script("function outer() {\nfunction inner() {\nreturn 1;\n}\n}");
        assert_eq!(names(&analysis), (vec![], vec!["inner"]));
    }

    #[test]
    fn test_braces_in_strings_are_counted() {
        let analysis = classify_script("function f() {\nconst s = \"}\";\nreturn s;\n}\nconst z = 1;");
        assert_eq!(analysis.functions[0].source, "function f() {\nconst s = \"}\";");
        assert_eq!(names(&analysis), (vec!["z"], vec!["f"]));
    }

    #[test]
    fn test_diagnostic_calls_removed() {
        assert_eq!(
            strip_diagnostic_calls("a();\nconsole.log('x', y);\nconsole.warn(1)\nb();"),
            "a();\n\n\nb();"
        );
        assert_eq!(
            strip_diagnostic_calls("console.debug(1);console.error(f(x));"),
            "console.debug(1););"
        );
    }

    #[test]
    fn test_diagnostic_calls_do_not_become_statements() {
        let analysis = classify_script("const a = 1;\nconsole.log(a);\nconst b = 2;");
        assert_eq!(names(&analysis), (vec!["a", "b"], vec![]));
    }

    #[test]
    fn test_classify_scripts_preserves_block_order() {
        let analysis = classify_scripts(["const a = 1;", "const b = 2;\nfunction go() {\n}"]);
        assert_eq!(names(&analysis), (vec!["a", "b"], vec!["go"]));
    }

    #[test]
    fn test_malformed_block_does_not_panic() {
        let analysis = classify_script("let x = {{{");
        assert_eq!(analysis.state[0].initializer.as_deref(), Some("{{{"));
        let analysis = classify_script("function");
        assert!(analysis.is_empty());
        let analysis = classify_script("const f = (a, b");
        assert!(analysis.functions.is_empty());
    }
}
