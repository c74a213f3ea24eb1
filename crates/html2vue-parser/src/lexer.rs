//! Statement lexer using logos.
//!
//! The lexer tokenizes a single trimmed line of behavior code. It only knows
//! the handful of tokens needed to recognize declaration shapes:
//! - declaration keywords (`function`, `const`, `let`, `var`)
//! - word-character identifiers
//! - the assignment, arrow, paren and brace punctuation
//!
//! Everything else (operators, quotes, dots) comes out as [`TokenKind::Error`],
//! which the shape matcher treats as "some other character".

use logos::Logos;
use text_size::{TextRange, TextSize};

/// A token produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    /// The kind of token.
    pub kind: TokenKind,
    /// The range of the token in the line.
    pub range: TextRange,
}

impl Token {
    /// Returns the text of this token in `line`.
    pub fn text<'src>(&self, line: &'src str) -> &'src str {
        &line[self.range]
    }
}

/// Token kinds for behavior statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Logos, Default)]
pub enum TokenKind {
    /// `function`
    #[token("function", priority = 5)]
    Function,

    /// `const`
    #[token("const", priority = 5)]
    Const,

    /// `let`
    #[token("let", priority = 5)]
    Let,

    /// `var`
    #[token("var", priority = 5)]
    Var,

    /// `=>`
    #[token("=>", priority = 10)]
    Arrow,

    /// `=`
    #[token("=", priority = 10)]
    Eq,

    /// `(`
    #[token("(", priority = 10)]
    LParen,

    /// `)`
    #[token(")", priority = 10)]
    RParen,

    /// `{`
    #[token("{", priority = 10)]
    LBrace,

    /// `}`
    #[token("}", priority = 10)]
    RBrace,

    /// `;`
    #[token(";", priority = 10)]
    Semi,

    /// `,`
    #[token(",", priority = 10)]
    Comma,

    /// A run of word characters (letters, digits, underscore).
    #[regex(r"[A-Za-z0-9_]+", priority = 3)]
    Ident,

    /// Whitespace
    #[regex(r"[ \t\r\n\f]+", priority = 3)]
    Whitespace,

    /// End of line
    Eof,

    /// Any character the lexer has no token for
    #[default]
    Error,
}

impl TokenKind {
    /// Returns true for the keywords that introduce a variable declaration.
    pub fn is_declaration_keyword(&self) -> bool {
        matches!(self, TokenKind::Const | TokenKind::Let | TokenKind::Var)
    }

    /// Returns a human-readable name for this token kind.
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Function => "'function'",
            TokenKind::Const => "'const'",
            TokenKind::Let => "'let'",
            TokenKind::Var => "'var'",
            TokenKind::Arrow => "'=>'",
            TokenKind::Eq => "'='",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::Semi => "';'",
            TokenKind::Comma => "','",
            TokenKind::Ident => "identifier",
            TokenKind::Whitespace => "whitespace",
            TokenKind::Eof => "end of line",
            TokenKind::Error => "other character",
        }
    }
}

/// A lexer for one line of behavior code.
pub struct Lexer<'src> {
    inner: logos::Lexer<'src, TokenKind>,
    source: &'src str,
    finished: bool,
}

impl<'src> Lexer<'src> {
    /// Creates a new lexer for the given line.
    pub fn new(source: &'src str) -> Self {
        Self {
            inner: TokenKind::lexer(source),
            source,
            finished: false,
        }
    }

    /// Returns the line being lexed.
    pub fn source(&self) -> &'src str {
        self.source
    }

    fn range(&self) -> TextRange {
        let span = self.inner.span();
        TextRange::new(
            TextSize::from(span.start as u32),
            TextSize::from(span.end as u32),
        )
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match self.inner.next() {
            Some(Ok(kind)) => Some(Token {
                kind,
                range: self.range(),
            }),
            Some(Err(())) => Some(Token {
                kind: TokenKind::Error,
                range: self.range(),
            }),
            None => {
                self.finished = true;
                let end = TextSize::from(self.source.len() as u32);
                Some(Token {
                    kind: TokenKind::Eof,
                    range: TextRange::empty(end),
                })
            }
        }
    }
}
