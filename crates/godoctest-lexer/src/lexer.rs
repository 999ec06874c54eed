// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The lexer implementation using logos.

use godoctest_ast::token::{Token, TokenKind};
use godoctest_ast::Span;
use logos::Logos;

/// Raw token type for logos. Literal text is copied out in a second pass.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\f]+")]  // Skip horizontal whitespace (not newlines)
enum RawToken {
    // === Keywords ===
    #[token("break")]
    Break,
    #[token("case")]
    Case,
    #[token("chan")]
    Chan,
    #[token("const")]
    Const,
    #[token("continue")]
    Continue,
    #[token("default")]
    Default,
    #[token("defer")]
    Defer,
    #[token("else")]
    Else,
    #[token("fallthrough")]
    Fallthrough,
    #[token("for")]
    For,
    #[token("func")]
    Func,
    #[token("go")]
    Go,
    #[token("goto")]
    Goto,
    #[token("if")]
    If,
    #[token("import")]
    Import,
    #[token("interface")]
    Interface,
    #[token("map")]
    Map,
    #[token("package")]
    Package,
    #[token("range")]
    Range,
    #[token("return")]
    Return,
    #[token("select")]
    Select,
    #[token("struct")]
    Struct,
    #[token("switch")]
    Switch,
    #[token("type")]
    Type,
    #[token("var")]
    Var,

    // === Operators (order matters - longer first) ===
    // Three-character operators
    #[token("<<=")]
    LtLtEq,
    #[token(">>=")]
    GtGtEq,
    #[token("&^=")]
    AmpCaretEq,
    #[token("...")]
    Ellipsis,

    // Two-character operators
    #[token("&^")]
    AmpCaret,
    #[token("+=")]
    PlusEq,
    #[token("-=")]
    MinusEq,
    #[token("*=")]
    StarEq,
    #[token("/=")]
    SlashEq,
    #[token("%=")]
    PercentEq,
    #[token("&=")]
    AmpEq,
    #[token("|=")]
    PipeEq,
    #[token("^=")]
    CaretEq,
    #[token("<<")]
    LtLt,
    #[token(">>")]
    GtGt,
    #[token("&&")]
    AmpAmp,
    #[token("||")]
    PipePipe,
    #[token("<-")]
    Arrow,
    #[token("++")]
    PlusPlus,
    #[token("--")]
    MinusMinus,
    #[token("==")]
    EqEq,
    #[token("!=")]
    BangEq,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token(":=")]
    ColonEq,

    // Single-character operators
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("~")]
    Tilde,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("=")]
    Eq,
    #[token("!")]
    Bang,
    #[token(".")]
    Dot,

    // === Delimiters ===
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token(";")]
    Semi,
    #[token(":")]
    Colon,

    // === Newline (drives Go's semicolon insertion) ===
    #[token("\n")]
    #[token("\r\n")]
    Newline,

    // === Comments (kept: annotations live in them) ===
    #[regex(r"//[^\n]*")]
    LineComment,

    // Block comments - Go block comments do not nest
    #[token("/*", block_comment)]
    BlockComment,

    // === Literals ===
    #[regex(r"0[xX][0-9a-fA-F_]+")]
    #[regex(r"0[oO][0-7_]+")]
    #[regex(r"0[bB][01_]+")]
    #[regex(r"[0-9][0-9_]*")]
    Int,

    #[regex(r"[0-9][0-9_]*\.[0-9_]*([eE][+-]?[0-9][0-9_]*)?")]
    #[regex(r"\.[0-9][0-9_]*([eE][+-]?[0-9][0-9_]*)?")]
    #[regex(r"[0-9][0-9_]*[eE][+-]?[0-9][0-9_]*")]
    #[regex(r"0[xX][0-9a-fA-F_]*(\.[0-9a-fA-F_]*)?[pP][+-]?[0-9][0-9_]*")]
    Float,

    #[regex(r"[0-9][0-9_]*(\.[0-9_]*)?([eE][+-]?[0-9][0-9_]*)?i")]
    #[regex(r"\.[0-9][0-9_]*([eE][+-]?[0-9][0-9_]*)?i")]
    Imag,

    // Rune literal: one character or one escape sequence
    #[regex(r"'([^'\\\n]|\\[^\n][^'\n]*)'")]
    Char,

    // Interpreted string
    #[regex(r#""([^"\\\n]|\\[^\n])*""#)]
    String,

    // Raw string, may span lines
    #[regex(r"`[^`]*`")]
    RawString,

    // === Identifier (must come after keywords) ===
    #[regex(r"[\p{L}_][\p{L}\p{Nd}_]*")]
    Ident,
}

/// Consume a block comment. Returns false if it is never closed, consuming
/// the rest of the input so the error is reported once.
fn block_comment(lexer: &mut logos::Lexer<RawToken>) -> bool {
    let remainder = lexer.remainder();
    match remainder.find("*/") {
        Some(end) => {
            lexer.bump(end + 2);
            true
        }
        None => {
            lexer.bump(remainder.len());
            false
        }
    }
}

/// Maximum number of errors to collect before stopping.
const MAX_ERRORS: usize = 20;

/// The lexer for Go source code.
pub struct Lexer<'a> {
    source: &'a str,
    errors: Vec<LexError>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source code.
    pub fn new(source: &'a str) -> Self {
        Self { source, errors: Vec::new() }
    }

    /// Tokenize the entire source, collecting multiple errors.
    pub fn tokenize(&mut self) -> LexResult {
        let mut tokens = Vec::new();
        let mut logos_lexer = RawToken::lexer(self.source);

        while let Some(result) = logos_lexer.next() {
            if self.errors.len() >= MAX_ERRORS {
                break;
            }

            let span = logos_lexer.span();
            let slice = logos_lexer.slice();

            let kind = match result {
                Ok(raw) => convert_token(raw, slice),
                Err(()) => {
                    self.errors.push(classify_error(self.source, span.start, span.end));
                    continue;
                }
            };

            tokens.push(Token {
                kind,
                span: Span::new(span.start, span.end),
            });
        }

        tokens.push(Token {
            kind: TokenKind::Eof,
            span: Span::new(self.source.len(), self.source.len()),
        });

        LexResult {
            tokens,
            errors: std::mem::take(&mut self.errors),
        }
    }
}

/// Convert a raw logos token to our TokenKind, copying literal text.
fn convert_token(raw: RawToken, slice: &str) -> TokenKind {
    match raw {
        // Keywords
        RawToken::Break => TokenKind::Break,
        RawToken::Case => TokenKind::Case,
        RawToken::Chan => TokenKind::Chan,
        RawToken::Const => TokenKind::Const,
        RawToken::Continue => TokenKind::Continue,
        RawToken::Default => TokenKind::Default,
        RawToken::Defer => TokenKind::Defer,
        RawToken::Else => TokenKind::Else,
        RawToken::Fallthrough => TokenKind::Fallthrough,
        RawToken::For => TokenKind::For,
        RawToken::Func => TokenKind::Func,
        RawToken::Go => TokenKind::Go,
        RawToken::Goto => TokenKind::Goto,
        RawToken::If => TokenKind::If,
        RawToken::Import => TokenKind::Import,
        RawToken::Interface => TokenKind::Interface,
        RawToken::Map => TokenKind::Map,
        RawToken::Package => TokenKind::Package,
        RawToken::Range => TokenKind::Range,
        RawToken::Return => TokenKind::Return,
        RawToken::Select => TokenKind::Select,
        RawToken::Struct => TokenKind::Struct,
        RawToken::Switch => TokenKind::Switch,
        RawToken::Type => TokenKind::Type,
        RawToken::Var => TokenKind::Var,

        // Operators
        RawToken::LtLtEq => TokenKind::LtLtEq,
        RawToken::GtGtEq => TokenKind::GtGtEq,
        RawToken::AmpCaretEq => TokenKind::AmpCaretEq,
        RawToken::Ellipsis => TokenKind::Ellipsis,
        RawToken::AmpCaret => TokenKind::AmpCaret,
        RawToken::PlusEq => TokenKind::PlusEq,
        RawToken::MinusEq => TokenKind::MinusEq,
        RawToken::StarEq => TokenKind::StarEq,
        RawToken::SlashEq => TokenKind::SlashEq,
        RawToken::PercentEq => TokenKind::PercentEq,
        RawToken::AmpEq => TokenKind::AmpEq,
        RawToken::PipeEq => TokenKind::PipeEq,
        RawToken::CaretEq => TokenKind::CaretEq,
        RawToken::LtLt => TokenKind::LtLt,
        RawToken::GtGt => TokenKind::GtGt,
        RawToken::AmpAmp => TokenKind::AmpAmp,
        RawToken::PipePipe => TokenKind::PipePipe,
        RawToken::Arrow => TokenKind::Arrow,
        RawToken::PlusPlus => TokenKind::PlusPlus,
        RawToken::MinusMinus => TokenKind::MinusMinus,
        RawToken::EqEq => TokenKind::EqEq,
        RawToken::BangEq => TokenKind::BangEq,
        RawToken::LtEq => TokenKind::LtEq,
        RawToken::GtEq => TokenKind::GtEq,
        RawToken::ColonEq => TokenKind::ColonEq,
        RawToken::Plus => TokenKind::Plus,
        RawToken::Minus => TokenKind::Minus,
        RawToken::Star => TokenKind::Star,
        RawToken::Slash => TokenKind::Slash,
        RawToken::Percent => TokenKind::Percent,
        RawToken::Amp => TokenKind::Amp,
        RawToken::Pipe => TokenKind::Pipe,
        RawToken::Caret => TokenKind::Caret,
        RawToken::Tilde => TokenKind::Tilde,
        RawToken::Lt => TokenKind::Lt,
        RawToken::Gt => TokenKind::Gt,
        RawToken::Eq => TokenKind::Eq,
        RawToken::Bang => TokenKind::Bang,
        RawToken::Dot => TokenKind::Dot,

        // Delimiters
        RawToken::LParen => TokenKind::LParen,
        RawToken::RParen => TokenKind::RParen,
        RawToken::LBracket => TokenKind::LBracket,
        RawToken::RBracket => TokenKind::RBracket,
        RawToken::LBrace => TokenKind::LBrace,
        RawToken::RBrace => TokenKind::RBrace,
        RawToken::Comma => TokenKind::Comma,
        RawToken::Semi => TokenKind::Semi,
        RawToken::Colon => TokenKind::Colon,

        RawToken::Newline => TokenKind::Newline,
        RawToken::LineComment => TokenKind::Comment(slice.trim_end_matches('\r').to_string()),
        RawToken::BlockComment => TokenKind::Comment(slice.to_string()),

        // Literals keep their source text
        RawToken::Int => TokenKind::Int(slice.to_string()),
        RawToken::Float => TokenKind::Float(slice.to_string()),
        RawToken::Imag => TokenKind::Imag(slice.to_string()),
        RawToken::Char => TokenKind::Char(slice.to_string()),
        RawToken::String | RawToken::RawString => TokenKind::String(slice.to_string()),
        RawToken::Ident => TokenKind::Ident(slice.to_string()),
    }
}

/// Pick a friendly error for input logos could not match.
fn classify_error(source: &str, start: usize, end: usize) -> LexError {
    let rest = &source[start..];
    if rest.starts_with("/*") {
        LexError::unterminated_comment(start, end)
    } else if rest.starts_with('"') || rest.starts_with('`') {
        LexError::unterminated_string(start, end)
    } else if rest.starts_with('\'') {
        LexError::invalid_rune(start, end)
    } else {
        let ch = rest.chars().next().unwrap_or('?');
        LexError::unexpected_char(ch, start)
    }
}

/// Result of lexing: tokens plus any errors found.
#[derive(Debug)]
pub struct LexResult {
    pub tokens: Vec<Token>,
    pub errors: Vec<LexError>,
}

impl LexResult {
    /// Returns true if lexing completed without errors.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A lexer error with location and friendly message.
#[derive(Debug, Clone)]
pub struct LexError {
    pub span: Span,
    pub message: String,
    pub hint: Option<String>,
}

impl std::fmt::Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for LexError {}

impl LexError {
    fn unexpected_char(ch: char, pos: usize) -> Self {
        Self {
            span: Span::new(pos, pos + ch.len_utf8()),
            message: format!("Unexpected character '{}'", ch),
            hint: None,
        }
    }

    fn unterminated_string(start: usize, end: usize) -> Self {
        Self {
            span: Span::new(start, end.max(start + 1)),
            message: "Unterminated string".to_string(),
            hint: Some("interpreted strings end on the same line with '\"'; raw strings end with '`'".to_string()),
        }
    }

    fn unterminated_comment(start: usize, end: usize) -> Self {
        Self {
            span: Span::new(start, end),
            message: "Unterminated block comment".to_string(),
            hint: Some("close the comment with '*/'".to_string()),
        }
    }

    fn invalid_rune(start: usize, end: usize) -> Self {
        Self {
            span: Span::new(start, end.max(start + 1)),
            message: "Invalid rune literal".to_string(),
            hint: Some("a rune holds exactly one character, like 'a' or '\\n'".to_string()),
        }
    }
}
