// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Token definitions for the Go lexer.

use crate::Span;

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

/// The kind of token.
///
/// Literals keep their verbatim source text: the generator copies values
/// into generated Go code and never needs them decoded.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals
    Int(String),
    Float(String),
    Imag(String),
    Char(String),
    String(String),

    // Identifier
    Ident(String),

    // Keywords
    Break,
    Case,
    Chan,
    Const,
    Continue,
    Default,
    Defer,
    Else,
    Fallthrough,
    For,
    Func,
    Go,
    Goto,
    If,
    Import,
    Interface,
    Map,
    Package,
    Range,
    Return,
    Select,
    Struct,
    Switch,
    Type,
    Var,

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Amp,          // &
    Pipe,         // |
    Caret,        // ^
    Tilde,        // ~
    LtLt,         // <<
    GtGt,         // >>
    AmpCaret,     // &^
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    PercentEq,
    AmpEq,
    PipeEq,
    CaretEq,
    LtLtEq,
    GtGtEq,
    AmpCaretEq,
    AmpAmp,
    PipePipe,
    Arrow,        // <-
    PlusPlus,
    MinusMinus,
    EqEq,
    Lt,
    Gt,
    Eq,
    Bang,
    BangEq,
    LtEq,
    GtEq,
    ColonEq,      // :=
    Ellipsis,     // ...
    Dot,

    // Delimiters
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Semi,
    Colon,

    // Trivia the parser cares about
    /// A `//` or `/* */` comment, delimiters included.
    Comment(String),
    Newline,
    Eof,
}

impl TokenKind {
    /// Returns a human-readable name for this token kind.
    pub fn display_name(&self) -> &'static str {
        match self {
            TokenKind::Int(_) | TokenKind::Float(_) | TokenKind::Imag(_) => "a number",
            TokenKind::Char(_) => "a rune",
            TokenKind::String(_) => "a string",
            TokenKind::Ident(_) => "a name",

            TokenKind::Break => "'break'",
            TokenKind::Case => "'case'",
            TokenKind::Chan => "'chan'",
            TokenKind::Const => "'const'",
            TokenKind::Continue => "'continue'",
            TokenKind::Default => "'default'",
            TokenKind::Defer => "'defer'",
            TokenKind::Else => "'else'",
            TokenKind::Fallthrough => "'fallthrough'",
            TokenKind::For => "'for'",
            TokenKind::Func => "'func'",
            TokenKind::Go => "'go'",
            TokenKind::Goto => "'goto'",
            TokenKind::If => "'if'",
            TokenKind::Import => "'import'",
            TokenKind::Interface => "'interface'",
            TokenKind::Map => "'map'",
            TokenKind::Package => "'package'",
            TokenKind::Range => "'range'",
            TokenKind::Return => "'return'",
            TokenKind::Select => "'select'",
            TokenKind::Struct => "'struct'",
            TokenKind::Switch => "'switch'",
            TokenKind::Type => "'type'",
            TokenKind::Var => "'var'",

            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::Star => "'*'",
            TokenKind::Slash => "'/'",
            TokenKind::Percent => "'%'",
            TokenKind::Amp => "'&'",
            TokenKind::Pipe => "'|'",
            TokenKind::Caret => "'^'",
            TokenKind::Tilde => "'~'",
            TokenKind::LtLt => "'<<'",
            TokenKind::GtGt => "'>>'",
            TokenKind::AmpCaret => "'&^'",
            TokenKind::PlusEq => "'+='",
            TokenKind::MinusEq => "'-='",
            TokenKind::StarEq => "'*='",
            TokenKind::SlashEq => "'/='",
            TokenKind::PercentEq => "'%='",
            TokenKind::AmpEq => "'&='",
            TokenKind::PipeEq => "'|='",
            TokenKind::CaretEq => "'^='",
            TokenKind::LtLtEq => "'<<='",
            TokenKind::GtGtEq => "'>>='",
            TokenKind::AmpCaretEq => "'&^='",
            TokenKind::AmpAmp => "'&&'",
            TokenKind::PipePipe => "'||'",
            TokenKind::Arrow => "'<-'",
            TokenKind::PlusPlus => "'++'",
            TokenKind::MinusMinus => "'--'",
            TokenKind::EqEq => "'=='",
            TokenKind::Lt => "'<'",
            TokenKind::Gt => "'>'",
            TokenKind::Eq => "'='",
            TokenKind::Bang => "'!'",
            TokenKind::BangEq => "'!='",
            TokenKind::LtEq => "'<='",
            TokenKind::GtEq => "'>='",
            TokenKind::ColonEq => "':='",
            TokenKind::Ellipsis => "'...'",
            TokenKind::Dot => "'.'",

            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::LBracket => "'['",
            TokenKind::RBracket => "']'",
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::Comma => "','",
            TokenKind::Semi => "';'",
            TokenKind::Colon => "':'",

            TokenKind::Comment(_) => "a comment",
            TokenKind::Newline => "newline",
            TokenKind::Eof => "end of file",
        }
    }

    /// The token's source text. Comments, newlines and EOF have none worth
    /// reproducing and yield their literal form or an empty string.
    pub fn lexeme(&self) -> &str {
        match self {
            TokenKind::Int(s)
            | TokenKind::Float(s)
            | TokenKind::Imag(s)
            | TokenKind::Char(s)
            | TokenKind::String(s)
            | TokenKind::Ident(s)
            | TokenKind::Comment(s) => s,
            TokenKind::Newline => "\n",
            TokenKind::Eof => "",
            other => other.display_name().trim_matches('\''),
        }
    }

    /// Identifiers, keywords and literals; two of these in a row need a
    /// space between them when text is rebuilt from tokens.
    pub fn is_word(&self) -> bool {
        match self {
            TokenKind::Int(_)
            | TokenKind::Float(_)
            | TokenKind::Imag(_)
            | TokenKind::Char(_)
            | TokenKind::String(_)
            | TokenKind::Ident(_) => true,
            TokenKind::Comment(_) | TokenKind::Newline | TokenKind::Eof => false,
            other => other.display_name().trim_matches('\'').chars().all(|c| c.is_ascii_lowercase()),
        }
    }

    /// Opening delimiter this token closes, if it is a closing delimiter.
    pub fn closes(&self) -> Option<TokenKind> {
        match self {
            TokenKind::RParen => Some(TokenKind::LParen),
            TokenKind::RBracket => Some(TokenKind::LBracket),
            TokenKind::RBrace => Some(TokenKind::LBrace),
            _ => None,
        }
    }

    pub fn is_open_delim(&self) -> bool {
        matches!(self, TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace)
    }

    /// Trivia is skipped by everything except comment grouping.
    pub fn is_trivia(&self) -> bool {
        matches!(self, TokenKind::Comment(_) | TokenKind::Newline)
    }
}
