//! Lexer for Go source.
//!
//! Tokenizes Go source code into a stream of tokens for the parser and for
//! the literal-table tokenizer.

mod lexer;

pub use lexer::{LexError, LexResult, Lexer};
