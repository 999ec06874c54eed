// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Error hints - suggestions for fixing common mistakes.
//!
//! Kept separate from the main parser to avoid clutter.

use godoctest_ast::token::TokenKind;

/// Get a hint for an "expected X" error based on context.
pub fn for_expected(expected: &str, found: &TokenKind) -> Option<&'static str> {
    match (expected, found) {
        ("'package'", _) => Some("every Go file starts with 'package name'"),

        // Block hints
        ("'{'", _) => Some("function body starts with '{'"),
        ("'}'", TokenKind::Eof) => Some("every '{' needs a matching '}'"),

        // Parentheses hints
        ("'('", _) => Some("parameter lists are wrapped in parentheses"),
        ("')'", TokenKind::Eof) => Some("add ')' to close the parenthesis"),
        ("')'", _) => Some("separate parameters with ','"),

        // Bracket hints
        ("']'", TokenKind::Eof) => Some("add ']' to close the bracket"),

        // Name/identifier hints
        ("a name", TokenKind::Int(_)) => Some("names can't start with a number"),
        ("a name", _) => Some("names start with a letter or '_'"),

        ("an import path", _) => Some("import paths are quoted, like 'import \"strings\"'"),

        // Type hints
        ("type", _) => Some("try a type like 'int', '*T', '[]byte' or 'map[string]int'"),

        (s, _) if s.starts_with("declaration") => {
            Some("top-level declarations start with 'func', 'var', 'const', 'type' or 'import'")
        }

        _ => None,
    }
}
