// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Literal table tokenizer.
//!
//! An annotation looks like
//!
//! ```text
//! // @test = {
//! //     {"", ""},
//! //     {"foo", "bar"},
//! // }
//! ```
//!
//! Each row is delimited by its own `{}` or `()`, and its fields map
//! positionally onto the parameters, then the results. Field values are
//! copied as source text; nested literals are only checked for balanced
//! delimiters.
//!
//! Go cannot take the address of an element of a composite literal, so
//! values for pointer slots go into a separate `ptrData` table and the
//! primary row holds `&ptrData[case].f<i>` instead.

use godoctest_ast::source::CommentForm;
use godoctest_ast::token::{Token, TokenKind};
use godoctest_lexer::Lexer;

use crate::signature::{Signature, Slot};
use crate::GenError;

/// Name of the generated pointer-storage table.
pub const POINTER_TABLE: &str = "ptrData";

/// What a null pointer field becomes in generated code.
pub const NULL_MARKER: &str = "nil";

/// One stored value for a pointer slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointerEntry {
    /// Field of the slot the value belongs to, e.g. `f0`.
    pub field: String,
    pub value: String,
}

/// Rows of a literal table. `pointer_rows[i]` holds the stored pointer
/// values of case `i`, possibly none.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenizedTable {
    pub rows: Vec<Vec<String>>,
    pub pointer_rows: Vec<Vec<PointerEntry>>,
}

impl TokenizedTable {
    pub fn has_pointer_storage(&self) -> bool {
        self.pointer_rows.iter().any(|row| !row.is_empty())
    }

    fn push_case(&mut self, fields: Vec<String>, slots: &[&Slot], null_token: &str) {
        let case = self.rows.len();
        let mut row = Vec::with_capacity(fields.len());
        let mut stored = Vec::new();

        for (value, slot) in fields.into_iter().zip(slots) {
            if !slot.descriptor.is_pointer() {
                row.push(value);
            } else if value == null_token {
                row.push(NULL_MARKER.to_string());
            } else {
                row.push(format!("&{}[{}].{}", POINTER_TABLE, case, slot.field));
                stored.push(PointerEntry { field: slot.field.clone(), value });
            }
        }

        self.rows.push(row);
        self.pointer_rows.push(stored);
    }
}

/// Remove comment delimiters from annotation text.
///
/// Block comments may carry a leading `*` on each line, as in
/// ```text
/// /*
///  * @test = {...}
///  */
/// ```
pub fn strip_comment_markers(text: &str, form: CommentForm) -> String {
    text.lines()
        .map(|line| {
            let trimmed = line.trim_start();
            match form {
                CommentForm::Line => trimmed.strip_prefix("//").unwrap_or(line),
                CommentForm::Block => {
                    let line = trimmed.strip_prefix("/*").unwrap_or(line);
                    let line = line.trim_end().strip_suffix("*/").unwrap_or(line);
                    line.trim_start().strip_prefix('*').unwrap_or(line)
                }
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Find the table body: the text between the `{` that follows the sentinel
/// (and an optional `=`) and its matching `}`. Anything after is ignored.
pub fn table_body<'a>(text: &'a str, sentinel: &str) -> Result<&'a str, GenError> {
    let Some(at) = text.find(sentinel) else {
        return Err(GenError::malformed(format!("no `{}` marker", sentinel)));
    };
    let rest = &text[at + sentinel.len()..];

    let lexed = Lexer::new(rest).tokenize();
    let mut tokens = lexed.tokens.iter().filter(|t| !t.kind.is_trivia());

    let mut open = tokens.next();
    if matches!(open.map(|t| &t.kind), Some(TokenKind::Eq)) {
        open = tokens.next();
    }
    let open = match open {
        Some(tok) if tok.kind == TokenKind::LBrace => tok,
        Some(tok) => {
            return Err(GenError::malformed(format!(
                "expected '{{' after `{}`, found {}",
                sentinel,
                tok.kind.display_name()
            )))
        }
        None => return Err(GenError::malformed(format!("expected '{{' after `{}`", sentinel))),
    };

    let mut stack = vec![TokenKind::LBrace];
    for tok in tokens {
        check_lex_errors(&lexed.errors, tok.span.end)?;
        if tok.kind.is_open_delim() {
            stack.push(tok.kind.clone());
        } else if let Some(opener) = tok.kind.closes() {
            if stack.pop() != Some(opener) {
                return Err(GenError::malformed(format!("unbalanced {}", tok.kind.display_name())));
            }
            if stack.is_empty() {
                return Ok(&rest[open.span.end..tok.span.start]);
            }
        }
    }

    check_lex_errors(&lexed.errors, rest.len())?;
    Err(GenError::malformed("literal table is missing its closing '}'"))
}

fn check_lex_errors(errors: &[godoctest_lexer::LexError], before: usize) -> Result<(), GenError> {
    match errors.iter().find(|e| e.span.start < before) {
        Some(err) => Err(GenError::malformed(err.message.clone())),
        None => Ok(()),
    }
}

/// Split a table body into rows matched against the declaration's slots.
pub fn tokenize(body: &str, signature: &Signature, null_token: &str) -> Result<TokenizedTable, GenError> {
    let lexed = Lexer::new(body).tokenize();
    if let Some(err) = lexed.errors.first() {
        return Err(GenError::malformed(err.message.clone()));
    }
    let tokens: Vec<Token> = lexed
        .tokens
        .into_iter()
        .filter(|t| !t.kind.is_trivia() && t.kind != TokenKind::Eof)
        .collect();

    let slots: Vec<&Slot> = signature.slots().collect();
    let mut table = TokenizedTable::default();
    let mut pos = 0;

    while pos < tokens.len() {
        match &tokens[pos].kind {
            TokenKind::Comma => pos += 1,
            TokenKind::LBrace | TokenKind::LParen => {
                let row = RowSplitter { source: body, tokens: &tokens, case: table.rows.len() };
                let (fields, next) = row.split(pos, signature)?;
                table.push_case(fields, &slots, null_token);
                pos = next;
            }
            other => {
                return Err(GenError::malformed(format!(
                    "expected '{{' or '(' to start row {}, found {}",
                    table.rows.len() + 1,
                    other.display_name()
                )))
            }
        }
    }

    Ok(table)
}

struct RowSplitter<'a> {
    source: &'a str,
    tokens: &'a [Token],
    case: usize,
}

impl RowSplitter<'_> {
    /// Split the row opened at `open` into field values. Returns the fields
    /// and the index just past the row's closer.
    fn split(&self, open: usize, signature: &Signature) -> Result<(Vec<String>, usize), GenError> {
        let row = self.case + 1;
        let closer = match self.tokens[open].kind {
            TokenKind::LParen => TokenKind::RParen,
            _ => TokenKind::RBrace,
        };

        let mut fields = Vec::new();
        let mut nested: Vec<TokenKind> = Vec::new();
        let mut field_start: Option<usize> = None;
        let mut i = open + 1;

        loop {
            let Some(tok) = self.tokens.get(i) else {
                return Err(GenError::malformed(format!("row {} is not closed", row)));
            };

            if nested.is_empty() {
                if tok.kind == TokenKind::Comma {
                    let Some(start) = field_start.take() else {
                        return Err(GenError::malformed(format!(
                            "row {} has an empty field {}",
                            row,
                            fields.len() + 1
                        )));
                    };
                    fields.push(self.text(start, i));
                    i += 1;
                    continue;
                }
                if tok.kind == closer {
                    if let Some(start) = field_start.take() {
                        fields.push(self.text(start, i));
                    }
                    if fields.len() != signature.field_count() {
                        return Err(GenError::malformed(format!(
                            "row {} has {} fields, expected {} ({} parameters + {} results)",
                            row,
                            fields.len(),
                            signature.field_count(),
                            signature.params.len(),
                            signature.results.len()
                        )));
                    }
                    return Ok((fields, i + 1));
                }
            }

            if tok.kind.is_open_delim() {
                nested.push(tok.kind.clone());
            } else if let Some(opener) = tok.kind.closes() {
                if nested.pop() != Some(opener) {
                    return Err(GenError::malformed(format!(
                        "row {}: unbalanced {}",
                        row,
                        tok.kind.display_name()
                    )));
                }
            }
            field_start.get_or_insert(i);
            i += 1;
        }
    }

    /// Source text of tokens `start..end`, with whitespace between tokens
    /// collapsed to one space.
    fn text(&self, start: usize, end: usize) -> String {
        let mut out = String::new();
        let mut prev_end = None;
        for tok in &self.tokens[start..end] {
            if prev_end.map_or(false, |p| p < tok.span.start) {
                out.push(' ');
            }
            out.push_str(&self.source[tok.span.start..tok.span.end]);
            prev_end = Some(tok.span.end);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::TypeDescriptor;

    fn sig(params: &[TypeDescriptor], results: &[TypeDescriptor]) -> Signature {
        Signature {
            params: params
                .iter()
                .enumerate()
                .map(|(i, d)| Slot { field: format!("f{}", i), descriptor: d.clone() })
                .collect(),
            results: results
                .iter()
                .enumerate()
                .map(|(j, d)| Slot { field: format!("e{}", j), descriptor: d.clone() })
                .collect(),
        }
    }

    fn plain(name: &str) -> TypeDescriptor {
        TypeDescriptor::Plain(name.into())
    }

    fn ptr(name: &str) -> TypeDescriptor {
        TypeDescriptor::Pointer(name.into())
    }

    #[test]
    fn strips_line_comments() {
        let text = "//\n//  @test = {\n//  \t{\"\", \"\"},\n//  }\n//";
        let stripped = strip_comment_markers(text, CommentForm::Line);
        assert_eq!(stripped, "\n  @test = {\n  \t{\"\", \"\"},\n  }\n");
    }

    #[test]
    fn strips_block_comment() {
        let text = "/*\n\t\t@test = {\n\t\t\t{\"\", \"\"},\n\t\t}\n\t*/";
        let stripped = strip_comment_markers(text, CommentForm::Block);
        assert!(!stripped.contains("/*"));
        assert!(!stripped.contains("*/"));
        assert!(stripped.contains("@test = {"));
    }

    #[test]
    fn strips_starred_block_comment() {
        let text = "/*\n * @test = {\n *     {1, 1},\n *     {2, 1},\n * }\n */";
        let stripped = strip_comment_markers(text, CommentForm::Block);
        assert!(!stripped.contains('*'), "got {:?}", stripped);
        let body = table_body(&stripped, "@test").unwrap();
        assert_eq!(body, "\n     {1, 1},\n     {2, 1},\n ");
    }

    #[test]
    fn starred_block_comment_tokenizes() {
        let sig = sig(&[plain("int")], &[plain("int")]);
        let text = strip_comment_markers("/* @test = {\n *   {1, 1},\n *   {7, 13},\n */", CommentForm::Block);
        let table = tokenize(table_body(&text, "@test").unwrap(), &sig, "nil").unwrap();
        assert_eq!(table.rows, vec![vec!["1", "1"], vec!["7", "13"]]);
    }

    #[test]
    fn body_between_outer_braces() {
        let body = table_body("  @test = {\n {1, 1},\n {2, 1},\n}\n trailing words", "@test").unwrap();
        assert_eq!(body, "\n {1, 1},\n {2, 1},\n");
    }

    #[test]
    fn equals_sign_is_optional() {
        assert_eq!(table_body("@test {{1}}", "@test").unwrap(), "{1}");
    }

    #[test]
    fn body_requires_braces() {
        assert!(table_body("@test = [1, 2]", "@test").is_err());
        assert!(table_body("@test = {{1, 2}", "@test").is_err());
        assert!(table_body("no marker here", "@test").is_err());
    }

    #[test]
    fn text_after_table_is_not_lexed() {
        // The unterminated quote after the table does not matter.
        assert_eq!(table_body("@test = {{1}} don't", "@test").unwrap(), "{1}");
    }

    #[test]
    fn scenario_a_two_string_rows() {
        let sig = sig(&[plain("string")], &[plain("string")]);
        let table = tokenize("{\"\", \"\"}, {\"foo\",\"bar\"}", &sig, "nil").unwrap();
        assert_eq!(
            table.rows,
            vec![vec!["\"\"", "\"\""], vec!["\"foo\"", "\"bar\""]]
        );
        assert!(!table.has_pointer_storage());
        assert_eq!(table.pointer_rows, vec![vec![], vec![]]);
    }

    #[test]
    fn scenario_b_five_rows() {
        let sig = sig(&[plain("int")], &[plain("int")]);
        let table = tokenize("{1,1},{2,1},{3,2},{7,13},{11,89}", &sig, "nil").unwrap();
        assert_eq!(table.rows.len(), 5);
        assert!(table.rows.iter().all(|r| r.len() == 2));
        assert_eq!(table.rows[4], vec!["11", "89"]);
    }

    #[test]
    fn scenario_c_pointer_storage() {
        let sig = sig(
            &[ptr("string"), plain("string"), ptr("int"), plain("float32")],
            &[plain("error")],
        );
        let body = "\n{nil, \"\", 13, 42.0, errors.New(\"boom\")},\n{\"\", \"x\", nil, 42.0, nil},\n";
        let table = tokenize(body, &sig, "nil").unwrap();

        assert_eq!(
            table.rows[0],
            vec!["nil", "\"\"", "&ptrData[0].f2", "42.0", "errors.New(\"boom\")"]
        );
        assert_eq!(table.rows[1], vec!["&ptrData[1].f0", "\"x\"", "nil", "42.0", "nil"]);
        assert_eq!(
            table.pointer_rows,
            vec![
                vec![PointerEntry { field: "f2".into(), value: "13".into() }],
                vec![PointerEntry { field: "f0".into(), value: "\"\"".into() }],
            ]
        );
        assert!(table.has_pointer_storage());
    }

    #[test]
    fn null_token_is_configurable() {
        let sig = sig(&[ptr("int")], &[]);
        let table = tokenize("{NULL}, {nil}", &sig, "NULL").unwrap();
        assert_eq!(table.rows[0], vec!["nil"]);
        assert_eq!(table.rows[1], vec!["&ptrData[1].f0"]);
        assert_eq!(table.pointer_rows[1][0].value, "nil");
    }

    #[test]
    fn nested_literals_are_copied() {
        let sig = sig(&[plain("Point"), plain("int")], &[plain("bool")]);
        let body = "{Point{X: 1, Y: (2 + 3)}, len([]int{1,\n    2}), true}";
        let table = tokenize(body, &sig, "nil").unwrap();
        assert_eq!(table.rows[0], vec!["Point{X: 1, Y: (2 + 3)}", "len([]int{1, 2})", "true"]);
    }

    #[test]
    fn parenthesised_rows_and_trailing_commas() {
        let sig = sig(&[plain("int")], &[plain("int")]);
        let table = tokenize("(1, 2,), {3, 4},", &sig, "nil").unwrap();
        assert_eq!(table.rows, vec![vec!["1", "2"], vec!["3", "4"]]);
    }

    #[test]
    fn wrong_field_count_names_the_row() {
        let sig = sig(&[plain("int")], &[plain("int")]);
        let err = tokenize("{1, 1}, {2, 1, 3}, {4, 5}", &sig, "nil").unwrap_err();
        assert_eq!(
            err.to_string(),
            "malformed literal block: row 2 has 3 fields, expected 2 (1 parameters + 1 results)"
        );
    }

    #[test]
    fn malformed_rows() {
        let sig = sig(&[plain("int")], &[plain("int")]);
        assert!(tokenize("{1, , 2}", &sig, "nil").is_err());
        assert!(tokenize("{1, 2)", &sig, "nil").is_err());
        assert!(tokenize("{1, [2}", &sig, "nil").is_err());
        assert!(tokenize("{1, 2", &sig, "nil").is_err());
        assert!(tokenize("1, 2", &sig, "nil").is_err());
        assert!(tokenize("{\"open, 2}", &sig, "nil").is_err());
    }

    #[test]
    fn empty_table_has_no_rows() {
        let sig = sig(&[plain("int")], &[plain("int")]);
        let table = tokenize("\n", &sig, "nil").unwrap();
        assert!(table.rows.is_empty());
    }

    #[test]
    fn comments_inside_table_are_skipped() {
        let sig = sig(&[plain("int")], &[plain("int")]);
        let table = tokenize("{1, 1}, // base case\n{2, 1}", &sig, "nil").unwrap();
        assert_eq!(table.rows.len(), 2);
    }
}
