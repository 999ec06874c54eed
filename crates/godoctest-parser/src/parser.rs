// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! A declaration-level Go parser.
//!
//! Parses the package clause and every top-level function signature. Bodies
//! and other declarations are skipped with delimiter balancing, so a file
//! with unbalanced braces is still rejected.

use godoctest_ast::decl::{ChanDir, FuncDecl, ImportSpec, Param, TypeExpr};
use godoctest_ast::source::{CommentForm, CommentGroup};
use godoctest_ast::token::{Token, TokenKind};
use godoctest_ast::Span;

/// Maximum number of errors to collect before stopping.
const MAX_ERRORS: usize = 20;

/// The parser for Go source code.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    /// Comment groups split off the token stream up front
    comments: Vec<CommentGroup>,
    /// Collected errors during parsing
    errors: Vec<ParseError>,
}

/// One comma-separated entry of a parameter list, before Go's grouping
/// rule decides whether a lone identifier is a name or a type.
enum ParamEntry {
    Bare(String, Span),
    Named(String, TypeExpr),
    Type(TypeExpr, Span),
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        let (mut tokens, comments) = group_comments(tokens);
        if !matches!(tokens.last().map(|t| &t.kind), Some(TokenKind::Eof)) {
            let end = tokens.last().map(|t| t.span.end).unwrap_or(0);
            tokens.push(Token { kind: TokenKind::Eof, span: Span::new(end, end) });
        }
        Self { tokens, pos: 0, comments, errors: Vec::new() }
    }

    /// Parse a whole file.
    pub fn parse(&mut self) -> ParseResult {
        let mut funcs = Vec::new();
        let mut imports = Vec::new();

        self.skip_separators();
        let package = match self.parse_package_clause() {
            Ok(name) => Some(name),
            Err(e) => {
                self.errors.push(e);
                None
            }
        };

        while package.is_some() && !self.at_end() {
            self.skip_separators();
            if self.at_end() {
                break;
            }

            let result = match self.current_kind() {
                TokenKind::Func => self.parse_func_decl().map(|func| funcs.push(func)),
                TokenKind::Import => self.parse_import_decl().map(|specs| imports.extend(specs)),
                TokenKind::Var | TokenKind::Const | TokenKind::Type => self.skip_decl(),
                _ => Err(ParseError::expected(
                    "declaration (func, var, const, type, import)",
                    self.current_kind(),
                    self.current().span,
                )),
            };

            if let Err(e) = result {
                if !self.record_error(e) {
                    break;
                }
                self.synchronize();
            }
        }

        ParseResult {
            package,
            imports,
            funcs,
            comments: std::mem::take(&mut self.comments),
            errors: std::mem::take(&mut self.errors),
        }
    }

    /// Record error, return if should continue.
    fn record_error(&mut self, error: ParseError) -> bool {
        self.errors.push(error);
        self.errors.len() < MAX_ERRORS
    }

    /// Skip to the next top-level declaration keyword after an error.
    fn synchronize(&mut self) {
        let mut depth = 0usize;
        self.advance();

        while !self.at_end() {
            match self.current_kind() {
                TokenKind::LBrace | TokenKind::LParen | TokenKind::LBracket => depth += 1,
                TokenKind::RBrace | TokenKind::RParen | TokenKind::RBracket => {
                    depth = depth.saturating_sub(1)
                }
                TokenKind::Func | TokenKind::Var | TokenKind::Const | TokenKind::Type | TokenKind::Import
                    if depth == 0 && self.after_separator() =>
                {
                    return;
                }
                _ => {}
            }
            self.advance();
        }
    }

    // =========================================================================
    // Token Navigation
    // =========================================================================

    fn current(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn current_kind(&self) -> &TokenKind {
        &self.current().kind
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.pos.saturating_sub(1)]
    }

    fn peek(&self, n: usize) -> &TokenKind {
        self.tokens.get(self.pos + n).map(|t| &t.kind).unwrap_or(&TokenKind::Eof)
    }

    fn at_end(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Eof)
    }

    fn advance(&mut self) -> &Token {
        if !self.at_end() {
            self.pos += 1;
        }
        self.previous()
    }

    fn after_separator(&self) -> bool {
        self.pos == 0 || matches!(self.previous().kind, TokenKind::Newline | TokenKind::Semi)
    }

    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(self.current_kind()) == std::mem::discriminant(kind)
    }

    fn match_token(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: &TokenKind) -> Result<&Token, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(ParseError::expected(
                kind.display_name(),
                self.current_kind(),
                self.current().span,
            ))
        }
    }

    fn skip_newlines(&mut self) {
        while self.check(&TokenKind::Newline) {
            self.advance();
        }
    }

    fn skip_separators(&mut self) {
        while self.check(&TokenKind::Newline) || self.check(&TokenKind::Semi) {
            self.advance();
        }
    }

    fn expect_terminator(&mut self) -> Result<(), ParseError> {
        if self.check(&TokenKind::Newline) || self.check(&TokenKind::Semi) {
            self.advance();
            Ok(())
        } else if self.at_end() {
            Ok(())
        } else {
            Err(ParseError::expected(
                "newline or ';'",
                self.current_kind(),
                self.current().span,
            ))
        }
    }

    fn expect_ident(&mut self) -> Result<String, ParseError> {
        match self.current_kind().clone() {
            TokenKind::Ident(name) => {
                self.advance();
                Ok(name)
            }
            _ => Err(ParseError::expected(
                "a name",
                self.current_kind(),
                self.current().span,
            )),
        }
    }

    /// Push openers and pop matching closers for the current token.
    fn track_delimiter(&self, open: &mut Vec<(TokenKind, Span)>) -> Result<(), ParseError> {
        let tok = self.current();
        if tok.kind.is_open_delim() {
            open.push((tok.kind.clone(), tok.span));
        } else if let Some(opener) = tok.kind.closes() {
            match open.pop() {
                Some((kind, _)) if kind == opener => {}
                _ => return Err(ParseError::unbalanced(&tok.kind, tok.span)),
            }
        }
        Ok(())
    }

    /// Skip from an opening delimiter past its matching closer.
    fn skip_delimited(&mut self) -> Result<(), ParseError> {
        let mut open = Vec::new();
        loop {
            if self.at_end() {
                return match open.pop() {
                    Some((kind, span)) => Err(ParseError::unclosed(&kind, span)),
                    None => Ok(()),
                };
            }
            self.track_delimiter(&mut open)?;
            self.advance();
            if open.is_empty() {
                return Ok(());
            }
        }
    }

    /// Skip a delimited run and return its inner text rebuilt from tokens.
    fn raw_delimited(&mut self) -> Result<String, ParseError> {
        let first = self.pos;
        self.skip_delimited()?;
        let inner = &self.tokens[first + 1..self.pos.saturating_sub(1).max(first + 1)];
        Ok(join_lexemes(inner.iter().map(|t| &t.kind)))
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    fn parse_package_clause(&mut self) -> Result<String, ParseError> {
        self.expect(&TokenKind::Package)?;
        let name = self.expect_ident()?;
        self.expect_terminator()?;
        Ok(name)
    }

    /// Parse `import "p"`, `import name "p"` or a parenthesised group.
    fn parse_import_decl(&mut self) -> Result<Vec<ImportSpec>, ParseError> {
        self.expect(&TokenKind::Import)?;
        if !self.check(&TokenKind::LParen) {
            let spec = self.parse_import_spec()?;
            self.expect_terminator()?;
            return Ok(vec![spec]);
        }

        let open = self.advance().span;
        let mut specs = Vec::new();
        loop {
            self.skip_separators();
            if self.match_token(&TokenKind::RParen) {
                break;
            }
            if self.at_end() {
                return Err(ParseError::unclosed(&TokenKind::LParen, open));
            }
            specs.push(self.parse_import_spec()?);
            if !self.check(&TokenKind::RParen) {
                self.expect_terminator()?;
            }
        }
        self.expect_terminator()?;
        Ok(specs)
    }

    fn parse_import_spec(&mut self) -> Result<ImportSpec, ParseError> {
        let start = self.current().span;
        let alias = match self.current_kind().clone() {
            TokenKind::Ident(name) => {
                self.advance();
                Some(name)
            }
            TokenKind::Dot => {
                self.advance();
                Some(".".to_string())
            }
            _ => None,
        };
        match self.current_kind().clone() {
            TokenKind::String(raw) => {
                let end = self.advance().span;
                Ok(ImportSpec { alias, path: unquote(&raw).to_string(), span: start.to(end) })
            }
            other => Err(ParseError::expected("an import path", &other, self.current().span)),
        }
    }

    /// Skip a var, const or type declaration.
    fn skip_decl(&mut self) -> Result<(), ParseError> {
        self.advance();
        let mut open = Vec::new();
        loop {
            match self.current_kind() {
                TokenKind::Eof => {
                    return match open.pop() {
                        Some((kind, span)) => Err(ParseError::unclosed(&kind, span)),
                        None => Ok(()),
                    };
                }
                TokenKind::Newline | TokenKind::Semi if open.is_empty() => return Ok(()),
                _ => self.track_delimiter(&mut open)?,
            }
            self.advance();
        }
    }

    fn parse_func_decl(&mut self) -> Result<FuncDecl, ParseError> {
        let start = self.expect(&TokenKind::Func)?.span;

        let receiver = if self.check(&TokenKind::LParen) {
            let open = self.current().span;
            let mut params = self.parse_param_list()?;
            if params.len() != 1 {
                return Err(ParseError::new("Method receiver must be a single parameter", open)
                    .with_hint("write the receiver as (r T) or (r *T)"));
            }
            params.pop()
        } else {
            None
        };

        let name = self.expect_ident()?;
        let type_params = if self.check(&TokenKind::LBracket) {
            Some(self.raw_delimited()?)
        } else {
            None
        };

        let params = self.parse_param_list()?;
        let results = self.parse_results()?;
        let signature = start.to(self.previous().span);

        let has_body = match self.current_kind() {
            TokenKind::LBrace => {
                self.skip_delimited()?;
                true
            }
            TokenKind::Newline | TokenKind::Semi | TokenKind::Eof => false,
            _ => {
                return Err(ParseError::expected(
                    "'{'",
                    self.current_kind(),
                    self.current().span,
                ))
            }
        };

        Ok(FuncDecl { name, receiver, type_params, params, results, signature, has_body })
    }

    // =========================================================================
    // Parameters
    // =========================================================================

    fn parse_param_list(&mut self) -> Result<Vec<Param>, ParseError> {
        self.expect(&TokenKind::LParen)?;
        let mut entries = Vec::new();
        loop {
            self.skip_newlines();
            if self.match_token(&TokenKind::RParen) {
                break;
            }
            entries.push(self.parse_param_entry()?);
            self.skip_newlines();
            if self.match_token(&TokenKind::Comma) {
                continue;
            }
            self.expect(&TokenKind::RParen)?;
            break;
        }
        resolve_params(entries)
    }

    fn parse_param_entry(&mut self) -> Result<ParamEntry, ParseError> {
        let start = self.current().span;
        let name = match self.current_kind() {
            TokenKind::Ident(name) => name.clone(),
            _ => {
                let ty = self.parse_param_type()?;
                return Ok(ParamEntry::Type(ty, start.to(self.previous().span)));
            }
        };

        match self.peek(1) {
            TokenKind::Comma | TokenKind::RParen | TokenKind::Newline => {
                self.advance();
                Ok(ParamEntry::Bare(name, start))
            }
            TokenKind::Dot => {
                let ty = self.parse_type()?;
                Ok(ParamEntry::Type(ty, start.to(self.previous().span)))
            }
            TokenKind::LBracket if !self.bracket_starts_array_type() => {
                let ty = self.parse_type()?;
                Ok(ParamEntry::Type(ty, start.to(self.previous().span)))
            }
            _ => {
                self.advance();
                let ty = self.parse_param_type()?;
                Ok(ParamEntry::Named(name, ty))
            }
        }
    }

    /// At `name [`: tell `a []T` / `a [N]T` apart from a generic `List[T]`.
    fn bracket_starts_array_type(&self) -> bool {
        if matches!(self.peek(2), TokenKind::RBracket) {
            return true;
        }
        let mut depth = 0usize;
        let mut i = self.pos + 1;
        while let Some(tok) = self.tokens.get(i) {
            match &tok.kind {
                TokenKind::LBracket => depth += 1,
                TokenKind::RBracket => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return self.tokens.get(i + 1).map_or(false, |t| starts_type(&t.kind));
                    }
                }
                TokenKind::Eof => return false,
                _ => {}
            }
            i += 1;
        }
        false
    }

    fn parse_param_type(&mut self) -> Result<TypeExpr, ParseError> {
        if self.match_token(&TokenKind::Ellipsis) {
            Ok(TypeExpr::Variadic(Box::new(self.parse_type()?)))
        } else {
            self.parse_type()
        }
    }

    fn parse_results(&mut self) -> Result<Vec<Param>, ParseError> {
        if self.check(&TokenKind::LParen) {
            return self.parse_param_list();
        }
        if starts_type(self.current_kind()) {
            let ty = self.parse_type()?;
            return Ok(vec![Param { name: None, ty }]);
        }
        Ok(Vec::new())
    }

    // =========================================================================
    // Types
    // =========================================================================

    fn parse_type(&mut self) -> Result<TypeExpr, ParseError> {
        match self.current_kind().clone() {
            TokenKind::Ident(name) => {
                self.advance();
                let mut ty = if self.match_token(&TokenKind::Dot) {
                    let member = self.expect_ident()?;
                    TypeExpr::Qualified { package: name, name: member }
                } else {
                    TypeExpr::Named(name)
                };
                if self.match_token(&TokenKind::LBracket) {
                    let args = self.parse_type_list(&TokenKind::RBracket)?;
                    ty = TypeExpr::Generic { base: Box::new(ty), args };
                }
                Ok(ty)
            }
            TokenKind::Star => {
                self.advance();
                Ok(TypeExpr::Pointer(Box::new(self.parse_type()?)))
            }
            TokenKind::LBracket => {
                self.advance();
                if self.match_token(&TokenKind::RBracket) {
                    return Ok(TypeExpr::Slice(Box::new(self.parse_type()?)));
                }
                let len = self.parse_array_len()?;
                Ok(TypeExpr::Array { len, elem: Box::new(self.parse_type()?) })
            }
            TokenKind::Map => {
                self.advance();
                self.expect(&TokenKind::LBracket)?;
                let key = self.parse_type()?;
                self.expect(&TokenKind::RBracket)?;
                let value = self.parse_type()?;
                Ok(TypeExpr::Map { key: Box::new(key), value: Box::new(value) })
            }
            TokenKind::Chan => {
                self.advance();
                let dir = if self.match_token(&TokenKind::Arrow) {
                    ChanDir::Send
                } else {
                    ChanDir::Both
                };
                Ok(TypeExpr::Chan { dir, elem: Box::new(self.parse_type()?) })
            }
            TokenKind::Arrow => {
                self.advance();
                self.expect(&TokenKind::Chan)?;
                Ok(TypeExpr::Chan { dir: ChanDir::Recv, elem: Box::new(self.parse_type()?) })
            }
            TokenKind::Func => {
                self.advance();
                let params = self.parse_param_list()?;
                let results = self.parse_results()?;
                Ok(TypeExpr::Func { params, results })
            }
            TokenKind::Struct | TokenKind::Interface => {
                let keyword = self.advance().kind.clone();
                if !self.check(&TokenKind::LBrace) {
                    return Err(ParseError::expected("'{'", self.current_kind(), self.current().span));
                }
                let body = format!("{}{{{}}}", keyword.lexeme(), self.raw_delimited()?);
                Ok(match keyword {
                    TokenKind::Struct => TypeExpr::Struct(body),
                    _ => TypeExpr::Interface(body),
                })
            }
            TokenKind::LParen => {
                self.advance();
                self.skip_newlines();
                let ty = self.parse_type()?;
                self.skip_newlines();
                self.expect(&TokenKind::RParen)?;
                Ok(ty)
            }
            other => Err(ParseError::expected("type", &other, self.current().span)),
        }
    }

    /// Array length expression, consuming the closing `]`.
    fn parse_array_len(&mut self) -> Result<String, ParseError> {
        let start = self.pos;
        let mut depth = 0usize;
        loop {
            match self.current_kind() {
                TokenKind::Eof => {
                    return Err(ParseError::expected("']'", &TokenKind::Eof, self.current().span));
                }
                TokenKind::RBracket if depth == 0 => break,
                TokenKind::LBracket | TokenKind::LParen | TokenKind::LBrace => depth += 1,
                TokenKind::RBracket | TokenKind::RParen | TokenKind::RBrace => {
                    depth = depth.saturating_sub(1)
                }
                _ => {}
            }
            self.advance();
        }
        let len = join_lexemes(self.tokens[start..self.pos].iter().map(|t| &t.kind));
        self.advance();
        Ok(len)
    }

    fn parse_type_list(&mut self, close: &TokenKind) -> Result<Vec<TypeExpr>, ParseError> {
        let mut types = Vec::new();
        loop {
            self.skip_newlines();
            if self.match_token(close) {
                break;
            }
            types.push(self.parse_type()?);
            self.skip_newlines();
            if self.match_token(&TokenKind::Comma) {
                continue;
            }
            self.expect(close)?;
            break;
        }
        Ok(types)
    }
}

/// Apply Go's grouping rule: if any entry is `name Type`, every bare
/// identifier is a name sharing the type of the next named entry;
/// otherwise every entry is an unnamed type.
fn resolve_params(entries: Vec<ParamEntry>) -> Result<Vec<Param>, ParseError> {
    let mut params = Vec::new();

    if !entries.iter().any(|e| matches!(e, ParamEntry::Named(..))) {
        for entry in entries {
            let ty = match entry {
                ParamEntry::Bare(name, _) => TypeExpr::Named(name),
                ParamEntry::Type(ty, _) | ParamEntry::Named(_, ty) => ty,
            };
            params.push(Param { name: None, ty });
        }
        return Ok(params);
    }

    let mut pending: Vec<(String, Span)> = Vec::new();
    for entry in entries {
        match entry {
            ParamEntry::Bare(name, span) => pending.push((name, span)),
            ParamEntry::Named(name, ty) => {
                for (grouped, _) in pending.drain(..) {
                    params.push(Param { name: Some(grouped), ty: ty.clone() });
                }
                params.push(Param { name: Some(name), ty });
            }
            ParamEntry::Type(ty, span) => {
                return Err(ParseError::new(
                    format!("Mixed named and unnamed parameters near '{}'", ty),
                    span,
                )
                .with_hint("either name every parameter or none of them"));
            }
        }
    }

    if let Some((name, span)) = pending.first() {
        return Err(ParseError::new(format!("Missing type for parameter '{}'", name), *span)
            .with_hint("grouped names share the type written after the last one: a, b int"));
    }

    Ok(params)
}

/// Whether a token can begin a type expression.
fn starts_type(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Ident(_)
            | TokenKind::Star
            | TokenKind::LBracket
            | TokenKind::LParen
            | TokenKind::Map
            | TokenKind::Chan
            | TokenKind::Func
            | TokenKind::Struct
            | TokenKind::Interface
            | TokenKind::Arrow
    )
}

/// Rebuild source-like text from tokens, spacing only between words.
fn join_lexemes<'a>(kinds: impl IntoIterator<Item = &'a TokenKind>) -> String {
    let mut out = String::new();
    let mut prev_word = false;
    for kind in kinds {
        if matches!(kind, TokenKind::Newline) {
            continue;
        }
        if prev_word && kind.is_word() {
            out.push(' ');
        }
        out.push_str(kind.lexeme());
        prev_word = kind.is_word();
    }
    out
}

/// Split comments out of the token stream and group them.
///
/// Comments separated by at most one line break, with no other token in
/// between, belong to the same group.
fn group_comments(tokens: Vec<Token>) -> (Vec<Token>, Vec<CommentGroup>) {
    let mut kept = Vec::with_capacity(tokens.len());
    let mut groups = Vec::new();
    let mut current: Vec<(String, Span)> = Vec::new();
    let mut newlines = 0usize;

    for tok in tokens {
        match tok.kind {
            TokenKind::Comment(text) => {
                if newlines > 1 {
                    flush_group(&mut current, &mut groups);
                }
                current.push((text, tok.span));
                newlines = 0;
            }
            TokenKind::Newline => {
                newlines += 1;
                kept.push(tok);
            }
            _ => {
                flush_group(&mut current, &mut groups);
                kept.push(tok);
            }
        }
    }
    flush_group(&mut current, &mut groups);

    (kept, groups)
}

fn flush_group(current: &mut Vec<(String, Span)>, groups: &mut Vec<CommentGroup>) {
    let (Some(first), Some(last)) = (current.first(), current.last()) else {
        return;
    };
    let form = if first.0.starts_with("/*") {
        CommentForm::Block
    } else {
        CommentForm::Line
    };
    let span = first.1.to(last.1);
    let text = current.iter().map(|(text, _)| text.as_str()).collect::<Vec<_>>().join("\n");
    groups.push(CommentGroup { form, text, span });
    current.clear();
}

/// Strip the quotes of an interpreted or raw string literal.
fn unquote(raw: &str) -> &str {
    raw.get(1..raw.len().saturating_sub(1)).unwrap_or("")
}

/// Result of parsing: the package name, imports, function signatures and
/// comment groups, plus any errors found.
#[derive(Debug)]
pub struct ParseResult {
    pub package: Option<String>,
    pub imports: Vec<ImportSpec>,
    pub funcs: Vec<FuncDecl>,
    pub comments: Vec<CommentGroup>,
    pub errors: Vec<ParseError>,
}

impl ParseResult {
    /// Returns true if parsing completed without errors.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A parser error with location and friendly message.
#[derive(Debug, Clone)]
pub struct ParseError {
    pub span: Span,
    pub message: String,
    pub hint: Option<String>,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ParseError {}

impl ParseError {
    fn new(message: impl Into<String>, span: Span) -> Self {
        Self { span, message: message.into(), hint: None }
    }

    fn expected(expected: &str, found: &TokenKind, span: Span) -> Self {
        let message = format_expected_message(expected, found);
        let hint = crate::hints::for_expected(expected, found).map(String::from);
        Self { span, message, hint }
    }

    fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    fn unbalanced(found: &TokenKind, span: Span) -> Self {
        Self::new(format!("Unexpected {} with no matching opener", found.display_name()), span)
    }

    fn unclosed(opener: &TokenKind, span: Span) -> Self {
        Self::new(format!("Unclosed {}", opener.display_name()), span)
            .with_hint("every opening delimiter needs a matching closer")
    }
}

/// Format a user-friendly "expected X, found Y" message.
fn format_expected_message(expected: &str, found: &TokenKind) -> String {
    match expected {
        "newline or ';'" => format!("Expected newline or ';', found {}", found.display_name()),
        "'{'" => format!("Expected '{{' to start the function body, found {}", found.display_name()),
        "')'" => {
            if matches!(found, TokenKind::Eof) {
                "Unclosed '(' - missing ')'".to_string()
            } else {
                format!("Expected ')', found {}", found.display_name())
            }
        }
        "']'" => {
            if matches!(found, TokenKind::Eof) {
                "Unclosed '[' - missing ']'".to_string()
            } else {
                format!("Expected ']', found {}", found.display_name())
            }
        }
        "a name" => format!("Expected name, found {}", found.display_name()),
        "type" => format!("Expected type, found {}", found.display_name()),
        s if s.starts_with("declaration") => {
            format!("Expected declaration, found {}", found.display_name())
        }
        _ => format!("Expected {}, found {}", expected, found.display_name()),
    }
}
