// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Parsed source files as handed from a front end to the generator.

use std::path::PathBuf;

use crate::decl::{FuncDecl, ImportSpec};
use crate::{LineMap, LineRange, Span};

/// How a comment group was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentForm {
    /// A run of `//` comments.
    Line,
    /// A `/* ... */` comment.
    Block,
}

/// Consecutive comments with no code and no blank line between them.
#[derive(Debug, Clone, PartialEq)]
pub struct CommentGroup {
    pub form: CommentForm,
    /// Raw comment text, delimiters included, one comment per line.
    pub text: String,
    pub span: Span,
}

/// One parsed source file.
#[derive(Debug, Clone)]
pub struct SourceUnit {
    pub path: PathBuf,
    pub package: String,
    pub imports: Vec<ImportSpec>,
    pub funcs: Vec<FuncDecl>,
    pub comments: Vec<CommentGroup>,
    pub line_map: LineMap,
}

impl SourceUnit {
    pub fn lines(&self, span: Span) -> LineRange {
        self.line_map.lines(span)
    }
}
