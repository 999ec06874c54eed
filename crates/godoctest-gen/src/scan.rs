// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Source scanner.
//!
//! Parses every accepted file of a directory and pairs each function with
//! the annotation block that starts on the line right after its signature.
//! Only that exact line counts; nearby comments are never searched.

use std::fs;
use std::path::{Path, PathBuf};

use godoctest_ast::decl::{FuncDecl, ImportSpec};
use godoctest_ast::source::{CommentForm, SourceUnit};
use godoctest_ast::{Frontend, LineRange};
use log::debug;

use crate::{GenConfig, GenError};

/// A comment group holding a test table.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationBlock {
    /// Raw comment text, delimiters included.
    pub text: String,
    pub form: CommentForm,
    /// First line of the block; always the line after the signature.
    pub line: u32,
}

#[derive(Debug, Clone)]
pub struct ScannedDecl {
    pub func: FuncDecl,
    /// Lines of the signature.
    pub lines: LineRange,
    pub annotation: Option<AnnotationBlock>,
}

#[derive(Debug, Clone)]
pub struct ScannedFile {
    pub path: PathBuf,
    pub package: String,
    /// Imports of the source file, offered to generated code.
    pub imports: Vec<ImportSpec>,
    pub decls: Vec<ScannedDecl>,
}

impl ScannedFile {
    pub fn annotated(&self) -> impl Iterator<Item = (&ScannedDecl, &AnnotationBlock)> {
        self.decls.iter().filter_map(|d| d.annotation.as_ref().map(|a| (d, a)))
    }
}

/// Scan every file in `dir` the front end accepts, in path order.
///
/// Any file that fails to parse fails the whole scan.
pub fn scan_dir(
    frontend: &dyn Frontend,
    dir: &Path,
    config: &GenConfig,
) -> Result<Vec<ScannedFile>, GenError> {
    let entries = fs::read_dir(dir).map_err(|e| GenError::io(dir, e))?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| GenError::io(dir, e))?.path();
        if path.is_file() && frontend.accepts(&path) {
            paths.push(path);
        }
    }
    paths.sort();

    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let source = fs::read_to_string(&path).map_err(|e| GenError::io(&path, e))?;
        let unit = frontend.parse_file(&path, &source)?;
        files.push(scan_unit(unit, &config.sentinel));
    }
    Ok(files)
}

/// Pair the functions of one parsed file with their annotation blocks.
pub fn scan_unit(unit: SourceUnit, sentinel: &str) -> ScannedFile {
    let SourceUnit { path, package, imports, funcs, comments, line_map } = unit;

    let decls = funcs
        .into_iter()
        .map(|func| {
            let lines = line_map.lines(func.signature);
            let annotation = comments
                .iter()
                .find(|group| {
                    line_map.lines(group.span).start == lines.end + 1 && group.text.contains(sentinel)
                })
                .map(|group| AnnotationBlock {
                    text: group.text.clone(),
                    form: group.form,
                    line: lines.end + 1,
                });
            if annotation.is_some() {
                debug!("{}: `{}` has an annotation block", path.display(), func.name);
            }
            ScannedDecl { func, lines, annotation }
        })
        .collect();

    ScannedFile { path, package, imports, decls }
}
